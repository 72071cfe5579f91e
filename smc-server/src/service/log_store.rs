//! Log store
//!
//! Bounded in-memory window of everything the server logs. Producers on any
//! thread append through [`LogStore::ingest`]; HTTP handlers read it back
//! through the query methods.
//!
//! Entries live in a single `RwLock<VecDeque<LogEntry>>` in insertion order.
//! Queries hold the read lock only while they copy the matching entries out,
//! so readers run concurrently with each other and never observe a
//! half-applied write. Ingest, sweep and clear take the write lock.
//!
//! Nothing here may emit tracing events while a lock is held: the capture
//! layer feeds events back into [`LogStore::ingest`].

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use smc_core::domain::log::{LogEntry, level};
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::debug;

/// Limit that returns every matching entry
pub const UNBOUNDED: usize = usize::MAX;

/// Thread-safe, capacity-bounded log buffer
pub struct LogStore {
    entries: RwLock<VecDeque<LogEntry>>,
    max_size: usize,
    retention: TimeDelta,
}

impl LogStore {
    /// Creates an empty store
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries kept; the oldest is evicted first
    /// * `retention` - Age after which [`LogStore::sweep_expired`] drops an entry
    pub fn new(max_size: usize, retention: Duration) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_size.min(1024))),
            max_size,
            retention: TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Appends a new entry stamped with the current time (millisecond precision)
    ///
    /// A timestamp that would go backwards (clock adjustments) is clamped to
    /// the previous entry's, so storage order and time order always agree.
    pub fn ingest(
        &self,
        level: impl Into<String>,
        source: impl Into<String>,
        message: impl Into<String>,
    ) {
        let level = level.into();
        let source = source.into();
        let message = message.into();

        let mut entries = self.write();
        let now = Utc::now().trunc_subsecs(3);
        let timestamp = entries.back().map_or(now, |last| last.timestamp.max(now));

        entries.push_back(LogEntry {
            timestamp,
            level,
            source,
            message,
        });

        while entries.len() > self.max_size {
            entries.pop_front();
        }
    }

    /// Newest-first entries within an inclusive time range
    ///
    /// An inverted range or a zero limit yields an empty result.
    pub fn query(
        &self,
        limit: usize,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Vec<LogEntry> {
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if start > end {
                return Vec::new();
            }
        }

        self.collect_newest(limit, |entry| {
            start_time.is_none_or(|start| entry.timestamp >= start)
                && end_time.is_none_or(|end| entry.timestamp <= end)
        })
    }

    /// Newest-first entries of one level (case-insensitive)
    ///
    /// # Arguments
    /// * `level` - Level to match exactly, ignoring case
    /// * `source` - If given, the entry source must contain this substring
    /// * `limit` - Maximum number of entries returned
    pub fn query_by_level(&self, level: &str, source: Option<&str>, limit: usize) -> Vec<LogEntry> {
        self.collect_newest(limit, |entry| entry.has_level(level) && matches_source(entry, source))
    }

    /// Newest-first `ERROR` entries
    pub fn query_errors(&self, source: Option<&str>, limit: usize) -> Vec<LogEntry> {
        self.query_by_level(level::ERROR, source, limit)
    }

    /// Newest-first warnings, spelled either `WARN` or `WARNING`
    pub fn query_warnings(&self, source: Option<&str>, limit: usize) -> Vec<LogEntry> {
        self.collect_newest(limit, |entry| {
            entry.is_warning() && matches_source(entry, source)
        })
    }

    /// Drops entries older than the retention window
    ///
    /// # Returns
    /// Number of entries removed
    pub fn sweep_expired(&self) -> usize {
        match Utc::now().checked_sub_signed(self.retention) {
            Some(cutoff) => self.sweep_older_than(cutoff),
            None => 0,
        }
    }

    /// Drops every entry stamped strictly before `cutoff`
    pub fn sweep_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut entries = self.write();
        let before = entries.len();

        // Storage order is time order, so expired entries form a prefix
        while entries.front().is_some_and(|entry| entry.timestamp < cutoff) {
            entries.pop_front();
        }

        before - entries.len()
    }

    /// Removes all entries
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Current number of entries
    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// Configured maximum number of entries
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    fn collect_newest(&self, limit: usize, filter: impl Fn(&LogEntry) -> bool) -> Vec<LogEntry> {
        if limit == 0 {
            return Vec::new();
        }

        let entries = self.read();
        entries
            .iter()
            .rev()
            .filter(|entry| filter(entry))
            .take(limit)
            .cloned()
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, VecDeque<LogEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<LogEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches_source(entry: &LogEntry, source: Option<&str>) -> bool {
    source.is_none_or(|source| entry.source.contains(source))
}

/// Spawns a background task that runs the retention sweep periodically
pub fn spawn_retention_sweep(store: Arc<LogStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(every);

        loop {
            ticker.tick().await;

            let removed = store.sweep_expired();
            if removed > 0 {
                debug!("Retention sweep removed {} log entries", removed);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn store(capacity: usize) -> LogStore {
        LogStore::new(capacity, DAY)
    }

    fn messages(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.message.as_str()).collect()
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = store(100);
        for i in 0..150 {
            store.ingest("INFO", "Server", format!("Message {}", i));
        }

        assert_eq!(store.size(), 100);

        let logs = store.query(UNBOUNDED, None, None);
        assert_eq!(logs.len(), 100);
        assert_eq!(logs.first().unwrap().message, "Message 149");
        assert_eq!(logs.last().unwrap().message, "Message 50");
    }

    #[test]
    fn test_retained_entries_keep_insertion_order() {
        let store = store(3);
        for message in ["a", "b", "c", "d", "e"] {
            store.ingest("INFO", "Server", message);
        }

        let mut logs = store.query(UNBOUNDED, None, None);
        logs.reverse();
        assert_eq!(messages(&logs), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_timestamps_never_decrease() {
        let store = store(1000);
        for i in 0..500 {
            store.ingest("INFO", "Server", i.to_string());
        }

        let logs = store.query(UNBOUNDED, None, None);
        assert!(logs.windows(2).all(|pair| pair[0].timestamp >= pair[1].timestamp));
    }

    #[test]
    fn test_query_respects_limit() {
        let store = store(100);
        for i in 0..10 {
            store.ingest("INFO", "Server", format!("Message {}", i));
        }

        let logs = store.query(3, None, None);
        assert_eq!(messages(&logs), vec!["Message 9", "Message 8", "Message 7"]);
    }

    #[test]
    fn test_zero_limit_is_empty() {
        let store = store(100);
        store.ingest("ERROR", "Server", "boom");

        assert!(store.query(0, None, None).is_empty());
        assert!(store.query_errors(None, 0).is_empty());
        assert!(store.query_warnings(None, 0).is_empty());
    }

    #[test]
    fn test_time_range_is_inclusive() {
        let store = store(100);
        store.ingest("INFO", "Server", "only");
        let timestamp = store.query(1, None, None)[0].timestamp;

        assert_eq!(store.query(UNBOUNDED, Some(timestamp), Some(timestamp)).len(), 1);

        let later = timestamp + TimeDelta::milliseconds(1);
        assert!(store.query(UNBOUNDED, Some(later), None).is_empty());

        let earlier = timestamp - TimeDelta::milliseconds(1);
        assert!(store.query(UNBOUNDED, None, Some(earlier)).is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let store = store(100);
        store.ingest("INFO", "Server", "message");

        let now = Utc::now();
        let logs = store.query(UNBOUNDED, Some(now), Some(now - TimeDelta::hours(1)));
        assert!(logs.is_empty());
    }

    #[test]
    fn test_query_by_level_ignores_case() {
        let store = store(100);
        store.ingest("ERROR", "Server", "upper");
        store.ingest("error", "Server", "lower");
        store.ingest("INFO", "Server", "info");

        let upper = store.query_by_level("ERROR", None, UNBOUNDED);
        let lower = store.query_by_level("error", None, UNBOUNDED);
        assert_eq!(upper, lower);
        assert_eq!(messages(&upper), vec!["lower", "upper"]);
    }

    #[test]
    fn test_source_filter_is_case_sensitive_substring() {
        let store = store(100);
        store.ingest("ERROR", "WorldEdit", "we");
        store.ingest("ERROR", "Essentials", "ess");
        store.ingest("ERROR", "EssentialsChat", "chat");

        let logs = store.query_errors(Some("Essentials"), UNBOUNDED);
        assert_eq!(messages(&logs), vec!["chat", "ess"]);

        assert!(store.query_errors(Some("essentials"), UNBOUNDED).is_empty());
    }

    #[test]
    fn test_warnings_match_both_spellings() {
        let store = store(100);
        store.ingest("WARN", "Server", "warn");
        store.ingest("WARNING", "Server", "warning");
        store.ingest("ERROR", "Server", "error");
        store.ingest("INFO", "Server", "info");

        let logs = store.query_warnings(None, UNBOUNDED);
        assert_eq!(messages(&logs), vec!["warning", "warn"]);
    }

    #[test]
    fn test_unknown_level_only_matches_itself() {
        let store = store(100);
        store.ingest("FINE", "Server", "fine");

        assert!(store.query_errors(None, UNBOUNDED).is_empty());
        assert!(store.query_warnings(None, UNBOUNDED).is_empty());
        assert_eq!(store.query_by_level("fine", None, UNBOUNDED).len(), 1);
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let store = store(100);
        let message = "java.lang.IllegalStateException: bad\n    at Foo.bar(Foo.java:1)";
        store.ingest("ERROR", "MyPlugin", message);

        let entry = &store.query_errors(Some("MyPlugin"), 1)[0];
        assert_eq!(entry.level, "ERROR");
        assert_eq!(entry.source, "MyPlugin");
        assert_eq!(entry.message, message);
    }

    #[test]
    fn test_sweep_older_than_removes_prefix() {
        let store = store(100);
        store.ingest("INFO", "Server", "old");
        store.ingest("INFO", "Server", "older");

        assert_eq!(store.sweep_older_than(Utc::now() - TimeDelta::hours(1)), 0);
        assert_eq!(store.sweep_older_than(Utc::now() + TimeDelta::seconds(1)), 2);
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_sweep_expired_is_idempotent() {
        let store = LogStore::new(100, Duration::from_secs(3600));
        for i in 0..5 {
            store.ingest("INFO", "Server", i.to_string());
        }

        assert_eq!(store.sweep_expired(), 0);
        assert_eq!(store.sweep_expired(), 0);
        assert_eq!(store.size(), 5);
    }

    #[test]
    fn test_sweep_expired_with_zero_retention() {
        let store = LogStore::new(100, Duration::ZERO);
        store.ingest("INFO", "Server", "stale");
        thread::sleep(Duration::from_millis(5));

        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.sweep_expired(), 0);
    }

    #[test]
    fn test_clear() {
        let store = store(100);
        store.ingest("INFO", "Server", "a");
        store.ingest("INFO", "Server", "b");

        store.clear();
        assert_eq!(store.size(), 0);
        assert!(store.query(UNBOUNDED, None, None).is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_concurrent_ingest_never_loses_entries() {
        const PRODUCERS: usize = 8;
        const PER_PRODUCER: usize = 500;

        for capacity in [1000, 10_000] {
            let store = store(capacity);

            thread::scope(|scope| {
                for producer in 0..PRODUCERS {
                    let store = &store;
                    scope.spawn(move || {
                        for i in 0..PER_PRODUCER {
                            store.ingest("INFO", format!("producer-{}", producer), i.to_string());
                        }
                    });
                }
                // Readers run alongside the producers
                for _ in 0..2 {
                    let store = &store;
                    scope.spawn(move || {
                        for _ in 0..50 {
                            let logs = store.query(100, None, None);
                            assert!(logs.len() <= 100);
                        }
                    });
                }
            });

            assert_eq!(store.size(), (PRODUCERS * PER_PRODUCER).min(capacity));
        }
    }

    #[test]
    fn test_concurrent_producers_keep_per_thread_order() {
        let store = store(10_000);

        thread::scope(|scope| {
            for producer in 0..4 {
                let store = &store;
                scope.spawn(move || {
                    for i in 0..200 {
                        store.ingest("INFO", format!("p{}", producer), i.to_string());
                    }
                });
            }
        });

        let logs = store.query(UNBOUNDED, None, None);
        for producer in 0..4 {
            let source = format!("p{}", producer);
            let seen: Vec<usize> = logs
                .iter()
                .filter(|entry| entry.source == source)
                .map(|entry| entry.message.parse().unwrap())
                .collect();
            assert_eq!(seen, (0..200).rev().collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_retention_sweep_task_runs() {
        let store = Arc::new(LogStore::new(100, Duration::ZERO));
        store.ingest("INFO", "Server", "stale");
        thread::sleep(Duration::from_millis(5));

        // The first tick fires immediately
        let handle = spawn_retention_sweep(Arc::clone(&store), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(store.size(), 0);
        handle.abort();
    }
}
