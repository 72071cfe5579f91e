//! Log capture
//!
//! [`CaptureLayer`] is a `tracing_subscriber` layer that turns every event
//! into a `(level, source, message)` triple and forwards it to whatever
//! [`LogStore`] is attached to its [`LogCapture`]. Nothing is recorded while
//! no store is attached.
//!
//! Lifecycle: create store, `attach`, run, `detach`, drop store.

use std::error::Error;
use std::fmt::{self, Write as _};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::service::LogStore;

/// Forwarding point between the tracing layer and a log store
#[derive(Default)]
pub struct LogCapture {
    store: RwLock<Option<Arc<LogStore>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts forwarding events into `store`, replacing any previous store
    pub fn attach(&self, store: Arc<LogStore>) {
        *self.store.write().unwrap_or_else(PoisonError::into_inner) = Some(store);
    }

    /// Stops forwarding. Events emitted afterwards are dropped.
    pub fn detach(&self) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    pub fn is_attached(&self) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Hands one record to the attached store, if any
    pub fn forward(&self, level: &str, source: &str, message: String) {
        // Clone the Arc so the store is never written under our own lock
        let store = self
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(store) = store {
            store.ingest(level, source, message);
        }
    }

    /// Builds a subscriber layer bound to this capture point
    pub fn layer(self: &Arc<Self>) -> CaptureLayer {
        CaptureLayer {
            capture: Arc::clone(self),
        }
    }
}

/// `tracing_subscriber` layer that records events into a [`LogCapture`]
pub struct CaptureLayer {
    capture: Arc<LogCapture>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.capture.is_attached() {
            return;
        }

        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        self.capture
            .forward(metadata.level().as_str(), metadata.target(), visitor.finish());
    }
}

/// Renders an error and its whole `source()` chain
///
/// ```text
/// connection refused
/// Caused by: os error 111
/// ```
pub fn render_error_chain(err: &(dyn Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(rendered, "\nCaused by: {}", cause);
        source = cause.source();
    }
    rendered
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<String>,
    errors: Vec<String>,
}

impl EventVisitor {
    fn finish(self) -> String {
        let mut line = self.message;
        for field in self.fields {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&field);
        }
        for error in self.errors {
            if !line.is_empty() {
                line.push('\n');
            }
            line.push_str(&error);
        }
        line
    }

    // `log` crate records bridged by tracing-log carry these
    fn is_ignored(field: &Field) -> bool {
        field.name().starts_with("log.")
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else if !Self::is_ignored(field) {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn Error + 'static)) {
        self.errors.push(render_error_chain(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else if !Self::is_ignored(field) {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}
