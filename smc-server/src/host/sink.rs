//! Output sinks for host command dispatch
//!
//! Everything a command would normally print back to whoever invoked it goes
//! through an [`OutputSink`]. The command bridge hands the host a
//! [`CaptureSink`] so the text can be returned to the remote caller; code
//! paths that don't need the text use a [`PassthroughSink`], which forwards
//! it to the server log.

use tracing::info;

/// Receiver of the text a command sends back to its invoker
pub trait OutputSink {
    /// Sends one message line
    fn send_message(&mut self, message: &str);

    /// Sends several messages, each as its own line
    fn send_messages(&mut self, messages: &[&str]) {
        for message in messages {
            self.send_message(message);
        }
    }
}

/// Sink that buffers output for a single execution
#[derive(Debug, Default)]
pub struct CaptureSink {
    buffer: String,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured text with surrounding whitespace trimmed
    pub fn output(&self) -> &str {
        self.buffer.trim()
    }

    pub fn into_output(self) -> String {
        self.output().to_string()
    }
}

impl OutputSink for CaptureSink {
    fn send_message(&mut self, message: &str) {
        self.buffer.push_str(message);
        self.buffer.push('\n');
    }
}

/// Sink that writes every message to the server log
pub struct PassthroughSink {
    sender: String,
}

impl PassthroughSink {
    /// # Arguments
    /// * `sender` - Name recorded alongside each forwarded line
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl OutputSink for PassthroughSink {
    fn send_message(&mut self, message: &str) {
        info!(sender = %self.sender, "{}", message);
    }
}
