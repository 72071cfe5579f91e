//! Host thread
//!
//! The managed host owns its command-dispatch state on exactly one thread.
//! [`HostThread`] starts that thread and owns the host value; everything
//! else talks to it through a cloneable [`HostHandle`], which queues work
//! onto the thread without ever waiting for it.
//!
//! Hand-off is one-directional: callers enqueue and (optionally) await a
//! one-shot reply, the host thread runs the task and replies with a
//! non-blocking send. If the caller stopped listening, the reply is dropped.

mod console;
mod sink;

pub use console::ConsoleHost;
pub use sink::{CaptureSink, OutputSink, PassthroughSink};

use smc_core::dto::status::{CommandInfo, PlayerInfo, PluginInfo};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

/// Errors surfaced by the host or the host thread
#[derive(Debug, Error)]
pub enum HostError {
    /// The host thread has shut down and accepts no more work
    #[error("Host is not running")]
    Stopped,

    /// The host failed while running a command
    #[error("{0}")]
    Command(String),

    /// A task panicked or was dropped before replying
    #[error("Host task failed: {0}")]
    TaskFailed(String),
}

/// The single-threaded host whose commands are dispatched remotely
pub trait CommandHost: Send + 'static {
    /// Dispatches one command as the console
    ///
    /// All text meant for the invoker must go to `sender`.
    ///
    /// # Returns
    /// `Ok(true)` if the host handled the command, `Ok(false)` if it refused it
    fn dispatch(&mut self, sender: &mut dyn OutputSink, command: &str) -> Result<bool, HostError>;

    /// Raw version string of the host (e.g. "1.20.4-R0.1-SNAPSHOT")
    fn version(&self) -> String;

    /// Commands the host can dispatch
    fn commands(&self) -> Vec<CommandInfo> {
        Vec::new()
    }

    /// Plugins loaded into the host
    fn plugins(&self) -> Vec<PluginInfo> {
        Vec::new()
    }

    /// Players currently connected
    fn players(&self) -> Vec<PlayerInfo> {
        Vec::new()
    }
}

/// Work item run on the host thread
pub type HostTask = Box<dyn FnOnce(&mut dyn CommandHost) + Send + 'static>;

enum HostMessage {
    Run(HostTask),
    Shutdown,
}

/// Owner of the dedicated host thread
pub struct HostThread {
    handle: HostHandle,
    thread: Option<JoinHandle<()>>,
}

impl HostThread {
    /// Moves `host` onto a new dedicated thread and starts its task loop
    pub fn spawn(host: impl CommandHost) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let host: Box<dyn CommandHost> = Box::new(host);

        let thread = std::thread::Builder::new()
            .name("smc-host".to_string())
            .spawn(move || run_host_loop(host, rx))?;

        Ok(Self {
            handle: HostHandle { tx },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    /// Stops the loop after tasks already queued and waits for the thread
    ///
    /// Blocks the calling thread until the host thread exits.
    pub fn shutdown(mut self) {
        let _ = self.handle.tx.send(HostMessage::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Host thread terminated abnormally");
            }
        }
    }
}

impl Drop for HostThread {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.handle.tx.send(HostMessage::Shutdown);
        }
    }
}

fn run_host_loop(mut host: Box<dyn CommandHost>, mut rx: mpsc::UnboundedReceiver<HostMessage>) {
    info!("Host thread started");

    while let Some(message) = rx.blocking_recv() {
        match message {
            HostMessage::Run(task) => {
                let host = host.as_mut();
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || task(host))) {
                    error!("Host task panicked: {}", panic_message(payload.as_ref()));
                }
            }
            HostMessage::Shutdown => break,
        }
    }

    info!("Host thread stopped");
}

/// Cloneable sender side of the host task queue
#[derive(Clone)]
pub struct HostHandle {
    tx: mpsc::UnboundedSender<HostMessage>,
}

impl HostHandle {
    /// Queues `task` to run on the host thread
    ///
    /// Never blocks. Tasks run in the order they were queued.
    pub fn submit<F>(&self, task: F) -> Result<(), HostError>
    where
        F: FnOnce(&mut dyn CommandHost) + Send + 'static,
    {
        self.tx
            .send(HostMessage::Run(Box::new(task)))
            .map_err(|_| HostError::Stopped)
    }

    /// Runs `f` on the host thread and waits for its return value
    pub async fn call<F, R>(&self, f: F) -> Result<R, HostError>
    where
        F: FnOnce(&mut dyn CommandHost) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.submit(move |host| {
            let _ = reply_tx.send(f(host));
        })?;

        reply_rx
            .await
            .map_err(|_| HostError::TaskFailed("task ended without a reply".to_string()))
    }

    /// False once the host thread has exited
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Extracts the message of a caught panic
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
