//! Runs controller commands against the backend.
//!
//! Each command becomes its own tokio task; the result is posted back to
//! the event loop as [`Event::Completion`], so the controller only ever
//! sees completions in arrival order alongside keys and ticks.

use std::sync::Arc;

use relchat_engine::ChatBackend;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::controller::{Command, Completion};
use crate::event::Event;

/// Perform one command and wrap its result.
pub async fn run_command(command: Command, backend: &dyn ChatBackend) -> Completion {
    match command {
        Command::FetchStatus => Completion::Status(backend.status().await),
        Command::SendChat { id, message } => Completion::Chat {
            id,
            result: backend.chat(&message).await,
        },
        Command::ClearHistory => Completion::Clear(backend.clear().await),
    }
}

/// Spawn a task running `command` that reports back through `tx`.
pub fn dispatch(
    command: Command,
    backend: Arc<dyn ChatBackend>,
    tx: mpsc::UnboundedSender<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let completion = run_command(command, backend.as_ref()).await;
        if tx.send(Event::Completion(completion)).is_err() {
            tracing::debug!("event loop closed before a request finished");
        }
    })
}

/// Spawned request tasks, aborted when the UI quits.
#[derive(Debug, Default)]
pub struct Dispatcher {
    handles: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `command` and keep its handle.
    pub fn spawn(
        &mut self,
        command: Command,
        backend: &Arc<dyn ChatBackend>,
        tx: &mpsc::UnboundedSender<Event>,
    ) {
        self.handles.retain(|handle| !handle.is_finished());
        self.handles
            .push(dispatch(command, Arc::clone(backend), tx.clone()));
    }

    /// Number of requests still running.
    pub fn in_flight(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort every request still running.
    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}
