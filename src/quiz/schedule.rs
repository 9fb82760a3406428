//! Deferred wake-ups for a quiz session.
//!
//! Timers run as tokio tasks that post [`SessionEvent`]s to the single event
//! loop owning the session. Every event carries the session id and the
//! generation it was scheduled under; cancelling aborts the task and bumps
//! the generation, so an event that is already queued arrives stale and is
//! dropped by the receiver.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use uuid::Uuid;

/// A wake-up addressed to one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEvent {
    pub session: Uuid,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// One second of the countdown elapsed.
    Tick { generation: u64 },
    /// The reveal display delay is over.
    RevealElapsed { generation: u64 },
}

/// Receiving half handed to the event loop.
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Spawns deferred actions that report back through the event channel.
///
/// A manual scheduler spawns nothing; its owner drives time by hand.
#[derive(Debug, Clone)]
pub struct Scheduler {
    tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl Scheduler {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Create a scheduler together with the receiver its events arrive on.
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn manual() -> Self {
        Self { tx: None }
    }

    /// Post `kind` every `period`, starting one period from now.
    pub(crate) fn every(&self, session: Uuid, period: Duration, kind: EventKind) -> Option<TaskGuard> {
        let tx = self.tx.clone()?;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(SessionEvent { session, kind }).is_err() {
                    break;
                }
            }
        });
        Some(TaskGuard(handle))
    }

    /// Post `kind` once after `delay`.
    pub(crate) fn after(&self, session: Uuid, delay: Duration, kind: EventKind) -> Option<TaskGuard> {
        let tx = self.tx.clone()?;
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(SessionEvent { session, kind });
        });
        Some(TaskGuard(handle))
    }
}

/// Aborts the wrapped task when dropped.
#[derive(Debug)]
pub struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
