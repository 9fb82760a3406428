//! Session countdown.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::schedule::{EventKind, Scheduler, TaskGuard};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Expired,
    Cancelled,
}

/// Result of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick from a cancelled or superseded run, or the countdown is not running.
    Stale,
    /// Seconds left after this tick.
    Remaining(u32),
    /// The countdown just reached zero. Reported once per `start`.
    Expired,
}

/// A restartable one-second countdown.
///
/// The wall-clock wait lives in a ticker task; the countdown itself only
/// changes when [`tick`](Self::tick) is applied by its owner.
#[derive(Debug)]
pub struct Countdown {
    state: CountdownState,
    duration_secs: u32,
    remaining_secs: u32,
    deadline: Option<Instant>,
    generation: u64,
    ticker: Option<TaskGuard>,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: CountdownState::Idle,
            duration_secs: 0,
            remaining_secs: 0,
            deadline: None,
            generation: 0,
            ticker: None,
        }
    }

    /// (Re)start from `duration_secs`. Any previous run is abandoned.
    pub fn start(&mut self, duration_secs: u32, session: Uuid, scheduler: &Scheduler) {
        self.ticker = None;
        self.generation += 1;
        self.state = CountdownState::Running;
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
        self.deadline = Some(Instant::now() + Duration::from_secs(duration_secs.into()));
        self.ticker = scheduler.every(session, TICK, EventKind::Tick {
            generation: self.generation,
        });
        debug!(%session, duration_secs, generation = self.generation, "countdown started");
    }

    /// Stop a running countdown. Ticks already in flight become stale.
    pub fn cancel(&mut self) {
        self.ticker = None;
        self.deadline = None;
        self.generation += 1;
        if self.state == CountdownState::Running {
            self.state = CountdownState::Cancelled;
        }
    }

    /// Apply a tick scheduled under `generation`.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if generation != self.generation || self.state != CountdownState::Running {
            return TickOutcome::Stale;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = CountdownState::Expired;
            self.ticker = None;
            TickOutcome::Expired
        } else {
            TickOutcome::Remaining(self.remaining_secs)
        }
    }

    /// Apply a tick to the current run.
    pub fn tick_now(&mut self) -> TickOutcome {
        self.tick(self.generation)
    }

    /// Whether a running countdown has reached its deadline, even if the
    /// final tick has not been applied yet.
    pub fn is_due(&self) -> bool {
        self.state == CountdownState::Running
            && self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
