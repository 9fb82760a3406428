//! Quiz session core: answer ordering, countdown, session state machine and
//! result recording.

mod error;
mod recorder;
mod schedule;
mod session;
mod shuffle;
mod timer;

pub use error::SessionError;
pub use recorder::ResultRecorder;
pub use schedule::{EventKind, EventReceiver, Scheduler, SessionEvent, TaskGuard};
pub use session::{
    Phase, QuizSession, SessionSettings, SessionState, Transition, DEFAULT_REVEAL_DELAY,
    DEFAULT_TIME_LIMIT_SECS,
};
pub use shuffle::AnswerShuffler;
pub use timer::{Countdown, CountdownState, TickOutcome};
