mod error;
mod history;
mod source;

pub use error::{HistoryError, SourceError};
pub use history::{HistoryStore, JsonHistoryStore, MemoryHistoryStore};
pub use source::{JsonFileSource, OpenTdbSource, QuestionRequest, QuestionSource, DEFAULT_ENDPOINT};
