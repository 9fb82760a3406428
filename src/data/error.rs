//! Error types for the question source and history store.

use std::io;

use thiserror::Error;

/// Failure to obtain a question set. No session is created when this occurs.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The trivia API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The trivia API answered with a non-zero `response_code`.
    #[error("trivia API rejected the request: {}", describe_response_code(.0))]
    ResponseCode(u8),

    /// The response or question file could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Reading a local question file failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The source returned no questions.
    #[error("no questions available")]
    Empty,
}

fn describe_response_code(code: &u8) -> &'static str {
    match *code {
        1 => "not enough questions for this query",
        2 => "invalid parameter",
        3 => "session token not found",
        4 => "session token exhausted",
        5 => "rate limited",
        _ => "unknown response code",
    }
}

/// Failure of the history store.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history IO error: {0}")]
    Io(#[from] io::Error),

    #[error("history file is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}
