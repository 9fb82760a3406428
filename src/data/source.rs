//! Question sources.
//!
//! A source is asked once per session for a batch of questions. It either
//! returns the whole ordered batch or fails; retrying is left to the caller.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, info};

use crate::models::{Difficulty, Question};

use super::error::SourceError;

/// Default Open Trivia DB endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://opentdb.com/api.php";

/// Parameters for one question fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    pub amount: usize,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
}

/// Provider of question batches.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch an ordered, non-empty batch of questions.
    async fn fetch_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, SourceError>;
}

#[derive(Deserialize)]
struct TriviaResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<Question>,
}

/// Open Trivia DB client, multiple-choice questions only.
pub struct OpenTdbSource {
    http: reqwest::Client,
    endpoint: String,
}

impl OpenTdbSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    fn query(request: &QuestionRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![("amount", request.amount.to_string())];
        if let Some(category) = request.category {
            query.push(("category", category.to_string()));
        }
        if let Some(difficulty) = request.difficulty {
            query.push(("difficulty", difficulty.to_string()));
        }
        query.push(("type", "multiple".to_string()));
        query
    }
}

impl Default for OpenTdbSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl QuestionSource for OpenTdbSource {
    async fn fetch_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, SourceError> {
        debug!(endpoint = %self.endpoint, ?request, "fetching questions");
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&Self::query(request))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SourceError::Api {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }

        let body = resp.text().await?;
        let questions = parse_trivia_response(&body)?;
        info!(count = questions.len(), "fetched questions");
        Ok(questions)
    }
}

fn parse_trivia_response(body: &str) -> Result<Vec<Question>, SourceError> {
    let data: TriviaResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    if data.response_code != 0 {
        return Err(SourceError::ResponseCode(data.response_code));
    }
    validate(data.results)
}

fn validate(questions: Vec<Question>) -> Result<Vec<Question>, SourceError> {
    if questions.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(questions)
}

/// Questions read from a local JSON file: an array of question objects.
///
/// Category and difficulty are ignored; the first `amount` questions are used.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn load(&self, amount: usize) -> Result<Vec<Question>, SourceError> {
        let json_content = fs::read_to_string(&self.path).await?;
        let mut questions: Vec<Question> = serde_json::from_str(&json_content)
            .map_err(|e| SourceError::Parse(format!("{}: {}", self.path.display(), e)))?;
        questions.truncate(amount);
        validate(questions)
    }
}

#[async_trait]
impl QuestionSource for JsonFileSource {
    async fn fetch_questions(&self, request: &QuestionRequest) -> Result<Vec<Question>, SourceError> {
        debug!(path = %self.path.display(), "loading questions from file");
        self.load(request.amount).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const FIXTURE: &str = r#"{
        "response_code": 0,
        "results": [
            {
                "type": "multiple",
                "difficulty": "easy",
                "category": "Animals",
                "question": "What is the fastest land animal?",
                "correct_answer": "Cheetah",
                "incorrect_answers": ["Lion", "Thomson&#039;s Gazelle", "Pronghorn Antelope"]
            },
            {
                "type": "multiple",
                "difficulty": "easy",
                "category": "Animals",
                "question": "What do you call a baby bat?",
                "correct_answer": "Pup",
                "incorrect_answers": ["Cub", "Chick", "Kid"]
            }
        ]
    }"#;

    #[test]
    fn test_parse_trivia_response() {
        let questions = parse_trivia_response(FIXTURE).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "What is the fastest land animal?");
        assert_eq!(questions[0].correct_answer, "Cheetah");
        // Entities are left for the presentation layer.
        assert_eq!(questions[0].incorrect_answers[1], "Thomson&#039;s Gazelle");
    }

    #[test]
    fn test_parse_nonzero_response_code() {
        let err = parse_trivia_response(r#"{"response_code": 1, "results": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::ResponseCode(1)));
    }

    #[test]
    fn test_parse_empty_results() {
        let err = parse_trivia_response(r#"{"response_code": 0, "results": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::Empty));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_trivia_response("<html>502</html>").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_query_parameters() {
        let request = QuestionRequest {
            amount: 5,
            category: Some(27),
            difficulty: Some(Difficulty::Easy),
        };
        let query = OpenTdbSource::query(&request);
        assert_eq!(
            query,
            vec![
                ("amount", "5".to_string()),
                ("category", "27".to_string()),
                ("difficulty", "easy".to_string()),
                ("type", "multiple".to_string()),
            ]
        );

        let any = QuestionRequest {
            amount: 10,
            category: None,
            difficulty: None,
        };
        assert_eq!(OpenTdbSource::query(&any).len(), 2);
    }

    #[tokio::test]
    async fn test_json_file_source_truncates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"text": "One", "correct_answer": "a", "incorrect_answers": ["b"]}},
                {{"text": "Two", "correct_answer": "c", "incorrect_answers": ["d"]}},
                {{"question": "Three", "correct_answer": "e", "incorrect_answers": ["f"]}}
            ]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let request = QuestionRequest {
            amount: 2,
            category: None,
            difficulty: None,
        };
        let questions = source.fetch_questions(&request).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].text, "Two");
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let request = QuestionRequest {
            amount: 5,
            category: None,
            difficulty: None,
        };
        let err = source.fetch_questions(&request).await.unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[tokio::test]
    async fn test_json_file_source_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not a question list").unwrap();

        let err = JsonFileSource::new(file.path()).load(5).await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
