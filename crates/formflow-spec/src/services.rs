//! Collaborators consumed by the editor and the navigator.
//!
//! Persistence, submission and file storage sit behind async traits; the
//! core never rolls local state back when one of them fails, so callers can
//! retry.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wire::FormDocument;

/// Errors raised by external collaborators.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("form '{0}' not found")]
    NotFound(String),
    #[error("form '{0}' already exists")]
    Conflict(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Create/read/update/delete of form documents by id.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Stores a new document and returns its id. An empty `form.id` lets the
    /// store pick one.
    async fn create(&self, form: &FormDocument) -> Result<String, TransportError>;
    async fn read(&self, id: &str) -> Result<FormDocument, TransportError>;
    async fn update(&self, id: &str, form: &FormDocument) -> Result<(), TransportError>;
    async fn delete(&self, id: &str) -> Result<(), TransportError>;
}

/// One stringified answer as handed to the submission service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubmittedAnswer {
    pub question_id: String,
    pub question_number: usize,
    pub value: String,
}

/// Final answers of one fill-out, ordered by global question number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Submission {
    pub form_id: String,
    pub answers: Vec<SubmittedAnswer>,
}

#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Records a submission and returns a receipt id.
    async fn submit(&self, submission: &Submission) -> Result<String, TransportError>;
}

/// File chosen by the respondent for an upload question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores the file and returns the stable name kept as the answer value.
    async fn store(&self, question_id: &str, file: FileSelection) -> Result<String, TransportError>;
}
