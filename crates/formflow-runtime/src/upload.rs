use formflow_spec::validators::file_type_allowed;
use formflow_spec::{FileSelection, FileStorage, QuestionType, TransportError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::control::ControlInput;
use crate::navigator::Navigator;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("question '{0}' not found")]
    UnknownQuestion(String),
    #[error("question '{0}' does not accept uploads")]
    NotUpload(String),
    #[error("\"{name}\" is not an allowed file type ({allowed})")]
    FileType { name: String, allowed: String },
    #[error("\"{name}\" exceeds the {limit_mb} MB limit")]
    FileTooLarge { name: String, limit_mb: u64 },
    #[error("file storage failed: {0}")]
    Transport(#[from] TransportError),
}

impl Navigator {
    /// Checks the files against the question's type and size limits, stores
    /// them and points the question's control at the stored names.
    ///
    /// Nothing is stored when any file is rejected.
    pub async fn attach_files<S>(
        &mut self,
        question_id: &str,
        files: Vec<FileSelection>,
        storage: &S,
    ) -> Result<Vec<String>, UploadError>
    where
        S: FileStorage + ?Sized,
    {
        let question = self
            .form()
            .question(question_id)
            .ok_or_else(|| UploadError::UnknownQuestion(question_id.to_string()))?;
        if question.kind != QuestionType::Upload {
            return Err(UploadError::NotUpload(question_id.to_string()));
        }
        for file in &files {
            if !file_type_allowed(question, &file.name) {
                return Err(UploadError::FileType {
                    name: file.name.clone(),
                    allowed: question.allowed_file_types.join(", "),
                });
            }
            if let Some(limit_mb) = question.max_file_size_mb
                && file.size_bytes() > limit_mb.saturating_mul(BYTES_PER_MB)
            {
                return Err(UploadError::FileTooLarge {
                    name: file.name.clone(),
                    limit_mb,
                });
            }
        }

        let mut names = Vec::with_capacity(files.len());
        for file in files {
            let name = storage
                .store(question_id, file)
                .await
                .inspect_err(|err| warn!(question = %question_id, %err, "file storage failed"))?;
            names.push(name);
        }
        debug!(question = %question_id, files = names.len(), "attached files");

        if let Some(control) = self.controls_mut().get_mut(question_id) {
            control.apply(ControlInput::Files(names.clone()));
        }
        Ok(names)
    }
}
