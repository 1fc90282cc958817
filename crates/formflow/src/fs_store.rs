//! Directory-backed collaborators used by the CLI.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use formflow_spec::{FormDocument, FormStore, Submission, SubmissionService, TransportError};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Stores each form as `<root>/<id>.json`.
#[derive(Debug, Clone)]
pub struct FsFormStore {
    root: PathBuf,
}

impl FsFormStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, TransportError> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !id.starts_with('.');
        if !safe {
            return Err(TransportError::Rejected(format!("invalid form id '{id}'")));
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    async fn write(
        &self,
        path: &Path,
        form: &FormDocument,
        id: &str,
    ) -> Result<(), TransportError> {
        let mut stored = form.clone();
        stored.id = id.to_string();
        fs::create_dir_all(&self.root).await?;
        fs::write(path, serde_json::to_vec_pretty(&stored)?).await?;
        debug!(path = %path.display(), "wrote form");
        Ok(())
    }
}

fn not_found(id: &str, err: std::io::Error) -> TransportError {
    if err.kind() == ErrorKind::NotFound {
        TransportError::NotFound(id.to_string())
    } else {
        TransportError::Io(err)
    }
}

#[async_trait]
impl FormStore for FsFormStore {
    async fn create(&self, form: &FormDocument) -> Result<String, TransportError> {
        let id = if form.id.is_empty() {
            format!("form-{}", Uuid::new_v4())
        } else {
            form.id.clone()
        };
        let path = self.path_for(&id)?;
        if fs::try_exists(&path).await? {
            return Err(TransportError::Conflict(id));
        }
        self.write(&path, form, &id).await?;
        Ok(id)
    }

    async fn read(&self, id: &str) -> Result<FormDocument, TransportError> {
        let path = self.path_for(id)?;
        let raw = fs::read(&path).await.map_err(|err| not_found(id, err))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn update(&self, id: &str, form: &FormDocument) -> Result<(), TransportError> {
        let path = self.path_for(id)?;
        if !fs::try_exists(&path).await? {
            return Err(TransportError::NotFound(id.to_string()));
        }
        self.write(&path, form, id).await
    }

    async fn delete(&self, id: &str) -> Result<(), TransportError> {
        let path = self.path_for(id)?;
        fs::remove_file(&path).await.map_err(|err| not_found(id, err))
    }
}

/// Records each submission as `<dir>/<receipt>.json`.
#[derive(Debug, Clone)]
pub struct FsSubmissions {
    dir: PathBuf,
}

impl FsSubmissions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SubmissionService for FsSubmissions {
    async fn submit(&self, submission: &Submission) -> Result<String, TransportError> {
        let receipt = Uuid::new_v4().to_string();
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{receipt}.json"));
        fs::write(&path, serde_json::to_vec_pretty(submission)?).await?;
        debug!(path = %path.display(), "recorded submission");
        Ok(receipt)
    }
}
