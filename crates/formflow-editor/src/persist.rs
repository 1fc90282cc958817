use formflow_spec::{FormDocument, FormReport, FormSpec, FormStore, TransportError, WireError};
use thiserror::Error;
use tracing::{info, warn};

use crate::session::EditorSession;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("form has {} validation error(s)", .0.error_count())]
    Invalid(Box<FormReport>),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("stored form is malformed: {0}")]
    Wire(#[from] WireError),
}

impl EditorSession {
    /// Opens a session on a stored form.
    pub async fn load<S>(store: &S, id: &str) -> Result<Self, LoadError>
    where
        S: FormStore + ?Sized,
    {
        let document = store.read(id).await?;
        Ok(Self::from_form(document.into_spec()?))
    }

    /// Validates the document and persists its sanitized form. Documents the
    /// store does not know yet are created, others updated. Returns the
    /// stored id.
    ///
    /// On failure the session is left exactly as it was, so the save can be
    /// retried.
    pub async fn save<S>(&mut self, store: &S) -> Result<String, SaveError>
    where
        S: FormStore + ?Sized,
    {
        let report = self.validate();
        if report.has_errors {
            return Err(SaveError::Invalid(Box::new(report)));
        }
        let sanitized = FormSpec {
            id: self.form.id.clone(),
            title: self.form.title.trim().to_string(),
            description: self.form.description.trim().to_string(),
            pages: report.sanitized_pages,
        };
        let document = FormDocument::from(&sanitized);

        let result = if sanitized.id.is_empty() {
            store.create(&document).await
        } else {
            match store.update(&sanitized.id, &document).await {
                Ok(()) => Ok(sanitized.id.clone()),
                Err(TransportError::NotFound(_)) => store.create(&document).await,
                Err(err) => Err(err),
            }
        };
        let id = result.inspect_err(|err| warn!(form = %sanitized.id, %err, "save failed"))?;

        info!(form = %id, "saved form");
        self.form = FormSpec { id: id.clone(), ..sanitized };
        Ok(id)
    }
}
