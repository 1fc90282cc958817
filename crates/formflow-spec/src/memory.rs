//! In-process collaborators for tests and dry runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::services::{
    FileSelection, FileStorage, FormStore, Submission, SubmissionService, TransportError,
};
use crate::wire::FormDocument;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Form store backed by a map. `fail_next` makes the next call fail once.
#[derive(Debug, Default)]
pub struct MemoryFormStore {
    forms: Mutex<BTreeMap<String, FormDocument>>,
    next_id: AtomicUsize,
    fail_next: AtomicBool,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.forms).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), TransportError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TransportError::Rejected("store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl FormStore for MemoryFormStore {
    async fn create(&self, form: &FormDocument) -> Result<String, TransportError> {
        self.check_failure()?;
        let mut forms = lock(&self.forms);
        let id = if form.id.is_empty() {
            format!("form-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        } else {
            form.id.clone()
        };
        if forms.contains_key(&id) {
            return Err(TransportError::Conflict(id));
        }
        let mut stored = form.clone();
        stored.id = id.clone();
        forms.insert(id.clone(), stored);
        Ok(id)
    }

    async fn read(&self, id: &str) -> Result<FormDocument, TransportError> {
        self.check_failure()?;
        lock(&self.forms)
            .get(id)
            .cloned()
            .ok_or_else(|| TransportError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, form: &FormDocument) -> Result<(), TransportError> {
        self.check_failure()?;
        let mut forms = lock(&self.forms);
        let slot = forms
            .get_mut(id)
            .ok_or_else(|| TransportError::NotFound(id.to_string()))?;
        *slot = form.clone();
        slot.id = id.to_string();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), TransportError> {
        self.check_failure()?;
        lock(&self.forms)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TransportError::NotFound(id.to_string()))
    }
}

/// Submission sink that keeps every accepted submission.
#[derive(Debug, Default)]
pub struct MemorySubmissions {
    accepted: Mutex<Vec<Submission>>,
    fail_next: AtomicBool,
}

impl MemorySubmissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn accepted(&self) -> Vec<Submission> {
        lock(&self.accepted).clone()
    }
}

#[async_trait]
impl SubmissionService for MemorySubmissions {
    async fn submit(&self, submission: &Submission) -> Result<String, TransportError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TransportError::Rejected("submission service unavailable".into()));
        }
        let mut accepted = lock(&self.accepted);
        accepted.push(submission.clone());
        Ok(format!("receipt-{}", accepted.len()))
    }
}

/// File storage that names each file `<question>/<n>-<name>`.
#[derive(Debug, Default)]
pub struct MemoryFileStorage {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.files).contains_key(name)
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn store(
        &self,
        question_id: &str,
        file: FileSelection,
    ) -> Result<String, TransportError> {
        let mut files = lock(&self.files);
        let name = format!("{question_id}/{}-{}", files.len() + 1, file.name);
        files.insert(name.clone(), file.bytes);
        Ok(name)
    }
}
