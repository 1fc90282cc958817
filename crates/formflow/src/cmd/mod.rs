pub mod fill;
pub mod save;
pub mod schema;
pub mod validate;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use formflow_spec::{FormDocument, FormSpec};

/// Reads a wire-format form document from disk.
pub(crate) fn load_form(path: &Path) -> Result<FormSpec> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read form {}", path.display()))?;
    let document = FormDocument::from_json(&raw)
        .with_context(|| format!("failed to parse form {}", path.display()))?;
    document
        .into_spec()
        .with_context(|| format!("failed to decode form {}", path.display()))
}
