//! CLI configuration (`config.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FormflowConfig {
    /// Directory holding stored form documents.
    pub store_dir: Option<PathBuf>,
    /// Directory receiving submissions recorded by `fill`.
    pub submissions_dir: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log: Option<String>,
}

impl FormflowConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "formflow", "formflow")
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads `explicit` when given (it must exist), otherwise the default
    /// location if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn log_filter(&self) -> &str {
        self.log.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("forms"))
    }

    pub fn submissions_dir(&self) -> PathBuf {
        self.submissions_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("submissions"))
    }
}

fn data_dir() -> PathBuf {
    FormflowConfig::project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".formflow"))
}
