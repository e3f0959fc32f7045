//! In-memory env source for testing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use gantry_core::{application::ports::EnvSource, domain::ConfigError};

/// Env files held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvSource {
    files: HashMap<PathBuf, String>,
}

impl MemoryEnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl EnvSource for MemoryEnvSource {
    fn read(&self, path: &Path) -> Result<String, ConfigError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ConfigError::MissingFile {
                path: path.to_path_buf(),
            })
    }
}
