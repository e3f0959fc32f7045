//! Local filesystem env source using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use gantry_core::{application::ports::EnvSource, domain::ConfigError};

/// Production env source reading from disk.
#[derive(Debug, Clone, Copy)]
pub struct LocalEnvSource;

impl LocalEnvSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalEnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvSource for LocalEnvSource {
    fn read(&self, path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e))
    }

    /// Absolute path when the file exists, so relative `--env-file`
    /// values still yield a usable base directory.
    fn locate(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

fn map_io_error(path: &Path, e: io::Error) -> ConfigError {
    match e.kind() {
        io::ErrorKind::NotFound => ConfigError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(".env");
        fs::write(&file, "APP_ID=basic\n").unwrap();

        let source = LocalEnvSource::new();
        assert_eq!(source.read(&file).unwrap(), "APP_ID=basic\n");
        assert!(source.locate(&file).is_absolute());
    }

    #[test]
    fn missing_file_is_missing_file_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("absent.env");
        assert_eq!(
            LocalEnvSource::new().read(&file),
            Err(ConfigError::MissingFile { path: file })
        );
    }

    #[test]
    fn non_utf8_content_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join(".env");
        fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            LocalEnvSource::new().read(&file),
            Err(ConfigError::Unreadable { .. })
        ));
    }
}
