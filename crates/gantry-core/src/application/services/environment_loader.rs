//! Environment Loader - reads the env file through an [`EnvSource`].
//!
//! This is the only component that touches the file; everything downstream
//! receives the parsed [`EnvironmentMap`].

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::ports::EnvSource;
use crate::domain::{ConfigError, EnvironmentMap};

pub struct EnvironmentLoader {
    source: Box<dyn EnvSource>,
}

impl EnvironmentLoader {
    pub fn new(source: Box<dyn EnvSource>) -> Self {
        Self { source }
    }

    /// Read and parse the file at `path`.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<EnvironmentMap, ConfigError> {
        let text = self.source.read(path)?;
        let env = EnvironmentMap::parse(&text).with_origin(self.source.locate(path));
        debug!(keys = env.len(), "environment loaded");
        Ok(env)
    }
}
