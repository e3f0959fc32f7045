//! Application bootstrap.
//!
//! The environment file is read once at startup; both config variants and
//! the dispatchers are built from that single [`EnvironmentMap`] and passed
//! down explicitly.
//!
//! # Resolution order
//!
//! 1. `--env-file` / `GANTRY_ENV_FILE` selects the file (default `.env`)
//! 2. `APP_BASE_PATH` inside it overrides the base path
//! 3. Otherwise the file's directory is the base path

use std::path::Path;
use std::sync::Arc;

use gantry_adapters::{
    HtmlErrorRenderer, LocalEnvSource, catalog_components, console_controllers, web_controllers,
};
use gantry_core::application::{
    ConfigAssembler, ConsoleDispatcher, EnvironmentLoader, WebDispatcher,
};
use gantry_core::domain::{AppConfig, EnvironmentMap, LogConfig};
use tracing::{debug, instrument};

use crate::error::CliResult;

/// The loaded environment, ready to assemble either entry point.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    env: EnvironmentMap,
}

impl Bootstrap {
    /// Read the environment file from disk.
    pub fn load(path: &Path) -> CliResult<Self> {
        let loader = EnvironmentLoader::new(Box::new(LocalEnvSource::new()));
        Ok(Self::from_env(loader.load(path)?))
    }

    pub fn from_env(env: EnvironmentMap) -> Self {
        Self { env }
    }

    /// Absolute path of the file the environment came from.
    pub fn origin(&self) -> Option<&Path> {
        self.env.origin()
    }

    pub fn log_config(&self) -> CliResult<LogConfig> {
        Ok(ConfigAssembler::logging(&self.env)?)
    }

    pub fn web_config(&self) -> CliResult<AppConfig> {
        Ok(ConfigAssembler::build_web(&self.env)?)
    }

    pub fn console_config(&self) -> CliResult<AppConfig> {
        Ok(ConfigAssembler::build_console(&self.env)?)
    }

    /// Web dispatcher with the configured catalog and the site controllers.
    #[instrument(skip_all)]
    pub fn web(&self) -> CliResult<WebDispatcher> {
        let config = Arc::new(self.web_config()?);
        let catalog = catalog_components().build(&config)?;
        let controllers = web_controllers(catalog)?;
        debug!(controllers = controllers.len(), "web controllers registered");
        Ok(WebDispatcher::new(
            config,
            controllers,
            Box::new(HtmlErrorRenderer::new()),
        )?)
    }

    /// Console dispatcher with the console controllers.
    #[instrument(skip_all)]
    pub fn console(&self) -> CliResult<ConsoleDispatcher> {
        let config = Arc::new(self.console_config()?);
        Ok(ConsoleDispatcher::new(config, console_controllers()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use gantry_core::domain::{ConfigError, Request};

    const ENV: &str = "\
APP_ID=shop
APP_NAME=Shop
DB_DRIVER=mysql
DB_HOST=localhost
DB_PORT=3306
DB_NAME=shop
DB_USER=shop
DB_PASSWORD=
";

    fn bootstrap(extra: &str) -> Bootstrap {
        Bootstrap::from_env(EnvironmentMap::parse(&format!("{ENV}{extra}")))
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = Bootstrap::load(Path::new("/definitely/not/here/.env")).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(matches!(
            err,
            CliError::Core(gantry_core::error::GantryError::Config(
                ConfigError::MissingFile { .. }
            ))
        ));
    }

    #[test]
    fn web_dispatcher_serves_demo_catalog() {
        let web = bootstrap("").web().unwrap();
        let response = web.handle(&Request::get("/product/view/1"));
        assert_eq!(response.status, 200);
        assert!(response.body.contains("The Rust Book"));
    }

    #[test]
    fn unknown_catalog_component_fails_startup() {
        let err = bootstrap("CATALOG_COMPONENT=redis\n").web().unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn console_dispatcher_runs_hello() {
        let console = bootstrap("").console().unwrap();
        assert_eq!(console.run(&["hello".into()]).stdout, "hello world\n");
    }
}
