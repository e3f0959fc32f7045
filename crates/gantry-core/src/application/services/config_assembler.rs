//! Config Assembler - builds the web and console [`AppConfig`] from an
//! environment map.
//!
//! Both variants share identity, paths, database and logging. They differ
//! in what is layered on top:
//!
//! | | web | console |
//! |---|---|---|
//! | id / name | as given | `-console` / ` Console` suffix |
//! | session policy | yes | no |
//! | route rules | the web table | none |
//! | error action | `site/error` | none |
//! | extra aliases | `@web`, `@webroot` | `@tests` |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::domain::{
    AppConfig, AppParams, ConfigError, ConfigKind, DatabaseDescriptor, EnvironmentMap, Flag,
    LogConfig, LogLevel, LogTarget, LogTargetKind, PathAliases, RouteRule, SessionPolicy,
    TraceLevel,
};

/// Keys that must be present. `DB_PASSWORD` may be empty.
pub const REQUIRED_KEYS: [&str; 8] = [
    "APP_ID",
    "APP_NAME",
    "DB_DRIVER",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
    "DB_USER",
    "DB_PASSWORD",
];

/// Cookie key used when `COOKIE_VALIDATION_KEY` is unset. Not a secret.
pub const PLACEHOLDER_COOKIE_KEY: &str = "insecure-development-cookie-key";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_CHARSET: &str = "utf8";
pub const DEFAULT_CATALOG: &str = "memory";

const ERROR_ACTION: &str = "site/error";

/// Stateless builder for both config variants.
pub struct ConfigAssembler;

impl ConfigAssembler {
    /// Configuration for the web entry point.
    #[instrument(skip_all, fields(origin = ?env.origin()))]
    pub fn build_web(env: &EnvironmentMap) -> Result<AppConfig, ConfigError> {
        let mut config = Self::build_common(env, ConfigKind::Web)?;

        let webroot = config.base_path.join("web");
        config.aliases.set("@web", "/");
        config.aliases.set("@webroot", webroot);

        config.session = Some(Self::session_policy(env));
        config.routes = Self::web_routes();
        config.error_action = Some(ERROR_ACTION.to_string());

        debug!(id = %config.id, routes = config.routes.len(), "web config assembled");
        Ok(config)
    }

    /// Configuration for the console entry point.
    #[instrument(skip_all, fields(origin = ?env.origin()))]
    pub fn build_console(env: &EnvironmentMap) -> Result<AppConfig, ConfigError> {
        let mut config = Self::build_common(env, ConfigKind::Console)?;

        config.id = format!("{}-console", config.id);
        config.name = format!("{} Console", config.name);
        let tests = config.base_path.join("tests");
        config.aliases.set("@tests", tests);

        debug!(id = %config.id, "console config assembled");
        Ok(config)
    }

    /// The web route table. Order matters: the first satisfied rule wins.
    pub fn web_routes() -> Vec<RouteRule> {
        vec![
            RouteRule::new("", "site/index"),
            RouteRule::new("about", "site/about"),
            RouteRule::new("contact", "site/contact"),
            RouteRule::new(
                r"<controller:(product|category)>/<action:(view|update|delete)>/<id:\d+>",
                "<controller>/<action>",
            ),
            RouteRule::new(r"<controller:[\w-]+>/<action:[\w-]+>", "<controller>/<action>"),
            RouteRule::new(r"<controller:[\w-]+>", "<controller>/index"),
        ]
    }

    /// Just the logging settings, for hosts that install their subscriber
    /// before assembling the rest.
    pub fn logging(env: &EnvironmentMap) -> Result<LogConfig, ConfigError> {
        let debug = Self::debug_flag(env)?;
        Ok(Self::log_config(debug, &Self::base_path(env).join("runtime")))
    }

    fn build_common(env: &EnvironmentMap, kind: ConfigKind) -> Result<AppConfig, ConfigError> {
        // Check everything before building anything.
        for key in REQUIRED_KEYS {
            env.require(key)?;
        }
        let database = Self::database(env)?;

        let debug = Self::debug_flag(env)?;
        let base_path = Self::base_path(env);
        let runtime_path = base_path.join("runtime");
        let vendor_path = base_path.join("vendor");

        let mut aliases = PathAliases::new();
        aliases.set("@app", &base_path);
        aliases.set("@runtime", &runtime_path);
        aliases.set("@vendor", &vendor_path);
        aliases.set("@bower", vendor_path.join("bower-asset"));
        aliases.set("@npm", vendor_path.join("npm-asset"));

        let log = Self::log_config(debug, &runtime_path);

        let catalog = env
            .get("CATALOG_COMPONENT")
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CATALOG);
        let components = BTreeMap::from([("catalog".to_string(), catalog.to_string())]);

        let admin_email = env
            .get("ADMIN_EMAIL")
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_ADMIN_EMAIL)
            .to_string();

        Ok(AppConfig {
            kind,
            id: env.require("APP_ID")?.to_string(),
            name: env.require("APP_NAME")?.to_string(),
            debug,
            base_path,
            runtime_path,
            vendor_path,
            aliases,
            database,
            log,
            session: None,
            routes: Vec::new(),
            error_action: None,
            components,
            params: AppParams { admin_email },
        })
    }

    fn debug_flag(env: &EnvironmentMap) -> Result<bool, ConfigError> {
        Ok(env.get("APP_DEBUG").unwrap_or_default().parse::<Flag>()?.0)
    }

    fn database(env: &EnvironmentMap) -> Result<DatabaseDescriptor, ConfigError> {
        let port_text = env.require("DB_PORT")?;
        let port = port_text
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "DB_PORT",
                value: port_text.to_string(),
                reason: e.to_string(),
            })?;

        Ok(DatabaseDescriptor {
            driver: env.require("DB_DRIVER")?.to_string(),
            host: env.require("DB_HOST")?.to_string(),
            port,
            name: env.require("DB_NAME")?.to_string(),
            user: env.require("DB_USER")?.to_string(),
            password: env.require("DB_PASSWORD")?.to_string(),
            charset: env
                .get("DB_CHARSET")
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_CHARSET)
                .to_string(),
        })
    }

    /// `APP_BASE_PATH`, else the env file's directory, else `.`.
    fn base_path(env: &EnvironmentMap) -> PathBuf {
        if let Some(explicit) = env.get("APP_BASE_PATH").filter(|v| !v.is_empty()) {
            return PathBuf::from(explicit);
        }
        env.origin()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    fn log_config(debug: bool, runtime_path: &Path) -> LogConfig {
        let mut targets = vec![LogTarget {
            kind: LogTargetKind::File {
                path: runtime_path.join("logs").join("app.log"),
            },
            levels: vec![LogLevel::Error, LogLevel::Warning],
        }];
        if debug {
            targets.push(LogTarget {
                kind: LogTargetKind::Console,
                levels: LogLevel::ALL.to_vec(),
            });
        }
        LogConfig {
            trace_level: TraceLevel::from_debug(debug),
            targets,
        }
    }

    fn session_policy(env: &EnvironmentMap) -> SessionPolicy {
        let configured = env
            .get("COOKIE_VALIDATION_KEY")
            .filter(|v| !v.is_empty());
        if configured.is_none() {
            warn!(
                key = "COOKIE_VALIDATION_KEY",
                "cookie validation key is not set; using the insecure development placeholder"
            );
        }
        SessionPolicy {
            cookie_validation_key: configured.unwrap_or(PLACEHOLDER_COOKIE_KEY).to_string(),
            placeholder_key: configured.is_none(),
            csrf_enabled: true,
            http_only: true,
            pretty_urls: true,
            show_script_name: false,
        }
    }
}
