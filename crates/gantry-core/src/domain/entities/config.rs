//! Assembled application configuration.
//!
//! [`AppConfig`] is built once per process type and never mutated. Nothing
//! here reads the environment; see
//! [`ConfigAssembler`](crate::application::ConfigAssembler).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::domain::entities::route::RouteRule;
use crate::domain::value_objects::{ConfigKind, LogLevel, TraceLevel};

/// Placeholder written over secrets in debug and serialised output.
pub const REDACTED: &str = "********";

/// Fully resolved configuration for one entry point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub kind: ConfigKind,
    pub id: String,
    pub name: String,
    pub debug: bool,
    pub base_path: PathBuf,
    pub runtime_path: PathBuf,
    pub vendor_path: PathBuf,
    pub aliases: PathAliases,
    pub database: DatabaseDescriptor,
    pub log: LogConfig,
    /// Web only; the console has no HTTP session.
    pub session: Option<SessionPolicy>,
    /// Empty for console configs.
    pub routes: Vec<RouteRule>,
    /// Route rendering error pages. Web only.
    pub error_action: Option<String>,
    /// Component id → implementation key.
    pub components: BTreeMap<String, String>,
    pub params: AppParams,
}

impl AppConfig {
    /// Implementation key configured for a component.
    pub fn component(&self, id: &str) -> Option<&str> {
        self.components.get(id).map(String::as_str)
    }
}

/// Free-form application parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppParams {
    pub admin_email: String,
}

/// Symbolic path names such as `@runtime` or `@webroot`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathAliases(BTreeMap<String, PathBuf>);

impl PathAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias. Names are stored with a leading `@`.
    pub fn set(&mut self, name: &str, path: impl Into<PathBuf>) {
        let name = if name.starts_with('@') {
            name.to_string()
        } else {
            format!("@{name}")
        };
        self.0.insert(name, path.into());
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.0.get(name).map(PathBuf::as_path)
    }

    /// Expand an aliased path such as `@runtime/logs/app.log`.
    ///
    /// Text not starting with `@` is returned unchanged. Returns `None` when
    /// the alias is unknown.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        if !path.starts_with('@') {
            return Some(PathBuf::from(path));
        }
        let (root, rest) = match path.find('/') {
            Some(pos) => (&path[..pos], Some(&path[pos + 1..])),
            None => (path, None),
        };
        let base = self.0.get(root)?;
        Some(match rest {
            Some(rest) if !rest.is_empty() => base.join(rest),
            _ => base.clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Connection settings for the data-access collaborator.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseDescriptor {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    #[serde(serialize_with = "redact")]
    pub password: String,
    pub charset: String,
}

impl DatabaseDescriptor {
    /// PDO-style DSN, e.g. `mysql:host=localhost;port=3306;dbname=app`.
    pub fn dsn(&self) -> String {
        format!(
            "{}:host={};port={};dbname={}",
            self.driver, self.host, self.port, self.name
        )
    }
}

impl fmt::Debug for DatabaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseDescriptor")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("charset", &self.charset)
            .finish()
    }
}

/// Logging setup derived from the debug flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogConfig {
    pub trace_level: TraceLevel,
    pub targets: Vec<LogTarget>,
}

/// Where log records go and which severities are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogTarget {
    pub kind: LogTargetKind,
    pub levels: Vec<LogLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogTargetKind {
    File { path: PathBuf },
    Console,
}

/// Cookie and session behaviour for the web entry point.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SessionPolicy {
    #[serde(serialize_with = "redact")]
    pub cookie_validation_key: String,
    /// `true` when the key is the built-in development placeholder.
    pub placeholder_key: bool,
    pub csrf_enabled: bool,
    pub http_only: bool,
    pub pretty_urls: bool,
    pub show_script_name: bool,
}

impl fmt::Debug for SessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionPolicy")
            .field("cookie_validation_key", &REDACTED)
            .field("placeholder_key", &self.placeholder_key)
            .field("csrf_enabled", &self.csrf_enabled)
            .field("http_only", &self.http_only)
            .field("pretty_urls", &self.pretty_urls)
            .field("show_script_name", &self.show_script_name)
            .finish()
    }
}

fn redact<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_empty() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> PathAliases {
        let mut a = PathAliases::new();
        a.set("@app", "/srv/app");
        a.set("runtime", "/srv/app/runtime");
        a
    }

    #[test]
    fn alias_names_gain_leading_at() {
        let a = aliases();
        assert_eq!(a.get("@runtime"), Some(Path::new("/srv/app/runtime")));
        assert!(a.get("runtime").is_none());
    }

    #[test]
    fn resolve_expands_prefix() {
        let a = aliases();
        assert_eq!(
            a.resolve("@runtime/logs/app.log"),
            Some(PathBuf::from("/srv/app/runtime/logs/app.log"))
        );
        assert_eq!(a.resolve("@app"), Some(PathBuf::from("/srv/app")));
        assert_eq!(a.resolve("plain/path"), Some(PathBuf::from("plain/path")));
        assert_eq!(a.resolve("@nope/x"), None);
    }

    #[test]
    fn database_secrets_are_redacted() {
        let db = DatabaseDescriptor {
            driver: "mysql".into(),
            host: "localhost".into(),
            port: 3306,
            name: "app".into(),
            user: "root".into(),
            password: "hunter2".into(),
            charset: "utf8".into(),
        };
        assert_eq!(db.dsn(), "mysql:host=localhost;port=3306;dbname=app");
        assert!(!format!("{db:?}").contains("hunter2"));
        let json = serde_json::to_string(&db).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains(REDACTED));
    }
}
