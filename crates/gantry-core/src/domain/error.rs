// ============================================================================
// domain/error.rs - CONFIGURATION AND PER-REQUEST ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::HttpMethod;

/// Startup errors raised while loading the environment or assembling config.
///
/// Every variant is fatal: the process must not serve requests after one of
/// these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("environment file not found: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("required environment key '{key}' is not set")]
    MissingKey { key: &'static str },

    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("environment file {} could not be read: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingFile { path } => vec![
                format!("Create {} from the example file", path.display()),
                "Or point to another file with --env-file / GANTRY_ENV_FILE".into(),
            ],
            Self::MissingKey { key } => vec![
                format!("Add a line like `{key}=...` to the environment file"),
                "Required keys: APP_ID, APP_NAME, DB_DRIVER, DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASSWORD".into(),
            ],
            Self::InvalidValue { key, .. } => vec![format!("Fix the value of {key}")],
            Self::Unreadable { .. } => vec![
                "Check file permissions".into(),
                "The environment file must be UTF-8 text".into(),
            ],
        }
    }
}

/// Route table errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteError {
    /// No rule matched the request path (or the console route is unknown).
    #[error("Page not found.")]
    NotFound { path: String },

    /// A rule pattern failed to compile.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Parameter binding failures; raised before the action body runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindingError {
    #[error("Missing required parameters: {}", .names.join(", "))]
    MissingParams { names: Vec<String> },

    #[error("Invalid data received for parameter \"{name}\": expected {expected}.")]
    InvalidParam {
        name: String,
        expected: &'static str,
    },
}

/// The request method is not in the action's allow-list.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "Method Not Allowed. This URL can only handle the following request methods: {}.",
    allow_header(.allowed)
)]
pub struct MethodNotAllowed {
    pub method: HttpMethod,
    pub allowed: Vec<HttpMethod>,
}

impl MethodNotAllowed {
    /// Value for the `Allow` response header.
    pub fn allow(&self) -> String {
        allow_header(&self.allowed)
    }
}

fn allow_header(allowed: &[HttpMethod]) -> String {
    allowed
        .iter()
        .map(HttpMethod::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised inside an action body.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// A domain error with an explicit status and display name.
    #[error("{message}")]
    Http {
        status: u16,
        name: String,
        message: String,
    },

    /// Anything else. `code` is an optional application error code.
    #[error("{message}")]
    Fault { code: Option<i64>, message: String },
}

impl ActionError {
    /// 404 with the standard display name.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::http(409, message)
    }

    /// HTTP error named after its status reason phrase.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            name: reason_phrase(status).to_string(),
            message: message.into(),
        }
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            code: None,
            message: message.into(),
        }
    }
}

/// Every error that can surface from dispatching one request or invocation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    MethodNotAllowed(#[from] MethodNotAllowed),

    #[error(transparent)]
    Action(#[from] ActionError),
}

impl DispatchError {
    /// HTTP status this error renders as.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Route(RouteError::NotFound { .. }) => 404,
            Self::Route(RouteError::InvalidPattern { .. }) => 500,
            Self::Binding(_) => 400,
            Self::MethodNotAllowed(_) => 405,
            Self::Action(ActionError::Http { status, .. }) => *status,
            Self::Action(ActionError::Fault { .. }) => 500,
        }
    }

    /// Display name for the error page.
    ///
    /// Faults are named `Error <code>`, or `Error 500` when they carry no code.
    pub fn name(&self) -> String {
        match self {
            Self::Action(ActionError::Http { name, .. }) => name.clone(),
            Self::Action(ActionError::Fault { code, .. }) => {
                format!("Error {}", code.unwrap_or(500))
            }
            other => reason_phrase(other.status_code()).to_string(),
        }
    }

    /// The `{name, message, statusCode}` shape handed to the error view.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            name: self.name(),
            message: self.to_string(),
            status_code: self.status_code(),
        }
    }

    /// Whether this is a client error the console should answer with usage.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Route(_) | Self::Binding(_))
    }
}

/// Boundary contract toward the error view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub name: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Standard reason phrase for the statuses this crate produces.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_status_and_name() {
        let err = DispatchError::from(ActionError::Http {
            status: 404,
            name: "Not Found".into(),
            message: "The requested page does not exist.".into(),
        });
        assert_eq!(
            err.to_response(),
            ErrorResponse {
                name: "Not Found".into(),
                message: "The requested page does not exist.".into(),
                status_code: 404,
            }
        );
    }

    #[test]
    fn fault_is_named_after_code_or_500() {
        let plain = DispatchError::from(ActionError::fault("disk on fire"));
        let resp = plain.to_response();
        assert_eq!(resp.name, "Error 500");
        assert_eq!(resp.message, "disk on fire");
        assert_eq!(resp.status_code, 500);

        let coded = DispatchError::from(ActionError::Fault {
            code: Some(42),
            message: "boom".into(),
        });
        assert_eq!(coded.name(), "Error 42");
        assert_eq!(coded.status_code(), 500);
    }

    #[test]
    fn per_request_errors_map_to_statuses() {
        let nf: DispatchError = RouteError::NotFound { path: "x".into() }.into();
        assert_eq!((nf.status_code(), nf.name().as_str()), (404, "Not Found"));

        let bind: DispatchError = BindingError::MissingParams {
            names: vec!["id".into()],
        }
        .into();
        assert_eq!(bind.status_code(), 400);
        assert_eq!(bind.to_string(), "Missing required parameters: id");

        let method: DispatchError = MethodNotAllowed {
            method: HttpMethod::Get,
            allowed: vec![HttpMethod::Post],
        }
        .into();
        assert_eq!(method.status_code(), 405);
        assert!(method.to_string().contains("POST"));
    }

    #[test]
    fn error_response_serialises_status_code_in_camel_case() {
        let resp = ErrorResponse {
            name: "Not Found".into(),
            message: "gone".into(),
            status_code: 404,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Not Found","message":"gone","statusCode":404}"#
        );
    }
}
