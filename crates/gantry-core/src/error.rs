//! Unified error handling for Gantry Core.
//!
//! Wraps configuration, dispatch and application errors behind one type with
//! a display category and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{ConfigError, DispatchError, RouteError};

/// Root error type for Gantry Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GantryError {
    /// Startup configuration errors. Always fatal.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A request or console invocation failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Wiring or storage failures.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),
}

impl From<RouteError> for GantryError {
    fn from(err: RouteError) -> Self {
        Self::Dispatch(DispatchError::Route(err))
    }
}

impl GantryError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Dispatch(DispatchError::Route(RouteError::InvalidPattern { .. })) => {
                vec!["Check the placeholder syntax: <name> or <name:regex>".into()]
            }
            Self::Dispatch(e) if e.is_usage_error() => {
                vec!["Try: gantry routes to list available routes".into()]
            }
            Self::Dispatch(_) => vec![],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Dispatch(DispatchError::Route(RouteError::InvalidPattern { .. })) => {
                ErrorCategory::Configuration
            }
            Self::Dispatch(e) => match e.status_code() {
                404 => ErrorCategory::NotFound,
                400..=499 => ErrorCategory::Validation,
                _ => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type GantryResult<T> = Result<T, GantryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_configuration_category() {
        let err = GantryError::from(ConfigError::MissingKey { key: "APP_ID" });
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.suggestions()[0].contains("APP_ID"));
    }

    #[test]
    fn dispatch_categories_follow_status() {
        let nf = GantryError::from(RouteError::NotFound { path: "x".into() });
        assert_eq!(nf.category(), ErrorCategory::NotFound);

        let fault = GantryError::from(DispatchError::from(
            crate::domain::ActionError::fault("boom"),
        ));
        assert_eq!(fault.category(), ErrorCategory::Internal);
    }
}
