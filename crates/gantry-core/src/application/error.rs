//! Application layer errors.
//!
//! These are wiring and storage failures, not request errors. Per-request
//! errors are `DispatchError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Config names an implementation nobody registered.
    #[error("No implementation '{key}' registered for component '{component}'")]
    ComponentNotRegistered { component: String, key: String },

    /// Config does not name an implementation for a component.
    #[error("Component '{component}' is not configured")]
    ComponentNotConfigured { component: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Catalog store error")]
    StoreLockError,

    /// The storage backend rejected an operation.
    #[error("Storage error: {reason}")]
    Storage { reason: String },

    /// Two controllers claimed the same id.
    #[error("Controller '{id}' is already registered")]
    DuplicateController { id: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ComponentNotRegistered { component, key } => vec![
                format!("'{key}' is not a known implementation of {component}"),
                "Available catalog implementations: memory".into(),
            ],
            Self::ComponentNotConfigured { component } => vec![
                format!("Set an implementation for {component} in the environment file"),
            ],
            Self::StoreLockError => vec![
                "The catalog store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::DuplicateController { id } => {
                vec![format!("Register '{id}' only once")]
            }
            Self::Storage { .. } => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ComponentNotRegistered { .. } | Self::ComponentNotConfigured { .. } => {
                ErrorCategory::Configuration
            }
            Self::StoreLockError | Self::Storage { .. } | Self::DuplicateController { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}
