use thiserror::Error;

use crate::contract::model::UserMode;

/// Rejections produced by the mock auth resolver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid login credentials.")]
    InvalidCredentials,

    #[error("Incorrect password.")]
    IncorrectPassword,

    #[error("No account found for '{email}'")]
    UnknownAccount { email: String },

    #[error("{message}")]
    Validation { message: String },
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Action requires {required} mode (signed in as {actual})")]
    WrongRole { required: UserMode, actual: UserMode },

    #[error("No job selected")]
    NoJobSelected,

    #[error("Job not found: {id}")]
    JobNotFound { id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Sync with server failed: {message}")]
    SyncFailure { message: String },

    #[error("Text generation failed: {message}")]
    GenerationFailure { message: String },

    #[error("Text generation is not configured (missing API key)")]
    GenerationUnavailable,

    #[error("'{op}' is already in progress")]
    Busy { op: &'static str },

    #[error("'{op}' was cancelled")]
    Cancelled { op: &'static str },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn wrong_role(required: UserMode, actual: UserMode) -> Self {
        Self::WrongRole { required, actual }
    }

    pub fn job_not_found(id: impl Into<String>) -> Self {
        Self::JobNotFound { id: id.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn sync_failure(message: impl Into<String>) -> Self {
        Self::SyncFailure {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailure {
            message: message.into(),
        }
    }

    pub fn busy(op: &'static str) -> Self {
        Self::Busy { op }
    }

    pub fn cancelled(op: &'static str) -> Self {
        Self::Cancelled { op }
    }

    /// True for errors a form should render inline next to its inputs.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Auth(_) | Self::NoJobSelected | Self::NotSignedIn
        )
    }
}
