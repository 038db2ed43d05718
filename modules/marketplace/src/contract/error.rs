use thiserror::Error;

pub use crate::domain::error::AuthError;

/// Errors that are safe to expose to hosts of the marketplace
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error(transparent)]
    Auth(AuthError),

    #[error("Not allowed: {message}")]
    Precondition { message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error")]
    Internal,
}

impl MarketplaceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for MarketplaceError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            Validation { field, message } => Self::validation(format!("{}: {}", field, message)),
            Auth(e) => Self::Auth(e),
            NotSignedIn => Self::precondition("sign in first"),
            WrongRole { required, .. } => {
                Self::precondition(format!("only available in {} mode", required))
            }
            NoJobSelected => Self::precondition("select a job first"),
            JobNotFound { id } => Self::precondition(format!("job {} does not exist", id)),
            Busy { op } => Self::precondition(format!("{} already in progress", op)),
            Cancelled { .. } => Self::Cancelled,
            Storage { .. }
            | SyncFailure { .. }
            | GenerationFailure { .. }
            | GenerationUnavailable => Self::internal(),
        }
    }
}
