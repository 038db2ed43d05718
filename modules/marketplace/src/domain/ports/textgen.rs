use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Prose generator used by the create-job and profile editors.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn job_description(&self, title: &str, company: &str) -> Result<String, DomainError>;
    async fn improve_bio(&self, bio: &str) -> Result<String, DomainError>;
}
