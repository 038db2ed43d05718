use async_trait::async_trait;
use tracing::{info, instrument};
use url::Url;

use crate::contract::model::{JobListing, NewJob, StudentProfile, User};
use crate::domain::error::DomainError;
use crate::domain::ports::BackendPort;

/// Stand-in for the remote API. Logs the request it would make and returns
/// the canned answer; nothing leaves the process.
pub struct MockBackend {
    base: Url,
}

impl MockBackend {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    pub fn from_base_url(raw: &str) -> Result<Self, DomainError> {
        let base = Url::parse(raw)
            .map_err(|e| DomainError::validation("api_base_url", format!("'{raw}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(DomainError::validation(
                "api_base_url",
                format!("'{raw}' cannot be used as a base URL"),
            ));
        }
        Ok(Self::new(base))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `<base>/<segments...>`
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl BackendPort for MockBackend {
    #[instrument(name = "marketplace.mock_backend.login", skip_all, fields(base = %self.base))]
    async fn login(&self, email: &str, _password: &str) -> Option<User> {
        info!(url = %self.endpoint(&["auth", "login"]), %email, "authenticating against backend");
        None
    }

    #[instrument(
        name = "marketplace.mock_backend.save_profile",
        skip_all,
        fields(base = %self.base)
    )]
    async fn save_profile(&self, profile: &StudentProfile) -> bool {
        info!(
            url = %self.endpoint(&["profile"]),
            id = %profile.id,
            experience = profile.experience.len(),
            "saving profile"
        );
        true
    }

    #[instrument(
        name = "marketplace.mock_backend.fetch_profile",
        skip_all,
        fields(base = %self.base)
    )]
    async fn fetch_profile(&self, user_id: &str) -> Option<StudentProfile> {
        info!(url = %self.endpoint(&["profile", user_id]), "fetching profile");
        None
    }

    #[instrument(name = "marketplace.mock_backend.post_job", skip_all, fields(base = %self.base))]
    async fn post_job(&self, job: &NewJob) -> Option<JobListing> {
        info!(url = %self.endpoint(&["jobs"]), title = %job.title, "inserting job");
        None
    }
}
