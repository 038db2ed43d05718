use async_trait::async_trait;

use crate::contract::model::{JobListing, NewJob, StudentProfile, User};

/// Remote API the shell would talk to if there were a server.
///
/// Every call settles; failures surface as `false` / `None`, never as a panic
/// or an error the caller has to unwind.
#[async_trait]
pub trait BackendPort: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Option<User>;
    async fn save_profile(&self, profile: &StudentProfile) -> bool;
    async fn fetch_profile(&self, user_id: &str) -> Option<StudentProfile>;
    async fn post_job(&self, job: &NewJob) -> Option<JobListing>;
}
