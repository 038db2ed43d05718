//! Async front of the shell. Runs the mocked network calls with their
//! artificial latency, guards against double submission and drops results
//! whose view was dismissed in the meantime.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::MarketplaceConfig;
use crate::contract::model::{
    AuthRequest, JobListing, NewJob, Notice, Screen, StudentProfile, SyncStatus, UserMode,
};
use crate::domain::auth;
use crate::domain::error::DomainError;
use crate::domain::jobs;
use crate::domain::pending::{simulated_latency, PendingOps, ViewKind, ViewScopes};
use crate::domain::ports::{BackendPort, TextGenerator};
use crate::domain::shell::Shell;

pub const PROFILE_SAVED: &str = "Profile saved successfully!";
pub const PROFILE_SYNC_FAILED: &str = "Failed to sync with server.";
pub const TITLE_REQUIRED: &str = "Enter a job title first so AI can help!";
pub const DESCRIPTION_FALLBACK: &str = "Error generating description. Please try again.";
pub const DESCRIPTION_NO_KEY: &str = "API key not configured. Please check your .env.local file.";

pub struct Session {
    shell: Arc<Mutex<Shell>>,
    backend: Arc<dyn BackendPort>,
    textgen: Arc<dyn TextGenerator>,
    pending: Arc<PendingOps>,
    views: ViewScopes,
    config: MarketplaceConfig,
}

impl Session {
    pub fn new(
        shell: Shell,
        backend: Arc<dyn BackendPort>,
        textgen: Arc<dyn TextGenerator>,
        config: MarketplaceConfig,
    ) -> Self {
        Self {
            shell: Arc::new(Mutex::new(shell)),
            backend,
            textgen,
            pending: PendingOps::new(),
            views: ViewScopes::default(),
            config,
        }
    }

    /// Synchronous access to the shell. Never hold the guard across an await.
    pub fn shell(&self) -> MutexGuard<'_, Shell> {
        self.shell.lock()
    }

    pub fn is_pending(&self, op: &str) -> bool {
        self.pending.is_pending(op)
    }

    // --- views ---

    pub fn open_view(&self, kind: ViewKind) -> CancellationToken {
        if kind == ViewKind::AuthModal {
            self.shell().open_auth_modal();
        }
        self.views.open(kind)
    }

    /// Close an overlay. Anything still in flight for it is abandoned.
    pub fn dismiss_view(&self, kind: ViewKind) {
        self.views.dismiss(kind);
        let mut shell = self.shell();
        match kind {
            ViewKind::AuthModal => shell.close_auth_modal(),
            ViewKind::JobDetail => shell.close_job(),
            ViewKind::ProfileEditor | ViewKind::CreateJob => {}
        }
    }

    pub fn open_job(&self, id: &str) -> Result<JobListing, DomainError> {
        let listing = self.shell().select_job(id)?.clone();
        self.views.open(ViewKind::JobDetail);
        Ok(listing)
    }

    // --- async operations ---

    /// Resolve credentials after the login latency, then apply the user.
    /// The backend is asked first; the mock resolver decides when it has
    /// no answer.
    #[instrument(
        name = "marketplace.session.sign_in",
        skip(self, req),
        fields(email = %req.email, signup = req.is_signup)
    )]
    pub async fn sign_in(&self, req: AuthRequest) -> Result<Screen, DomainError> {
        let _guard = self.pending.try_begin("sign_in")?;
        let cancel = self.views.current(ViewKind::AuthModal);

        simulated_latency("sign_in", self.config.latency.login(), &cancel).await?;

        let remote = if req.is_signup {
            None
        } else {
            self.backend.login(&req.email, &req.password).await
        };
        let user = match remote {
            Some(user) => user,
            None => auth::resolve(&req, &self.config.auth)?,
        };

        let screen = {
            let mut shell = self.shell();
            if cancel.is_cancelled() {
                return Err(DomainError::cancelled("sign_in"));
            }
            shell.login(user)?
        };
        self.views.dismiss(ViewKind::AuthModal);
        Ok(screen)
    }

    #[instrument(name = "marketplace.session.sign_out", skip(self))]
    pub fn sign_out(&self) -> Result<Screen, DomainError> {
        for kind in [
            ViewKind::AuthModal,
            ViewKind::JobDetail,
            ViewKind::ProfileEditor,
            ViewKind::CreateJob,
        ] {
            self.views.dismiss(kind);
        }
        self.shell().logout()
    }

    /// Validates up front so form errors are immediate, then posts after
    /// the backend latency.
    #[instrument(
        name = "marketplace.session.submit_job",
        skip(self, job),
        fields(title = %job.title)
    )]
    pub async fn submit_job(&self, job: NewJob) -> Result<JobListing, DomainError> {
        self.require_role(UserMode::Employer)?;
        jobs::validate(&job)?;

        let _guard = self.pending.try_begin("post_job")?;
        let cancel = self.views.current(ViewKind::CreateJob);

        simulated_latency("post_job", self.config.latency.post_job(), &cancel).await?;
        if self.backend.post_job(&job).await.is_none() {
            debug!("backend did not store the job; keeping the local copy");
        }
        let listing = {
            let mut shell = self.shell();
            if cancel.is_cancelled() {
                return Err(DomainError::cancelled("post_job"));
            }
            shell.post_job(job)?
        };
        self.views.dismiss(ViewKind::CreateJob);
        Ok(listing)
    }

    /// Profile for the editor: the backend copy if there is one, else the
    /// local copy, else seeded defaults.
    #[instrument(name = "marketplace.session.load_profile", skip(self))]
    pub async fn load_profile(&self) -> Result<StudentProfile, DomainError> {
        let (user_id, local) = {
            let shell = self.shell();
            let local = shell.load_profile()?;
            let id = shell
                .user()
                .and_then(|u| u.student_id.clone())
                .unwrap_or_else(|| local.id.clone());
            (id, local)
        };
        let cancel = self.views.open(ViewKind::ProfileEditor);

        simulated_latency("load_profile", self.config.latency.profile(), &cancel).await?;
        match self.backend.fetch_profile(&user_id).await {
            Some(remote) => Ok(remote),
            None => Ok(local),
        }
    }

    /// Local write first, then sync. A failed sync is reported through the
    /// returned status and a banner, never as an error. Dismissing the editor
    /// mid-sync keeps the local copy and yields `Abandoned` without a banner.
    #[instrument(name = "marketplace.session.save_profile", skip_all)]
    pub async fn save_profile(&self, profile: &StudentProfile) -> Result<SyncStatus, DomainError> {
        let _guard = self.pending.try_begin("save_profile")?;
        let cancel = self.views.current(ViewKind::ProfileEditor);
        self.shell().save_profile_local(profile)?;

        if simulated_latency("save_profile", self.config.latency.profile(), &cancel)
            .await
            .is_err()
        {
            info!("editor dismissed; profile kept locally, sync abandoned");
            return Ok(SyncStatus::Abandoned);
        }
        let synced = self.backend.save_profile(profile).await;

        let mut shell = self.shell();
        if cancel.is_cancelled() {
            info!("editor dismissed; profile kept locally, sync abandoned");
            return Ok(SyncStatus::Abandoned);
        }
        let (status, notice) = if synced {
            (SyncStatus::Synced, Notice::success(PROFILE_SAVED))
        } else {
            let err = DomainError::sync_failure("backend rejected the profile");
            warn!(error = %err, "profile kept locally only");
            (SyncStatus::Failed, Notice::error(PROFILE_SYNC_FAILED))
        };
        shell.set_notice(notice);
        info!(?status, "profile saved");
        Ok(status)
    }

    /// Draft a listing description. Generator failures become a readable
    /// placeholder instead of an error.
    #[instrument(name = "marketplace.session.draft_description", skip(self))]
    pub async fn draft_description(&self, title: &str) -> Result<String, DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", TITLE_REQUIRED));
        }
        let company = self.require_role(UserMode::Employer)?;

        let _guard = self.pending.try_begin("draft_description")?;
        let cancel = self.views.current(ViewKind::CreateJob);
        simulated_latency("draft_description", self.config.latency.generation(), &cancel).await?;

        let text = match self.textgen.job_description(title.trim(), &company).await {
            Ok(text) => text,
            Err(DomainError::GenerationUnavailable) => DESCRIPTION_NO_KEY.to_string(),
            Err(e) => {
                warn!(error = %e, "description generation failed");
                DESCRIPTION_FALLBACK.to_string()
            }
        };
        if cancel.is_cancelled() {
            return Err(DomainError::cancelled("draft_description"));
        }
        Ok(text)
    }

    /// Polished bio, or the input unchanged if generation fails.
    #[instrument(name = "marketplace.session.refine_bio", skip_all)]
    pub async fn refine_bio(&self, bio: &str) -> Result<String, DomainError> {
        if bio.trim().is_empty() {
            return Ok(bio.to_string());
        }
        self.require_role(UserMode::Student)?;

        let _guard = self.pending.try_begin("refine_bio")?;
        let cancel = self.views.current(ViewKind::ProfileEditor);
        simulated_latency("refine_bio", self.config.latency.generation(), &cancel).await?;

        let refined = match self.textgen.improve_bio(bio).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => bio.to_string(),
            Err(e) => {
                warn!(error = %e, "bio refinement failed");
                bio.to_string()
            }
        };
        if cancel.is_cancelled() {
            return Err(DomainError::cancelled("refine_bio"));
        }
        Ok(refined)
    }

    /// Checks the signed-in role; returns the user's display name.
    fn require_role(&self, mode: UserMode) -> Result<String, DomainError> {
        let shell = self.shell();
        let user = shell.user().ok_or(DomainError::NotSignedIn)?;
        if user.mode != mode {
            return Err(DomainError::wrong_role(mode, user.mode));
        }
        Ok(user.display_name().to_string())
    }
}
