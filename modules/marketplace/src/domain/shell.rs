//! Application shell: owns the top-level state and writes every mutation
//! through to the persisted store before it becomes visible.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::config::MarketplaceConfig;
use crate::contract::model::{
    InboxEntry, JobListing, Message, NavItem, NewJob, Notice, Screen, StudentProfile, Theme, User,
    UserMode, View,
};
use crate::domain::error::DomainError;
use crate::domain::events::MarketplaceEvent;
use crate::domain::jobs;
use crate::domain::ports::{EventPublisher, NoopPublisher};
use crate::domain::profile::seeded_profile;
use crate::domain::router;
use crate::domain::store::{PersistedStore, StorageKey};

const UNKNOWN_JOB_TITLE: &str = "Job Listing";

/// Top-level UI state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub user: Option<User>,
    /// Mode toggle used while nobody is signed in.
    pub guest_mode: UserMode,
    /// Last requested screen; the shown screen is derived from it on read.
    pub requested_screen: Screen,
    /// Newest first.
    pub jobs: Vec<JobListing>,
    /// Newest first.
    pub messages: Vec<Message>,
    pub theme: Theme,
    pub selected_job: Option<String>,
    pub auth_modal_open: bool,
    pub notice: Option<Notice>,
}

pub struct Shell {
    state: AppState,
    store: PersistedStore,
    events: Arc<dyn EventPublisher<MarketplaceEvent>>,
}

impl Shell {
    /// Load persisted state and compute the initial screen.
    #[instrument(name = "marketplace.shell.start", skip_all)]
    pub fn start(store: PersistedStore, config: &MarketplaceConfig) -> Self {
        let user: Option<User> = store.load_or_default(&StorageKey::CurrentUser);
        let jobs: Vec<JobListing> = store.load_or_default(&StorageKey::Jobs);
        let messages: Vec<Message> = store.load_or_default(&StorageKey::Messages);

        let guest_mode = user.as_ref().map(|u| u.mode).unwrap_or_default();
        let state = AppState {
            requested_screen: router::default_screen(guest_mode),
            guest_mode,
            user,
            jobs,
            messages,
            theme: if config.prefer_dark {
                Theme::Dark
            } else {
                Theme::Light
            },
            ..Default::default()
        };

        info!(
            signed_in = state.user.is_some(),
            jobs = state.jobs.len(),
            messages = state.messages.len(),
            "shell started"
        );

        Self {
            state,
            store,
            events: Arc::new(NoopPublisher),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher<MarketplaceEvent>>) -> Self {
        self.events = events;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &PersistedStore {
        &self.store
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    // --- navigation ---

    pub fn current_screen(&self) -> Screen {
        router::resolve_screen(
            self.state.user.as_ref(),
            self.state.guest_mode,
            self.state.requested_screen,
        )
    }

    pub fn current_view(&self) -> View {
        router::resolve_view(
            self.state.user.as_ref(),
            self.state.guest_mode,
            self.state.requested_screen,
        )
    }

    /// Record the request and return the screen that is actually shown.
    pub fn request_screen(&mut self, screen: Screen) -> Screen {
        self.state.requested_screen = screen;
        let shown = self.current_screen();
        if shown != screen {
            debug!(requested = %screen, shown = %shown, "screen request redirected");
        }
        shown
    }

    /// Guest mode toggle. Signed-in users keep their role's screens.
    pub fn switch_mode(&mut self, mode: UserMode) -> Screen {
        if self.state.user.is_none() {
            self.state.guest_mode = mode;
            self.state.requested_screen = router::default_screen(mode);
        } else {
            debug!(%mode, "mode toggle ignored while signed in");
        }
        self.current_screen()
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        router::nav_items(
            self.state.user.as_ref(),
            self.state.guest_mode,
            self.current_screen(),
        )
    }

    // --- session ---

    #[instrument(
        name = "marketplace.shell.login",
        skip(self, user),
        fields(email = %user.email, mode = %user.mode)
    )]
    pub fn login(&mut self, user: User) -> Result<Screen, DomainError> {
        self.store.save(&StorageKey::CurrentUser, &user)?;

        let mode = user.mode;
        let email = user.email.clone();
        self.state.guest_mode = mode;
        self.state.requested_screen = router::default_screen(mode);
        self.state.user = Some(user);
        self.state.auth_modal_open = false;

        self.events.publish(&MarketplaceEvent::SignedIn {
            email,
            mode,
            at: Utc::now(),
        });
        info!("signed in");
        Ok(self.current_screen())
    }

    #[instrument(name = "marketplace.shell.logout", skip(self))]
    pub fn logout(&mut self) -> Result<Screen, DomainError> {
        self.store.remove(&StorageKey::CurrentUser)?;

        self.state.user = None;
        self.state.guest_mode = UserMode::Student;
        self.state.requested_screen = Screen::Feed;
        self.state.selected_job = None;

        self.events.publish(&MarketplaceEvent::SignedOut { at: Utc::now() });
        info!("signed out");
        Ok(self.current_screen())
    }

    fn require_user(&self, mode: UserMode) -> Result<&User, DomainError> {
        let user = self.state.user.as_ref().ok_or(DomainError::NotSignedIn)?;
        if user.mode != mode {
            return Err(DomainError::wrong_role(mode, user.mode));
        }
        Ok(user)
    }

    // --- jobs ---

    pub fn feed_jobs(&self) -> &[JobListing] {
        &self.state.jobs
    }

    pub fn job(&self, id: &str) -> Option<&JobListing> {
        self.state.jobs.iter().find(|j| j.id == id)
    }

    /// Listings owned by the signed-in employer (matched on company name).
    pub fn employer_jobs(&self) -> Vec<&JobListing> {
        match self.state.user.as_ref() {
            Some(u) if u.is_employer() => {
                let company = u.display_name();
                self.state.jobs.iter().filter(|j| j.company == company).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Validate, prepend, persist, then route to the dashboard.
    /// On any failure the job list is left exactly as it was.
    #[instrument(name = "marketplace.shell.post_job", skip(self, job), fields(title = %job.title))]
    pub fn post_job(&mut self, job: NewJob) -> Result<JobListing, DomainError> {
        let company = self.require_user(UserMode::Employer)?.display_name().to_string();
        let listing = jobs::build_listing(&job, &company, Utc::now())?;

        self.state.jobs.insert(0, listing.clone());
        if let Err(e) = self.store.save(&StorageKey::Jobs, &self.state.jobs) {
            self.state.jobs.remove(0);
            warn!(error = %e, "job not persisted; rolled back");
            return Err(e);
        }

        self.state.requested_screen = Screen::Dashboard;
        self.events.publish(&MarketplaceEvent::JobPosted {
            id: listing.id.clone(),
            company,
            at: listing.posted_at,
        });
        info!(job_id = %listing.id, "job posted");
        Ok(listing)
    }

    // --- job detail overlay & messaging ---

    pub fn select_job(&mut self, id: &str) -> Result<&JobListing, DomainError> {
        let idx = self
            .state
            .jobs
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(|| DomainError::job_not_found(id))?;
        self.state.selected_job = Some(id.to_string());
        Ok(&self.state.jobs[idx])
    }

    pub fn close_job(&mut self) {
        self.state.selected_job = None;
    }

    pub fn selected_job(&self) -> Option<&JobListing> {
        self.state.selected_job.as_deref().and_then(|id| self.job(id))
    }

    /// Only signed-in students may message an employer.
    pub fn can_message(&self) -> bool {
        self.state.user.as_ref().is_some_and(User::is_student)
    }

    /// Needs a signed-in student and a selected job; otherwise an error is
    /// returned and nothing changes.
    #[instrument(name = "marketplace.shell.send_message", skip(self, text))]
    pub fn send_message(&mut self, text: &str) -> Result<Message, DomainError> {
        let user = self.require_user(UserMode::Student)?;
        let job_id = self
            .selected_job()
            .map(|j| j.id.clone())
            .ok_or(DomainError::NoJobSelected)?;
        if text.trim().is_empty() {
            return Err(DomainError::validation(
                "message",
                "Please enter a message before sending.",
            ));
        }

        let message = Message {
            id: jobs::new_listing_id(),
            job_id,
            student_id: user.student_id.clone().unwrap_or_else(|| "anon".to_string()),
            student_name: user
                .first_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Anonymous Student".to_string()),
            text: text.to_string(),
            timestamp: Utc::now(),
            is_read: false,
        };

        self.state.messages.insert(0, message.clone());
        if let Err(e) = self.store.save(&StorageKey::Messages, &self.state.messages) {
            self.state.messages.remove(0);
            warn!(error = %e, "message not persisted; rolled back");
            return Err(e);
        }

        self.events.publish(&MarketplaceEvent::MessageSent {
            id: message.id.clone(),
            job_id: message.job_id.clone(),
            at: message.timestamp,
        });
        debug!(message_id = %message.id, "message sent");
        Ok(message)
    }

    /// Messages with the title of the listing they refer to.
    pub fn inbox(&self) -> Vec<InboxEntry> {
        self.state
            .messages
            .iter()
            .map(|m| InboxEntry {
                job_title: self
                    .job(&m.job_id)
                    .map(|j| j.title.clone())
                    .unwrap_or_else(|| UNKNOWN_JOB_TITLE.to_string()),
                message: m.clone(),
            })
            .collect()
    }

    // --- profile ---

    /// Saved profile of the signed-in student, or the seeded placeholder.
    pub fn load_profile(&self) -> Result<StudentProfile, DomainError> {
        let user = self.require_user(UserMode::Student)?;
        let key = StorageKey::Profile(user.email.clone());
        Ok(self.store.load_or_else(&key, || seeded_profile(user)))
    }

    #[instrument(name = "marketplace.shell.save_profile_local", skip_all)]
    pub fn save_profile_local(&mut self, profile: &StudentProfile) -> Result<(), DomainError> {
        let email = self.require_user(UserMode::Student)?.email.clone();
        self.store.save(&StorageKey::Profile(email.clone()), profile)?;
        self.events.publish(&MarketplaceEvent::ProfileSaved {
            email,
            at: Utc::now(),
        });
        Ok(())
    }

    // --- chrome ---

    pub fn toggle_theme(&mut self) -> Theme {
        self.state.theme = match self.state.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        self.state.theme
    }

    pub fn open_auth_modal(&mut self) {
        self.state.auth_modal_open = true;
    }

    pub fn close_auth_modal(&mut self) {
        self.state.auth_modal_open = false;
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.state.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.state.notice.take()
    }
}
