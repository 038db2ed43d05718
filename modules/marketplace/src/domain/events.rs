use chrono::{DateTime, Utc};

use crate::contract::model::UserMode;

/// Transport-agnostic domain event.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketplaceEvent {
    SignedIn {
        email: String,
        mode: UserMode,
        at: DateTime<Utc>,
    },
    SignedOut { at: DateTime<Utc> },
    JobPosted {
        id: String,
        company: String,
        at: DateTime<Utc>,
    },
    MessageSent {
        id: String,
        job_id: String,
        at: DateTime<Utc>,
    },
    ProfileSaved {
        email: String,
        at: DateTime<Utc>,
    },
}
