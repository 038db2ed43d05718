use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two mutually exclusive roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserMode {
    #[default]
    Student,
    Employer,
}

impl UserMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserMode::Student => "student",
            UserMode::Employer => "employer",
        }
    }
}

impl fmt::Display for UserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(UserMode::Student),
            "employer" => Ok(UserMode::Employer),
            other => Err(format!("unknown mode '{other}' (expected student|employer)")),
        }
    }
}

/// Signed-in user record, persisted as the current-user snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub mode: UserMode,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<String>,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.mode == UserMode::Student
    }

    pub fn is_employer(&self) -> bool {
        self.mode == UserMode::Employer
    }

    /// Name shown in the header. For employers this is the company name,
    /// which is also the key that ties job listings to their owner.
    pub fn display_name(&self) -> &str {
        match (self.first_name.as_deref(), self.mode) {
            (Some(name), _) if !name.trim().is_empty() => name,
            (_, UserMode::Student) => "Student",
            (_, UserMode::Employer) => "Employer",
        }
    }
}

/// One of the six top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    #[default]
    Feed,
    Profile,
    Tracker,
    Dashboard,
    CreateJob,
    Inbox,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Feed,
        Screen::Profile,
        Screen::Tracker,
        Screen::Dashboard,
        Screen::CreateJob,
        Screen::Inbox,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Screen::Feed => "feed",
            Screen::Profile => "profile",
            Screen::Tracker => "tracker",
            Screen::Dashboard => "dashboard",
            Screen::CreateJob => "create-job",
            Screen::Inbox => "inbox",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == wanted)
            .ok_or_else(|| format!("unknown screen '{s}'"))
    }
}

/// What the shell actually renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Screen(Screen),
    /// Hire-talent call to action shown to guests in employer mode.
    EmployerPreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub logo: String,
    pub salary_min: f64,
    pub salary_max: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub status: JobStatus,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub applicant_count: u32,
    pub posted_at: DateTime<Utc>,
}

/// Raw create-job form input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub deadline: String,
    pub description: String,
    pub salary_min: f64,
    pub salary_max: f64,
    pub responsibilities: Vec<String>,
    pub skills: Vec<String>,
    pub contact: String,
}

impl Default for NewJob {
    fn default() -> Self {
        Self {
            title: String::new(),
            location: String::new(),
            deadline: String::new(),
            description: String::new(),
            salary_min: 12.5,
            salary_max: 15.0,
            responsibilities: vec![String::new()],
            skills: Vec::new(),
            contact: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub job_id: String,
    pub student_id: String,
    pub student_name: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

/// A message paired with the title of the listing it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    pub message: Message,
    pub job_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    Role,
    Company,
    Period,
}

impl FromStr for ExperienceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "role" => Ok(Self::Role),
            "company" => Ok(Self::Company),
            "period" => Ok(Self::Period),
            other => Err(format!("unknown experience field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub degree: String,
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub portfolio_url: String,
    #[serde(default)]
    pub linked_in_url: String,
}

/// Field-by-field profile edit; `None` leaves the field as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub university: Option<String>,
    pub degree: Option<String>,
    pub bio: Option<String>,
    pub portfolio_url: Option<String>,
    pub linked_in_url: Option<String>,
}

/// Credentials and signup form fields handed to the auth resolver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub mode: UserMode,
    pub is_signup: bool,
    pub first_name: String,
    pub last_name: String,
    pub university: String,
    pub company_name: String,
}

impl AuthRequest {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn signup(mode: UserMode, email: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            email: email.into(),
            confirm_password: password.clone(),
            password,
            mode,
            is_signup: true,
            ..Default::default()
        }
    }
}

/// Navigation affordance offered by the bottom bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub target: NavTarget,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Screen(Screen),
    SwitchMode(UserMode),
    OpenAuth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient, dismissible banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Outcome of pushing a locally saved profile to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    Failed,
    /// The editor closed before the backend answered; only the local copy was written.
    Abandoned,
}
