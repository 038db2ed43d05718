//! Mock credential check. Pure: callers persist the returned user.

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::AuthPolicy;
use crate::contract::model::{AuthRequest, User, UserMode};
use crate::domain::error::AuthError;

pub const DEMO_PASSWORD: &str = "toms1902";
pub const DEMO_STUDENT: &str = "user1";
pub const DEMO_EMPLOYER: &str = "user2";

const MOCK_TOKEN: &str = "mock-jwt-token";

fn is_demo_username(email: &str) -> bool {
    email == DEMO_STUDENT || email == DEMO_EMPLOYER
}

fn demo_user(email: &str) -> Option<User> {
    let user = match email {
        DEMO_STUDENT => User {
            mode: UserMode::Student,
            email: email.to_string(),
            student_id: Some(new_id(UserMode::Student)),
            employer_id: None,
            token: MOCK_TOKEN.to_string(),
            first_name: Some("Test".to_string()),
            last_name: Some("Student".to_string()),
            university: Some("Trinity College Dublin (TCD)".to_string()),
            company_name: None,
        },
        DEMO_EMPLOYER => User {
            mode: UserMode::Employer,
            email: email.to_string(),
            student_id: None,
            employer_id: Some(new_id(UserMode::Employer)),
            token: MOCK_TOKEN.to_string(),
            first_name: Some("Global Ventures Ltd".to_string()),
            last_name: Some("Ventures".to_string()),
            university: None,
            company_name: Some("Global Ventures Ltd".to_string()),
        },
        _ => return None,
    };
    Some(user)
}

/// `s-xxxxx` / `e-xxxxx`
fn new_id(mode: UserMode) -> String {
    let prefix = match mode {
        UserMode::Student => 's',
        UserMode::Employer => 'e',
    };
    let raw = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &raw[..5])
}

fn non_blank(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

fn synthesize(req: &AuthRequest) -> User {
    let (student_id, employer_id) = match req.mode {
        UserMode::Student => (Some(new_id(UserMode::Student)), None),
        UserMode::Employer => (None, Some(new_id(UserMode::Employer))),
    };
    let first_name = match req.mode {
        UserMode::Student => non_blank(&req.first_name).unwrap_or_else(|| "Student".into()),
        UserMode::Employer => non_blank(&req.company_name).unwrap_or_else(|| "Employer".into()),
    };
    User {
        mode: req.mode,
        email: req.email.trim().to_string(),
        student_id,
        employer_id,
        token: MOCK_TOKEN.to_string(),
        first_name: Some(first_name),
        last_name: non_blank(&req.last_name),
        university: non_blank(&req.university),
        company_name: non_blank(&req.company_name),
    }
}

fn validate_signup(req: &AuthRequest, policy: &AuthPolicy) -> Result<(), AuthError> {
    if req.password.chars().count() < policy.min_password_len {
        return Err(AuthError::validation(format!(
            "Password must be at least {} characters long.",
            policy.min_password_len
        )));
    }
    if req.password != req.confirm_password {
        return Err(AuthError::validation("Passwords do not match."));
    }
    match req.mode {
        UserMode::Student if req.university.trim().is_empty() => {
            Err(AuthError::validation("Please select your university."))
        }
        UserMode::Employer if req.company_name.trim().is_empty() => {
            Err(AuthError::validation("Please enter your company name."))
        }
        _ => Ok(()),
    }
}

/// Decide a login or signup attempt.
///
/// Order: demo pairs, email marker, signup validation, demo usernames with
/// a wrong password, then the non-demo login policy.
#[instrument(
    name = "marketplace.auth.resolve",
    skip(req, policy),
    fields(email = %req.email, signup = req.is_signup, mode = %req.mode)
)]
pub fn resolve(req: &AuthRequest, policy: &AuthPolicy) -> Result<User, AuthError> {
    let email = req.email.trim();

    if req.password == DEMO_PASSWORD {
        if let Some(user) = demo_user(email) {
            debug!(mode = %user.mode, "demo account matched");
            return Ok(user);
        }
    }

    if req.is_signup {
        if !email.contains('@') {
            return Err(AuthError::InvalidCredentials);
        }
        validate_signup(req, policy)?;
        let user = synthesize(req);
        debug!("signup accepted");
        return Ok(user);
    }

    if is_demo_username(email) {
        return Err(AuthError::IncorrectPassword);
    }
    if !email.contains('@') {
        return Err(AuthError::InvalidCredentials);
    }

    if policy.accept_any_login {
        if req.password.chars().count() < policy.min_password_len {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters long.",
                policy.min_password_len
            )));
        }
        debug!("open login accepted");
        return Ok(synthesize(req));
    }

    Err(AuthError::UnknownAccount {
        email: email.to_string(),
    })
}
