use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::contract::model::{JobListing, JobStatus, NewJob};
use crate::domain::error::DomainError;

pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

pub fn placeholder_logo(id: &str) -> String {
    format!("https://picsum.photos/seed/{}/200", id)
}

pub fn new_listing_id() -> String {
    Uuid::new_v4().simple().to_string()[..9].to_string()
}

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "Please fill in all required fields."));
    }
    Ok(())
}

/// Checks the create-job form; returns the parsed deadline.
pub fn validate(job: &NewJob) -> Result<NaiveDate, DomainError> {
    require("title", &job.title)?;
    require("location", &job.location)?;
    require("deadline", &job.deadline)?;
    require("description", &job.description)?;

    let deadline = NaiveDate::parse_from_str(job.deadline.trim(), DEADLINE_FORMAT)
        .map_err(|_| DomainError::validation("deadline", "Use the YYYY-MM-DD format."))?;

    if !job.salary_min.is_finite() || !job.salary_max.is_finite() || job.salary_min < 0.0 {
        return Err(DomainError::validation("salary", "Pay must be a positive number."));
    }
    if job.salary_min > job.salary_max {
        return Err(DomainError::validation(
            "salary",
            "Minimum pay cannot be greater than maximum pay.",
        ));
    }
    Ok(deadline)
}

/// Validate and turn a form into a listing owned by `company`.
pub fn build_listing(
    job: &NewJob,
    company: &str,
    now: DateTime<Utc>,
) -> Result<JobListing, DomainError> {
    let deadline = validate(job)?;
    let id = new_listing_id();
    let trimmed = |items: &[String]| -> Vec<String> {
        items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    Ok(JobListing {
        logo: placeholder_logo(&id),
        id,
        title: job.title.trim().to_string(),
        company: company.to_string(),
        location: job.location.trim().to_string(),
        salary_min: job.salary_min,
        salary_max: job.salary_max,
        tags: vec!["New".to_string()],
        description: job.description.trim().to_string(),
        responsibilities: trimmed(&job.responsibilities),
        skills: trimmed(&job.skills),
        status: JobStatus::Active,
        deadline,
        contact: job.contact.trim().to_string(),
        applicant_count: 0,
        posted_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewJob {
        NewJob {
            title: "Barista".into(),
            location: "Dublin 2".into(),
            deadline: "2026-12-01".into(),
            description: "Weekend shifts.".into(),
            responsibilities: vec!["Make coffee".into(), "  ".into(), String::new()],
            ..NewJob::default()
        }
    }

    #[test]
    fn valid_form_builds_listing() {
        let now = Utc::now();
        let listing = build_listing(&form(), "Bean There", now).unwrap();

        assert_eq!(listing.id.len(), 9);
        assert_eq!(listing.logo, placeholder_logo(&listing.id));
        assert_eq!(listing.company, "Bean There");
        assert_eq!(listing.responsibilities, vec!["Make coffee".to_string()]);
        assert_eq!(listing.tags, vec!["New".to_string()]);
        assert_eq!(listing.status, JobStatus::Active);
        assert_eq!(listing.applicant_count, 0);
        assert_eq!(listing.deadline, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(listing.posted_at, now);
        assert_eq!((listing.salary_min, listing.salary_max), (12.5, 15.0));
    }

    #[test]
    fn each_required_field_is_checked() {
        for field in ["title", "location", "deadline", "description"] {
            let mut job = form();
            match field {
                "title" => job.title = " ".into(),
                "location" => job.location.clear(),
                "deadline" => job.deadline.clear(),
                _ => job.description.clear(),
            }
            match validate(&job) {
                Err(DomainError::Validation { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn inverted_salary_range_is_rejected() {
        let job = NewJob {
            salary_min: 15.0,
            salary_max: 10.0,
            ..form()
        };
        assert!(matches!(
            validate(&job),
            Err(DomainError::Validation { ref field, .. }) if field == "salary"
        ));

        let equal = NewJob {
            salary_min: 11.0,
            salary_max: 11.0,
            ..form()
        };
        assert!(validate(&equal).is_ok());
    }

    #[test]
    fn malformed_deadline_is_rejected() {
        let job = NewJob {
            deadline: "next friday".into(),
            ..form()
        };
        assert!(validate(&job).is_err());
    }
}
