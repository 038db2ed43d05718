use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::ports::TextGenerator;

const MAX_DESCRIPTION_WORDS: usize = 100;

/// Offline generator that fills fixed templates. Refuses to run without an
/// API key so hosts behave the same as with a hosted model.
pub struct TemplateGenerator {
    api_key: Option<String>,
}

impl TemplateGenerator {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(DomainError::GenerationUnavailable)
        }
    }
}

fn truncate_words(text: &str, max: usize) -> String {
    text.split_whitespace().take(max).collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl TextGenerator for TemplateGenerator {
    #[instrument(name = "marketplace.textgen.job_description", skip(self))]
    async fn job_description(&self, title: &str, company: &str) -> Result<String, DomainError> {
        self.ensure_configured()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::generation("no job title given"));
        }
        let text = format!(
            "{company} is looking for a reliable student to join the team as a part-time \
             {title}. You will work alongside friendly colleagues, pick up practical skills \
             and get real experience for your CV. Shifts are arranged around your lectures \
             and exams, so flexibility is provided for students throughout the academic year."
        );
        debug!(words = text.split_whitespace().count(), "description drafted");
        Ok(truncate_words(&text, MAX_DESCRIPTION_WORDS))
    }

    #[instrument(name = "marketplace.textgen.improve_bio", skip_all)]
    async fn improve_bio(&self, bio: &str) -> Result<String, DomainError> {
        self.ensure_configured()?;
        let mut body = bio.split_whitespace().collect::<Vec<_>>().join(" ");
        if body.is_empty() {
            return Err(DomainError::generation("empty bio"));
        }
        if let Some(first) = body.get(..1) {
            body = first.to_uppercase() + &body[1..];
        }
        if !body.ends_with(&['.', '!', '?'][..]) {
            body.push('.');
        }
        Ok(format!(
            "{body} I am punctual, quick to learn and happy to take on responsibility, \
             and I am available for part-time shifts that fit around my studies."
        ))
    }
}
