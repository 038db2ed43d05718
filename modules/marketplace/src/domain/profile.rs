use crate::contract::model::{Experience, ExperienceField, ProfilePatch, StudentProfile, User};
use crate::domain::error::DomainError;

/// Placeholder profile shown the first time a student opens the editor.
pub fn seeded_profile(user: &User) -> StudentProfile {
    let or = |v: &Option<String>, fallback: &str| {
        v.as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    StudentProfile {
        id: or(&user.student_id, "1"),
        first_name: or(&user.first_name, "Alex"),
        last_name: or(&user.last_name, "Byrne"),
        dob: "2001-05-15".to_string(),
        email: user.email.clone(),
        phone: "+353 87 123 4567".to_string(),
        university: or(&user.university, "Trinity College Dublin (TCD)"),
        degree: "BSc Computer Science".to_string(),
        bio: "Dedicated student looking for a part-time role to gain experience.".to_string(),
        skills: vec!["Communication".to_string(), "Time Management".to_string()],
        experience: Vec::new(),
        portfolio_url: String::new(),
        linked_in_url: String::new(),
    }
}

impl StudentProfile {
    pub fn apply(&mut self, patch: ProfilePatch) {
        let ProfilePatch {
            first_name,
            last_name,
            dob,
            phone,
            university,
            degree,
            bio,
            portfolio_url,
            linked_in_url,
        } = patch;
        let fields = [
            (first_name, &mut self.first_name),
            (last_name, &mut self.last_name),
            (dob, &mut self.dob),
            (phone, &mut self.phone),
            (university, &mut self.university),
            (degree, &mut self.degree),
            (bio, &mut self.bio),
            (portfolio_url, &mut self.portfolio_url),
            (linked_in_url, &mut self.linked_in_url),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }

    /// Replace skills from a comma separated list. Skills behave like a set:
    /// blanks are dropped and repeats (case-insensitive) keep the first spelling.
    pub fn set_skills_from_csv(&mut self, csv: &str) {
        let mut skills: Vec<String> = Vec::new();
        for skill in csv.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                skills.push(skill.to_string());
            }
        }
        self.skills = skills;
    }

    pub fn add_experience(&mut self) -> usize {
        self.experience.push(Experience::default());
        self.experience.len() - 1
    }

    pub fn update_experience(
        &mut self,
        index: usize,
        field: ExperienceField,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        let entry = self
            .experience
            .get_mut(index)
            .ok_or_else(|| DomainError::validation("experience", format!("no entry #{index}")))?;
        let slot = match field {
            ExperienceField::Role => &mut entry.role,
            ExperienceField::Company => &mut entry.company,
            ExperienceField::Period => &mut entry.period,
        };
        *slot = value.into();
        Ok(())
    }

    pub fn remove_experience(&mut self, index: usize) -> Result<Experience, DomainError> {
        if index >= self.experience.len() {
            return Err(DomainError::validation("experience", format!("no entry #{index}")));
        }
        Ok(self.experience.remove(index))
    }

    /// Two-letter avatar text.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .collect()
    }
}
