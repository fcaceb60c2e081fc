use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::performance::PartyName;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    #[default]
    Agent,
    TeamLead,
    Manager,
    Admin,
}

impl StaffRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::TeamLead => "Team Lead",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }
}

/// Payload for creating or replacing a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSubmission {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: StaffRole,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub joined_on: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub joined_on: NaiveDate,
    pub active: bool,
}

impl StaffMember {
    /// Identity matched against `agent_name` on call reports.
    pub fn agent_name(&self) -> PartyName {
        PartyName::new(self.full_name.as_str())
    }

    pub fn role_label(&self) -> &'static str {
        self.role.label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaffValidationError {
    #[error("full name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Checked, normalised fields ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedStaff {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub joined_on: Option<NaiveDate>,
    pub active: bool,
}

impl ValidatedStaff {
    pub(crate) fn into_member(self, id: StaffId, default_joined_on: NaiveDate) -> StaffMember {
        StaffMember {
            id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            role: self.role,
            joined_on: self.joined_on.unwrap_or(default_joined_on),
            active: self.active,
        }
    }
}

pub(crate) fn validate_submission(
    submission: StaffSubmission,
) -> Result<ValidatedStaff, StaffValidationError> {
    let full_name = submission
        .full_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if full_name.is_empty() {
        return Err(StaffValidationError::MissingName);
    }

    let email = submission.email.trim().to_ascii_lowercase();
    if !is_plausible_email(&email) {
        return Err(StaffValidationError::InvalidEmail(submission.email));
    }

    let phone = submission
        .phone
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    Ok(ValidatedStaff {
        full_name,
        email,
        phone,
        role: submission.role,
        joined_on: submission.joined_on,
        active: submission.active,
    })
}

fn is_plausible_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !value.contains(char::is_whitespace)
        }
        _ => false,
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str) -> StaffSubmission {
        StaffSubmission {
            full_name: name.to_string(),
            email: email.to_string(),
            phone: Some("  ".to_string()),
            role: StaffRole::Agent,
            joined_on: None,
            active: true,
        }
    }

    #[test]
    fn validation_normalises_fields() {
        let validated = validate_submission(submission("  Ava   Stone ", " Ava@Example.com "))
            .expect("valid submission");
        assert_eq!(validated.full_name, "Ava Stone");
        assert_eq!(validated.email, "ava@example.com");
        assert_eq!(validated.phone, None);
    }

    #[test]
    fn validation_rejects_blank_name_and_bad_email() {
        assert_eq!(
            validate_submission(submission(" ", "a@b.c")),
            Err(StaffValidationError::MissingName)
        );
        assert!(matches!(
            validate_submission(submission("Ava", "not-an-email")),
            Err(StaffValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_submission(submission("Ava", "a@b@c")),
            Err(StaffValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_submission(submission("Ava", "@example.com")),
            Err(StaffValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn submission_defaults_role_and_active() {
        let parsed: StaffSubmission = serde_json::from_value(serde_json::json!({
            "full_name": "Ava Stone",
            "email": "ava@example.com",
            "joined_on": "2024-05-01",
        }))
        .expect("submission parses");
        assert_eq!(parsed.role, StaffRole::Agent);
        assert!(parsed.active);
        assert_eq!(parsed.joined_on, NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
