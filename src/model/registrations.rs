use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use uuid::Uuid;

use crate::domain::{
    EmailAddress, ExperienceLevel, ParticipantName, PaymentStatus, RegistrationType,
};
use crate::error::{Error, MissingFields};

/// Raw registration form payload, exactly as entered.
/// Absent fields deserialize to empty values so that validation can report
/// them by name rather than the request failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub experience_level: String,
    pub motivation: Option<String>,
    pub tracks_interested: Vec<String>,
    pub registration_type: String,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: None,
            experience_level: String::new(),
            motivation: None,
            tracks_interested: Vec::new(),
            registration_type: RegistrationType::default().as_ref().to_string(),
        }
    }
}

impl RegistrationDraft {
    /// Check that every required field is present and non-blank.
    /// Presence only; format checks are delegated to the domain parsers.
    pub fn validate(&self) -> Result<(), MissingFields> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.experience_level.trim().is_empty() {
            missing.push("experience_level");
        }
        if self.registration_type.trim().is_empty() {
            missing.push("registration_type");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields(missing))
        }
    }

    /// Pure, idempotent cleanup: trim name, trim+lowercase email, and turn
    /// blank optional fields into absent ones.
    pub fn normalize(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: normalize_optional(&self.phone),
            experience_level: self.experience_level.trim().to_lowercase(),
            motivation: normalize_optional(&self.motivation),
            tracks_interested: self.tracks_interested.clone(),
            registration_type: self.registration_type.trim().to_lowercase(),
        }
    }
}

fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A validated, normalized registration ready to be inserted
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: ParticipantName,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub experience_level: ExperienceLevel,
    pub motivation: Option<String>,
    pub tracks_interested: Vec<String>,
    pub registration_type: RegistrationType,
}

impl NewRegistration {
    /// Premium registrations start out pending payment; free ones carry no
    /// payment status at all.
    pub fn initial_payment_status(&self) -> Option<PaymentStatus> {
        match self.registration_type {
            RegistrationType::Free => None,
            RegistrationType::Premium => Some(PaymentStatus::Pending),
        }
    }
}

impl TryFrom<RegistrationDraft> for NewRegistration {
    type Error = Error;

    fn try_from(draft: RegistrationDraft) -> Result<Self, Self::Error> {
        draft.validate()?;
        let draft = draft.normalize();

        Ok(Self {
            name: draft.name.parse()?,
            email: draft.email.parse()?,
            phone: draft.phone,
            experience_level: draft.experience_level.parse()?,
            motivation: draft.motivation,
            tracks_interested: draft.tracks_interested,
            registration_type: draft.registration_type.parse()?,
        })
    }
}

/// Stored registration record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    /// ID of the registration, assigned by the store on insert
    pub id: Uuid,
    /// Participant supplied data, persisted verbatim after normalization
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub experience_level: String,
    pub motivation: Option<String>,
    pub tracks_interested: Vec<String>,
    pub registration_type: String,
    /// `None` for free registrations; `pending` until the processor confirms
    /// the charge for premium ones, then `completed`
    pub payment_status: Option<String>,
    /// Processor back-references, set on payment confirmation only
    pub payment_intent_id: Option<String>,
    pub stripe_customer_id: Option<String>,
    /// Creation and update timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
