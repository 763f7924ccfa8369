//! Domain entities. Pure data structures for the core business.
//!
//! Complaints and their lifecycle live in `complaint`; this file holds identities and notices.

use super::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is using the client. Every role-dependent decision matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Traveler,
    Agent,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Traveler, Role::Agent];

    pub fn label(self) -> &'static str {
        match self {
            Role::Traveler => "Traveler",
            Role::Agent => "Agent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An authenticated user of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn is_agent(&self) -> bool {
        matches!(self.role, Role::Agent)
    }
}

/// Sign-up form payload.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl RegistrationRequest {
    /// Minimum password length accepted at sign-up.
    pub const MIN_PASSWORD_LEN: usize = 6;

    /// Checks the form fields. Email uniqueness is checked against the directory by the caller.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation(format!(
                "'{}' is not a valid email",
                self.email
            )));
        }
        if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {} characters",
                Self::MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Partial update for an identity. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct IdentityPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
}

/// Trims a phone number. Blank means none.
pub fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

impl IdentityPatch {
    /// Same normalisation as sign-up: trimmed name and email, blank phone cleared.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            email: self.email.map(|e| e.trim().to_string()),
            phone: self.phone.map(normalize_phone),
        }
    }

    pub fn apply(self, identity: &mut Identity) {
        if let Some(name) = self.name {
            identity.name = name;
        }
        if let Some(email) = self.email {
            identity.email = email;
        }
        if let Some(phone) = self.phone {
            identity.phone = phone;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StatusChange,
    NewComplaint,
    Comment,
}

/// A notice shown in the notification list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub complaint_id: Option<String>,
    /// Identity the notice is addressed to. `None` means every identity of the matching role.
    pub recipient_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Whether `viewer` should see this notice.
    ///
    /// * Traveler: status changes that are broadcast or addressed to them.
    /// * Agent: new complaints and comments.
    pub fn is_visible_to(&self, viewer: &Identity) -> bool {
        match viewer.role {
            Role::Traveler => {
                self.kind == NotificationKind::StatusChange
                    && self
                        .recipient_id
                        .as_deref()
                        .is_none_or(|id| id == viewer.id)
            }
            Role::Agent => matches!(
                self.kind,
                NotificationKind::NewComplaint | NotificationKind::Comment
            ),
        }
    }
}
