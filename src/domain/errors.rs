//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use crate::domain::ComplaintStatus;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Email, password or role did not match a known identity.
    #[error("Incorrect email, password or role")]
    InvalidCredentials,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Cannot move a complaint from '{from}' to '{to}'")]
    InvalidTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("File \"{name}\" is too large ({size} bytes, max {max} bytes)")]
    AttachmentTooLarge { name: String, size: u64, max: u64 },

    #[error("File \"{name}\" has an unsupported type: {mime}")]
    UnsupportedMediaType { name: String, mime: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("UI error: {0}")]
    Ui(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
