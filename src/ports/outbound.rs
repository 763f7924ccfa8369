//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters. The in-memory adapters stand in for a backend; a networked
//! or database implementation can replace them without touching use cases or the UI.

use crate::domain::{
    Complaint, DomainError, Identity, IdentityPatch, Notification, PredictionPoint, Role,
    StatusChange, TrendPoint,
};

/// Identity directory and credential check.
#[async_trait::async_trait]
pub trait IdentityRepoPort: Send + Sync {
    /// Returns the identity whose email, role and password all match.
    /// `None` when any of them does not.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<Identity>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError>;

    async fn get(&self, id: &str) -> Result<Option<Identity>, DomainError>;

    /// All identities, newest first.
    async fn list(&self) -> Result<Vec<Identity>, DomainError>;

    /// Stores a new identity with its password. Fails on duplicate email.
    async fn create(&self, identity: Identity, password: &str) -> Result<(), DomainError>;

    /// Applies `patch` and returns the updated identity.
    async fn update(&self, id: &str, patch: IdentityPatch) -> Result<Identity, DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Complaint storage.
#[async_trait::async_trait]
pub trait ComplaintRepoPort: Send + Sync {
    /// Stores a new complaint.
    async fn create(&self, complaint: Complaint) -> Result<(), DomainError>;

    /// Every stored complaint, in storage order. Visibility and filtering are applied by callers.
    async fn list(&self) -> Result<Vec<Complaint>, DomainError>;

    async fn get(&self, id: &str) -> Result<Option<Complaint>, DomainError>;

    /// Applies a status change atomically via `Complaint::advance` and returns the updated complaint.
    async fn advance_status(
        &self,
        id: &str,
        change: StatusChange,
    ) -> Result<Complaint, DomainError>;
}

/// Notification storage.
#[async_trait::async_trait]
pub trait NotificationRepoPort: Send + Sync {
    /// All notices, newest first.
    async fn list(&self) -> Result<Vec<Notification>, DomainError>;

    async fn add(&self, notification: Notification) -> Result<(), DomainError>;

    /// Marks the given notices read. Unknown ids are ignored. Returns how many changed.
    async fn mark_read(&self, ids: &[String]) -> Result<usize, DomainError>;
}

/// Session persistence. Stores at most one identity.
#[async_trait::async_trait]
pub trait SessionStorePort: Send + Sync {
    async fn load(&self) -> Result<Option<Identity>, DomainError>;

    async fn save(&self, identity: &Identity) -> Result<(), DomainError>;

    async fn clear(&self) -> Result<(), DomainError>;
}

/// Source of the dashboard time series. Counts are computed from complaints, not sourced here.
#[async_trait::async_trait]
pub trait DashboardSourcePort: Send + Sync {
    async fn weekly_trend(&self) -> Result<Vec<TrendPoint>, DomainError>;

    /// Predicted counts. Produced independently of the trend; no model is implied.
    async fn prediction(&self) -> Result<Vec<PredictionPoint>, DomainError>;
}
