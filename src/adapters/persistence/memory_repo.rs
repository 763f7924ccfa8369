//! In-memory repositories. Implement the identity, complaint and notification ports.
//!
//! State lives behind a `tokio::sync::RwLock`; every mutation is a single write-locked
//! replacement. An optional latency is slept before each call to mimic a remote backend.

use super::fixtures;
use crate::domain::{
    Complaint, DomainError, Identity, IdentityPatch, Notification, Role, StatusChange,
};
use crate::ports::{ComplaintRepoPort, IdentityRepoPort, NotificationRepoPort};
use crate::shared::ids::new_id;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Simulated round-trip delay. Zero means no sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latency(Duration);

impl Latency {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub(crate) async fn wait(self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

struct Credentialed {
    identity: Identity,
    /// Demo credential; the mock directory has no hashing backend.
    password: String,
}

/// In-memory identity directory.
pub struct MemoryIdentityRepo {
    rows: RwLock<Vec<Credentialed>>,
    latency: Latency,
}

impl MemoryIdentityRepo {
    pub fn new(latency: Latency) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            latency,
        }
    }

    /// Directory pre-filled with the fixture identities, all using the demo password.
    pub fn seeded(latency: Latency) -> Self {
        let rows = fixtures::identities()
            .into_iter()
            .map(|identity| Credentialed {
                identity,
                password: fixtures::DEMO_PASSWORD.to_string(),
            })
            .collect();
        Self {
            rows: RwLock::new(rows),
            latency,
        }
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[async_trait::async_trait]
impl IdentityRepoPort for MemoryIdentityRepo {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<Identity>, DomainError> {
        self.latency.wait().await;
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| {
                same_email(&r.identity.email, email)
                    && r.identity.role == role
                    && r.password == password
            })
            .map(|r| r.identity.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, DomainError> {
        self.latency.wait().await;
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| same_email(&r.identity.email, email))
            .map(|r| r.identity.clone()))
    }

    async fn get(&self, id: &str) -> Result<Option<Identity>, DomainError> {
        self.latency.wait().await;
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.identity.id == id)
            .map(|r| r.identity.clone()))
    }

    async fn list(&self) -> Result<Vec<Identity>, DomainError> {
        self.latency.wait().await;
        let rows = self.rows.read().await;
        let mut out: Vec<Identity> = rows.iter().map(|r| r.identity.clone()).collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn create(&self, identity: Identity, password: &str) -> Result<(), DomainError> {
        self.latency.wait().await;
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|r| same_email(&r.identity.email, &identity.email))
        {
            return Err(DomainError::Validation(format!(
                "an account already exists for {}",
                identity.email
            )));
        }
        info!(id = %identity.id, role = %identity.role, "identity created");
        rows.push(Credentialed {
            identity,
            password: password.to_string(),
        });
        Ok(())
    }

    async fn update(&self, id: &str, patch: IdentityPatch) -> Result<Identity, DomainError> {
        self.latency.wait().await;
        let mut rows = self.rows.write().await;
        if let Some(email) = patch.email.as_deref() {
            if rows
                .iter()
                .any(|r| r.identity.id != id && same_email(&r.identity.email, email))
            {
                return Err(DomainError::Validation(format!(
                    "an account already exists for {email}"
                )));
            }
        }
        let row = rows
            .iter_mut()
            .find(|r| r.identity.id == id)
            .ok_or_else(|| DomainError::not_found("identity", id))?;
        patch.apply(&mut row.identity);
        debug!(id, "identity updated");
        Ok(row.identity.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.latency.wait().await;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| r.identity.id != id);
        if rows.len() == before {
            return Err(DomainError::not_found("identity", id));
        }
        info!(id, "identity deleted");
        Ok(())
    }
}

/// In-memory complaint store.
pub struct MemoryComplaintRepo {
    rows: RwLock<Vec<Complaint>>,
    latency: Latency,
}

impl MemoryComplaintRepo {
    pub fn new(latency: Latency) -> Self {
        Self::with_rows(Vec::new(), latency)
    }

    pub fn seeded(latency: Latency) -> Self {
        Self::with_rows(fixtures::complaints(), latency)
    }

    pub fn with_rows(rows: Vec<Complaint>, latency: Latency) -> Self {
        Self {
            rows: RwLock::new(rows),
            latency,
        }
    }
}

#[async_trait::async_trait]
impl ComplaintRepoPort for MemoryComplaintRepo {
    async fn create(&self, complaint: Complaint) -> Result<(), DomainError> {
        self.latency.wait().await;
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.id == complaint.id) {
            return Err(DomainError::Repo(format!(
                "duplicate complaint id {}",
                complaint.id
            )));
        }
        rows.insert(0, complaint);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Complaint>, DomainError> {
        self.latency.wait().await;
        Ok(self.rows.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Complaint>, DomainError> {
        self.latency.wait().await;
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn advance_status(
        &self,
        id: &str,
        change: StatusChange,
    ) -> Result<Complaint, DomainError> {
        self.latency.wait().await;
        let mut rows = self.rows.write().await;
        let complaint = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("complaint", id))?;
        complaint.advance(change, new_id())?;
        Ok(complaint.clone())
    }
}

/// In-memory notification store.
pub struct MemoryNotificationRepo {
    rows: RwLock<Vec<Notification>>,
    latency: Latency,
}

impl MemoryNotificationRepo {
    pub fn new(latency: Latency) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            latency,
        }
    }

    pub fn seeded(latency: Latency) -> Self {
        Self {
            rows: RwLock::new(fixtures::notifications()),
            latency,
        }
    }
}

#[async_trait::async_trait]
impl NotificationRepoPort for MemoryNotificationRepo {
    async fn list(&self) -> Result<Vec<Notification>, DomainError> {
        self.latency.wait().await;
        let mut out = self.rows.read().await.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn add(&self, notification: Notification) -> Result<(), DomainError> {
        self.latency.wait().await;
        self.rows.write().await.insert(0, notification);
        Ok(())
    }

    async fn mark_read(&self, ids: &[String]) -> Result<usize, DomainError> {
        self.latency.wait().await;
        let mut rows = self.rows.write().await;
        let mut changed = 0;
        for n in rows.iter_mut().filter(|n| !n.read && ids.contains(&n.id)) {
            n.read = true;
            changed += 1;
        }
        Ok(changed)
    }
}
