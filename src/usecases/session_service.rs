//! Sign-in, sign-up, sign-out and session restore.
//!
//! The signed-in identity is held in memory and mirrored to the session store so it
//! survives a restart.

use crate::domain::entities::normalize_phone;
use crate::domain::{DomainError, Identity, RegistrationRequest, Role};
use crate::ports::{IdentityRepoPort, SessionStorePort};
use crate::shared::ids::new_id;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct SessionService {
    identities: Arc<dyn IdentityRepoPort>,
    store: Arc<dyn SessionStorePort>,
    current: RwLock<Option<Identity>>,
}

impl SessionService {
    pub fn new(identities: Arc<dyn IdentityRepoPort>, store: Arc<dyn SessionStorePort>) -> Self {
        Self {
            identities,
            store,
            current: RwLock::new(None),
        }
    }

    /// Loads a previously persisted identity, if any.
    pub async fn restore(&self) -> Result<Option<Identity>, DomainError> {
        let stored = self.store.load().await?;
        if let Some(ref who) = stored {
            info!(user_id = %who.id, role = %who.role, "restored session");
        }
        *self.current.write().await = stored.clone();
        Ok(stored)
    }

    pub async fn current(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }

    /// The signed-in identity, or `NotAuthenticated`.
    pub async fn require(&self) -> Result<Identity, DomainError> {
        self.current().await.ok_or(DomainError::NotAuthenticated)
    }

    /// Signs in when email, password and role all match. On failure nothing changes.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Identity, DomainError> {
        let Some(who) = self
            .identities
            .verify_credentials(email.trim(), password, role)
            .await?
        else {
            warn!(email = %email.trim(), role = %role, "sign-in rejected");
            return Err(DomainError::InvalidCredentials);
        };
        self.store.save(&who).await?;
        *self.current.write().await = Some(who.clone());
        info!(user_id = %who.id, role = %who.role, "signed in");
        Ok(who)
    }

    /// Registers a new identity in the directory and signs it in.
    pub async fn sign_up(&self, request: RegistrationRequest) -> Result<Identity, DomainError> {
        request.validate()?;
        let email = request.email.trim().to_string();
        if self.identities.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Validation(format!(
                "an account already exists for {email}"
            )));
        }
        let who = Identity {
            id: new_id(),
            email,
            name: request.name.trim().to_string(),
            role: request.role,
            phone: normalize_phone(request.phone),
            created_at: Utc::now(),
        };
        self.identities
            .create(who.clone(), &request.password)
            .await?;
        self.store.save(&who).await?;
        *self.current.write().await = Some(who.clone());
        info!(user_id = %who.id, role = %who.role, "account created");
        Ok(who)
    }

    /// Clears the persisted record, then the in-memory identity. On failure both are kept.
    pub async fn sign_out(&self) -> Result<(), DomainError> {
        let mut current = self.current.write().await;
        self.store.clear().await?;
        if let Some(who) = current.take() {
            info!(user_id = %who.id, "signed out");
        }
        Ok(())
    }
}
