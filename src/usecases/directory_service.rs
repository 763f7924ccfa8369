//! User directory: lookup for everyone, mutations for agents.

use crate::domain::entities::normalize_phone;
use crate::domain::{DomainError, Identity, IdentityPatch, RegistrationRequest, Role};
use crate::ports::IdentityRepoPort;
use crate::shared::ids::new_id;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub struct DirectoryService {
    repo: Arc<dyn IdentityRepoPort>,
}

fn require_agent(actor: &Identity) -> Result<(), DomainError> {
    match actor.role {
        Role::Agent => Ok(()),
        Role::Traveler => Err(DomainError::Forbidden(
            "only agents can manage the directory".into(),
        )),
    }
}

impl DirectoryService {
    pub fn new(repo: Arc<dyn IdentityRepoPort>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Identity>, DomainError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Identity, DomainError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("identity", id))
    }

    pub async fn by_role(&self, role: Role) -> Result<Vec<Identity>, DomainError> {
        Ok(self
            .repo
            .list()
            .await?
            .into_iter()
            .filter(|i| i.role == role)
            .collect())
    }

    pub async fn create(
        &self,
        actor: &Identity,
        request: RegistrationRequest,
    ) -> Result<Identity, DomainError> {
        require_agent(actor)?;
        request.validate()?;
        let identity = Identity {
            id: new_id(),
            email: request.email.trim().to_string(),
            name: request.name.trim().to_string(),
            role: request.role,
            phone: normalize_phone(request.phone),
            created_at: Utc::now(),
        };
        self.repo.create(identity.clone(), &request.password).await?;
        info!(by = %actor.id, id = %identity.id, "directory entry created");
        Ok(identity)
    }

    pub async fn update(
        &self,
        actor: &Identity,
        id: &str,
        patch: IdentityPatch,
    ) -> Result<Identity, DomainError> {
        require_agent(actor)?;
        let patch = patch.normalized();
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::Validation("name is required".into()));
        }
        if patch.email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Err(DomainError::Validation("email is not valid".into()));
        }
        self.repo.update(id, patch).await
    }

    /// Removes an identity. Agents cannot delete themselves.
    pub async fn delete(&self, actor: &Identity, id: &str) -> Result<(), DomainError> {
        require_agent(actor)?;
        if actor.id == id {
            return Err(DomainError::Forbidden("cannot delete your own account".into()));
        }
        self.repo.delete(id).await?;
        info!(by = %actor.id, id, "directory entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::{Latency, MemoryIdentityRepo, fixtures};

    fn service() -> DirectoryService {
        DirectoryService::new(Arc::new(MemoryIdentityRepo::seeded(Latency::default())))
    }

    fn person(id: &str) -> Identity {
        fixtures::identities()
            .into_iter()
            .find(|i| i.id == id)
            .unwrap()
    }

    #[tokio::test]
    async fn lookups() {
        let svc = service();
        assert_eq!(svc.list().await.unwrap().len(), 5);
        assert_eq!(svc.by_role(Role::Agent).await.unwrap().len(), 2);
        assert_eq!(svc.by_role(Role::Traveler).await.unwrap().len(), 3);
        assert_eq!(svc.get("4").await.unwrap().name, "Amina Khelifi");
        assert!(matches!(
            svc.get("404").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn travelers_cannot_mutate() {
        let svc = service();
        let traveler = person("1");
        assert!(matches!(
            svc.delete(&traveler, "3").await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            svc.update(&traveler, "3", IdentityPatch::default()).await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn agent_manages_entries() {
        let svc = service();
        let agent = person("2");
        let created = svc
            .create(
                &agent,
                RegistrationRequest {
                    name: "Karim Ziani".into(),
                    email: "karim@example.com".into(),
                    password: "welcome1".into(),
                    phone: Some("  +213 555 222 333 ".into()),
                    role: Role::Agent,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.phone.as_deref(), Some("+213 555 222 333"));
        assert_eq!(svc.by_role(Role::Agent).await.unwrap().len(), 3);

        let renamed = svc
            .update(
                &agent,
                &created.id,
                IdentityPatch {
                    phone: Some(Some("+213 555 000 111".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.phone.as_deref(), Some("+213 555 000 111"));
        assert_eq!(renamed.created_at, created.created_at);

        let moved = svc
            .update(
                &agent,
                &created.id,
                IdentityPatch {
                    email: Some("  karim.ziani@example.com ".into()),
                    phone: Some(Some("   ".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.email, "karim.ziani@example.com");
        assert_eq!(moved.phone, None);

        svc.delete(&agent, &created.id).await.unwrap();
        assert!(matches!(
            svc.delete(&agent, "2").await,
            Err(DomainError::Forbidden(_))
        ));
    }
}
