//! Complaint use cases: submit, list with filters, view, and advance status.
//!
//! - Travelers only ever see complaints they own
//! - Only agents may advance status; the transition table lives in the domain
//! - Notices are published on submission and on every status change

use crate::domain::{
    AttachmentIntake, Complaint, ComplaintDraft, ComplaintFilter, ComplaintStatus, DomainError,
    FileCandidate, Identity, Notification, NotificationKind, Role, StatusChange, filter,
};
use crate::ports::{ComplaintRepoPort, NotificationRepoPort};
use crate::shared::ids::new_id;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ComplaintService {
    complaints: Arc<dyn ComplaintRepoPort>,
    notifications: Arc<dyn NotificationRepoPort>,
    max_attachment_bytes: u64,
}

impl ComplaintService {
    pub fn new(
        complaints: Arc<dyn ComplaintRepoPort>,
        notifications: Arc<dyn NotificationRepoPort>,
        max_attachment_bytes: u64,
    ) -> Self {
        Self {
            complaints,
            notifications,
            max_attachment_bytes,
        }
    }

    pub fn max_attachment_bytes(&self) -> u64 {
        self.max_attachment_bytes
    }

    /// Validates picked files against the configured size ceiling and accepted types.
    pub fn intake_files(&self, candidates: Vec<FileCandidate>) -> AttachmentIntake {
        let intake =
            AttachmentIntake::from_candidates(candidates, self.max_attachment_bytes, new_id);
        for rejected in &intake.rejected {
            warn!(reason = %rejected, "attachment rejected");
        }
        intake
    }

    /// Files a new complaint owned by `actor`. It starts `submitted` with one history entry.
    pub async fn create(
        &self,
        actor: &Identity,
        draft: ComplaintDraft,
    ) -> Result<Complaint, DomainError> {
        draft.validate()?;
        let complaint = Complaint::submit(new_id(), actor.id.clone(), draft, new_id(), Utc::now());
        self.complaints.create(complaint.clone()).await?;
        info!(
            complaint_id = %complaint.id,
            user_id = %actor.id,
            category = ?complaint.category,
            attachments = complaint.attachments.len(),
            "complaint submitted"
        );
        self.publish(Notification {
            id: new_id(),
            message: format!("New complaint submitted - {}", complaint.title),
            kind: NotificationKind::NewComplaint,
            complaint_id: Some(complaint.id.clone()),
            recipient_id: None,
            read: false,
            created_at: complaint.created_at,
        })
        .await;
        Ok(complaint)
    }

    /// Complaints visible to `actor` that match `criteria`, newest first.
    pub async fn list(
        &self,
        actor: &Identity,
        criteria: &ComplaintFilter,
    ) -> Result<Vec<Complaint>, DomainError> {
        let all = self.complaints.list().await?;
        Ok(filter::select(&all, actor, criteria))
    }

    /// A single complaint. Complaints the actor may not see are reported as not found.
    pub async fn get(&self, actor: &Identity, id: &str) -> Result<Complaint, DomainError> {
        self.complaints
            .get(id)
            .await?
            .filter(|c| filter::is_visible_to(c, actor))
            .ok_or_else(|| DomainError::not_found("complaint", id))
    }

    /// Status buttons to offer `actor` for `complaint`. Travelers get none.
    pub fn available_transitions(
        &self,
        actor: &Identity,
        complaint: &Complaint,
    ) -> &'static [ComplaintStatus] {
        match actor.role {
            Role::Agent => complaint.status.next_statuses(),
            Role::Traveler => &[],
        }
    }

    /// Moves a complaint to `to`, recording `comment` and the agent's name in the history.
    pub async fn transition(
        &self,
        actor: &Identity,
        id: &str,
        to: ComplaintStatus,
        comment: Option<String>,
    ) -> Result<Complaint, DomainError> {
        match actor.role {
            Role::Agent => {}
            Role::Traveler => {
                return Err(DomainError::Forbidden(
                    "only agents can change a complaint's status".into(),
                ));
            }
        }
        let change = StatusChange {
            to,
            comment,
            author: actor.name.clone(),
            at: Utc::now(),
        };
        let updated = self.complaints.advance_status(id, change).await?;
        info!(
            complaint_id = %updated.id,
            status = %updated.status,
            agent = %actor.name,
            "complaint status changed"
        );
        self.publish(Notification {
            id: new_id(),
            message: format!(
                "Your complaint \"{}\" is now {}",
                updated.title,
                updated.status.label().to_lowercase()
            ),
            kind: NotificationKind::StatusChange,
            complaint_id: Some(updated.id.clone()),
            recipient_id: Some(updated.user_id.clone()),
            read: false,
            created_at: updated.updated_at,
        })
        .await;
        Ok(updated)
    }

    /// Notices are best effort: a failed publish never undoes the complaint change.
    async fn publish(&self, notification: Notification) {
        if let Err(e) = self.notifications.add(notification).await {
            warn!(error = %e, "failed to publish notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::{
        Latency, MemoryComplaintRepo, MemoryNotificationRepo, fixtures,
    };
    use crate::domain::{ComplaintCategory, DEFAULT_MAX_ATTACHMENT_BYTES, SYSTEM_AUTHOR};
    use chrono::NaiveDate;

    struct Fixture {
        svc: ComplaintService,
        notices: Arc<MemoryNotificationRepo>,
    }

    fn fixture() -> Fixture {
        let notices = Arc::new(MemoryNotificationRepo::new(Latency::default()));
        let svc = ComplaintService::new(
            Arc::new(MemoryComplaintRepo::seeded(Latency::default())),
            notices.clone(),
            DEFAULT_MAX_ATTACHMENT_BYTES,
        );
        Fixture { svc, notices }
    }

    fn person(id: &str) -> Identity {
        fixtures::identities()
            .into_iter()
            .find(|i| i.id == id)
            .unwrap()
    }

    fn draft(title: &str) -> ComplaintDraft {
        ComplaintDraft {
            title: title.into(),
            description: "Ticket machine swallowed my card".into(),
            category: ComplaintCategory::Payment,
            station: "Gare de Annaba".into(),
            line: None,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn create_yields_single_system_entry_and_notice() {
        let f = fixture();
        let traveler = person("3");
        let c = f.svc.create(&traveler, draft("Card stuck")).await.unwrap();
        assert_eq!(c.user_id, "3");
        assert_eq!(c.status, ComplaintStatus::Submitted);
        assert_eq!(c.status_history.len(), 1);
        assert_eq!(c.status_history[0].updated_by, SYSTEM_AUTHOR);

        let notices = f.notices.list().await.unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NotificationKind::NewComplaint);
        assert_eq!(notices[0].complaint_id.as_deref(), Some(c.id.as_str()));
    }

    #[tokio::test]
    async fn traveler_lists_only_own_complaints() {
        let f = fixture();
        f.svc.create(&person("3"), draft("Other owner")).await.unwrap();

        let mine = f
            .svc
            .list(&person("1"), &ComplaintFilter::default())
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.user_id == "1"));

        let all = f
            .svc
            .list(&person("2"), &ComplaintFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].title, "Other owner");
    }

    #[tokio::test]
    async fn get_hides_foreign_complaints() {
        let f = fixture();
        let err = f.svc.get(&person("3"), "1").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(f.svc.get(&person("1"), "1").await.is_ok());
        assert!(f.svc.get(&person("2"), "1").await.is_ok());
    }

    #[tokio::test]
    async fn only_agents_transition() {
        let f = fixture();
        let traveler = person("3");
        let c = f.svc.create(&traveler, draft("Card stuck")).await.unwrap();

        let err = f
            .svc
            .transition(&traveler, &c.id, ComplaintStatus::Accepted, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(f.svc.get(&traveler, &c.id).await.unwrap().status_history.len(), 1);
        assert!(f.svc.available_transitions(&traveler, &c).is_empty());

        let agent = person("2");
        assert_eq!(
            f.svc.available_transitions(&agent, &c),
            &[ComplaintStatus::Accepted, ComplaintStatus::Rejected]
        );
        let accepted = f
            .svc
            .transition(&agent, &c.id, ComplaintStatus::Accepted, Some("On it".into()))
            .await
            .unwrap();
        assert_eq!(accepted.status, ComplaintStatus::Accepted);
        assert_eq!(accepted.status_history.len(), 2);
        assert_eq!(accepted.status_history[1].updated_by, "Fatima Benali");
        assert_eq!(accepted.status_history[1].comment.as_deref(), Some("On it"));
        assert_eq!(accepted.assigned_agent.as_deref(), Some("Fatima Benali"));

        let notices = f.notices.list().await.unwrap();
        let status_notice = notices
            .iter()
            .find(|n| n.kind == NotificationKind::StatusChange)
            .unwrap();
        assert_eq!(status_notice.recipient_id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn full_lifecycle_then_terminal() {
        let f = fixture();
        let agent = person("4");
        let c = f.svc.create(&person("5"), draft("Refund")).await.unwrap();
        for to in [
            ComplaintStatus::Accepted,
            ComplaintStatus::InProgress,
            ComplaintStatus::Treated,
        ] {
            f.svc.transition(&agent, &c.id, to, None).await.unwrap();
        }
        let done = f.svc.get(&agent, &c.id).await.unwrap();
        assert_eq!(done.status_history.len(), 4);
        assert!(f.svc.available_transitions(&agent, &done).is_empty());

        let err = f
            .svc
            .transition(&agent, &c.id, ComplaintStatus::Rejected, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: ComplaintStatus::Treated,
                to: ComplaintStatus::Rejected
            }
        );
    }

    #[tokio::test]
    async fn create_rejects_blank_fields() {
        let f = fixture();
        let err = f.svc.create(&person("1"), draft("  ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            f.svc
                .list(&person("2"), &ComplaintFilter::default())
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn intake_uses_configured_ceiling() {
        let svc = ComplaintService::new(
            Arc::new(MemoryComplaintRepo::new(Latency::default())),
            Arc::new(MemoryNotificationRepo::new(Latency::default())),
            1024,
        );
        let intake = svc.intake_files(vec![
            FileCandidate {
                name: "a.png".into(),
                url: "file:///a.png".into(),
                mime: "image/png".into(),
                size: 1024,
            },
            FileCandidate {
                name: "b.png".into(),
                url: "file:///b.png".into(),
                mime: "image/png".into(),
                size: 1025,
            },
        ]);
        assert_eq!(intake.accepted.len(), 1);
        assert_eq!(intake.rejected.len(), 1);
    }
}
