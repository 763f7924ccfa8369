//! End-to-end: a traveler files a complaint, an agent works it through to treated, and the
//! traveler sees the notices and the history.

use chrono::NaiveDate;
use rail_complaints::adapters::dashboard::FixtureDashboardSource;
use rail_complaints::adapters::persistence::{
    Latency, MemoryComplaintRepo, MemoryIdentityRepo, MemoryNotificationRepo, SessionJson,
    fixtures,
};
use rail_complaints::domain::{
    ComplaintCategory, ComplaintDraft, ComplaintFilter, ComplaintStatus, DomainError,
    FileCandidate, NotificationKind, Role, SYSTEM_AUTHOR,
};
use rail_complaints::ports::{
    ComplaintRepoPort, IdentityRepoPort, NotificationRepoPort, SessionStorePort,
};
use rail_complaints::usecases::{
    Action, AppState, ComplaintService, DashboardService, NotificationService, Screen,
    SessionService, View,
};
use std::sync::Arc;

struct Desk {
    session: SessionService,
    complaints: ComplaintService,
    dashboard: DashboardService,
    notifications: NotificationService,
}

fn desk(dir: &tempfile::TempDir) -> Desk {
    let latency = Latency::default();
    let identities: Arc<dyn IdentityRepoPort> = Arc::new(MemoryIdentityRepo::seeded(latency));
    let complaints: Arc<dyn ComplaintRepoPort> = Arc::new(MemoryComplaintRepo::seeded(latency));
    let notifications: Arc<dyn NotificationRepoPort> =
        Arc::new(MemoryNotificationRepo::seeded(latency));
    let store: Arc<dyn SessionStorePort> =
        Arc::new(SessionJson::new(dir.path().join("session.json")));
    Desk {
        session: SessionService::new(identities, store),
        complaints: ComplaintService::new(
            Arc::clone(&complaints),
            Arc::clone(&notifications),
            1024 * 1024,
        ),
        dashboard: DashboardService::new(
            complaints,
            Arc::new(FixtureDashboardSource::new(latency)),
        ),
        notifications: NotificationService::new(notifications),
    }
}

#[tokio::test]
async fn traveler_files_and_agent_treats() {
    let dir = tempfile::tempdir().unwrap();
    let d = desk(&dir);

    // traveler signs in and lands on the submission form
    let traveler = d
        .session
        .sign_in("voyageur@example.com", fixtures::DEMO_PASSWORD, Role::Traveler)
        .await
        .unwrap();
    let mut state = AppState::restored(d.session.current().await);
    assert_eq!(state.screen(), Screen::View(View::NewComplaint));

    let intake = d.complaints.intake_files(vec![
        FileCandidate {
            name: "quai.jpg".into(),
            url: "file:///tmp/quai.jpg".into(),
            mime: "image/jpeg".into(),
            size: 200_000,
        },
        FileCandidate {
            name: "notes.txt".into(),
            url: "file:///tmp/notes.txt".into(),
            mime: "text/plain".into(),
            size: 10,
        },
        FileCandidate {
            name: "video.mp4".into(),
            url: "file:///tmp/video.mp4".into(),
            mime: "video/mp4".into(),
            size: 5 * 1024 * 1024,
        },
    ]);
    assert_eq!(intake.accepted.len(), 1);
    assert_eq!(intake.rejected.len(), 2);

    let filed = d
        .complaints
        .create(
            &traveler,
            ComplaintDraft {
                title: "Broken escalator".into(),
                description: "Escalator to platform 2 stopped".into(),
                category: ComplaintCategory::Technical,
                station: "Gare d'Oran".into(),
                line: Some("Oran - Alger".into()),
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                attachments: intake.accepted,
            },
        )
        .await
        .unwrap();
    assert_eq!(filed.status, ComplaintStatus::Submitted);
    assert_eq!(filed.attachments.len(), 1);
    assert_eq!(filed.status_history[0].updated_by, SYSTEM_AUTHOR);

    state.dispatch(Action::Navigate(View::MyComplaints));
    let mine = d
        .complaints
        .list(&traveler, &ComplaintFilter::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 3);
    assert_eq!(mine[0].id, filed.id);

    // agent works it through
    d.session.sign_out().await.unwrap();
    state.dispatch(Action::SignedOut);
    assert_eq!(state.screen(), Screen::Login);

    let agent = d
        .session
        .sign_in("agent@example.com", fixtures::DEMO_PASSWORD, Role::Agent)
        .await
        .unwrap();
    state.dispatch(Action::SignedIn(agent.clone()));
    assert_eq!(state.screen(), Screen::View(View::Dashboard));

    let stats = d.dashboard.stats(&agent).await.unwrap();
    assert_eq!(stats.total_complaints, 3);
    assert_eq!(stats.by_status[&ComplaintStatus::Submitted], 1);

    let agent_notices = d.notifications.list(&agent).await.unwrap();
    assert!(agent_notices.iter().any(|n| {
        n.kind == NotificationKind::NewComplaint && n.complaint_id.as_deref() == Some(&filed.id)
    }));

    let submitted = d
        .complaints
        .list(
            &agent,
            &ComplaintFilter {
                status: Some(ComplaintStatus::Submitted),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(submitted.len(), 1);
    state.dispatch(Action::SelectComplaint(submitted[0].id.clone()));
    assert_eq!(state.screen(), Screen::Detail(filed.id.clone()));

    let err = d
        .complaints
        .transition(&agent, &filed.id, ComplaintStatus::Treated, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));

    for (to, comment) in [
        (ComplaintStatus::Accepted, Some("Maintenance informed".to_string())),
        (ComplaintStatus::InProgress, None),
        (ComplaintStatus::Treated, Some("Escalator repaired".to_string())),
    ] {
        d.complaints
            .transition(&agent, &filed.id, to, comment)
            .await
            .unwrap();
    }

    // traveler sees the outcome
    d.session.sign_out().await.unwrap();
    let traveler = d
        .session
        .sign_in("voyageur@example.com", fixtures::DEMO_PASSWORD, Role::Traveler)
        .await
        .unwrap();
    let done = d.complaints.get(&traveler, &filed.id).await.unwrap();
    assert_eq!(done.status, ComplaintStatus::Treated);
    assert_eq!(done.assigned_agent.as_deref(), Some(agent.name.as_str()));
    let trail: Vec<ComplaintStatus> = done.status_history.iter().map(|h| h.status).collect();
    assert_eq!(
        trail,
        vec![
            ComplaintStatus::Submitted,
            ComplaintStatus::Accepted,
            ComplaintStatus::InProgress,
            ComplaintStatus::Treated,
        ]
    );
    assert_eq!(
        done.status_history[3].comment.as_deref(),
        Some("Escalator repaired")
    );

    let status_notices: Vec<_> = d
        .notifications
        .list(&traveler)
        .await
        .unwrap()
        .into_iter()
        .filter(|n| n.complaint_id.as_deref() == Some(filed.id.as_str()))
        .collect();
    assert_eq!(status_notices.len(), 3);
    assert!(
        status_notices
            .iter()
            .all(|n| n.kind == NotificationKind::StatusChange && !n.read)
    );
    let before = d.notifications.unread_count(&traveler).await.unwrap();
    let changed = d.notifications.mark_all_read(&traveler).await.unwrap();
    assert_eq!(changed, before);
    assert_eq!(d.notifications.unread_count(&traveler).await.unwrap(), 0);

    // other travelers never see it
    let stranger = d
        .session
        .sign_in(
            "mohamed.saidi@example.com",
            fixtures::DEMO_PASSWORD,
            Role::Traveler,
        )
        .await
        .unwrap();
    assert!(matches!(
        d.complaints.get(&stranger, &filed.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(d.notifications.list(&stranger).await.unwrap().is_empty());
}

#[tokio::test]
async fn session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let who = desk(&dir)
        .session
        .sign_in("agent@example.com", fixtures::DEMO_PASSWORD, Role::Agent)
        .await
        .unwrap();

    let restarted = desk(&dir);
    let restored = restarted.session.restore().await.unwrap();
    assert_eq!(restored.as_ref(), Some(&who));
    let state = AppState::restored(restored);
    assert_eq!(state.screen(), Screen::View(View::Dashboard));

    restarted.session.sign_out().await.unwrap();
    assert_eq!(desk(&dir).session.restore().await.unwrap(), None);
}
