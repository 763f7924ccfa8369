//! Seed data for the in-memory adapters.
//!
//! Every seeded identity signs in with [`DEMO_PASSWORD`].

use crate::domain::{
    Complaint, ComplaintCategory, ComplaintStatus, Identity, Notification, NotificationKind,
    PredictionPoint, Priority, Role, SYSTEM_AUTHOR, StatusHistoryEntry, TrendPoint,
};
use chrono::{DateTime, NaiveDate, Utc};

pub const DEMO_PASSWORD: &str = "password123";

fn ts(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn identity(id: &str, email: &str, name: &str, role: Role, phone: &str, at: &str) -> Identity {
    Identity {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        phone: Some(phone.to_string()),
        created_at: ts(at),
    }
}

pub fn identities() -> Vec<Identity> {
    vec![
        identity(
            "1",
            "voyageur@example.com",
            "Ahmed Bouhadjar",
            Role::Traveler,
            "+213 555 123 456",
            "2024-01-10T08:00:00Z",
        ),
        identity(
            "2",
            "agent@example.com",
            "Fatima Benali",
            Role::Agent,
            "+213 555 987 654",
            "2024-01-05T10:30:00Z",
        ),
        identity(
            "3",
            "mohamed.saidi@example.com",
            "Mohamed Saidi",
            Role::Traveler,
            "+213 555 456 789",
            "2024-01-12T14:20:00Z",
        ),
        identity(
            "4",
            "amina.khelifi@example.com",
            "Amina Khelifi",
            Role::Agent,
            "+213 555 321 654",
            "2024-01-08T09:15:00Z",
        ),
        identity(
            "5",
            "yacine.benaissa@example.com",
            "Yacine Benaissa",
            Role::Traveler,
            "+213 555 789 123",
            "2024-01-15T16:45:00Z",
        ),
    ]
}

fn entry(
    id: &str,
    status: ComplaintStatus,
    comment: Option<&str>,
    by: &str,
    at: &str,
) -> StatusHistoryEntry {
    StatusHistoryEntry {
        id: id.to_string(),
        status,
        comment: comment.map(String::from),
        updated_by: by.to_string(),
        updated_at: ts(at),
    }
}

pub fn complaints() -> Vec<Complaint> {
    vec![
        Complaint {
            id: "1".into(),
            user_id: "1".into(),
            title: "Major delay on the Alger-Oran train".into(),
            description: "The 08:00 train left two hours late without any prior notice.".into(),
            category: ComplaintCategory::Delay,
            station: "Gare d'Alger".into(),
            line: Some("Alger-Oran".into()),
            date: day(2024, 1, 15),
            status: ComplaintStatus::InProgress,
            priority: Priority::High,
            attachments: vec![],
            status_history: vec![
                entry(
                    "1",
                    ComplaintStatus::Submitted,
                    None,
                    SYSTEM_AUTHOR,
                    "2024-01-15T10:30:00Z",
                ),
                entry(
                    "2",
                    ComplaintStatus::Accepted,
                    Some("Complaint taken into account"),
                    "Agent Benali",
                    "2024-01-15T14:00:00Z",
                ),
                entry(
                    "3",
                    ComplaintStatus::InProgress,
                    Some("Investigation under way"),
                    "Agent Benali",
                    "2024-01-16T09:00:00Z",
                ),
            ],
            created_at: ts("2024-01-15T10:30:00Z"),
            updated_at: ts("2024-01-16T09:00:00Z"),
            assigned_agent: Some("Agent Benali".into()),
        },
        Complaint {
            id: "2".into(),
            user_id: "1".into(),
            title: "Air conditioning failure".into(),
            description: "The air conditioning was not working in car 3.".into(),
            category: ComplaintCategory::Technical,
            station: "Gare de Constantine".into(),
            line: Some("Constantine-Alger".into()),
            date: day(2024, 1, 10),
            status: ComplaintStatus::Treated,
            priority: Priority::Medium,
            attachments: vec![],
            status_history: vec![
                entry(
                    "4",
                    ComplaintStatus::Submitted,
                    None,
                    SYSTEM_AUTHOR,
                    "2024-01-10T16:20:00Z",
                ),
                entry(
                    "5",
                    ComplaintStatus::Accepted,
                    None,
                    "Agent Saidi",
                    "2024-01-11T08:00:00Z",
                ),
                entry(
                    "6",
                    ComplaintStatus::InProgress,
                    None,
                    "Agent Saidi",
                    "2024-01-11T14:00:00Z",
                ),
                entry(
                    "7",
                    ComplaintStatus::Treated,
                    Some("Air conditioning unit repaired"),
                    "Agent Saidi",
                    "2024-01-12T11:30:00Z",
                ),
            ],
            created_at: ts("2024-01-10T16:20:00Z"),
            updated_at: ts("2024-01-12T11:30:00Z"),
            assigned_agent: Some("Agent Saidi".into()),
        },
    ]
}

fn notice(
    id: &str,
    message: &str,
    kind: NotificationKind,
    complaint_id: &str,
    recipient_id: Option<&str>,
    read: bool,
    at: &str,
) -> Notification {
    Notification {
        id: id.to_string(),
        message: message.to_string(),
        kind,
        complaint_id: Some(complaint_id.to_string()),
        recipient_id: recipient_id.map(String::from),
        read,
        created_at: ts(at),
    }
}

pub fn notifications() -> Vec<Notification> {
    vec![
        notice(
            "1",
            "Your complaint #1 was accepted by an agent",
            NotificationKind::StatusChange,
            "1",
            Some("1"),
            false,
            "2024-01-16T09:00:00Z",
        ),
        notice(
            "2",
            "New complaint submitted - Major delay on the Alger-Oran train",
            NotificationKind::NewComplaint,
            "1",
            None,
            false,
            "2024-01-15T10:30:00Z",
        ),
        notice(
            "3",
            "Your complaint #2 is now being processed",
            NotificationKind::StatusChange,
            "2",
            Some("1"),
            true,
            "2024-01-14T14:20:00Z",
        ),
    ]
}

pub fn weekly_trend() -> Vec<TrendPoint> {
    [12, 18, 15, 22, 19, 25, 16]
        .into_iter()
        .zip(8..)
        .map(|(count, d)| TrendPoint {
            date: day(2024, 1, d),
            count,
        })
        .collect()
}

pub fn prediction() -> Vec<PredictionPoint> {
    [20, 23, 18, 26, 22, 19, 24]
        .into_iter()
        .zip(15..)
        .map(|(predicted, d)| PredictionPoint {
            date: day(2024, 1, d),
            predicted,
        })
        .collect()
}
