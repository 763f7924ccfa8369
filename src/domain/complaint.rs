//! Complaint entity and its status lifecycle.
//!
//! Status only moves forward:
//! `submitted → {accepted, rejected}`, `accepted → in_progress`, `in_progress → treated`.
//! `rejected` and `treated` are terminal. The history log is append-only and always starts
//! with a `submitted` entry authored by [`SYSTEM_AUTHOR`].

use super::{Attachment, DomainError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author recorded on the initial history entry.
pub const SYSTEM_AUTHOR: &str = "System";

/// Stations offered by the submission form and the station filter.
pub const STATIONS: [&str; 10] = [
    "Gare d'Alger",
    "Gare d'Oran",
    "Gare de Constantine",
    "Gare de Annaba",
    "Gare de Tlemcen",
    "Gare de Sétif",
    "Gare de Batna",
    "Gare de Béjaïa",
    "Gare de Skikda",
    "Gare de Jijel",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Delay,
    Payment,
    Technical,
    Security,
    Cleanliness,
    Staff,
    Other,
}

impl ComplaintCategory {
    pub const ALL: [ComplaintCategory; 7] = [
        ComplaintCategory::Delay,
        ComplaintCategory::Payment,
        ComplaintCategory::Technical,
        ComplaintCategory::Security,
        ComplaintCategory::Cleanliness,
        ComplaintCategory::Staff,
        ComplaintCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComplaintCategory::Delay => "Delay",
            ComplaintCategory::Payment => "Payment",
            ComplaintCategory::Technical => "Technical issue",
            ComplaintCategory::Security => "Security",
            ComplaintCategory::Cleanliness => "Cleanliness",
            ComplaintCategory::Staff => "Staff behaviour",
            ComplaintCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complaint status. Declaration order is the lifecycle order used for display and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Submitted,
    Accepted,
    Rejected,
    InProgress,
    Treated,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 5] = [
        ComplaintStatus::Submitted,
        ComplaintStatus::Accepted,
        ComplaintStatus::Rejected,
        ComplaintStatus::InProgress,
        ComplaintStatus::Treated,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Submitted => "submitted",
            ComplaintStatus::Accepted => "accepted",
            ComplaintStatus::Rejected => "rejected",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Treated => "treated",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Submitted => "Submitted",
            ComplaintStatus::Accepted => "Accepted",
            ComplaintStatus::Rejected => "Rejected",
            ComplaintStatus::InProgress => "In progress",
            ComplaintStatus::Treated => "Treated",
        }
    }

    /// Statuses reachable in one step from `self`.
    pub const fn next_statuses(self) -> &'static [ComplaintStatus] {
        match self {
            ComplaintStatus::Submitted => &[ComplaintStatus::Accepted, ComplaintStatus::Rejected],
            ComplaintStatus::Accepted => &[ComplaintStatus::InProgress],
            ComplaintStatus::InProgress => &[ComplaintStatus::Treated],
            ComplaintStatus::Rejected | ComplaintStatus::Treated => &[],
        }
    }

    pub const fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }

    pub fn can_transition_to(self, next: ComplaintStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` when `next` is not in [`Self::next_statuses`].
    pub fn validate_transition(self, next: ComplaintStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// One line of the audit log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: String,
    pub status: ComplaintStatus,
    pub comment: Option<String>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub station: String,
    pub line: Option<String>,
    /// Day the incident happened.
    pub date: NaiveDate,
    pub status: ComplaintStatus,
    pub priority: Priority,
    pub attachments: Vec<Attachment>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_agent: Option<String>,
}

/// What the submission form collects.
#[derive(Debug, Clone)]
pub struct ComplaintDraft {
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub station: String,
    pub line: Option<String>,
    pub date: NaiveDate,
    pub attachments: Vec<Attachment>,
}

impl ComplaintDraft {
    /// Title, description and station are required.
    pub fn validate(&self) -> Result<(), DomainError> {
        let missing = [
            ("title", &self.title),
            ("description", &self.description),
            ("station", &self.station),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());
        match missing {
            Some((field, _)) => Err(DomainError::Validation(format!("{field} is required"))),
            None => Ok(()),
        }
    }
}

/// A requested status change, as applied by the repository.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub to: ComplaintStatus,
    pub comment: Option<String>,
    pub author: String,
    pub at: DateTime<Utc>,
}

impl Complaint {
    /// Builds a new `submitted` complaint owned by `user_id` with its initial history entry.
    pub fn submit(
        id: String,
        user_id: String,
        draft: ComplaintDraft,
        history_id: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            category: draft.category,
            station: draft.station.trim().to_string(),
            line: draft
                .line
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            date: draft.date,
            status: ComplaintStatus::Submitted,
            priority: Priority::default(),
            attachments: draft.attachments,
            status_history: vec![StatusHistoryEntry {
                id: history_id,
                status: ComplaintStatus::Submitted,
                comment: None,
                updated_by: SYSTEM_AUTHOR.to_string(),
                updated_at: now,
            }],
            created_at: now,
            updated_at: now,
            assigned_agent: None,
        }
    }

    /// Applies `change` if the lifecycle allows it, appending one history entry.
    /// Returns the appended entry. Leaves `self` untouched on error.
    pub fn advance(
        &mut self,
        change: StatusChange,
        history_id: String,
    ) -> Result<StatusHistoryEntry, DomainError> {
        self.status.validate_transition(change.to)?;
        let comment = change
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if self.assigned_agent.is_none() {
            self.assigned_agent = Some(change.author.clone());
        }
        self.status = change.to;
        self.updated_at = change.at;
        let entry = StatusHistoryEntry {
            id: history_id,
            status: change.to,
            comment,
            updated_by: change.author,
            updated_at: change.at,
        };
        self.status_history.push(entry.clone());
        Ok(entry)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
