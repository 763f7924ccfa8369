//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod attachment;
pub mod complaint;
pub mod dashboard;
pub mod entities;
pub mod errors;
pub mod filter;

pub use attachment::{
    Attachment, AttachmentIntake, AttachmentKind, DEFAULT_MAX_ATTACHMENT_BYTES, FileCandidate,
};
pub use complaint::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintStatus, Priority, STATIONS,
    SYSTEM_AUTHOR, StatusChange, StatusHistoryEntry,
};
pub use dashboard::{ChartPoint, DashboardStats, PredictionPoint, TrendPoint};
pub use entities::{
    Identity, IdentityPatch, Notification, NotificationKind, RegistrationRequest, Role,
};
pub use errors::DomainError;
pub use filter::ComplaintFilter;
