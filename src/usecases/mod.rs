//! Application use cases. Orchestrate domain logic via ports.

pub mod complaint_service;
pub mod dashboard_service;
pub mod directory_service;
pub mod notification_service;
pub mod session_service;
pub mod shell;

pub use complaint_service::ComplaintService;
pub use dashboard_service::DashboardService;
pub use directory_service::DirectoryService;
pub use notification_service::NotificationService;
pub use session_service::SessionService;
pub use shell::{Action, AppState, AuthMode, Screen, View};
