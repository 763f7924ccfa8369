//! Infrastructure adapters. Implement outbound ports.
//!
//! In-memory repositories, the session file, dashboard series and the terminal UI.
//! Map errors to DomainError.

pub mod dashboard;
pub mod persistence;
pub mod ui;
