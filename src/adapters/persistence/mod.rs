//! Persistence adapters: in-memory repositories seeded from fixtures, and the session file.

pub mod fixtures;
pub mod memory_repo;
pub mod session_json;

pub use memory_repo::{Latency, MemoryComplaintRepo, MemoryIdentityRepo, MemoryNotificationRepo};
pub use session_json::SessionJson;
