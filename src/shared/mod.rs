//! Cross-cutting helpers shared by every layer.

pub mod config;
pub mod ids;
