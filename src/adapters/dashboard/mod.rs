//! Dashboard series adapters.

pub mod fixture_source;

pub use fixture_source::FixtureDashboardSource;
