//! rail-complaints: railway complaint desk for travelers and agents, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
