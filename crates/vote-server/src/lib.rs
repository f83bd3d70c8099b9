//! vote-server
//!
//! Multi-client async TCP server for the vote broadcaster.

pub mod config;
pub mod types;
pub mod server;
pub mod coordinator_task;

// internal, not re-exported
mod client;
