//! Error types for the core.
//!
//! State operations are infallible: malformed or out-of-order events
//! are dropped as no-ops. The only fallible surface is parsing
//! deployment configuration.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The configured identity mode is not one we know.
    #[error("unknown identity mode {0:?} (expected \"color\" or \"connection\")")]
    UnknownIdentityMode(String),
}
