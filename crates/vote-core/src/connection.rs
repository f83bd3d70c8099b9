//! Connection identifiers and per-connection state.

use std::fmt;

/// Identifier for a live connection.
///
/// Opaque to the core. The transport layer guarantees uniqueness
/// over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State held for one live connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
    /// Claimed color. `None` until the client picks one, or after
    /// another connection took it over.
    pub color: Option<String>,
}

impl Connection {
    /// A fresh connection without a color.
    pub fn new() -> Self {
        Connection::default()
    }
}
