//! Registry of live connections and the colors they hold.

use std::collections::BTreeMap;

use crate::connection::{Connection, ConnectionId};

/// Broadcast view of the registry: connection id -> claimed color.
pub type UsersSnapshot = BTreeMap<ConnectionId, Option<String>>;

/// All live connections, keyed by id.
///
/// Ordered so snapshots encode deterministically.
#[derive(Debug, Default, Clone)]
pub struct ConnectionRegistry {
    connections: BTreeMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        ConnectionRegistry::default()
    }

    /// Register a new connection without a color.
    ///
    /// Returns `false` (and leaves the entry untouched) if the id is
    /// already registered.
    pub fn on_connect(&mut self, id: ConnectionId) -> bool {
        if self.connections.contains_key(&id) {
            return false;
        }
        self.connections.insert(id, Connection::new());
        true
    }

    /// Remove a connection, returning its final state.
    ///
    /// Unknown ids are a no-op.
    pub fn on_disconnect(&mut self, id: ConnectionId) -> Option<Connection> {
        self.connections.remove(&id)
    }

    /// Number of live connections.
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Color currently held by `id`, if any.
    pub fn color_of(&self, id: ConnectionId) -> Option<&str> {
        self.connections.get(&id)?.color.as_deref()
    }

    /// Overwrite the color of `id`. Returns `false` for unknown ids.
    pub fn set_color(&mut self, id: ConnectionId, color: Option<String>) -> bool {
        match self.connections.get_mut(&id) {
            Some(conn) => {
                conn.color = color;
                true
            }
            None => false,
        }
    }

    /// Clear `color` from every connection other than `except`.
    ///
    /// Linear scan over all connections; returns the ids that lost
    /// the color.
    pub fn revoke_color(&mut self, color: &str, except: ConnectionId) -> Vec<ConnectionId> {
        let mut revoked = Vec::new();
        for (id, conn) in self.connections.iter_mut() {
            if *id != except && conn.color.as_deref() == Some(color) {
                conn.color = None;
                revoked.push(*id);
            }
        }
        revoked
    }

    /// Ids of every connection currently holding `color`.
    pub fn holders_of(&self, color: &str) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|(_, conn)| conn.color.as_deref() == Some(color))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Recompute the broadcast view of all connections.
    pub fn snapshot(&self) -> UsersSnapshot {
        self.connections
            .iter()
            .map(|(id, conn)| (*id, conn.color.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionId, &Connection)> {
        self.connections.iter()
    }
}
