//! Identity resolution policy.
//!
//! Decides which key a vote is attributed to and what happens when two
//! connections claim the same color. Two policies exist and one is
//! picked per deployment via [`IdentityMode`]:
//!
//! - [`ConnectionScoped`]: votes belong to the connection; the color is
//!   display-only and disconnecting drops the connection's votes.
//! - [`ColorScoped`]: votes belong to the color; claiming a color takes
//!   it away from whoever held it, and votes outlive disconnects.
//!
//! The coordinator only ever talks to the [`IdentityPolicy`] trait.

use std::fmt;
use std::str::FromStr;

use crate::connection::ConnectionId;
use crate::error::CoreError;
use crate::registry::ConnectionRegistry;
use crate::vote_store::VoteStore;

/// Deployment-time choice of identity model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum IdentityMode {
    /// Attribution key = connection id.
    Connection,

    /// Attribution key = claimed color.
    #[default]
    Color,
}

impl IdentityMode {
    /// Build the policy object for this mode.
    pub fn policy(self) -> Box<dyn IdentityPolicy + Send> {
        match self {
            IdentityMode::Connection => Box::new(ConnectionScoped),
            IdentityMode::Color => Box::new(ColorScoped),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IdentityMode::Connection => "connection",
            IdentityMode::Color => "color",
        }
    }
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentityMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connection" | "session" | "a" => Ok(IdentityMode::Connection),
            "color" | "colour" | "b" => Ok(IdentityMode::Color),
            _ => Err(CoreError::UnknownIdentityMode(s.to_string())),
        }
    }
}

/// Identity rules shared by the vote store and the coordinator.
pub trait IdentityPolicy: fmt::Debug {
    fn mode(&self) -> IdentityMode;

    /// Key that a vote from `id` is stored under, or `None` if the
    /// connection may not vote right now.
    fn attribution_key(&self, registry: &ConnectionRegistry, id: ConnectionId) -> Option<String>;

    /// Apply a color claim by `id` (`None` clears its color).
    ///
    /// Returns the connections that lost their color as a result.
    fn claim_color(
        &self,
        registry: &mut ConnectionRegistry,
        id: ConnectionId,
        color: Option<String>,
    ) -> Vec<ConnectionId>;

    /// Clean up after `id` left the registry.
    ///
    /// Returns the number of vote records removed.
    fn on_disconnect(&self, votes: &mut VoteStore, id: ConnectionId) -> usize;
}

/// Mode A: one ballot per connection.
#[derive(Debug, Copy, Clone, Default)]
pub struct ConnectionScoped;

impl IdentityPolicy for ConnectionScoped {
    fn mode(&self) -> IdentityMode {
        IdentityMode::Connection
    }

    fn attribution_key(&self, registry: &ConnectionRegistry, id: ConnectionId) -> Option<String> {
        registry.contains(id).then(|| id.to_string())
    }

    fn claim_color(
        &self,
        registry: &mut ConnectionRegistry,
        id: ConnectionId,
        color: Option<String>,
    ) -> Vec<ConnectionId> {
        registry.set_color(id, color);
        Vec::new()
    }

    fn on_disconnect(&self, votes: &mut VoteStore, id: ConnectionId) -> usize {
        votes.clear_key_everywhere(&id.to_string())
    }
}

/// Mode B: one ballot per color, colors are exclusive and can be taken over.
#[derive(Debug, Copy, Clone, Default)]
pub struct ColorScoped;

impl IdentityPolicy for ColorScoped {
    fn mode(&self) -> IdentityMode {
        IdentityMode::Color
    }

    fn attribution_key(&self, registry: &ConnectionRegistry, id: ConnectionId) -> Option<String> {
        registry.color_of(id).map(str::to_owned)
    }

    fn claim_color(
        &self,
        registry: &mut ConnectionRegistry,
        id: ConnectionId,
        color: Option<String>,
    ) -> Vec<ConnectionId> {
        let revoked = match color.as_deref() {
            Some(color) => registry.revoke_color(color, id),
            None => Vec::new(),
        };
        registry.set_color(id, color);
        revoked
    }

    fn on_disconnect(&self, _votes: &mut VoteStore, _id: ConnectionId) -> usize {
        // Votes stay with the color for whoever claims it next.
        0
    }
}
