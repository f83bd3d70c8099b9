//! Message types used by the core coordinator.
//!
//! These are **transport-agnostic** logical messages:
//! - [`InputMessage`]: what the coordinator consumes, always paired with
//!   the [`ConnectionId`](crate::ConnectionId) it came from.
//! - [`OutputMessage`]: what it produces, each carrying its own
//!   [`Audience`] so the networking layer can route without extra context.
//!
//! The JSON encoders live in the `vote-protocol` crate; this module is
//! purely logical.

use crate::registry::UsersSnapshot;
use crate::vote_store::VotesSnapshot;

/// A request into the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMessage {
    /// Transport opened a new connection.
    Connect,

    /// Transport closed the connection.
    Disconnect,

    /// Client claims (or with an empty string, drops) a color.
    SetColor(SetColor),

    /// Client asks for the full vote table.
    RequestVotes,

    /// Client selects or deselects an option in a group.
    Vote(Vote),
}

/// `set-color` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetColor {
    pub color: String,
}

/// `vote` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Ballot namespace.
    pub group: String,

    /// Selected option; `None` or empty deselects.
    pub option: Option<String>,
}

/// Who should receive an [`OutputMessage`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every live connection, the originator included.
    All,

    /// Only the connection whose event produced the message.
    Origin,
}

/// An event emitted by the coordinator. Always a full snapshot, never a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMessage {
    /// Number of live connections.
    UserCount(usize),

    /// Every connection and its color.
    UsersUpdate(UsersSnapshot),

    /// Full vote table for a single client catching up.
    SyncVotes(VotesSnapshot),

    /// A vote changed; carries the fresh tables.
    VoteUpdate(VoteUpdate),
}

/// Vote-update event (output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteUpdate {
    pub group: String,

    /// Option as sent by the voter; `None` for a deselection.
    pub option: Option<String>,

    /// Attribution key the vote was stored under.
    pub key: String,

    /// Voter's color at the time of the vote.
    pub color: Option<String>,

    pub all_votes: VotesSnapshot,
    pub users: UsersSnapshot,
}

impl OutputMessage {
    /// Routing policy:
    /// - `SyncVotes` => unicast to the originator.
    /// - everything else => broadcast.
    pub fn audience(&self) -> Audience {
        match self {
            OutputMessage::SyncVotes(_) => Audience::Origin,
            OutputMessage::UserCount(_)
            | OutputMessage::UsersUpdate(_)
            | OutputMessage::VoteUpdate(_) => Audience::All,
        }
    }
}
