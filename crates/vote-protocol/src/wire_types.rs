//! Wire-level event names, envelopes, and limits.
//!
//! Every frame is one JSON object followed by `\n`:
//!
//! ```text
//! {"event": "<name>", "data": <payload>}
//! ```
//!
//! `data` may be omitted (or `null`) for events without payload.
//! The encode/decode logic lives in `json_codec`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vote_core::{OutputMessage, UsersSnapshot, VotesSnapshot};

/// Hard limit on a single inbound line, newline excluded.
pub const MAX_LINE_LEN: usize = 64 * 1024;

// Client -> server
pub const EVENT_SET_COLOR: &str = "set-color";
pub const EVENT_REQUEST_VOTES: &str = "request-votes";
pub const EVENT_VOTE: &str = "vote";

// Server -> client
pub const EVENT_USER_COUNT: &str = "user-count";
pub const EVENT_USERS_UPDATE: &str = "users-update";
pub const EVENT_SYNC_VOTES: &str = "sync-votes";
pub const EVENT_VOTE_UPDATE: &str = "vote-update";

/// Wire name of an output event.
pub fn output_event_name(msg: &OutputMessage) -> &'static str {
    match msg {
        OutputMessage::UserCount(_) => EVENT_USER_COUNT,
        OutputMessage::UsersUpdate(_) => EVENT_USERS_UPDATE,
        OutputMessage::SyncVotes(_) => EVENT_SYNC_VOTES,
        OutputMessage::VoteUpdate(_) => EVENT_VOTE_UPDATE,
    }
}

/// Inbound envelope before the payload is interpreted.
#[derive(Debug, Deserialize)]
pub struct RawEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Outbound envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub event: String,
    pub data: T,
}

/// `set-color` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetColorPayload {
    pub color: String,
}

/// `vote` payload. A missing or null `option` deselects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePayload {
    pub group: String,
    #[serde(default)]
    pub option: Option<String>,
}

/// One entry of the `users-update` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    pub color: Option<String>,
}

/// `users-update` payload: connection id -> `{color}`.
pub type UsersPayload = BTreeMap<u64, UserEntry>;

pub fn users_payload(users: &UsersSnapshot) -> UsersPayload {
    users
        .iter()
        .map(|(id, color)| (id.0, UserEntry { color: color.clone() }))
        .collect()
}

/// `vote-update` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteUpdatePayload {
    pub group: String,
    pub option: Option<String>,
    pub key: String,
    pub color: Option<String>,
    pub all_votes: VotesSnapshot,
    pub users: UsersPayload,
}
