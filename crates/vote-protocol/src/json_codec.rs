//! JSON-lines codec.
//!
//! Inbound lines are validated here, at the boundary: anything that
//! isn't a known event with a well-formed payload becomes a
//! [`ProtocolError`] and never reaches the core.
//!
//! Input events (line -> `InputMessage`):
//!
//! - `{"event":"set-color","data":{"color":"red"}}`
//! - `{"event":"request-votes"}`
//! - `{"event":"vote","data":{"group":"g1","option":"yes"}}`
//!   (`option` missing, `null` or `""` deselects)
//!
//! Output events (`OutputMessage` -> line):
//!
//! - `{"event":"user-count","data":3}`
//! - `{"event":"users-update","data":{"1":{"color":"red"},"2":{"color":null}}}`
//! - `{"event":"sync-votes","data":{"g1":{"red":"yes"}}}`
//! - `{"event":"vote-update","data":{"group":"g1","option":"yes","key":"red",
//!   "color":"red","allVotes":{...},"users":{...}}}`

use serde::Serialize;
use vote_core::{InputMessage, OutputMessage, SetColor, Vote};

use crate::error::ProtocolError;
use crate::wire_types::{
    output_event_name, users_payload, Envelope, RawEnvelope, SetColorPayload, VotePayload,
    VoteUpdatePayload, EVENT_REQUEST_VOTES, EVENT_SET_COLOR, EVENT_VOTE, MAX_LINE_LEN,
};

/// Decode one inbound line (without its trailing newline).
pub fn decode_input(line: &str) -> Result<InputMessage, ProtocolError> {
    if line.len() > MAX_LINE_LEN {
        return Err(ProtocolError::LineTooLong(line.len()));
    }

    let RawEnvelope { event, data } = serde_json::from_str(line)?;

    match event.as_str() {
        EVENT_SET_COLOR => {
            let payload: SetColorPayload = serde_json::from_value(data)?;
            Ok(InputMessage::SetColor(SetColor {
                color: payload.color,
            }))
        }
        EVENT_REQUEST_VOTES => Ok(InputMessage::RequestVotes),
        EVENT_VOTE => {
            let payload: VotePayload = serde_json::from_value(data)?;
            Ok(InputMessage::Vote(Vote {
                group: payload.group,
                option: payload.option,
            }))
        }
        _ => Err(ProtocolError::UnknownEvent(event.clone())),
    }
}

/// Encode a client-side message as a newline-terminated frame.
///
/// `Connect` / `Disconnect` are transport events and cannot be sent.
pub fn encode_input(msg: &InputMessage) -> Result<Vec<u8>, ProtocolError> {
    match msg {
        InputMessage::Connect => Err(ProtocolError::TransportOnly("connect")),
        InputMessage::Disconnect => Err(ProtocolError::TransportOnly("disconnect")),
        InputMessage::SetColor(claim) => frame(
            EVENT_SET_COLOR,
            SetColorPayload {
                color: claim.color.clone(),
            },
        ),
        InputMessage::RequestVotes => frame(EVENT_REQUEST_VOTES, serde_json::Value::Null),
        InputMessage::Vote(vote) => frame(
            EVENT_VOTE,
            VotePayload {
                group: vote.group.clone(),
                option: vote.option.clone(),
            },
        ),
    }
}

/// Encode a server event as a newline-terminated frame.
pub fn encode_output(msg: &OutputMessage) -> Result<Vec<u8>, ProtocolError> {
    let event = output_event_name(msg);
    match msg {
        OutputMessage::UserCount(n) => frame(event, n),
        OutputMessage::UsersUpdate(users) => frame(event, users_payload(users)),
        OutputMessage::SyncVotes(votes) => frame(event, votes),
        OutputMessage::VoteUpdate(update) => frame(
            event,
            VoteUpdatePayload {
                group: update.group.clone(),
                option: update.option.clone(),
                key: update.key.clone(),
                color: update.color.clone(),
                all_votes: update.all_votes.clone(),
                users: users_payload(&update.users),
            },
        ),
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn frame<T: Serialize>(event: &str, data: T) -> Result<Vec<u8>, ProtocolError> {
    let envelope = Envelope {
        event: event.to_string(),
        data,
    };
    let mut out = serde_json::to_vec(&envelope)?;
    out.push(b'\n');
    Ok(out)
}
