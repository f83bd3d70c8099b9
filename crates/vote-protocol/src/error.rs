use thiserror::Error;

/// Reasons an inbound line is rejected or a message cannot be framed.
///
/// None of these are ever sent back to clients; the server logs and
/// drops the offending line.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown event {0:?}")]
    UnknownEvent(String),

    #[error("line of {0} bytes exceeds the {} byte limit", crate::wire_types::MAX_LINE_LEN)]
    LineTooLong(usize),

    #[error("{0} is a transport event and has no wire form")]
    TransportOnly(&'static str),
}
