//! vote-protocol
//!
//! Wire-level encoding/decoding for the vote broadcaster.
//!
//! This crate turns logical core messages
//! (`vote_core::InputMessage` / `OutputMessage`) into newline-terminated
//! JSON event envelopes and back again.
//!
//! - [`json_codec`]    : the wire protocol spoken over TCP
//! - [`command_codec`] : terse text commands (for tools / replay)

pub mod wire_types;
pub mod json_codec;
pub mod command_codec;
pub mod error;

pub use error::ProtocolError;
pub use json_codec::{decode_input, encode_input, encode_output};
