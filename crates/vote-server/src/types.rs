//! Shared types for the vote TCP server.
//!
//! This module defines:
//! - channel aliases between connections and the coordinator task
//! - `ClientRegistry`: outbound channels of every live connection
//! - `CoordinatorRequest`: messages flowing into the coordinator task

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::RwLock;
use vote_core::{ConnectionId, InputMessage};

/// Encoded, newline-terminated frames headed to one connection.
pub type OutboundTx = mpsc::UnboundedSender<Bytes>;
pub type OutboundRx = mpsc::UnboundedReceiver<Bytes>;

/// Registry of connected clients and their outbound channels.
///
/// - Key: `ConnectionId`
/// - Value: `OutboundTx` to send encoded frames to that client.
///
/// Holds transport handles only; who holds which color lives in the
/// coordinator.
pub type ClientRegistry = Arc<RwLock<HashMap<ConnectionId, OutboundTx>>>;

/// Message flowing from the accept loop or a connection task into the
/// coordinator task.
#[derive(Debug)]
pub struct CoordinatorRequest {
    pub conn_id: ConnectionId,
    pub msg: InputMessage,
}

/// Channel from connections → coordinator task.
pub type CoordinatorTx = mpsc::UnboundedSender<CoordinatorRequest>;
pub type CoordinatorRx = mpsc::UnboundedReceiver<CoordinatorRequest>;
