//! Central coordinator loop.
//!
//! This task owns the `VoteCoordinator` and processes every
//! `CoordinatorRequest`, one at a time and to completion, so no two
//! events ever interleave mid-mutation.
//!
//! Routing follows `OutputMessage::audience()`:
//! - `SyncVotes`: sent **only** to the originating connection.
//! - everything else: broadcast to **all** connected clients.
//!
//! Each event is encoded once and the frame shared between recipients.
//! Sends are fire-and-forget: a closed channel only means that client
//! is already on its way out.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::{debug, info, warn};
use vote_core::{Audience, ConnectionId, IdentityMode, InputMessage, OutputMessage, VoteCoordinator};
use vote_protocol::command_codec::format_output_summary;
use vote_protocol::encode_output;

use crate::types::{ClientRegistry, CoordinatorRequest, CoordinatorRx, OutboundTx};

/// Run the central coordinator loop.
///
/// - `coordinator_rx`: receives requests from the accept loop and all connection tasks.
/// - `clients`: registry of connected clients and their outbound channels.
pub async fn run_coordinator_loop(
    mode: IdentityMode,
    mut coordinator_rx: CoordinatorRx,
    clients: ClientRegistry,
) {
    let mut coordinator = VoteCoordinator::new(mode);
    info!(identity = %mode, "coordinator started");

    while let Some(req) = coordinator_rx.recv().await {
        let CoordinatorRequest { conn_id, msg } = req;
        let is_claim = matches!(msg, InputMessage::SetColor(_));

        let outputs = coordinator.process_message(conn_id, msg);

        if outputs.is_empty() {
            continue;
        }

        if let Some(color) = applied_color(&coordinator, conn_id, is_claim, &outputs) {
            info!(conn = %conn_id, color = ?color, "color picked");
        }

        // Snapshot of current clients to minimize lock hold time.
        let current_clients = {
            let guard = clients.read().await;
            guard.clone()
        };

        for out in outputs {
            route_output(conn_id, &out, &current_clients);
        }
    }

    info!("coordinator loop shutting down (channel closed)");
}

/// Color `conn_id` holds after a claim the coordinator accepted.
///
/// `None` when the input was not a claim or produced no output. The inner
/// `None` means the claim cleared the color.
pub fn applied_color<'a>(
    coordinator: &'a VoteCoordinator,
    conn_id: ConnectionId,
    is_claim: bool,
    outputs: &[OutputMessage],
) -> Option<Option<&'a str>> {
    if !is_claim || outputs.is_empty() {
        return None;
    }
    Some(coordinator.registry().color_of(conn_id))
}

/// Deliver a single `OutputMessage` to its audience.
fn route_output(
    origin: ConnectionId,
    msg: &OutputMessage,
    clients: &HashMap<ConnectionId, OutboundTx>,
) {
    let frame = match encode_output(msg) {
        Ok(frame) => Bytes::from(frame),
        Err(e) => {
            warn!(error = %e, "failed to encode outbound event");
            return;
        }
    };

    match msg.audience() {
        Audience::Origin => {
            debug!(to = %origin, event = %format_output_summary(msg), "unicast");
            if let Some(tx) = clients.get(&origin) {
                let _ = tx.send(frame);
            }
        }
        Audience::All => {
            debug!(recipients = clients.len(), event = %format_output_summary(msg), "broadcast");
            for tx in clients.values() {
                let _ = tx.send(frame.clone());
            }
        }
    }
}
