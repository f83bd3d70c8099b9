//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ConnectionId`.
//! - Spawns:
//!   - a per-connection task to handle I/O,
//!   - a single central coordinator task that owns all vote state.
//!
//! The per-connection logic and the coordinator loop live in `client`
//! and `coordinator_task` respectively.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};
use vote_core::{ConnectionId, InputMessage};

use crate::client;
use crate::config::Config;
use crate::coordinator_task;
use crate::types::{
    ClientRegistry, CoordinatorRequest, CoordinatorRx, CoordinatorTx, OutboundRx, OutboundTx,
};

/// Bind the configured address and serve forever.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "listening");

    run_with_listener(listener, config).await
}

/// Serve on an already bound listener.
pub async fn run_with_listener(listener: TcpListener, config: Config) -> anyhow::Result<()> {
    // Shared registry of clients → outbound channels.
    let clients: ClientRegistry = Arc::new(RwLock::new(HashMap::new()));

    // Channel from connections → coordinator task.
    let (coordinator_tx, coordinator_rx): (CoordinatorTx, CoordinatorRx) =
        mpsc::unbounded_channel();

    // Spawn the central coordinator task.
    tokio::spawn(coordinator_task::run_coordinator_loop(
        config.identity_mode,
        coordinator_rx,
        clients.clone(),
    ));

    let mut next_id: u64 = 1;

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let current_clients = clients.read().await.len();

        if current_clients >= config.max_clients {
            warn!(
                %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: max_clients reached"
            );
            // Just drop the stream; client will see the connection closed.
            continue;
        }

        let conn_id = ConnectionId(next_id);
        next_id += 1;
        info!(conn = %conn_id, %peer_addr, "user connected");

        // Register the outbound channel before the coordinator hears of
        // the connection, so the connect broadcast reaches it too.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();
        clients.write().await.insert(conn_id, out_tx);

        coordinator_tx
            .send(CoordinatorRequest {
                conn_id,
                msg: InputMessage::Connect,
            })
            .context("coordinator task stopped")?;

        let clients_clone = clients.clone();
        let coordinator_tx_clone = coordinator_tx.clone();

        tokio::spawn(async move {
            match client::run_client(conn_id, stream, coordinator_tx_clone.clone(), out_rx).await {
                Ok(()) => info!(conn = %conn_id, "user disconnected"),
                Err(e) => warn!(conn = %conn_id, error = %e, "user disconnected with error"),
            }

            // Unregister first: the disconnect broadcast must not target us.
            clients_clone.write().await.remove(&conn_id);
            let _ = coordinator_tx_clone.send(CoordinatorRequest {
                conn_id,
                msg: InputMessage::Disconnect,
            });
        });
    }
}
