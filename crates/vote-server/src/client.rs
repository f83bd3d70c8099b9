//! Per-connection I/O.
//!
//! Each connection gets a reader (this task) that splits the byte
//! stream into lines, decodes them and forwards valid events to the
//! coordinator, plus a writer task draining the connection's outbound
//! channel onto the socket.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, warn};
use vote_core::ConnectionId;
use vote_protocol::decode_input;
use vote_protocol::wire_types::MAX_LINE_LEN;

use crate::types::{CoordinatorRequest, CoordinatorTx, OutboundRx};

const READ_CHUNK: usize = 4096;

/// Run the I/O loop for a single connection until the peer goes away.
///
/// Returns `Ok(())` on a clean EOF. The caller is responsible for
/// unregistering the connection afterwards.
pub async fn run_client(
    conn_id: ConnectionId,
    stream: TcpStream,
    coordinator_tx: CoordinatorTx,
    out_rx: OutboundRx,
) -> anyhow::Result<()> {
    let (read_half, write_half) = stream.into_split();

    // Ends by itself once every sender for this connection is dropped.
    tokio::spawn(run_writer(conn_id, write_half, out_rx));

    run_reader(conn_id, read_half, &coordinator_tx).await
}

async fn run_reader(
    conn_id: ConnectionId,
    mut read_half: OwnedReadHalf,
    coordinator_tx: &CoordinatorTx,
) -> anyhow::Result<()> {
    let mut buffer = BytesMut::with_capacity(READ_CHUNK);

    loop {
        // Process complete lines
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line = buffer.split_to(newline_pos + 1).freeze();
            handle_line(conn_id, line.slice(..newline_pos), coordinator_tx)?;
        }

        if buffer.len() > MAX_LINE_LEN {
            anyhow::bail!("unterminated line exceeds {} bytes", MAX_LINE_LEN);
        }

        if read_half.read_buf(&mut buffer).await? == 0 {
            // EOF - client disconnected
            return Ok(());
        }
    }
}

fn handle_line(
    conn_id: ConnectionId,
    raw: Bytes,
    coordinator_tx: &CoordinatorTx,
) -> anyhow::Result<()> {
    let line = match std::str::from_utf8(&raw) {
        Ok(line) => line.trim(),
        Err(_) => {
            warn!(conn = %conn_id, "dropping non-utf8 line");
            return Ok(());
        }
    };

    if line.is_empty() {
        return Ok(());
    }

    match decode_input(line) {
        Ok(msg) => {
            debug!(conn = %conn_id, ?msg, "inbound event");
            coordinator_tx
                .send(CoordinatorRequest { conn_id, msg })
                .map_err(|_| anyhow::anyhow!("coordinator channel closed"))?;
        }
        Err(e) => {
            warn!(conn = %conn_id, error = %e, "dropping malformed line");
        }
    }

    Ok(())
}

async fn run_writer(conn_id: ConnectionId, mut write_half: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(frame) = out_rx.recv().await {
        if let Err(e) = write_half.write_all(&frame).await {
            debug!(conn = %conn_id, error = %e, "write failed, dropping outbound frames");
            break;
        }
    }
}
