//! A single peer connection: a socket split into an inbound read loop and
//! an outbound write half fed by a channel.
//!
//! Grounded on `internal/peer/peer.go`'s `Peer` (connection, alive flag,
//! inbound/outbound direction, start/read/write loop) and `node.go`'s
//! `NewOutboundPeer`/`NewInboundPeer` handshake, translated from a
//! goroutine-per-direction-with-shared-struct design into a
//! task-per-direction-with-channel design: the write half owns the socket's
//! write end exclusively via an `mpsc` channel instead of synchronizing
//! access to a shared connection.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::message::{read_message, write_message, WireMessage};

/// Number of outbound messages a peer's write task buffers before
/// `send` starts applying backpressure.
const OUTBOUND_QUEUE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A handle to a live peer connection. Cloning shares the same outbound
/// queue, so any clone can enqueue a message to the same socket.
#[derive(Clone)]
pub struct PeerHandle {
    pub addr: String,
    pub node_id: [u8; 32],
    pub direction: Direction,
    outbound: mpsc::Sender<WireMessage>,
}

impl PeerHandle {
    /// Queues `msg` for delivery. Fails silently into a log line if the
    /// peer's write task has already exited, since a dead outbound queue
    /// just means the peer is gone and the caller's next read will notice.
    pub fn send(&self, msg: WireMessage) {
        if self.outbound.try_send(msg).is_err() {
            warn!(addr = %self.addr, "dropped outbound message to a full or closed peer queue");
        }
    }
}

/// Splits `stream` into read/write tasks and returns a [`PeerHandle`] plus
/// a receiver yielding every [`WireMessage`] the peer sends us.
///
/// The caller is expected to drive the returned receiver in a loop,
/// dispatching each message (e.g. into the mempool for `Tx`, or answering
/// `GetAddr`) for as long as the peer stays connected.
pub fn spawn(
    stream: TcpStream,
    addr: String,
    node_id: [u8; 32],
    direction: Direction,
) -> (PeerHandle, mpsc::Receiver<WireMessage>) {
    let (read_half, write_half) = stream.into_split();
    let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE_DEPTH);
    let (inbound_tx, inbound_rx) = mpsc::channel(OUTBOUND_QUEUE_DEPTH);

    tokio::spawn(read_loop(read_half, inbound_tx, addr.clone()));
    tokio::spawn(write_loop(write_half, outbound_rx, addr.clone()));

    (
        PeerHandle {
            addr,
            node_id,
            direction,
            outbound: outbound_tx,
        },
        inbound_rx,
    )
}

async fn read_loop<R: AsyncRead + Unpin>(
    mut reader: R,
    inbound: mpsc::Sender<WireMessage>,
    addr: String,
) {
    loop {
        match read_message(&mut reader).await {
            Ok(msg) => {
                if inbound.send(msg).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!(addr = %addr, error = %e, "peer read loop ending");
                break;
            }
        }
    }
}

async fn write_loop<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut outbound: mpsc::Receiver<WireMessage>,
    addr: String,
) {
    while let Some(msg) = outbound.recv().await {
        if let Err(e) = write_message(&mut writer, &msg).await {
            debug!(addr = %addr, error = %e, "peer write loop ending");
            break;
        }
    }
    let _ = writer.shutdown().await;
}
