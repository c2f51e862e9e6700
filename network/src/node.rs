//! The node: owns the peer table, performs the version/verack handshake,
//! and dispatches inbound messages into the mempool.
//!
//! Grounded on `internal/node/node.go`'s `Node` (peer map keyed by id,
//! `NewOutboundPeer`/`NewInboundPeer`, `Start`'s accept loop, `getOtherPeers`
//! answering `GetAddr`-equivalent requests), translated from a mutex-free
//! single-threaded `map` into a `tokio::sync::Mutex`-guarded table since
//! each peer's read loop now runs on its own task.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::OsRng;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use obscura_core::{Chain, KeyImageSet, Mempool, UtxoSet};

use crate::config::NodeConfig;
use crate::message::WireMessage;
use crate::peer::{self, Direction, PeerHandle};

/// Mempool, UTXO set, and key-image ledger mutate together at transaction
/// acceptance time, so a single task-owning mutex serializes all three
/// rather than three locks taken in some order callers must get right.
#[derive(Default)]
pub struct NodeState {
    pub mempool: Mempool,
    pub utxos: UtxoSet,
    pub spent: KeyImageSet,
}

/// Shared node state: the peer table and the core-crate state peers'
/// messages get dispatched into.
pub struct Node {
    config: NodeConfig,
    peers: Mutex<HashMap<[u8; 32], PeerHandle>>,
    pub chain: Chain,
    pub state: Mutex<NodeState>,
}

impl Node {
    pub fn new(config: NodeConfig) -> Arc<Self> {
        Arc::new(Node {
            config,
            peers: Mutex::new(HashMap::new()),
            chain: Chain::new(),
            state: Mutex::new(NodeState::default()),
        })
    }

    /// Binds the listen address from the node's config and accepts
    /// connections until the process is torn down.
    pub async fn run(self: &Arc<Self>) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr()).await?;
        info!(addr = %self.config.listen_addr(), "node listening");

        for seed in self.config.seed_peers.clone() {
            let node = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = node.connect_outbound(&seed).await {
                    warn!(addr = %seed, error = %e, "failed to connect to seed peer");
                }
            });
        }

        loop {
            let (stream, remote) = listener.accept().await?;
            let node = Arc::clone(self);
            tokio::spawn(async move {
                if let Err(e) = node.accept_inbound(stream, remote.to_string()).await {
                    warn!(addr = %remote, error = %e, "inbound peer handshake failed");
                }
            });
        }
    }

    /// Dials `addr`, performs the version/verack handshake, registers the
    /// peer, then drives its inbound message loop.
    pub async fn connect_outbound(self: &Arc<Self>, addr: &str) -> std::io::Result<()> {
        let stream = TcpStream::connect(addr).await?;
        self.handshake_and_serve(stream, addr.to_string(), Direction::Outbound)
            .await
    }

    async fn accept_inbound(
        self: &Arc<Self>,
        stream: TcpStream,
        addr: String,
    ) -> std::io::Result<()> {
        self.handshake_and_serve(stream, addr, Direction::Inbound)
            .await
    }

    async fn handshake_and_serve(
        self: &Arc<Self>,
        stream: TcpStream,
        addr: String,
        direction: Direction,
    ) -> std::io::Result<()> {
        let (handle, mut inbound) = peer::spawn(stream, addr.clone(), self.config.node_id, direction);

        handle.send(WireMessage::Version {
            protocol_version: self.config.protocol_version,
            listen_addr: self.config.listen_addr(),
            node_id: self.config.node_id,
            nonce: rand::Rng::gen(&mut OsRng),
        });

        self.peers.lock().await.insert(handle.node_id, handle.clone());
        info!(addr = %addr, direction = ?direction, "peer registered");

        while let Some(msg) = inbound.recv().await {
            self.dispatch(&handle, msg).await;
        }

        self.peers.lock().await.remove(&handle.node_id);
        info!(addr = %addr, "peer disconnected");
        Ok(())
    }

    async fn dispatch(self: &Arc<Self>, from: &PeerHandle, msg: WireMessage) {
        match msg {
            WireMessage::Version { .. } => {
                from.send(WireMessage::VerAck);
            }
            WireMessage::VerAck => {}
            WireMessage::Ping { nonce } => from.send(WireMessage::Pong { nonce }),
            WireMessage::Pong { .. } => {}
            WireMessage::GetAddr => {
                let peers = self.peers.lock().await;
                let addrs = peers
                    .values()
                    .filter(|p| p.node_id != from.node_id)
                    .map(|p| p.addr.clone())
                    .collect();
                from.send(WireMessage::Addr { peers: addrs });
            }
            WireMessage::Addr { peers } => {
                debug!(addr = %from.addr, count = peers.len(), "received peer addresses");
            }
            WireMessage::Tx { transaction } => {
                let mut state = self.state.lock().await;
                let spent = state.spent.clone();
                if state.mempool.accept(transaction, &spent).is_err() {
                    warn!(addr = %from.addr, "rejected invalid transaction from peer");
                }
            }
        }
    }
}
