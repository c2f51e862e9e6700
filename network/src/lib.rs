//! `obscura-network`: the gossip-style peer layer carrying transactions
//! between nodes over a hand-rolled, length-prefixed TCP wire protocol.
//!
//! Grounded on `internal/node`, `internal/peer`, and `internal/messages` in
//! the original design, reworked from goroutines-plus-shared-state onto
//! `tokio` tasks and channels. This crate owns all I/O; `obscura-core`
//! never sees a socket.
//!
//! Non-goals: NAT traversal, peer reputation/banning, encrypted transport,
//! DHT-based peer discovery. Peers are found via static seed addresses and
//! `GetAddr`/`Addr` gossip only.

pub mod config;
pub mod identity;
pub mod message;
pub mod node;
pub mod peer;

pub use config::NodeConfig;
pub use message::WireMessage;
pub use node::Node;
