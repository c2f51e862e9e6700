//! `obscura-core`: stealth addresses, linkable ring signatures, the UTXO
//! set, and the Merkle-tree-backed block chain for a privacy-preserving
//! transaction protocol inspired by CryptoNote/Monero.
//!
//! This crate performs no I/O, owns no sockets, and spawns no tasks.
//! Everything outside it — peer networking, wallet key storage, the CLI —
//! is a thin collaborator that calls into [`transaction::Transaction`]'s
//! serialize/verify surface and otherwise adds nothing of cryptographic
//! substance.
//!
//! Non-goals: proof of work / consensus selection, fork handling,
//! persistent chain storage, fee policy, wallet key backup, script
//! execution. Amounts are non-negative integers of fixed granularity; there
//! are no Pedersen commitments, bulletproofs, or zk-SNARKs here.

pub mod address;
pub mod chain;
pub mod config;
pub mod curve;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod mempool;
pub mod merkle;
pub mod ring_signature;
pub mod transaction;
pub mod utxo;
pub mod utxo_set;

pub use address::{LongTermKey, OneTimeAddress, PublicKey};
pub use chain::{Block, BlockHeader, Chain};
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::KeyImageSet;
pub use mempool::Mempool;
pub use ring_signature::{KeyImage, RingSignature};
pub use transaction::Transaction;
pub use utxo::Utxo;
pub use utxo_set::UtxoSet;
