//! Block headers and the append-only chain.
//!
//! Grounded on `internal/chain/chain.go`'s `Header`/`Block`/`Chain` types.
//! The original wraps its block slice in a `sync.RWMutex`; this rewrite uses
//! `std::sync::RwLock` directly, since core operations never `.await` —
//! a blocking lock is the right tool here, not a `tokio::sync` one.

use std::sync::{RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash;
use crate::merkle::MerkleTree;
use crate::transaction::Transaction;

/// A block header. `previous_hash` is set by [`Chain::append`], not by the
/// header's own constructor, and is deliberately excluded from the bytes
/// hashed to produce `hash` — this is the order the original source uses,
/// reproduced here identically so producer and verifier agree byte-for-byte
/// on a header's hash regardless of when `previous_hash` is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: u8,
    pub previous_hash: [u8; 32],
    pub merkle_root: [u8; 32],
    pub time: u64,
    hash: [u8; 32],
}

impl BlockHeader {
    fn compute_hash(version: u8, merkle_root: &[u8; 32], time: u64) -> [u8; 32] {
        let mut buf = Vec::with_capacity(1 + 32 + 20);
        buf.push(version);
        buf.extend_from_slice(merkle_root);
        buf.extend_from_slice(time.to_string().as_bytes());
        hash::digest(&buf)
    }

    pub fn new(version: u8, merkle_root: [u8; 32], time: u64) -> Self {
        let hash = Self::compute_hash(version, &merkle_root, time);
        BlockHeader {
            version,
            previous_hash: [0u8; 32],
            merkle_root,
            time,
            hash,
        }
    }

    fn genesis() -> Self {
        BlockHeader {
            version: 0,
            previous_hash: [0u8; 32],
            merkle_root: [0u8; 32],
            time: 0,
            hash: Self::compute_hash(0, &[0u8; 32], 0),
        }
    }

    /// The header's own hash. Callers use this both as the block's
    /// identifier and as the next block's `previous_hash`.
    pub fn hash(&self) -> [u8; 32] {
        self.hash
    }
}

/// A block: a header plus the Merkle tree of transactions it commits to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Builds a block from `transactions`, computing its Merkle root.
    /// `previous_hash` starts zeroed; [`Chain::append`] fills it in.
    pub fn new(version: u8, transactions: Vec<Transaction>, time: u64) -> Self {
        let tree = MerkleTree::build(&transactions);
        let header = BlockHeader::new(version, tree.root(), time);
        Block {
            header,
            transactions,
        }
    }

    fn genesis() -> Self {
        Block {
            header: BlockHeader::genesis(),
            transactions: Vec::new(),
        }
    }
}

/// An append-only ordered sequence of blocks, safe for concurrent readers
/// with a single writer at a time.
pub struct Chain {
    blocks: RwLock<Vec<Block>>,
}

impl Chain {
    /// Creates a chain whose index 0 is a zeroed genesis block.
    pub fn new() -> Self {
        Chain {
            blocks: RwLock::new(vec![Block::genesis()]),
        }
    }

    /// Appends `block` after setting its `previous_hash` to the current
    /// tail header's hash. Always succeeds unless the write lock is
    /// poisoned, which is a [`Error::ChainConsistency`] — a fatal
    /// condition, since the chain is meant to be the only writer.
    pub fn append(&self, mut block: Block) -> Result<()> {
        let mut guard = self
            .blocks
            .write()
            .map_err(|_| Error::ChainConsistency)?;
        let tip_hash = guard
            .last()
            .expect("chain always contains at least the genesis block")
            .header
            .hash();
        block.header.previous_hash = tip_hash;
        guard.push(block);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.blocks.read().expect("chain lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        false // genesis is always present
    }

    /// Clones the block at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Block> {
        self.blocks
            .read()
            .expect("chain lock poisoned")
            .get(index)
            .cloned()
    }

    pub fn tip_hash(&self) -> [u8; 32] {
        self.blocks
            .read()
            .expect("chain lock poisoned")
            .last()
            .expect("chain always contains at least the genesis block")
            .header
            .hash()
    }

    /// Read access to the full block list under the chain's read lock, for
    /// callers that need to scan more than one block (e.g. a wallet
    /// rescanning for incoming outputs).
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<Block>> {
        self.blocks.read().expect("chain lock poisoned")
    }
}

impl Default for Chain {
    fn default() -> Self {
        Chain::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_block(time: u64) -> Block {
        Block::new(1, Vec::new(), time)
    }

    #[test]
    fn genesis_has_zeroed_header() {
        let chain = Chain::new();
        let genesis = chain.get(0).unwrap();
        assert_eq!(genesis.header.version, 0);
        assert_eq!(genesis.header.previous_hash, [0u8; 32]);
        assert_eq!(genesis.header.merkle_root, [0u8; 32]);
    }

    #[test]
    fn appended_blocks_link_by_previous_hash() {
        let chain = Chain::new();
        let genesis_hash = chain.get(0).unwrap().header.hash();

        chain.append(plain_block(1)).unwrap();
        let b1 = chain.get(1).unwrap();
        assert_eq!(b1.header.previous_hash, genesis_hash);

        chain.append(plain_block(2)).unwrap();
        let b2 = chain.get(2).unwrap();
        assert_eq!(b2.header.previous_hash, b1.header.hash());
    }

    #[test]
    fn header_hash_excludes_previous_hash() {
        let mut header = BlockHeader::new(1, [7u8; 32], 42);
        let hash_before = header.hash();
        header.previous_hash = [9u8; 32];
        assert_eq!(BlockHeader::compute_hash(1, &[7u8; 32], 42), hash_before);
        assert_eq!(header.hash(), hash_before);
    }
}
