//! The UTXO entity: a spendable amount tied to a one-time destination
//! address, keyed everywhere by its content-hash.
//!
//! Grounded on `internal/transaction/transaction.go`'s `Utxo` type, with the
//! amount encoding fixed to a `u64` in the smallest spendable unit rather
//! than the original's `fmt.Sprintf("%x", float32)`: floats are a poor fit
//! for value accounting and the printf encoding is not bit-exact across
//! implementations.

use serde::{Deserialize, Serialize};

use crate::address::OneTimeAddress;
use crate::hash;

/// Content-hash of a [`Utxo`]: `SHA256(amount_be ‖ encode(P) ‖ encode(R))`.
pub type ContentHash = [u8; 32];

/// An unspent transaction output: an amount locked to a one-time
/// destination. Immutable once constructed — the content-hash is derived
/// from `amount` and `destination` and is never mutated independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub amount: u64,
    pub destination: OneTimeAddress,
}

impl Utxo {
    pub fn new(amount: u64, destination: OneTimeAddress) -> Self {
        Utxo { amount, destination }
    }

    /// The content-hash used as this UTXO's key in a [`crate::utxo_set::UtxoSet`]
    /// and as the `P_i` reference inside a ring signature's serialized ring.
    pub fn content_hash(&self) -> ContentHash {
        let mut buf = Vec::with_capacity(8 + 32 + 32);
        buf.extend_from_slice(&self.amount.to_be_bytes());
        buf.extend_from_slice(&self.destination.p.to_bytes());
        buf.extend_from_slice(&self.destination.r.to_bytes());
        hash::digest(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::LongTermKey;
    use rand::rngs::OsRng;

    #[test]
    fn content_hash_is_deterministic() {
        let owner = LongTermKey::generate(&mut OsRng);
        let dest = LongTermKey::derive(&owner.public, &mut OsRng);
        let u = Utxo::new(100, dest);
        assert_eq!(u.content_hash(), u.content_hash());
    }

    #[test]
    fn content_hash_differs_by_amount() {
        let owner = LongTermKey::generate(&mut OsRng);
        let dest = LongTermKey::derive(&owner.public, &mut OsRng);
        let a = Utxo::new(100, dest);
        let b = Utxo::new(200, dest);
        assert_ne!(a.content_hash(), b.content_hash());
    }
}
