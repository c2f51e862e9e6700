//! The active UTXO set: a content-addressed map from `Utxo::content_hash`
//! to the UTXO itself, plus the decoy-selection scan a signer uses to build
//! a ring.
//!
//! Grounded on `internal/chain/chain.go`'s `utxoSet` (there, an
//! interface-with-one-implementation around a `map[FixedHash]*Utxo`; per the
//! design note on interface collapse, this is a single concrete type here).

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::utxo::{ContentHash, Utxo};

/// Content-addressed set of live UTXOs.
#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    by_hash: HashMap<ContentHash, Utxo>,
}

impl UtxoSet {
    pub fn new() -> Self {
        UtxoSet::default()
    }

    /// Inserts `u`, keyed by its content-hash. Re-inserting the same
    /// content-hash overwrites the existing entry (content-hashes are
    /// collision-resistant by construction; a collision would mean `u` is
    /// bit-for-bit identical to what was already there).
    pub fn add(&mut self, u: Utxo) {
        self.by_hash.insert(u.content_hash(), u);
    }

    pub fn contains(&self, u: &Utxo) -> bool {
        self.by_hash.contains_key(&u.content_hash())
    }

    pub fn contains_hash(&self, hash: &ContentHash) -> bool {
        self.by_hash.contains_key(hash)
    }

    pub fn get(&self, hash: &ContentHash) -> Option<&Utxo> {
        self.by_hash.get(hash)
    }

    pub fn remove(&mut self, u: &Utxo) -> Option<Utxo> {
        self.by_hash.remove(&u.content_hash())
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Yields a snapshot of the live UTXOs; iteration order is not
    /// guaranteed to match insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Utxo> {
        self.by_hash.values()
    }

    /// Builds a ring for spending `real`, by scanning for up to
    /// `ring_size - 1` other UTXOs of the same amount to use as decoys.
    ///
    /// If fewer than `ring_size - 1` candidates exist, proceeds with a
    /// smaller ring (as long as at least one decoy is found, so `n >= 2`).
    /// Fails with [`Error::InsufficientDecoys`] if `real` is the only UTXO of
    /// its amount. The real output's position in the returned ring is chosen
    /// uniformly at random and also returned, since the caller (the signer)
    /// needs it to build the ring signature.
    pub fn select_ring(
        &self,
        real: &Utxo,
        ring_size: usize,
        rng: &mut impl rand::RngCore,
    ) -> Result<(Vec<Utxo>, usize)> {
        use rand::Rng;

        let real_hash = real.content_hash();
        let wanted_decoys = ring_size.saturating_sub(1);

        let mut decoys: Vec<Utxo> = self
            .by_hash
            .values()
            .filter(|u| u.amount == real.amount && u.content_hash() != real_hash)
            .take(wanted_decoys)
            .copied()
            .collect();

        if decoys.is_empty() {
            return Err(Error::InsufficientDecoys {
                needed: wanted_decoys,
                found: 0,
            });
        }

        let real_index = rng.gen_range(0..=decoys.len());
        decoys.insert(real_index, *real);

        Ok((decoys, real_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::LongTermKey;
    use rand::rngs::OsRng;

    fn fresh_utxo(amount: u64) -> Utxo {
        let owner = LongTermKey::generate(&mut OsRng);
        let dest = LongTermKey::derive(&owner.public, &mut OsRng);
        Utxo::new(amount, dest)
    }

    #[test]
    fn add_remove_idempotence() {
        let mut set = UtxoSet::new();
        let u = fresh_utxo(10);
        set.add(u);
        assert!(set.contains(&u));
        set.remove(&u);
        assert!(!set.contains(&u));
    }

    #[test]
    fn select_ring_finds_matching_amount_decoys() {
        let mut set = UtxoSet::new();
        let real = fresh_utxo(50);
        set.add(real);
        for _ in 0..7 {
            set.add(fresh_utxo(50));
        }
        // A distractor of a different amount must never be selected.
        set.add(fresh_utxo(999));

        let (ring, real_index) = set.select_ring(&real, 8, &mut OsRng).unwrap();
        assert_eq!(ring.len(), 8);
        assert_eq!(ring[real_index], real);
        assert!(ring.iter().all(|u| u.amount == 50));
    }

    #[test]
    fn select_ring_fails_with_only_real_output() {
        let mut set = UtxoSet::new();
        let real = fresh_utxo(50);
        set.add(real);
        assert!(matches!(
            set.select_ring(&real, 8, &mut OsRng),
            Err(Error::InsufficientDecoys { .. })
        ));
    }

    #[test]
    fn select_ring_proceeds_with_smaller_ring_when_short_on_decoys() {
        let mut set = UtxoSet::new();
        let real = fresh_utxo(50);
        set.add(real);
        set.add(fresh_utxo(50));

        let (ring, real_index) = set.select_ring(&real, 8, &mut OsRng).unwrap();
        assert_eq!(ring.len(), 2);
        assert_eq!(ring[real_index], real);
    }
}
