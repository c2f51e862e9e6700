//! Spend-protection: the key-image ledger preventing double spends.
//!
//! Every accepted transaction's [`crate::ring_signature::KeyImage`] is
//! recorded here before the transaction's outputs are trusted. A key image
//! reappearing means the same spend scalar signed twice — a double spend —
//! regardless of which UTXOs were named in either ring.

use std::collections::HashSet;

use crate::ring_signature::KeyImage;

/// Set of key-image encodings seen across all accepted transactions.
#[derive(Debug, Clone, Default)]
pub struct KeyImageSet {
    seen: HashSet<[u8; 32]>,
}

impl KeyImageSet {
    pub fn new() -> Self {
        KeyImageSet::default()
    }

    pub fn contains(&self, image: &KeyImage) -> bool {
        self.seen.contains(&image.to_bytes())
    }

    /// Records `image` as spent. Returns `false` if it was already present
    /// (a double spend slipped past an earlier check), `true` otherwise.
    pub fn insert(&mut self, image: KeyImage) -> bool {
        self.seen.insert(image.to_bytes())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Point, Scalar};
    use rand::rngs::OsRng;

    fn random_image() -> KeyImage {
        KeyImage(Point::base_mul(&Scalar::random(&mut OsRng)))
    }

    #[test]
    fn fresh_image_is_not_contained_until_inserted() {
        let mut set = KeyImageSet::new();
        let img = random_image();
        assert!(!set.contains(&img));
        assert!(set.insert(img));
        assert!(set.contains(&img));
    }

    #[test]
    fn reinserting_the_same_image_reports_reuse() {
        let mut set = KeyImageSet::new();
        let img = random_image();
        assert!(set.insert(img));
        assert!(!set.insert(img));
    }
}
