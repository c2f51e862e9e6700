//! Linkable traceable ring signatures.
//!
//! Grounded on `internal/transaction/ring_signature.go`: a signer proves
//! knowledge of the spend scalar for exactly one of `n` candidate one-time
//! outputs without revealing which, while a deterministic key image ties
//! every signature produced with the same spend scalar together (so a
//! double spend is detectable without deanonymizing the spender).
//!
//! The `message` passed to [`sign`] and [`verify`] is the canonical
//! transaction body bytes — which already contains the ring via
//! `Transaction::inputs` — so the challenge hash's "serialize(ring)" term
//! from the data model is folded into hashing `message` directly. The
//! ring itself is not duplicated inside [`RingSignature`]: it lives once, on
//! `Transaction::inputs`, and callers supply it explicitly to sign/verify.
//! Storing it twice would only open a desync hazard (a signature whose
//! embedded ring silently diverges from the transaction's) with no benefit.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Point, Scalar};
use crate::error::{Error, Result};
use crate::hash;
use crate::utxo::Utxo;

const KEY_IMAGE_DOMAIN: &[u8] = b"obscura-key-image-v1";
const CHALLENGE_DOMAIN: &[u8] = b"obscura-ring-challenge-v1";

/// `H_p`, exposed at module scope since both signing and verification need
/// the same per-output hash-to-point.
fn hash_p(point: &Point) -> Point {
    hash::hash_to_point(KEY_IMAGE_DOMAIN, &point.to_bytes())
}

/// A deterministic group element `I = x * H_p(P)` binding every signature
/// produced with spend scalar `x` together, without revealing `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyImage(pub Point);

impl KeyImage {
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

/// A linkable ring signature over a ring of `n >= 2` one-time outputs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RingSignature {
    pub image: KeyImage,
    pub c: Vec<Scalar>,
    pub r: Vec<Scalar>,
}

/// Signs `message` (the canonical transaction body bytes) proving knowledge
/// of the spend scalar `x` for `ring[real_index]`, without revealing
/// `real_index` to a verifier.
///
/// `ring` must contain at least two outputs. Fails with
/// [`Error::RingTooSmall`] or an out-of-bounds `real_index` before any
/// secret-dependent branching occurs.
pub fn sign(
    message: &[u8],
    ring: &[Utxo],
    real_index: usize,
    x: Scalar,
    rng: &mut impl RngCore,
) -> Result<RingSignature> {
    let n = ring.len();
    if n < 2 {
        return Err(Error::RingTooSmall(n));
    }
    if real_index >= n {
        return Err(Error::Malformed("real_index out of bounds for ring"));
    }

    let image = KeyImage(x * hash_p(&ring[real_index].destination.p));

    let q: Vec<Scalar> = (0..n).map(|_| Scalar::random(rng)).collect();
    let mut w: Vec<Scalar> = (0..n)
        .map(|i| {
            if i == real_index {
                Scalar::zero()
            } else {
                Scalar::random(rng)
            }
        })
        .collect();
    w[real_index] = Scalar::zero();

    let l: Vec<Point> = (0..n)
        .map(|i| Point::base_mul(&q[i]) + w[i] * ring[i].destination.p)
        .collect();
    let big_r: Vec<Point> = (0..n)
        .map(|i| q[i] * hash_p(&ring[i].destination.p) + w[i] * image.0)
        .collect();

    let challenge = compute_challenge(message, &l, &big_r);

    let sum_others = (0..n)
        .filter(|&i| i != real_index)
        .fold(Scalar::zero(), |acc, i| acc + w[i]);

    let mut c = w;
    c[real_index] = challenge - sum_others;

    let mut r = q;
    r[real_index] = r[real_index] - c[real_index] * x;

    Ok(RingSignature { image, c, r })
}

/// Verifies `sig` against `message` and `ring`. Returns `false` on any
/// structural mismatch (wrong ring length, wrong number of responses) or a
/// failed challenge-sum equation; signature verification is a boolean
/// outcome, never an error.
pub fn verify(message: &[u8], ring: &[Utxo], sig: &RingSignature) -> bool {
    let n = ring.len();
    if n < 2 || sig.c.len() != n || sig.r.len() != n {
        return false;
    }

    let l: Vec<Point> = (0..n)
        .map(|i| Point::base_mul(&sig.r[i]) + sig.c[i] * ring[i].destination.p)
        .collect();
    let big_r: Vec<Point> = (0..n)
        .map(|i| sig.r[i] * hash_p(&ring[i].destination.p) + sig.c[i] * sig.image.0)
        .collect();

    let recomputed = compute_challenge(message, &l, &big_r);
    let sum_c = sig.c.iter().copied().fold(Scalar::zero(), |acc, c| acc + c);

    recomputed == sum_c
}

fn compute_challenge(message: &[u8], l: &[Point], r: &[Point]) -> Scalar {
    let mut buf = Vec::with_capacity(message.len() + 64 * (l.len() + r.len()));
    buf.extend_from_slice(message);
    for p in l {
        buf.extend_from_slice(&p.to_bytes());
    }
    for p in r {
        buf.extend_from_slice(&p.to_bytes());
    }
    hash::hash_to_scalar(CHALLENGE_DOMAIN, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::LongTermKey;
    use rand::rngs::OsRng;

    fn ring_of(n: usize, real_index: usize) -> (Vec<Utxo>, Scalar) {
        let mut ring = Vec::with_capacity(n);
        let mut real_x = Scalar::zero();
        for i in 0..n {
            let owner = LongTermKey::generate(&mut OsRng);
            let dest = LongTermKey::derive(&owner.public, &mut OsRng);
            if i == real_index {
                real_x = owner.recover_spend_key(&dest);
            }
            ring.push(Utxo::new(100, dest));
        }
        (ring, real_x)
    }

    #[test]
    fn signature_verifies_for_honest_signer_any_position() {
        for real_index in [0usize, 3, 7] {
            let (ring, x) = ring_of(8, real_index);
            let msg = b"hello";
            let sig = sign(msg, &ring, real_index, x, &mut OsRng).unwrap();
            assert!(verify(msg, &ring, &sig));
        }
    }

    #[test]
    fn tampered_message_fails_verification() {
        let (ring, x) = ring_of(8, 3);
        let sig = sign(b"hello", &ring, 3, x, &mut OsRng).unwrap();
        assert!(!verify(b"world", &ring, &sig));
    }

    #[test]
    fn same_spend_key_yields_identical_key_image_across_signatures() {
        let (ring_a, x) = ring_of(4, 1);
        let (mut ring_b, _) = ring_of(4, 2);
        // Force ring_b's real output to be the same one spent in ring_a, at
        // a different position, so only pi differs between the two sigs.
        ring_b[2] = ring_a[1];

        let sig_a = sign(b"tx-a", &ring_a, 1, x, &mut OsRng).unwrap();
        let sig_b = sign(b"tx-b", &ring_b, 2, x, &mut OsRng).unwrap();

        assert_eq!(sig_a.image, sig_b.image);
    }

    #[test]
    fn ring_too_small_is_rejected() {
        let (ring, x) = ring_of(1, 0);
        assert!(matches!(
            sign(b"m", &ring, 0, x, &mut OsRng),
            Err(Error::RingTooSmall(1))
        ));
    }
}
