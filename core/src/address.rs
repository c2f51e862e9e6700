//! Long-term stealth addresses and one-time destination derivation.
//!
//! Grounded on `internal/transaction/address.go` in the original design: a
//! recipient publishes a long-term public keyset `(A, B)`; a sender derives a
//! fresh one-time destination `(P, R)` per payment that only the recipient
//! can recognize and later spend, without either party revealing which
//! on-chain output belongs to whom.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::curve::{Point, Scalar};
use crate::error::{Error, Result};
use crate::hash;

const DOMAIN: &[u8] = b"obscura-stealth-address-v1";
const ADDRESS_CHECKSUM_LEN: usize = 8;

/// The two private scalars backing a long-term address.
#[derive(Clone, Copy)]
pub struct PrivateKey {
    a: Scalar,
    b: Scalar,
}

/// The two public points backing a long-term address, `A = aG` and `B = bG`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub a: Point,
    pub b: Point,
}

/// A long-term address: a private keyset plus the public keyset it was
/// derived from. Created once per address via [`LongTermKey::generate`].
#[derive(Clone, Copy)]
pub struct LongTermKey {
    private: PrivateKey,
    pub public: PublicKey,
}

/// A one-time destination derived for a single payment.
///
/// `P` is the spendable one-time public key; `R` is the ephemeral public key
/// the recipient needs, together with their private scalar `a`, to recognize
/// and later spend the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTimeAddress {
    pub p: Point,
    pub r: Point,
}

impl LongTermKey {
    /// Samples `(a, b)` uniformly from a CSPRNG and computes `A = aG`,
    /// `B = bG`.
    pub fn generate(rng: &mut impl RngCore) -> Self {
        let a = Scalar::random(rng);
        let b = Scalar::random(rng);
        let public = PublicKey {
            a: Point::base_mul(&a),
            b: Point::base_mul(&b),
        };
        LongTermKey {
            private: PrivateKey { a, b },
            public,
        }
    }

    /// Derives a fresh one-time destination address for `dest_pub`, the
    /// recipient's public keyset. Only the caller of this function learns
    /// the ephemeral scalar `r`; it is not returned.
    pub fn derive(dest_pub: &PublicKey, rng: &mut impl RngCore) -> OneTimeAddress {
        let r = Scalar::random(rng);
        let big_r = Point::base_mul(&r);
        let shared = r * dest_pub.a;
        let s = hash::hash_to_scalar(DOMAIN, &shared.to_bytes());
        let p = Point::base_mul(&s) + dest_pub.b;
        OneTimeAddress { p, r: big_r }
    }

    /// Returns `true` if `dest` is a one-time address this key recognizes,
    /// i.e. it was derived for `self.public`.
    pub fn recognize(&self, dest: &OneTimeAddress) -> bool {
        let shared = self.private.a * dest.r;
        let s = hash::hash_to_scalar(DOMAIN, &shared.to_bytes());
        let candidate = Point::base_mul(&s) + self.public.b;
        candidate == dest.p
    }

    /// Recovers the one-time spend scalar `x` such that `x * G == dest.P`,
    /// for a destination this key recognizes. Invariant: callers MUST only
    /// rely on the result after [`LongTermKey::recognize`] returns `true`.
    pub fn recover_spend_key(&self, dest: &OneTimeAddress) -> Scalar {
        let shared = self.private.a * dest.r;
        let s = hash::hash_to_scalar(DOMAIN, &shared.to_bytes());
        s + self.private.b
    }

    /// Encodes the private scalars `(a, b)` as 64 canonical bytes, for a
    /// wallet to persist to disk. There is no wallet-side key backup scheme
    /// beyond this raw encoding.
    pub fn to_private_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.private.a.to_bytes());
        out[32..].copy_from_slice(&self.private.b.to_bytes());
        out
    }

    /// Reconstructs a [`LongTermKey`] from the 64-byte encoding produced by
    /// [`LongTermKey::to_private_bytes`].
    pub fn from_private_bytes(bytes: &[u8; 64]) -> Result<Self> {
        let mut a_bytes = [0u8; 32];
        let mut b_bytes = [0u8; 32];
        a_bytes.copy_from_slice(&bytes[..32]);
        b_bytes.copy_from_slice(&bytes[32..]);
        let a = Scalar::from_canonical_bytes(a_bytes)?;
        let b = Scalar::from_canonical_bytes(b_bytes)?;
        let public = PublicKey {
            a: Point::base_mul(&a),
            b: Point::base_mul(&b),
        };
        Ok(LongTermKey {
            private: PrivateKey { a, b },
            public,
        })
    }
}

impl PublicKey {
    /// Encodes the keyset as a human-readable address string.
    ///
    /// `lrn1` carries both `A` and `B`; `lrn0` is a truncated form carrying
    /// only `B` (a viewless address that can receive funds but cannot be
    /// used to recognize or spend them, since `a` is not derivable from
    /// `B` alone). Both forms append an 8-byte SHA-256 checksum of the
    /// encoded keys and are base58-encoded, mirroring the original design's
    /// address encoding.
    pub fn to_human_readable(&self, truncated: bool) -> String {
        let b_bytes = self.b.to_bytes();
        let mut payload = Vec::with_capacity(64);
        let mut checked = Vec::with_capacity(64);

        let prefix = if truncated {
            "lrn0"
        } else {
            let a_bytes = self.a.to_bytes();
            payload.extend_from_slice(&a_bytes);
            checked.extend_from_slice(&a_bytes);
            "lrn1"
        };
        payload.extend_from_slice(&b_bytes);
        checked.extend_from_slice(&b_bytes);

        let checksum = hash::digest(&checked);
        payload.extend_from_slice(&checksum[..ADDRESS_CHECKSUM_LEN]);

        format!("{prefix}{}", bs58::encode(payload).into_string())
    }

    /// Decodes a human-readable address produced by
    /// [`PublicKey::to_human_readable`]. Rejects a bad checksum, a bad
    /// prefix, or keys that fail canonical point decoding.
    pub fn from_human_readable(s: &str) -> Result<Self> {
        let (truncated, rest) = if let Some(rest) = s.strip_prefix("lrn1") {
            (false, rest)
        } else if let Some(rest) = s.strip_prefix("lrn0") {
            (true, rest)
        } else {
            return Err(Error::Malformed("unrecognized address prefix"));
        };

        let payload = bs58::decode(rest)
            .into_vec()
            .map_err(|_| Error::Malformed("invalid base58 address payload"))?;

        let expected_len = if truncated {
            32 + ADDRESS_CHECKSUM_LEN
        } else {
            64 + ADDRESS_CHECKSUM_LEN
        };
        if payload.len() != expected_len {
            return Err(Error::Malformed("address payload has the wrong length"));
        }

        let (keys, checksum) = payload.split_at(payload.len() - ADDRESS_CHECKSUM_LEN);
        let expected_checksum = hash::digest(keys);
        if checksum != &expected_checksum[..ADDRESS_CHECKSUM_LEN] {
            return Err(Error::Malformed("address checksum mismatch"));
        }

        let (a, b) = if truncated {
            (Point::identity(), decode_point(keys)?)
        } else {
            let (a_bytes, b_bytes) = keys.split_at(32);
            (decode_point(a_bytes)?, decode_point(b_bytes)?)
        };

        Ok(PublicKey { a, b })
    }
}

fn decode_point(bytes: &[u8]) -> Result<Point> {
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| Error::Malformed("point must be 32 bytes"))?;
    Point::from_canonical_bytes(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn stealth_round_trip() {
        let owner = LongTermKey::generate(&mut OsRng);
        let other = LongTermKey::generate(&mut OsRng);

        let dest = LongTermKey::derive(&owner.public, &mut OsRng);
        assert!(owner.recognize(&dest));
        assert!(!other.recognize(&dest));
    }

    #[test]
    fn spend_key_recovery_matches_destination() {
        let owner = LongTermKey::generate(&mut OsRng);
        let dest = LongTermKey::derive(&owner.public, &mut OsRng);
        let x = owner.recover_spend_key(&dest);
        assert_eq!(Point::base_mul(&x), dest.p);
    }

    #[test]
    fn human_readable_round_trip_full_and_truncated() {
        let owner = LongTermKey::generate(&mut OsRng);

        let full = owner.public.to_human_readable(false);
        assert!(full.starts_with("lrn1"));
        let decoded = PublicKey::from_human_readable(&full).unwrap();
        assert_eq!(decoded, owner.public);

        let truncated = owner.public.to_human_readable(true);
        assert!(truncated.starts_with("lrn0"));
        let decoded = PublicKey::from_human_readable(&truncated).unwrap();
        assert_eq!(decoded.b, owner.public.b);
    }

    #[test]
    fn human_readable_rejects_bad_checksum() {
        let owner = LongTermKey::generate(&mut OsRng);
        let mut full = owner.public.to_human_readable(false);
        full.push('1');
        assert!(PublicKey::from_human_readable(&full).is_err());
    }
}
