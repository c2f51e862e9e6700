//! The single fixed-output digest used throughout the crate (SHA-256, via
//! `sha2`), plus the two derived operations built on top of it:
//! hash-to-scalar and hash-to-point. Both conventions are fixed once here so
//! that signer and verifier can never disagree about them.

use sha2::{Digest, Sha256};

use crate::curve::{Point, Scalar};

/// 32-byte SHA-256 digest of `data`.
pub fn digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&out);
    bytes
}

/// Hashes `domain ‖ data` to a scalar modulo the group order `l`.
///
/// Computes `d0 = SHA256(domain ‖ data)`, `d1 = SHA256(d0)`, then reduces the
/// 64-byte concatenation `d0 ‖ d1` via wide reduction. This replaces the
/// Ed25519 secret-key "clamping" convention the original design used for a
/// challenge scalar (a convention meant for clamped private scalars) with an
/// unbiased wide reduction over the full 64-byte space.
pub fn hash_to_scalar(domain: &[u8], data: &[u8]) -> Scalar {
    let mut framed = Vec::with_capacity(domain.len() + data.len());
    framed.extend_from_slice(domain);
    framed.extend_from_slice(data);
    let d0 = digest(&framed);
    let d1 = digest(&d0);
    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(&d0);
    wide[32..].copy_from_slice(&d1);
    Scalar::from_uniform_bytes(&wide)
}

/// Deterministic map from a point's compressed encoding to another point in
/// the prime-order subgroup, used only to derive `I = x * H_p(P)`.
///
/// Try-and-increment: hash `domain ‖ encoding ‖ counter` for
/// `counter = 0, 1, 2, ...` until the digest decompresses to a point on the
/// curve, then clear the cofactor by multiplying by 8 to land in the
/// prime-order subgroup. This resolves the original design's insecure
/// identity-map placeholder (`HashPoint(p) = p`, under which the key image
/// would trivially leak the spend key) without pulling in a non-crates.io
/// hash-to-curve implementation.
pub fn hash_to_point(domain: &[u8], point_encoding: &[u8; 32]) -> Point {
    use curve25519_dalek::edwards::CompressedEdwardsY;

    let mut counter: u32 = 0;
    loop {
        let mut framed = Vec::with_capacity(domain.len() + 32 + 4);
        framed.extend_from_slice(domain);
        framed.extend_from_slice(point_encoding);
        framed.extend_from_slice(&counter.to_le_bytes());
        let candidate = digest(&framed);

        if let Some(decompressed) = CompressedEdwardsY(candidate).decompress() {
            let cleared = decompressed.mul_by_cofactor();
            return Point::from_subgroup_point(cleared);
        }
        counter = counter
            .checked_add(1)
            .expect("hash_to_point: exhausted try-and-increment counter");
    }
}
