//! Node identity generation.
//!
//! Grounded on `internal/config/node.go`'s `generateNewIdentity`: a node's
//! identity is a hash of an 8-byte random nonce and the current time,
//! generated once at startup. The original hashes the nonce against a
//! `MarshalText` RFC3339-ish timestamp; here that becomes `chrono`'s RFC3339
//! formatting feeding `obscura_core::hash::digest`.

use rand::RngCore;

/// Generates a fresh 32-byte node identity: `SHA256(nonce ‖ rfc3339_now)`.
pub fn generate(rng: &mut impl RngCore) -> [u8; 32] {
    let mut nonce = [0u8; 8];
    rng.fill_bytes(&mut nonce);
    let timestamp = chrono::Utc::now().to_rfc3339();

    let mut data = Vec::with_capacity(8 + timestamp.len());
    data.extend_from_slice(&nonce);
    data.extend_from_slice(timestamp.as_bytes());

    obscura_core::hash::digest(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn produces_distinct_identities() {
        let a = generate(&mut OsRng);
        let b = generate(&mut OsRng);
        assert_ne!(a, b);
    }
}
