//! Transactions: a ring of spent UTXOs, the outputs they create, and the
//! ring signature proving the spend is authorized.
//!
//! Grounded on `internal/transaction/transaction.go`. The original
//! alternates between `encoding/json` and `encoding/gob` across files for
//! the bytes a signature is computed over — a soundness bug, since signer
//! and verifier must agree on exactly one byte-for-byte encoding. This
//! rewrite fixes `bincode` as the single canonical form, used identically
//! for hashing and for the ring signature's message.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::address::OneTimeAddress;
use crate::curve::Scalar;
use crate::error::{Error, Result};
use crate::hash;
use crate::ledger::KeyImageSet;
use crate::merkle::MerkleLeaf;
use crate::ring_signature::{self, RingSignature};
use crate::utxo::Utxo;

/// The part of a transaction that is hashed to produce the ring signature's
/// message. Excludes the signature itself, since the signature cannot sign
/// over its own bytes.
#[derive(Serialize)]
struct SigningBody<'a> {
    inputs: &'a [Utxo],
    outputs: &'a [Utxo],
    recipient: &'a OneTimeAddress,
}

/// A transfer of value: a ring of candidate spent outputs (exactly one of
/// which the signer actually owns), the new outputs it creates, the
/// recipient's one-time address, and the ring signature authorizing the
/// spend.
///
/// `recipient` names which of `outputs` is the actual payment (as opposed to
/// change returned to the sender); it mirrors `outputs[0].destination` in
/// the common two-output payment-plus-change case but is carried separately
/// so a wallet or block explorer does not need to guess which output a
/// transaction intended to pay, per the original design's `To` field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<Utxo>,
    pub outputs: Vec<Utxo>,
    pub recipient: OneTimeAddress,
    pub signature: RingSignature,
}

impl Transaction {
    /// Builds and signs a new transaction. `inputs` is the full ring
    /// (decoys plus the real output at `real_index`); `x` is the real
    /// output's spend scalar.
    pub fn new_signed(
        inputs: Vec<Utxo>,
        outputs: Vec<Utxo>,
        recipient: OneTimeAddress,
        real_index: usize,
        x: Scalar,
        rng: &mut impl RngCore,
    ) -> Result<Self> {
        let signing_bytes = Self::encode_signing_body(&inputs, &outputs, &recipient);
        let signature = ring_signature::sign(&signing_bytes, &inputs, real_index, x, rng)?;
        Ok(Transaction {
            inputs,
            outputs,
            recipient,
            signature,
        })
    }

    fn encode_signing_body(inputs: &[Utxo], outputs: &[Utxo], recipient: &OneTimeAddress) -> Vec<u8> {
        let body = SigningBody {
            inputs,
            outputs,
            recipient,
        };
        bincode::serialize(&body).expect("transaction signing body is always serializable")
    }

    fn signing_bytes(&self) -> Vec<u8> {
        Self::encode_signing_body(&self.inputs, &self.outputs, &self.recipient)
    }

    /// Canonical byte encoding of the full transaction, including the
    /// signature. This is what gets hashed to produce [`Transaction::hash`]
    /// and what a Merkle tree leaf hashes over.
    pub fn bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("transaction is always serializable")
    }

    /// Parses a transaction from the canonical encoding produced by
    /// [`Transaction::bytes`]. This is the only entry point for transaction
    /// bytes arriving from an untrusted source (a peer on the wire); it
    /// fails with [`Error::Serialization`] rather than panicking on
    /// malformed input.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn hash(&self) -> [u8; 32] {
        hash::digest(&self.bytes())
    }

    /// Full validity check: ring shape, amount conservation, signature
    /// verification, and key-image freshness against `spent`.
    pub fn check_validity(&self, spent: &KeyImageSet) -> Result<()> {
        if self.inputs.len() < 2 {
            return Err(Error::RingTooSmall(self.inputs.len()));
        }

        let input_amount = self.inputs[0].amount;
        if self.inputs.iter().any(|u| u.amount != input_amount) {
            return Err(Error::RingAmountMismatch);
        }

        let output_total: u64 = self.outputs.iter().map(|o| o.amount).sum();
        if output_total != input_amount {
            return Err(Error::ValueNotConserved);
        }

        if spent.contains(&self.signature.image) {
            return Err(Error::KeyImageReuse);
        }

        let signing_bytes = self.signing_bytes();
        if !ring_signature::verify(&signing_bytes, &self.inputs, &self.signature) {
            return Err(Error::InvalidRingSignature);
        }

        Ok(())
    }
}

impl MerkleLeaf for Transaction {
    fn leaf_bytes(&self) -> Vec<u8> {
        self.hash().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::LongTermKey;
    use rand::rngs::OsRng;

    fn ring_of(n: usize, real_index: usize, amount: u64) -> (Vec<Utxo>, Scalar, OneTimeAddress) {
        let mut ring = Vec::with_capacity(n);
        let mut real_x = Scalar::zero();
        let mut real_dest = None;
        for i in 0..n {
            let owner = LongTermKey::generate(&mut OsRng);
            let dest = LongTermKey::derive(&owner.public, &mut OsRng);
            if i == real_index {
                real_x = owner.recover_spend_key(&dest);
                real_dest = Some(dest);
            }
            ring.push(Utxo::new(amount, dest));
        }
        (ring, real_x, real_dest.unwrap())
    }

    #[test]
    fn well_formed_transaction_is_valid() {
        let (inputs, x, _) = ring_of(8, 3, 100);
        let recipient_owner = LongTermKey::generate(&mut OsRng);
        let recipient = LongTermKey::derive(&recipient_owner.public, &mut OsRng);
        let outputs = vec![Utxo::new(100, recipient)];

        let tx = Transaction::new_signed(inputs, outputs, recipient, 3, x, &mut OsRng).unwrap();
        let spent = KeyImageSet::new();
        assert!(tx.check_validity(&spent).is_ok());
    }

    #[test]
    fn bytes_and_parse_round_trip() {
        let (inputs, x, _) = ring_of(4, 1, 100);
        let recipient_owner = LongTermKey::generate(&mut OsRng);
        let recipient = LongTermKey::derive(&recipient_owner.public, &mut OsRng);
        let outputs = vec![Utxo::new(100, recipient)];

        let tx = Transaction::new_signed(inputs, outputs, recipient, 1, x, &mut OsRng).unwrap();
        let parsed = Transaction::parse(&tx.bytes()).unwrap();
        assert_eq!(parsed.hash(), tx.hash());
    }

    #[test]
    fn parse_rejects_malformed_bytes() {
        assert!(matches!(
            Transaction::parse(&[0u8; 4]),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn conservation_violation_is_rejected() {
        let (inputs, x, _) = ring_of(8, 3, 100);
        let recipient_owner = LongTermKey::generate(&mut OsRng);
        let recipient = LongTermKey::derive(&recipient_owner.public, &mut OsRng);
        // Mint extra value out of thin air.
        let outputs = vec![Utxo::new(150, recipient)];

        let tx = Transaction::new_signed(inputs, outputs, recipient, 3, x, &mut OsRng).unwrap();
        let spent = KeyImageSet::new();
        assert_eq!(
            tx.check_validity(&spent),
            Err(Error::ValueNotConserved)
        );
    }

    #[test]
    fn negative_conservation_via_amount_mismatch_is_rejected() {
        let (mut inputs, x, _) = ring_of(8, 3, 100);
        inputs[5].amount = 200; // break the ring's shared-amount invariant
        let recipient_owner = LongTermKey::generate(&mut OsRng);
        let recipient = LongTermKey::derive(&recipient_owner.public, &mut OsRng);
        let outputs = vec![Utxo::new(100, recipient)];

        let tx = Transaction::new_signed(inputs, outputs, recipient, 3, x, &mut OsRng).unwrap();
        let spent = KeyImageSet::new();
        assert_eq!(tx.check_validity(&spent), Err(Error::RingAmountMismatch));
    }

    #[test]
    fn double_spend_is_rejected() {
        let (inputs, x, _) = ring_of(8, 3, 100);
        let recipient_owner = LongTermKey::generate(&mut OsRng);
        let recipient = LongTermKey::derive(&recipient_owner.public, &mut OsRng);
        let outputs = vec![Utxo::new(100, recipient)];

        let tx = Transaction::new_signed(inputs, outputs, recipient, 3, x, &mut OsRng).unwrap();
        let mut spent = KeyImageSet::new();
        spent.insert(tx.signature.image);
        assert_eq!(tx.check_validity(&spent), Err(Error::KeyImageReuse));
    }
}
