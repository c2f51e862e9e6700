//! `obscura-wallet`: long-term key storage and an address book.
//!
//! Grounded on `internal/config/node.go`'s identity/config persistence
//! pattern generalized to key material, and on `internal/transaction/address.go`
//! for the human-readable address encoding the address book stores
//! contacts under. Wallet key backup (seed phrases, encrypted export) is out
//! of scope — this crate persists the raw private scalars to a JSON file and
//! nothing more.

pub mod error;

use std::collections::HashMap;
use std::path::Path;

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use obscura_core::{LongTermKey, PublicKey, Utxo, UtxoSet};

pub use error::{Error, Result};

/// A wallet: one long-term keyset plus a address book of known contacts.
pub struct Wallet {
    pub key: LongTermKey,
    address_book: HashMap<String, PublicKey>,
}

/// On-disk representation. Private keys are hex-encoded; contacts use the
/// same `lrn1`/`lrn0` encoding as [`PublicKey::to_human_readable`], so a
/// wallet file is readable with nothing but a hex and base58 decoder.
#[derive(Serialize, Deserialize)]
struct WalletFile {
    private_key_hex: String,
    address_book: Vec<(String, String)>,
}

impl Wallet {
    /// Generates a fresh wallet with an empty address book.
    pub fn generate() -> Self {
        Wallet {
            key: LongTermKey::generate(&mut OsRng),
            address_book: HashMap::new(),
        }
    }

    /// This wallet's own address, in the full `lrn1` form.
    pub fn address(&self) -> String {
        self.key.public.to_human_readable(false)
    }

    /// Records `addr` (an `lrn1`/`lrn0` encoded address) under `name`.
    pub fn add_contact(&mut self, name: impl Into<String>, addr: &str) -> Result<()> {
        let public = PublicKey::from_human_readable(addr)?;
        self.address_book.insert(name.into(), public);
        Ok(())
    }

    pub fn contact(&self, name: &str) -> Result<&PublicKey> {
        self.address_book
            .get(name)
            .ok_or_else(|| Error::UnknownContact(name.to_string()))
    }

    pub fn contacts(&self) -> impl Iterator<Item = (&str, &PublicKey)> {
        self.address_book.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Scans `utxos` for outputs this wallet's long-term key recognizes,
    /// returning them alongside the summed balance.
    pub fn scan(&self, utxos: &UtxoSet) -> (u64, Vec<Utxo>) {
        let mut owned = Vec::new();
        let mut balance = 0u64;
        for utxo in utxos.iter() {
            if self.key.recognize(&utxo.destination) {
                balance += utxo.amount;
                owned.push(*utxo);
            }
        }
        (balance, owned)
    }

    /// Serializes this wallet to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = WalletFile {
            private_key_hex: hex::encode(self.key.to_private_bytes()),
            address_book: self
                .address_book
                .iter()
                .map(|(name, pk)| (name.clone(), pk.to_human_readable(false)))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a wallet previously written by [`Wallet::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let file: WalletFile = serde_json::from_str(&json)?;

        let bytes = hex::decode(&file.private_key_hex)
            .map_err(|e| Error::BadPrivateKey(e.to_string()))?;
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| Error::BadPrivateKey("expected 64 bytes".to_string()))?;
        let key = LongTermKey::from_private_bytes(&bytes)?;

        let mut address_book = HashMap::with_capacity(file.address_book.len());
        for (name, addr) in file.address_book {
            address_book.insert(name, PublicKey::from_human_readable(&addr)?);
        }

        Ok(Wallet { key, address_book })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip_preserves_address_and_contacts() {
        let dir = std::env::temp_dir().join(format!("obscura-wallet-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wallet.json");

        let mut wallet = Wallet::generate();
        let other = Wallet::generate();
        wallet.add_contact("alice", &other.address()).unwrap();
        wallet.save(&path).unwrap();

        let loaded = Wallet::load(&path).unwrap();
        assert_eq!(loaded.address(), wallet.address());
        assert_eq!(loaded.contact("alice").unwrap(), &other.key.public);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn scan_finds_only_owned_outputs() {
        let wallet = Wallet::generate();
        let stranger = Wallet::generate();

        let mut utxos = UtxoSet::new();
        let owned_dest = LongTermKey::derive(&wallet.key.public, &mut OsRng);
        let foreign_dest = LongTermKey::derive(&stranger.key.public, &mut OsRng);
        utxos.add(Utxo::new(10, owned_dest));
        utxos.add(Utxo::new(20, foreign_dest));

        let (balance, owned) = wallet.scan(&utxos);
        assert_eq!(balance, 10);
        assert_eq!(owned.len(), 1);
    }

    #[test]
    fn unknown_contact_lookup_fails() {
        let wallet = Wallet::generate();
        assert!(wallet.contact("nobody").is_err());
    }
}
