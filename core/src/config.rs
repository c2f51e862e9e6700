//! Core-level runtime configuration: the parameters a signer needs that
//! aren't baked into the protocol itself.
//!
//! The [`Config`]/[`ConfigBuilder`] fluent-builder shape is carried over
//! unchanged from the original PoW-era configuration; only the fields
//! changed, since difficulty and block reward are consensus mechanics this
//! crate does not implement. [`crate::ledger::KeyImageSet`] aside, the ring
//! size and the smallest-unit granularity are the two protocol knobs the
//! core crate itself cares about; network-facing settings (listen address,
//! bootstrap peers) live in `obscura-network`'s own `NodeConfig`, built the
//! same way.

use serde::{Deserialize, Serialize};

/// Runtime configuration shared across the core crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Default ring size a signer aims for when selecting decoys; the
    /// actual ring may come out smaller if the UTXO set can't supply enough
    /// decoys of the spent amount.
    pub ring_size: usize,

    /// The smallest spendable unit amounts are expressed in; purely
    /// documentation for callers displaying amounts, since the core itself
    /// treats `u64` amounts as already being in this unit.
    pub granularity: u64,

    /// Human-readable name identifying the network (e.g. "main", "test").
    pub network: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ring_size: 8,
            granularity: 1,
            network: "main".into(),
        }
    }
}

/// Fluent builder for [`Config`].
pub struct ConfigBuilder {
    inner: Config,
}

impl ConfigBuilder {
    /// Starts a new builder pre-populated with [`Config::default`].
    pub fn new() -> Self {
        Self {
            inner: Config::default(),
        }
    }

    pub fn ring_size(mut self, size: usize) -> Self {
        self.inner.ring_size = size;
        self
    }

    pub fn granularity(mut self, granularity: u64) -> Self {
        self.inner.granularity = granularity;
        self
    }

    pub fn network<S: Into<String>>(mut self, name: S) -> Self {
        self.inner.network = name.into();
        self
    }

    /// Consumes the builder returning an immutable configuration value.
    pub fn finish(self) -> Config {
        self.inner
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_fields() {
        let cfg = ConfigBuilder::new()
            .ring_size(16)
            .granularity(100)
            .network("test")
            .finish();
        assert_eq!(cfg.ring_size, 16);
        assert_eq!(cfg.granularity, 100);
        assert_eq!(cfg.network, "test");
    }
}
