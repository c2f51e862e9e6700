//! Error types for the **Obscura** core crate.
//!
//! All high-level operations return [`crate::Result`] which is a convenient
//! alias for `core::result::Result<T, Error>`.
//!
//! The enum is intentionally minimal and high-level. Lower-level errors are
//! mapped into one of these variants before bubbling up to callers. Signature
//! and recognition failures are *not* represented here — those are boolean
//! outcomes, never exceptions (see [`crate::ring_signature::verify`]).
//!
//! # Examples
//!
//! ```
//! use obscura_core::{Error, Result};
//!
//! fn demo_fn(fail: bool) -> Result<()> {
//!     if fail {
//!         Err(Error::ChainConsistency)
//!     } else {
//!         Ok(())
//!     }
//! }
//! ```

use thiserror::Error;

/// Core crate error type.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// A 32-byte scalar encoding was not the canonical reduced form.
    #[error("non-canonical scalar encoding")]
    NonCanonicalScalar,

    /// A 32-byte point encoding did not decompress to a point in the
    /// prime-order subgroup.
    #[error("non-canonical point encoding, or point outside the prime-order subgroup")]
    NonCanonicalPoint,

    /// A byte string did not match the expected length or shape.
    #[error("malformed byte string: {0}")]
    Malformed(&'static str),

    /// A ring was constructed with fewer than two members.
    #[error("ring must contain at least two outputs, found {0}")]
    RingTooSmall(usize),

    /// Not enough unspent outputs of the required amount exist to build a
    /// ring of the requested size.
    #[error("insufficient decoys: need {needed}, found {found}")]
    InsufficientDecoys { needed: usize, found: usize },

    /// Ring members do not all carry the same amount.
    #[error("ring members do not share a common amount")]
    RingAmountMismatch,

    /// Sum of output amounts does not equal the sum of input amounts.
    #[error("output amounts do not conserve input value")]
    ValueNotConserved,

    /// The ring signature did not verify against the transaction body.
    #[error("ring signature verification failed")]
    InvalidRingSignature,

    /// The transaction's key image has already been spent.
    #[error("key image already present in the ledger (double spend)")]
    KeyImageReuse,

    /// `previous_hash` of an appended block did not match the chain tip.
    #[error("block previous-hash does not match chain tip")]
    ChainConsistency,

    /// Canonical (de)serialization of a core entity failed.
    #[error("(de)serialization failed: {0}")]
    Serialization(String),
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
