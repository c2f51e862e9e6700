//! Curve25519/Ed25519 scalar and point primitives.
//!
//! [`Scalar`] and [`Point`] are thin wrappers around `curve25519-dalek`'s
//! types that preserve two invariants for as long as a value exists:
//! a `Scalar` is always the canonical reduced representative mod `l`, and a
//! `Point` is always a member of the prime-order subgroup. Both are `Copy`
//! and immutable once constructed, so they are free to share across threads
//! or tasks.

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use curve25519_dalek::traits::Identity;
use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Add, Mul, Neg, Sub};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// A scalar modulo the Ed25519 group order `l`, canonically encoded.
#[derive(Clone, Copy, Debug)]
pub struct Scalar(DalekScalar);

impl Scalar {
    /// The additive identity.
    pub fn zero() -> Self {
        Scalar(DalekScalar::zero())
    }

    /// Draws a uniformly random scalar from a cryptographically secure RNG
    /// by filling 64 bytes and reducing them modulo `l`. Avoids depending on
    /// `curve25519-dalek`'s own `Scalar::random`, which pins an older
    /// `rand_core` than the rest of the workspace uses.
    pub fn random(rng: &mut impl RngCore) -> Self {
        let mut bytes = [0u8; 64];
        rng.fill_bytes(&mut bytes);
        Scalar(DalekScalar::from_bytes_mod_order_wide(&bytes))
    }

    /// Reduces 64 uniformly random bytes modulo `l`.
    pub fn from_uniform_bytes(bytes: &[u8; 64]) -> Self {
        Scalar(DalekScalar::from_bytes_mod_order_wide(bytes))
    }

    /// Decodes a canonical 32-byte little-endian scalar encoding. Rejects
    /// any encoding that is not already fully reduced mod `l`.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Result<Self> {
        Option::<DalekScalar>::from(DalekScalar::from_canonical_bytes(bytes))
            .map(Scalar)
            .ok_or(Error::NonCanonicalScalar)
    }

    /// Canonical 32-byte little-endian encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.to_bytes()
    }

    pub(crate) fn inner(&self) -> &DalekScalar {
        &self.0
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::zero()
    }
}

// Scalar equality must be constant-time: it is compared over canonical byte
// encodings rather than relying on the inner type's own `PartialEq`.
impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes().ct_eq(&other.to_bytes()).into()
    }
}
impl Eq for Scalar {}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 - rhs.0)
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 * rhs.0)
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar(-self.0)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| de::Error::custom("scalar must be 32 bytes"))?;
        Scalar::from_canonical_bytes(array).map_err(de::Error::custom)
    }
}

/// A point on the prime-order subgroup of Curve25519 (Edwards form),
/// canonically encoded.
#[derive(Clone, Copy, Debug)]
pub struct Point(EdwardsPoint);

impl Point {
    /// The group identity element.
    pub fn identity() -> Self {
        Point(EdwardsPoint::identity())
    }

    /// Computes `scalar * G`, the base-point multiplication.
    pub fn base_mul(scalar: &Scalar) -> Self {
        Point(scalar.0 * ED25519_BASEPOINT_POINT)
    }

    /// Decodes a canonical compressed point encoding, rejecting any bytes
    /// that do not decompress onto the curve or that decompress to a point
    /// outside the prime-order subgroup.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Result<Self> {
        let decompressed = CompressedEdwardsY(bytes)
            .decompress()
            .ok_or(Error::NonCanonicalPoint)?;
        if !decompressed.is_torsion_free() {
            return Err(Error::NonCanonicalPoint);
        }
        Ok(Point(decompressed))
    }

    /// Canonical 32-byte compressed encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.compress().to_bytes()
    }

    pub(crate) fn from_subgroup_point(point: EdwardsPoint) -> Self {
        debug_assert!(point.is_torsion_free());
        Point(point)
    }

    pub(crate) fn inner(&self) -> &EdwardsPoint {
        &self.0
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for Point {}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

/// Variable-base scalar multiplication, `scalar * point`.
impl Mul<Point> for Scalar {
    type Output = Point;
    fn mul(self, rhs: Point) -> Point {
        Point(self.0 * rhs.0)
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let bytes: Vec<u8> = Deserialize::deserialize(deserializer)?;
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| de::Error::custom("point must be 32 bytes"))?;
        Point::from_canonical_bytes(array).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn scalar_roundtrip_through_canonical_bytes() {
        let s = Scalar::random(&mut OsRng);
        let decoded = Scalar::from_canonical_bytes(s.to_bytes()).unwrap();
        assert_eq!(s, decoded);
    }

    #[test]
    fn non_canonical_scalar_rejected() {
        // l (the group order) itself is not a canonical residue: all 0xff
        // bytes are far above l and must be rejected.
        let bytes = [0xffu8; 32];
        assert!(Scalar::from_canonical_bytes(bytes).is_err());
    }

    #[test]
    fn point_roundtrip_through_canonical_bytes() {
        let s = Scalar::random(&mut OsRng);
        let p = Point::base_mul(&s);
        let decoded = Point::from_canonical_bytes(p.to_bytes()).unwrap();
        assert_eq!(p, decoded);
    }

    #[test]
    fn base_mul_is_additive_homomorphism() {
        let a = Scalar::random(&mut OsRng);
        let b = Scalar::random(&mut OsRng);
        let lhs = Point::base_mul(&(a + b));
        let rhs = Point::base_mul(&a) + Point::base_mul(&b);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn identity_is_encoding_of_zero_point() {
        let identity = Point::identity();
        let from_bytes = Point::from_canonical_bytes(identity.to_bytes()).unwrap();
        assert_eq!(identity, from_bytes);
    }
}
