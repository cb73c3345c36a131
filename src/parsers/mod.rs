//! Readers and writers for the artifact formats produced by the
//! circom/snarkjs toolchain.
//!
//! [`json`] covers the text formats (proving key, verification key, witness,
//! proof, public signals); [`bin`] covers the canonical binary proving key,
//! the native binary layout, and binary witnesses. This module holds the
//! affine wire codec they share.
//!
//! Wire conventions, preserved bit-for-bit from the upstream toolchain:
//! `G1` marshals to 64 bytes (`x`, `y`, each 32 bytes big-endian); `G2`
//! marshals to 128 bytes in the coordinate order `x1, x0, y1, y0` — the
//! imaginary component of each `Fq2` element comes first. An all-zero
//! encoding is the identity, and a coordinate string equal to `"1"` in the
//! decimal text formats also denotes an identity coordinate and is
//! normalized to zero before parsing.

pub mod bin;
pub mod json;

use ark_bn254::{Fq, Fq2, G1Affine, G2Affine};
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::field;

/// Parse a decimal or `0x`-prefixed hex literal.
pub(crate) fn str_to_biguint(s: &str) -> Result<BigUint> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex_digits) => BigUint::parse_bytes(hex_digits.as_bytes(), 16),
        None => BigUint::parse_bytes(s.as_bytes(), 10),
    };
    parsed.ok_or_else(|| Error::Parse(format!("invalid numeric literal: {s:?}")))
}

/// Parse a point coordinate, normalizing the `"1"` identity sentinel.
pub(crate) fn coord_from_str(s: &str) -> Result<BigUint> {
    str_to_biguint(if s == "1" { "0" } else { s })
}

pub(crate) fn fq_from_biguint(v: &BigUint) -> Result<Fq> {
    if v >= &*field::Q {
        return Err(Error::Parse(
            "coordinate exceeds the base field modulus".into(),
        ));
    }
    Ok(Fq::from_le_bytes_mod_order(&v.to_bytes_le()))
}

pub(crate) fn fq_to_biguint(v: &Fq) -> BigUint {
    BigUint::from_bytes_be(&v.into_bigint().to_bytes_be())
}

/// Build a `G1` point from affine coordinates, validating curve and subgroup
/// membership. `(0, 0)` is the identity.
pub(crate) fn g1_from_coords(x: &BigUint, y: &BigUint) -> Result<G1Affine> {
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::identity());
    }
    let p = G1Affine::new_unchecked(fq_from_biguint(x)?, fq_from_biguint(y)?);
    if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Error::InvalidPoint);
    }
    Ok(p)
}

/// Build a `G2` point from the four affine coordinates
/// `x = x0 + x1*u`, `y = y0 + y1*u`, validating curve and subgroup
/// membership. All-zero coordinates are the identity.
pub(crate) fn g2_from_coords(
    x0: &BigUint,
    x1: &BigUint,
    y0: &BigUint,
    y1: &BigUint,
) -> Result<G2Affine> {
    if x0.is_zero() && x1.is_zero() && y0.is_zero() && y1.is_zero() {
        return Ok(G2Affine::identity());
    }
    let x = Fq2::new(fq_from_biguint(x0)?, fq_from_biguint(x1)?);
    let y = Fq2::new(fq_from_biguint(y0)?, fq_from_biguint(y1)?);
    let p = G2Affine::new_unchecked(x, y);
    if !p.is_on_curve() || !p.is_in_correct_subgroup_assuming_on_curve() {
        return Err(Error::InvalidPoint);
    }
    Ok(p)
}

fn fq_to_be32(v: &Fq) -> [u8; 32] {
    let bytes = v.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Marshal a `G1` point to its 64-byte affine wire form.
pub fn g1_to_bytes(p: &G1Affine) -> [u8; 64] {
    let mut out = [0u8; 64];
    if p.infinity {
        return out;
    }
    out[..32].copy_from_slice(&fq_to_be32(&p.x));
    out[32..].copy_from_slice(&fq_to_be32(&p.y));
    out
}

/// Unmarshal a `G1` point from its 64-byte affine wire form.
pub fn g1_from_bytes(bytes: &[u8]) -> Result<G1Affine> {
    if bytes.len() != 64 {
        return Err(Error::Parse(format!(
            "G1 wire form must be 64 bytes, got {}",
            bytes.len()
        )));
    }
    let x = BigUint::from_bytes_be(&bytes[..32]);
    let y = BigUint::from_bytes_be(&bytes[32..]);
    g1_from_coords(&x, &y)
}

/// Marshal a `G2` point to its 128-byte affine wire form
/// (`x1, x0, y1, y0`).
pub fn g2_to_bytes(p: &G2Affine) -> [u8; 128] {
    let mut out = [0u8; 128];
    if p.infinity {
        return out;
    }
    out[..32].copy_from_slice(&fq_to_be32(&p.x.c1));
    out[32..64].copy_from_slice(&fq_to_be32(&p.x.c0));
    out[64..96].copy_from_slice(&fq_to_be32(&p.y.c1));
    out[96..].copy_from_slice(&fq_to_be32(&p.y.c0));
    out
}

/// Unmarshal a `G2` point from its 128-byte affine wire form.
pub fn g2_from_bytes(bytes: &[u8]) -> Result<G2Affine> {
    if bytes.len() != 128 {
        return Err(Error::Parse(format!(
            "G2 wire form must be 128 bytes, got {}",
            bytes.len()
        )));
    }
    let x1 = BigUint::from_bytes_be(&bytes[..32]);
    let x0 = BigUint::from_bytes_be(&bytes[32..64]);
    let y1 = BigUint::from_bytes_be(&bytes[64..96]);
    let y0 = BigUint::from_bytes_be(&bytes[96..]);
    g2_from_coords(&x0, &x1, &y0, &y1)
}
