//! Binary proving-key and witness layouts.
//!
//! Two proving-key layouts share the same section structure: a 12-byte
//! header (`nVars`, `nPublic`, `domainSize` as little-endian `u32`), a
//! 28-byte offset table (`polsA`, `polsB`, then `pointsA`, `pointsB1`,
//! `pointsB2`, `pointsC`, `pointsHExps`), the five `vk_*` points, and then
//! the sections themselves. Every section start is validated against the
//! running cursor.
//!
//! The canonical layout (emitted by the upstream toolchain) stores field
//! elements in Montgomery form with little-endian bytes; polynomial
//! coefficients are encoded modulo `r`, point coordinates modulo `q`, and a
//! decoded coordinate equal to `1` marks an identity coordinate. The native
//! layout stores everything in normal form, big-endian, and exists purely to
//! make reloading faster; [`pk_to_bin`] produces it.
//!
//! Both layouts omit the first `n_public + 1` points of the `C` query; the
//! readers substitute the identity, matching the in-memory invariant.

use std::io::Read;

use ark_bn254::G1Affine;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

use crate::data_structures::{ProvingKey, SparseRow, Witness};
use crate::error::{Error, Result};
use crate::field::{self, Fr};

use super::{g1_from_bytes, g1_from_coords, g1_to_bytes, g2_from_bytes, g2_from_coords, g2_to_bytes};

/// `(2^256)^-1 mod q`, the factor that undoes the Montgomery encoding of
/// point coordinates.
static MONT_INV_Q: Lazy<BigUint> = Lazy::new(|| {
    (BigUint::one() << 256u32).modpow(&(&*field::Q - 2u32), &field::Q)
});

/// `(2^256)^-1 mod r`, for polynomial coefficients.
static MONT_INV_R: Lazy<BigUint> = Lazy::new(|| {
    (BigUint::one() << 256u32).modpow(&(&*field::R - 2u32), &field::R)
});

fn read_bytes<const N: usize>(reader: &mut impl Read, cursor: &mut usize) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    *cursor += N;
    Ok(buf)
}

fn read_u32(reader: &mut impl Read, cursor: &mut usize) -> Result<usize> {
    let buf = read_bytes::<4>(reader, cursor)?;
    Ok(u32::from_le_bytes(buf) as usize)
}

fn check_offset(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::UnexpectedOffset { expected, actual });
    }
    Ok(())
}

fn mont_coord(bytes: &[u8], modulus: &BigUint, inv: &BigUint) -> BigUint {
    let v = (BigUint::from_bytes_le(bytes) * inv) % modulus;
    // a decoded value of exactly 1 is the identity sentinel
    if v.is_one() {
        BigUint::zero()
    } else {
        v
    }
}

fn g1_from_mont(bytes: &[u8; 64]) -> Result<G1Affine> {
    let x = mont_coord(&bytes[..32], &field::Q, &MONT_INV_Q);
    let y = mont_coord(&bytes[32..], &field::Q, &MONT_INV_Q);
    g1_from_coords(&x, &y)
}

fn g2_from_mont(bytes: &[u8; 128]) -> Result<ark_bn254::G2Affine> {
    // stored as (x0, x1, y0, y1)
    let x0 = mont_coord(&bytes[..32], &field::Q, &MONT_INV_Q);
    let x1 = mont_coord(&bytes[32..64], &field::Q, &MONT_INV_Q);
    let y0 = mont_coord(&bytes[64..96], &field::Q, &MONT_INV_Q);
    let y1 = mont_coord(&bytes[96..], &field::Q, &MONT_INV_Q);
    g2_from_coords(&x0, &x1, &y0, &y1)
}

struct Header {
    n_vars: usize,
    n_public: usize,
    domain_size: usize,
    p_pols_a: usize,
    p_pols_b: usize,
    p_points_a: usize,
    p_points_b1: usize,
    p_points_b2: usize,
    p_points_c: usize,
    p_points_h_exps: usize,
}

fn read_header(reader: &mut impl Read, cursor: &mut usize) -> Result<Header> {
    Ok(Header {
        n_vars: read_u32(reader, cursor)?,
        n_public: read_u32(reader, cursor)?,
        domain_size: read_u32(reader, cursor)?,
        p_pols_a: read_u32(reader, cursor)?,
        p_pols_b: read_u32(reader, cursor)?,
        p_points_a: read_u32(reader, cursor)?,
        p_points_b1: read_u32(reader, cursor)?,
        p_points_b2: read_u32(reader, cursor)?,
        p_points_c: read_u32(reader, cursor)?,
        p_points_h_exps: read_u32(reader, cursor)?,
    })
}

fn read_rows(
    reader: &mut impl Read,
    cursor: &mut usize,
    n_vars: usize,
    decode: impl Fn(&[u8; 32]) -> Fr,
) -> Result<Vec<SparseRow>> {
    let mut rows = Vec::with_capacity(n_vars);
    for _ in 0..n_vars {
        let n_keys = read_u32(reader, cursor)?;
        let mut row = SparseRow::new();
        for _ in 0..n_keys {
            let key = read_u32(reader, cursor)?;
            let value = read_bytes::<32>(reader, cursor)?;
            row.insert(key, decode(&value));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Parse the canonical binary `proving_key.bin` (Montgomery form,
/// little-endian).
pub fn parse_pk_bin(reader: &mut impl Read) -> Result<ProvingKey> {
    let mut cursor = 0usize;
    let header = read_header(reader, &mut cursor)?;

    let alpha_g1 = g1_from_mont(&read_bytes(reader, &mut cursor)?)?;
    let beta_g1 = g1_from_mont(&read_bytes(reader, &mut cursor)?)?;
    let delta_g1 = g1_from_mont(&read_bytes(reader, &mut cursor)?)?;
    let beta_g2 = g2_from_mont(&read_bytes(reader, &mut cursor)?)?;
    let delta_g2 = g2_from_mont(&read_bytes(reader, &mut cursor)?)?;

    check_offset(header.p_pols_a, cursor)?;
    let mont_fr =
        |b: &[u8; 32]| field::fr_from_biguint(&((BigUint::from_bytes_le(b) * &*MONT_INV_R) % &*field::R));
    let pols_a = read_rows(reader, &mut cursor, header.n_vars, mont_fr)?;
    check_offset(header.p_pols_b, cursor)?;
    let pols_b = read_rows(reader, &mut cursor, header.n_vars, mont_fr)?;

    check_offset(header.p_points_a, cursor)?;
    let mut a_query = Vec::with_capacity(header.n_vars);
    for _ in 0..header.n_vars {
        a_query.push(g1_from_mont(&read_bytes(reader, &mut cursor)?)?);
    }
    check_offset(header.p_points_b1, cursor)?;
    let mut b_g1_query = Vec::with_capacity(header.n_vars);
    for _ in 0..header.n_vars {
        b_g1_query.push(g1_from_mont(&read_bytes(reader, &mut cursor)?)?);
    }
    check_offset(header.p_points_b2, cursor)?;
    let mut b_g2_query = Vec::with_capacity(header.n_vars);
    for _ in 0..header.n_vars {
        b_g2_query.push(g2_from_mont(&read_bytes(reader, &mut cursor)?)?);
    }

    check_offset(header.p_points_c, cursor)?;
    let mut c_query = vec![G1Affine::identity(); header.n_public + 1];
    for _ in header.n_public + 1..header.n_vars {
        c_query.push(g1_from_mont(&read_bytes(reader, &mut cursor)?)?);
    }

    check_offset(header.p_points_h_exps, cursor)?;
    let mut h_query = Vec::with_capacity(header.domain_size);
    for _ in 0..header.domain_size {
        h_query.push(g1_from_mont(&read_bytes(reader, &mut cursor)?)?);
    }

    Ok(ProvingKey {
        n_vars: header.n_vars,
        n_public: header.n_public,
        domain_size: header.domain_size,
        a_query,
        b_g1_query,
        b_g2_query,
        c_query,
        h_query,
        alpha_g1,
        beta_g1,
        delta_g1,
        beta_g2,
        delta_g2,
        pols_a,
        pols_b,
    })
}

/// Parse the native binary layout written by [`pk_to_bin`].
pub fn parse_pk_native_bin(reader: &mut impl Read) -> Result<ProvingKey> {
    let mut cursor = 0usize;
    let header = read_header(reader, &mut cursor)?;

    let alpha_g1 = g1_from_bytes(&read_bytes::<64>(reader, &mut cursor)?)?;
    let beta_g1 = g1_from_bytes(&read_bytes::<64>(reader, &mut cursor)?)?;
    let delta_g1 = g1_from_bytes(&read_bytes::<64>(reader, &mut cursor)?)?;
    let beta_g2 = g2_from_bytes(&read_bytes::<128>(reader, &mut cursor)?)?;
    let delta_g2 = g2_from_bytes(&read_bytes::<128>(reader, &mut cursor)?)?;

    check_offset(header.p_pols_a, cursor)?;
    let be_fr = |b: &[u8; 32]| field::fr_from_biguint(&BigUint::from_bytes_be(b));
    let pols_a = read_rows(reader, &mut cursor, header.n_vars, be_fr)?;
    check_offset(header.p_pols_b, cursor)?;
    let pols_b = read_rows(reader, &mut cursor, header.n_vars, be_fr)?;

    check_offset(header.p_points_a, cursor)?;
    let mut a_query = Vec::with_capacity(header.n_vars);
    for _ in 0..header.n_vars {
        a_query.push(g1_from_bytes(&read_bytes::<64>(reader, &mut cursor)?)?);
    }
    check_offset(header.p_points_b1, cursor)?;
    let mut b_g1_query = Vec::with_capacity(header.n_vars);
    for _ in 0..header.n_vars {
        b_g1_query.push(g1_from_bytes(&read_bytes::<64>(reader, &mut cursor)?)?);
    }
    check_offset(header.p_points_b2, cursor)?;
    let mut b_g2_query = Vec::with_capacity(header.n_vars);
    for _ in 0..header.n_vars {
        b_g2_query.push(g2_from_bytes(&read_bytes::<128>(reader, &mut cursor)?)?);
    }

    check_offset(header.p_points_c, cursor)?;
    let mut c_query = vec![G1Affine::identity(); header.n_public + 1];
    for _ in header.n_public + 1..header.n_vars {
        c_query.push(g1_from_bytes(&read_bytes::<64>(reader, &mut cursor)?)?);
    }

    check_offset(header.p_points_h_exps, cursor)?;
    let mut h_query = Vec::with_capacity(header.domain_size + 1);
    for _ in 0..header.domain_size + 1 {
        h_query.push(g1_from_bytes(&read_bytes::<64>(reader, &mut cursor)?)?);
    }

    Ok(ProvingKey {
        n_vars: header.n_vars,
        n_public: header.n_public,
        domain_size: header.domain_size,
        a_query,
        b_g1_query,
        b_g2_query,
        c_query,
        h_query,
        alpha_g1,
        beta_g1,
        delta_g1,
        beta_g2,
        delta_g2,
        pols_a,
        pols_b,
    })
}

fn fr_to_be32(v: &Fr) -> [u8; 32] {
    let bytes = field::biguint_from_fr(v).to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Serialize a proving key into the native binary layout.
///
/// The key must carry the full JSON complement of `domain_size + 1`
/// H-exponent points.
pub fn pk_to_bin(pk: &ProvingKey) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offset = 0usize;

    for v in [pk.n_vars, pk.n_public, pk.domain_size] {
        out.extend_from_slice(&(v as u32).to_le_bytes());
    }
    offset += 12;

    // reserve the offset table: polsA, polsB, A, B1, B2, C, HExps
    let table_at = out.len();
    out.extend_from_slice(&[0u8; 28]);
    offset += 28;

    out.extend_from_slice(&g1_to_bytes(&pk.alpha_g1));
    out.extend_from_slice(&g1_to_bytes(&pk.beta_g1));
    out.extend_from_slice(&g1_to_bytes(&pk.delta_g1));
    out.extend_from_slice(&g2_to_bytes(&pk.beta_g2));
    out.extend_from_slice(&g2_to_bytes(&pk.delta_g2));
    offset += 448;

    let mut offsets = [0u32; 7];

    for (slot, rows) in [(0usize, &pk.pols_a), (1, &pk.pols_b)] {
        offsets[slot] = offset as u32;
        for row in rows.iter() {
            out.extend_from_slice(&(row.len() as u32).to_le_bytes());
            offset += 4;
            for (&key, value) in row {
                out.extend_from_slice(&(key as u32).to_le_bytes());
                out.extend_from_slice(&fr_to_be32(value));
                offset += 36;
            }
        }
    }

    offsets[2] = offset as u32;
    for p in &pk.a_query {
        out.extend_from_slice(&g1_to_bytes(p));
        offset += 64;
    }
    offsets[3] = offset as u32;
    for p in &pk.b_g1_query {
        out.extend_from_slice(&g1_to_bytes(p));
        offset += 64;
    }
    offsets[4] = offset as u32;
    for p in &pk.b_g2_query {
        out.extend_from_slice(&g2_to_bytes(p));
        offset += 128;
    }
    offsets[5] = offset as u32;
    for p in &pk.c_query[pk.n_public + 1..] {
        out.extend_from_slice(&g1_to_bytes(p));
        offset += 64;
    }
    offsets[6] = offset as u32;
    for p in &pk.h_query[..=pk.domain_size] {
        out.extend_from_slice(&g1_to_bytes(p));
        offset += 64;
    }

    for (i, o) in offsets.iter().enumerate() {
        out[table_at + 4 * i..table_at + 4 * (i + 1)].copy_from_slice(&o.to_le_bytes());
    }
    out
}

/// Parse `witness.bin`: a concatenation of 32-byte little-endian field
/// elements modulo `r`.
pub fn parse_witness_bin(reader: &mut impl Read) -> Result<Witness> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.len() % 32 != 0 {
        return Err(Error::Parse(format!(
            "witness length {} is not a multiple of 32 bytes",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(32)
        .map(|chunk| <Fr as ark_ff::PrimeField>::from_le_bytes_mod_order(chunk))
        .collect())
}
