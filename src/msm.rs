//! Windowed multi-scalar multiplication: `sum_i k_i * P_i` over `G1` or `G2`.
//!
//! Bases are split into chunks of `chunk_size` points and each chunk gets a
//! subset-sum table of `2^chunk_size` entries, so one table lookup per bit
//! position replaces `chunk_size` conditional additions. Two strategies are
//! provided: the standard double-and-add walk, and a "no-double" variant that
//! keeps one accumulator per bit position and consolidates with a single
//! Horner pass at the end, which wins on large inputs.
//!
//! Every entry point accepts a previous partial sum, so callers can shard the
//! input range across workers and combine the per-shard results by plain
//! group addition.

use ark_ec::{CurveGroup, Group};
use ark_ff::{BigInteger, PrimeField, Zero};

/// Chunk size used by the prover; tunable in `2..=9`.
pub const DEFAULT_CHUNK_SIZE: usize = 6;

/// Bit positions tracked per scalar: the bit length of the BN254 base field
/// modulus `q`.
const NBITS: usize = ark_bn254::Fq::MODULUS_BIT_SIZE as usize;

/// The raw scalar representation consumed by the engine.
pub type ScalarRepr<G> = <<G as Group>::ScalarField as PrimeField>::BigInt;

/// Subset-sum table over one chunk of up to `chunk_size` bases:
/// `data[v] = sum of bases[j] for every bit j set in v`.
pub struct Table<G: CurveGroup> {
    data: Vec<G>,
}

impl<G: CurveGroup> Table<G> {
    /// Build the table for one chunk. A short final chunk is padded with the
    /// identity.
    ///
    /// `data[0]` is the identity, `data[2^j]` is `bases[j]`, and every other
    /// entry is `data[u] + data[v - u]` with `u` the highest power of two
    /// `<= v`.
    pub fn new(bases: &[G::Affine], chunk_size: usize) -> Self {
        debug_assert!(bases.len() <= chunk_size);
        let mut data = Vec::with_capacity(1 << chunk_size);
        data.push(G::zero());
        let mut last_pow2 = 1usize;
        let mut nelems = 0usize;
        for v in 1..(1usize << chunk_size) {
            let entry = if v & (v - 1) == 0 {
                last_pow2 = v;
                let p = bases
                    .get(nelems)
                    .map_or_else(G::zero, |base| (*base).into());
                nelems += 1;
                p
            } else {
                data[last_pow2] + data[v - last_pow2]
            };
            data.push(entry);
        }
        Self { data }
    }

    /// Table entries, identity first.
    pub fn data(&self) -> &[G] {
        &self.data
    }

    /// Standard windowed multiplication of this chunk: walk the scalar bits
    /// from the most significant down, doubling the accumulator and adding
    /// the table entry selected by the packed bit column. `prev` is added to
    /// the result.
    pub fn mul(&self, scalars: &[ScalarRepr<G>], prev: G) -> G {
        let mut q = G::zero();
        for i in (0..chunk_msb(scalars)).rev() {
            q.double_in_place();
            let digit = chunk_digit(scalars, i);
            if digit != 0 {
                q += self.data[digit];
            }
        }
        q + prev
    }
}

/// Highest bit position used by any scalar in the chunk.
fn chunk_msb<B: BigInteger>(scalars: &[B]) -> usize {
    scalars
        .iter()
        .map(|k| k.num_bits() as usize)
        .max()
        .unwrap_or(0)
}

/// Pack bit `i` of each scalar in the chunk into a table index.
fn chunk_digit<B: BigInteger>(scalars: &[B], i: usize) -> usize {
    let mut digit = 0usize;
    for (j, k) in scalars.iter().enumerate() {
        if k.get_bit(i) {
            digit |= 1 << j;
        }
    }
    digit
}

/// `prev + sum_i k_i * P_i` with per-chunk tables built on the fly, using the
/// standard double-and-add walk.
pub fn windowed_mul<G: CurveGroup>(
    bases: &[G::Affine],
    scalars: &[ScalarRepr<G>],
    prev: G,
    chunk_size: usize,
) -> G {
    assert_eq!(bases.len(), scalars.len());
    if bases.is_empty() {
        return prev;
    }
    let mut q = G::zero();
    for (base_chunk, scalar_chunk) in bases.chunks(chunk_size).zip(scalars.chunks(chunk_size)) {
        let table = Table::<G>::new(base_chunk, chunk_size);
        q = table.mul(scalar_chunk, q);
    }
    q + prev
}

/// `prev + sum_i k_i * P_i` without intermediate doublings, with per-chunk
/// tables built on the fly.
pub fn windowed_mul_no_double<G: CurveGroup>(
    bases: &[G::Affine],
    scalars: &[ScalarRepr<G>],
    prev: G,
    chunk_size: usize,
) -> G {
    assert_eq!(bases.len(), scalars.len());
    if bases.is_empty() {
        return prev;
    }
    let mut buckets = vec![G::zero(); NBITS];
    for (base_chunk, scalar_chunk) in bases.chunks(chunk_size).zip(scalars.chunks(chunk_size)) {
        let table = Table::<G>::new(base_chunk, chunk_size);
        accumulate_chunk(&table, scalar_chunk, &mut buckets);
    }
    consolidate(&buckets) + prev
}

/// No-double multiplication against tables precomputed by the caller.
/// `scalars` is consumed `chunk_size` entries per table; a short tail is
/// treated as zero-extended.
pub fn tables_mul_no_double<G: CurveGroup>(
    tables: &[Table<G>],
    scalars: &[ScalarRepr<G>],
    prev: G,
    chunk_size: usize,
) -> G {
    if tables.is_empty() {
        return prev;
    }
    let mut buckets = vec![G::zero(); NBITS];
    for (table, scalar_chunk) in tables.iter().zip(scalars.chunks(chunk_size)) {
        accumulate_chunk(table, scalar_chunk, &mut buckets);
    }
    consolidate(&buckets) + prev
}

/// Add the chunk's table entries into the per-bit accumulators.
fn accumulate_chunk<G: CurveGroup>(
    table: &Table<G>,
    scalars: &[ScalarRepr<G>],
    buckets: &mut [G],
) {
    for i in (0..chunk_msb(scalars)).rev() {
        let digit = chunk_digit(scalars, i);
        if digit != 0 {
            buckets[i] += table.data[digit];
        }
    }
}

/// Horner pass over the per-bit accumulators:
/// `R <- 2*R + buckets[i - 1]` from the top bit down.
fn consolidate<G: CurveGroup>(buckets: &[G]) -> G {
    let mut r = buckets[NBITS - 1];
    for i in (1..NBITS).rev() {
        r.double_in_place();
        r += buckets[i - 1];
    }
    r
}
