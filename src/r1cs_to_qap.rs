//! Evaluate the witness against the sparse QAP rows and build the quotient
//! polynomial `H(x) = (A*B - C) / Z(x)`.
//!
//! `A` and `B` are first obtained as value tables on the evaluation domain
//! `D` of size `m`, then re-evaluated on the shifted coset `xi * D` (with
//! `xi` a primitive `2m`-th root of unity) so that the value table of `A*B`
//! on the full `2m`-point domain can be assembled without ever multiplying
//! degree-`2m` polynomials directly. The upper half of its inverse FFT is
//! exactly `H`: the `C`-side contribution vanishes on the domain and is
//! absorbed by the `C` query bases instead.

use ark_bn254::Fr;
use ark_ff::Zero;
use rayon::prelude::*;

use crate::data_structures::{ProvingKey, SparseRow, Witness};
use crate::domain::{log2_ceil, Radix2Domain};

/// Compute the `domain_size` coefficients of `H` for the given witness.
pub fn calculate_h(pk: &ProvingKey, witness: &Witness) -> Vec<Fr> {
    let m = pk.domain_size;
    debug_assert!(m.is_power_of_two());
    let coset_level = log2_ceil(m) + 1;
    let domain = Radix2Domain::new(coset_level);

    // Values of A(x) and B(x) on the evaluation domain.
    let (pol_at, pol_bt) = rayon::join(
        || eval_sparse(&pk.pols_a, witness, m),
        || eval_sparse(&pk.pols_b, witness, m),
    );

    let mut pol_as = domain.ifft(&pol_at);
    let mut pol_bs = domain.ifft(&pol_bt);

    // Shift the coefficient forms onto the coset: scale coefficient i by
    // xi^i, so the next FFT evaluates at xi * D instead of D.
    pol_as
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, c)| *c *= domain.root(coset_level, i));
    pol_bs
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, c)| *c *= domain.root(coset_level, i));

    let pol_at_odd = domain.fft(&pol_as);
    let pol_bt_odd = domain.fft(&pol_bs);

    // Interleave into the value table of A*B on the 2m-th roots of unity:
    // even slots hold values on D, odd slots values on xi * D.
    let mut pol_abt = vec![Fr::zero(); 2 * m];
    pol_abt
        .par_chunks_mut(2)
        .enumerate()
        .for_each(|(i, pair)| {
            pair[0] = pol_at[i] * pol_bt[i];
            pair[1] = pol_at_odd[i] * pol_bt_odd[i];
        });

    let h_full = domain.ifft(&pol_abt);
    h_full[m..].to_vec()
}

/// `out[j] = sum_i w[i] * rows[i][j]`, iterating only the stored entries.
fn eval_sparse(rows: &[SparseRow], witness: &Witness, m: usize) -> Vec<Fr> {
    let mut out = vec![Fr::zero(); m];
    for (row, wi) in rows.iter().zip(witness) {
        if wi.is_zero() {
            continue;
        }
        for (&j, coeff) in row {
            out[j] += *wi * coeff;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly;
    use ark_bn254::{G1Affine, G2Affine};
    use ark_std::{test_rng, UniformRand};
    use std::collections::BTreeMap;

    fn sparse_pk(m: usize, pols_a: Vec<SparseRow>, pols_b: Vec<SparseRow>) -> ProvingKey {
        let n_vars = pols_a.len();
        ProvingKey {
            n_vars,
            n_public: 0,
            domain_size: m,
            a_query: Vec::new(),
            b_g1_query: Vec::new(),
            b_g2_query: Vec::new(),
            c_query: Vec::new(),
            h_query: Vec::new(),
            alpha_g1: G1Affine::identity(),
            beta_g1: G1Affine::identity(),
            delta_g1: G1Affine::identity(),
            beta_g2: G2Affine::identity(),
            delta_g2: G2Affine::identity(),
            pols_a,
            pols_b,
        }
    }

    fn random_rows(n_vars: usize, m: usize, rng: &mut impl rand::Rng) -> Vec<SparseRow> {
        (0..n_vars)
            .map(|_| {
                let mut row = BTreeMap::new();
                for j in 0..m {
                    if rng.gen_bool(0.5) {
                        row.insert(j, Fr::rand(rng));
                    }
                }
                row
            })
            .collect()
    }

    #[test]
    fn h_is_the_upper_half_of_ab() {
        let rng = &mut test_rng();
        let m = 8usize;
        let n_vars = 5usize;
        let pk = sparse_pk(m, random_rows(n_vars, m, rng), random_rows(n_vars, m, rng));
        let witness: Witness = (0..n_vars).map(|_| Fr::rand(rng)).collect();

        let h = calculate_h(&pk, &witness);
        assert_eq!(h.len(), m);

        // Directly: interpolate A and B, multiply, and read off the
        // coefficients of x^m .. x^(2m-1).
        let domain = Radix2Domain::new(log2_ceil(m));
        let a_vals = eval_sparse(&pk.pols_a, &witness, m);
        let b_vals = eval_sparse(&pk.pols_b, &witness, m);
        let ab = poly::poly_mul(&domain.ifft(&a_vals), &domain.ifft(&b_vals));

        let mut expected = ab[m..].to_vec();
        expected.resize(m, Fr::zero());
        assert_eq!(h, expected);
    }

    #[test]
    fn h_handles_a_one_constraint_domain() {
        let rng = &mut test_rng();
        let mut row = BTreeMap::new();
        row.insert(0usize, Fr::rand(rng));
        let pk = sparse_pk(1, vec![row.clone()], vec![row]);
        let witness: Witness = vec![Fr::rand(rng)];
        assert_eq!(calculate_h(&pk, &witness).len(), 1);
    }

    #[test]
    fn sparse_evaluation_sums_rows() {
        let rng = &mut test_rng();
        let w0 = Fr::rand(rng);
        let w1 = Fr::rand(rng);
        let c0 = Fr::rand(rng);
        let c1 = Fr::rand(rng);

        let mut r0 = BTreeMap::new();
        r0.insert(1usize, c0);
        let mut r1 = BTreeMap::new();
        r1.insert(1usize, c1);

        let vals = eval_sparse(&[r0, r1], &vec![w0, w1], 4);
        assert!(vals[0].is_zero());
        assert_eq!(vals[1], w0 * c0 + w1 * c1);
        assert!(vals[2].is_zero() && vals[3].is_zero());
    }
}
