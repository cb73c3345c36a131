use ark_bn254::{Fr, G1Projective, G2Projective};
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{PrimeField, Zero};
use ark_std::{end_timer, start_timer};
use rand::Rng;
use rayon::prelude::*;

use crate::data_structures::{Proof, ProvingKey, Witness};
use crate::error::{Error, Result};
use crate::{field, msm, r1cs_to_qap};

/// Create a Groth16 proof that is zero-knowledge, sampling the blinding
/// scalars `r` and `s` from `rng`.
///
/// Returns the proof together with the public signals
/// `witness[1..=n_public]`.
#[inline]
pub fn create_random_proof<R: Rng>(
    pk: &ProvingKey,
    witness: &Witness,
    rng: &mut R,
) -> Result<(Proof, Vec<Fr>)> {
    let r = field::rand_scalar(rng)?;
    let s = field::rand_scalar(rng)?;

    create_proof(pk, witness, r, s)
}

/// Create a Groth16 proof using the blinding scalars `r` and `s`.
pub fn create_proof(pk: &ProvingKey, witness: &Witness, r: Fr, s: Fr) -> Result<(Proof, Vec<Fr>)> {
    if witness.len() != pk.n_vars {
        return Err(Error::SizeMismatch {
            expected: pk.n_vars,
            actual: witness.len(),
        });
    }

    let prover_time = start_timer!(|| "Groth16::Prover");
    let scalars: Vec<_> = witness.par_iter().map(|w| w.into_bigint()).collect();

    // Witness MSMs: each shard contributes a partial sum to all four
    // accumulators; partials combine by group addition, so any split of the
    // variable range yields the same points.
    let msm_time = start_timer!(|| "Witness MSMs");
    let parts: Vec<_> = shard_ranges(pk.n_vars, rayon::current_num_threads())
        .into_par_iter()
        .map(|(start, end)| {
            let a = msm::windowed_mul_no_double(
                &pk.a_query[start..end],
                &scalars[start..end],
                G1Projective::zero(),
                msm::DEFAULT_CHUNK_SIZE,
            );
            let b = msm::windowed_mul_no_double(
                &pk.b_g2_query[start..end],
                &scalars[start..end],
                G2Projective::zero(),
                msm::DEFAULT_CHUNK_SIZE,
            );
            let b1 = msm::windowed_mul_no_double(
                &pk.b_g1_query[start..end],
                &scalars[start..end],
                G1Projective::zero(),
                msm::DEFAULT_CHUNK_SIZE,
            );
            // The public-input prefix of the C query is the identity; skip it.
            let c = if end > pk.n_public + 1 {
                let lo = start.max(pk.n_public + 1);
                msm::windowed_mul_no_double(
                    &pk.c_query[lo..end],
                    &scalars[lo..end],
                    G1Projective::zero(),
                    msm::DEFAULT_CHUNK_SIZE,
                )
            } else {
                G1Projective::zero()
            };
            (a, b, b1, c)
        })
        .collect();

    // Shard reduction happens on the orchestrating thread, after the barrier.
    let mut g_a = G1Projective::zero();
    let mut g_b = G2Projective::zero();
    let mut g_b1 = G1Projective::zero();
    let mut g_c = G1Projective::zero();
    for (a, b, b1, c) in parts {
        g_a += a;
        g_b += b;
        g_b1 += b1;
        g_c += c;
    }
    end_timer!(msm_time);

    let h_time = start_timer!(|| "Quotient polynomial");
    let h = r1cs_to_qap::calculate_h(pk, witness);
    end_timer!(h_time);

    let h_msm_time = start_timer!(|| "H MSM");
    let h_scalars: Vec<_> = h.par_iter().map(|c| c.into_bigint()).collect();
    let g_h = shard_ranges(h.len(), rayon::current_num_threads())
        .into_par_iter()
        .map(|(start, end)| {
            msm::windowed_mul_no_double(
                &pk.h_query[start..end],
                &h_scalars[start..end],
                G1Projective::zero(),
                msm::DEFAULT_CHUNK_SIZE,
            )
        })
        .collect::<Vec<_>>()
        .into_iter()
        .fold(G1Projective::zero(), |acc, p| acc + p);
    end_timer!(h_msm_time);

    // Blinding terms.
    g_a += &pk.alpha_g1;
    g_a += pk.delta_g1.mul_bigint(r.into_bigint());

    g_b += &pk.beta_g2;
    g_b += pk.delta_g2.mul_bigint(s.into_bigint());

    g_b1 += &pk.beta_g1;
    g_b1 += pk.delta_g1.mul_bigint(s.into_bigint());

    g_c += g_h;
    g_c += g_a.mul_bigint(s.into_bigint());
    g_c += g_b1.mul_bigint(r.into_bigint());
    g_c += pk.delta_g1.mul_bigint((-(r * s)).into_bigint());
    end_timer!(prover_time);

    let proof = Proof {
        a: g_a.into_affine(),
        b: g_b.into_affine(),
        c: g_c.into_affine(),
    };
    let public_signals = witness[1..=pk.n_public].to_vec();

    Ok((proof, public_signals))
}

/// Split `0..n` into `parts` contiguous ranges, one per worker.
fn shard_ranges(n: usize, parts: usize) -> Vec<(usize, usize)> {
    (0..parts)
        .map(|i| (i * n / parts, (i + 1) * n / parts))
        .collect()
}
