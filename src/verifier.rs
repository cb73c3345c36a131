use ark_bn254::{Bn254, Fq12, G1Projective};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{One, PrimeField};
use num_bigint::BigUint;

use crate::data_structures::{Proof, VerifyingKey};
use crate::field;

/// Verify a Groth16 proof against `vk` and the public inputs.
///
/// Returns `false` (rather than an error) when the input count does not
/// match the key, when an input is outside the scalar field, or when the
/// pairing-product check fails. Neither `proof` nor `inputs` is mutated, so
/// repeated calls give identical answers.
pub fn verify_proof(vk: &VerifyingKey, proof: &Proof, inputs: &[BigUint]) -> bool {
    if inputs.len() + 1 != vk.ic.len() {
        return false;
    }
    for input in inputs {
        if *input >= *field::R {
            return false;
        }
    }

    let mut vk_x: G1Projective = vk.ic[0].into_group();
    for (input, base) in inputs.iter().zip(vk.ic.iter().skip(1)) {
        vk_x += base.mul_bigint(field::fr_from_biguint(input).into_bigint());
    }

    // e(A, B) * e(-alpha, beta) * e(-vk_x, gamma) * e(-C, delta) == 1
    let qap = Bn254::multi_miller_loop(
        [
            proof.a,
            -vk.alpha_g1,
            (-vk_x).into_affine(),
            -proof.c,
        ],
        [proof.b, vk.beta_g2, vk.gamma_g2, vk.delta_g2],
    );
    match Bn254::final_exponentiation(qap) {
        Some(res) => res.0 == Fq12::one(),
        None => false,
    }
}
