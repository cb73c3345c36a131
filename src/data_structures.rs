use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use std::collections::BTreeMap;

/// One sparse QAP polynomial row: evaluation-point index to coefficient.
///
/// No zero coefficients are stored and every index is below the domain size.
/// Keys iterate in ascending order, which is also the serialization order.
pub type SparseRow = BTreeMap<usize, Fr>;

/// The witness assignment, one `Fr` per circuit variable.
/// `witness[0] = 1` by convention.
pub type Witness = Vec<Fr>;

/// A proof in the Groth16 SNARK.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof {
    /// The `A` element in `G1`.
    pub a: G1Affine,
    /// The `B` element in `G2`.
    pub b: G2Affine,
    /// The `C` element in `G1`.
    pub c: G1Affine,
}

/// A verification key in the Groth16 SNARK, as shipped in
/// `verification_key.json`.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifyingKey {
    /// The `alpha * G` element in `G1`.
    pub alpha_g1: G1Affine,
    /// The `beta * H` element in `G2`.
    pub beta_g2: G2Affine,
    /// The `gamma * H` element in `G2`.
    pub gamma_g2: G2Affine,
    /// The `delta * H` element in `G2`.
    pub delta_g2: G2Affine,
    /// The input-commitment bases; `ic.len() = n_public + 1`.
    pub ic: Vec<G1Affine>,
}

/// The prover key for the Groth16 zkSNARK, as produced by the circom/snarkjs
/// trusted setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvingKey {
    /// Total number of circuit variables, the constant one included.
    pub n_vars: usize,
    /// Number of public inputs; they occupy variable indices `1..=n_public`.
    pub n_public: usize,
    /// Size of the evaluation domain, the smallest power of two at or above
    /// the constraint count.
    pub domain_size: usize,
    /// The elements `a_i(x) * G` in `G1`, one per variable.
    pub a_query: Vec<G1Affine>,
    /// The elements `b_i(x) * G` in `G1`, one per variable.
    pub b_g1_query: Vec<G1Affine>,
    /// The elements `b_i(x) * H` in `G2`, one per variable.
    pub b_g2_query: Vec<G2Affine>,
    /// The per-variable `C` bases in `G1`. Entries `0..=n_public` are the
    /// identity in every load path.
    pub c_query: Vec<G1Affine>,
    /// The quotient-polynomial bases `x^i * Z(x) / delta * G` in `G1`. The
    /// JSON and native layouts carry `domain_size + 1` of them; the prover
    /// consumes `domain_size`.
    pub h_query: Vec<G1Affine>,
    /// The `alpha * G` element in `G1`.
    pub alpha_g1: G1Affine,
    /// The `beta * G` element in `G1`.
    pub beta_g1: G1Affine,
    /// The `delta * G` element in `G1`.
    pub delta_g1: G1Affine,
    /// The `beta * H` element in `G2`.
    pub beta_g2: G2Affine,
    /// The `delta * H` element in `G2`.
    pub delta_g2: G2Affine,
    /// Sparse `A`-side QAP rows, one per variable.
    pub pols_a: Vec<SparseRow>,
    /// Sparse `B`-side QAP rows, one per variable.
    pub pols_b: Vec<SparseRow>,
}
