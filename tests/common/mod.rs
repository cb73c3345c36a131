//! Shared test fixtures: a tiny R1CS described directly by its sparse QAP
//! rows, and a circuit-specific setup that turns it into a valid
//! `(ProvingKey, VerifyingKey)` pair from random toxic waste.

use ark_bn254::{Fr, G1Projective, G2Projective};
use ark_ec::{CurveGroup, Group};
use ark_ff::{Field, One, UniformRand, Zero};
use rand::Rng;

use circom_groth16::domain::Radix2Domain;
use circom_groth16::{ProvingKey, SparseRow, VerifyingKey, Witness};

/// A satisfied R1CS instance: sparse rows per variable plus the witness.
pub struct TestCircuit {
    pub pols_a: Vec<SparseRow>,
    pub pols_b: Vec<SparseRow>,
    pub pols_c: Vec<SparseRow>,
    pub n_public: usize,
    pub witness: Witness,
}

impl TestCircuit {
    /// A product circuit over variables `[1, out, a, b, e_0, ..]` with one
    /// public output:
    ///
    /// ```text
    /// constraint 0:     a * b = out
    /// constraint 1:     b * 1 = b
    /// constraint 2+k: e_k * 1 = e_k
    /// ```
    ///
    /// The `e_k` are extra witness variables with random values, used to
    /// grow the domain and give every query real work.
    pub fn product(a: Fr, b: Fr, extra: usize, rng: &mut impl Rng) -> Self {
        let n_vars = 4 + extra;
        let mut pols_a = vec![SparseRow::new(); n_vars];
        let mut pols_b = vec![SparseRow::new(); n_vars];
        let mut pols_c = vec![SparseRow::new(); n_vars];

        pols_a[2].insert(0, Fr::one());
        pols_b[3].insert(0, Fr::one());
        pols_c[1].insert(0, Fr::one());

        pols_a[3].insert(1, Fr::one());
        pols_b[0].insert(1, Fr::one());
        pols_c[3].insert(1, Fr::one());

        for k in 0..extra {
            pols_a[4 + k].insert(2 + k, Fr::one());
            pols_b[0].insert(2 + k, Fr::one());
            pols_c[4 + k].insert(2 + k, Fr::one());
        }

        let mut witness = vec![Fr::one(), a * b, a, b];
        witness.extend((0..extra).map(|_| Fr::rand(rng)));

        Self {
            pols_a,
            pols_b,
            pols_c,
            n_public: 1,
            witness,
        }
    }

    pub fn n_constraints(&self) -> usize {
        self.pols_a
            .iter()
            .chain(&self.pols_b)
            .chain(&self.pols_c)
            .flat_map(|row| row.keys())
            .max()
            .map_or(0, |j| j + 1)
    }

    /// Run a circuit-specific setup with fresh toxic waste, evaluating every
    /// QAP polynomial at a random point `tau` through the Lagrange basis of
    /// the evaluation domain.
    pub fn setup(&self, rng: &mut impl Rng) -> (ProvingKey, VerifyingKey) {
        let n_vars = self.pols_a.len();
        let m = self.n_constraints().next_power_of_two();
        let level = m.trailing_zeros() as usize;

        let tau = Fr::rand(rng);
        let alpha = Fr::rand(rng);
        let beta = Fr::rand(rng);
        let gamma = Fr::rand(rng);
        let delta = Fr::rand(rng);
        let gamma_inv = gamma.inverse().unwrap();
        let delta_inv = delta.inverse().unwrap();

        // Lagrange basis at tau: u_j(tau) = Z(tau) * w^j / (m * (tau - w^j)).
        let domain = Radix2Domain::new(level);
        let zt = tau.pow([m as u64]) - Fr::one();
        let m_inv = Fr::from(m as u64).inverse().unwrap();
        let u: Vec<Fr> = (0..m)
            .map(|j| {
                let wj = domain.root(level, j);
                zt * wj * m_inv * (tau - wj).inverse().unwrap()
            })
            .collect();

        let eval = |row: &SparseRow| {
            row.iter()
                .fold(Fr::zero(), |acc, (&j, coeff)| acc + u[j] * coeff)
        };
        let a_t: Vec<Fr> = self.pols_a.iter().map(eval).collect();
        let b_t: Vec<Fr> = self.pols_b.iter().map(eval).collect();
        let c_t: Vec<Fr> = self.pols_c.iter().map(eval).collect();

        let g1 = G1Projective::generator();
        let g2 = G2Projective::generator();

        let a_query = a_t.iter().map(|v| (g1 * *v).into_affine()).collect();
        let b_g1_query = b_t.iter().map(|v| (g1 * *v).into_affine()).collect();
        let b_g2_query = b_t.iter().map(|v| (g2 * *v).into_affine()).collect();

        let lc = |i: usize| beta * a_t[i] + alpha * b_t[i] + c_t[i];
        let c_query = (0..n_vars)
            .map(|i| {
                if i <= self.n_public {
                    G1Projective::zero()
                } else {
                    g1 * (lc(i) * delta_inv)
                }
                .into_affine()
            })
            .collect();
        let ic = (0..=self.n_public)
            .map(|i| (g1 * (lc(i) * gamma_inv)).into_affine())
            .collect();

        let h_query = (0..=m)
            .map(|j| (g1 * (tau.pow([j as u64]) * zt * delta_inv)).into_affine())
            .collect();

        let pk = ProvingKey {
            n_vars,
            n_public: self.n_public,
            domain_size: m,
            a_query,
            b_g1_query,
            b_g2_query,
            c_query,
            h_query,
            alpha_g1: (g1 * alpha).into_affine(),
            beta_g1: (g1 * beta).into_affine(),
            delta_g1: (g1 * delta).into_affine(),
            beta_g2: (g2 * beta).into_affine(),
            delta_g2: (g2 * delta).into_affine(),
            pols_a: self.pols_a.clone(),
            pols_b: self.pols_b.clone(),
        };
        let vk = VerifyingKey {
            alpha_g1: pk.alpha_g1,
            beta_g2: pk.beta_g2,
            gamma_g2: (g2 * gamma).into_affine(),
            delta_g2: pk.delta_g2,
            ic,
        };
        (pk, vk)
    }
}
