//! The snarkjs JSON artifact formats.
//!
//! Points are arrays of decimal (or `0x`-hex) coordinate strings with a
//! trailing projective coordinate; `G2` coordinates are nested pairs stored
//! as `[[x0, x1], [y0, y1]]`. Sparse polynomial rows map decimal key strings
//! to decimal value strings.

use ark_bn254::{Fr, G1Affine, G2Affine};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data_structures::{Proof, ProvingKey, SparseRow, VerifyingKey, Witness};
use crate::error::{Error, Result};
use crate::field;

use super::{coord_from_str, fq_to_biguint, g1_to_bytes, g2_to_bytes, str_to_biguint};

/// `proving_key.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProvingKeyJson {
    /// `G1` points of the `A` query.
    #[serde(rename = "A")]
    pub a: Vec<Vec<String>>,
    /// `G1` points of the `B` query.
    #[serde(rename = "B1")]
    pub b1: Vec<Vec<String>>,
    /// `G2` points of the `B` query.
    #[serde(rename = "B2")]
    pub b2: Vec<Vec<Vec<String>>>,
    /// `G1` points of the `C` query.
    #[serde(rename = "C")]
    pub c: Vec<Vec<String>>,
    /// Total number of variables.
    #[serde(rename = "nVars")]
    pub n_vars: usize,
    /// Number of public inputs.
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    /// `alpha * G` in `G1`.
    pub vk_alfa_1: Vec<String>,
    /// `beta * G` in `G1`.
    pub vk_beta_1: Vec<String>,
    /// `delta * G` in `G1`.
    pub vk_delta_1: Vec<String>,
    /// `beta * H` in `G2`.
    pub vk_beta_2: Vec<Vec<String>>,
    /// `delta * H` in `G2`.
    pub vk_delta_2: Vec<Vec<String>>,
    /// `G1` points of the `H` query, `domainSize + 1` of them.
    #[serde(rename = "hExps")]
    pub h_exps: Vec<Vec<String>>,
    /// Evaluation domain size.
    #[serde(rename = "domainSize")]
    pub domain_size: usize,
    /// Sparse `A`-side rows.
    #[serde(rename = "polsA")]
    pub pols_a: Vec<BTreeMap<String, String>>,
    /// Sparse `B`-side rows.
    #[serde(rename = "polsB")]
    pub pols_b: Vec<BTreeMap<String, String>>,
}

/// `verification_key.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyingKeyJson {
    /// `alpha * G` in `G1`.
    pub vk_alfa_1: Vec<String>,
    /// `beta * H` in `G2`.
    pub vk_beta_2: Vec<Vec<String>>,
    /// `gamma * H` in `G2`.
    pub vk_gamma_2: Vec<Vec<String>>,
    /// `delta * H` in `G2`.
    pub vk_delta_2: Vec<Vec<String>>,
    /// Input-commitment bases in `G1`.
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
}

/// `proof.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofJson {
    /// `A` as `[x, y, "1"]`.
    pub pi_a: Vec<String>,
    /// `B` as `[[x0, x1], [y0, y1], ["1", "0"]]`.
    pub pi_b: Vec<Vec<String>>,
    /// `C` as `[x, y, "1"]`.
    pub pi_c: Vec<String>,
    /// Always `"groth"`.
    pub protocol: String,
}

fn g1_from_strings(coords: &[String]) -> Result<G1Affine> {
    if coords.len() <= 2 {
        return Err(Error::Parse("not enough data for a G1 point".into()));
    }
    let x = coord_from_str(&coords[0])?;
    let y = coord_from_str(&coords[1])?;
    super::g1_from_coords(&x, &y)
}

fn g2_from_strings(coords: &[Vec<String>]) -> Result<G2Affine> {
    if coords.len() <= 2 {
        return Err(Error::Parse("not enough data for a G2 point".into()));
    }
    let pair = |p: &[String]| -> Result<(BigUint, BigUint)> {
        if p.len() != 2 {
            return Err(Error::Parse("G2 coordinate is not a pair".into()));
        }
        Ok((coord_from_str(&p[0])?, coord_from_str(&p[1])?))
    };
    let (x0, x1) = pair(&coords[0])?;
    let (y0, y1) = pair(&coords[1])?;
    super::g2_from_coords(&x0, &x1, &y0, &y1)
}

fn g1_array_from_strings(points: &[Vec<String>]) -> Result<Vec<G1Affine>> {
    points.iter().map(|p| g1_from_strings(p)).collect()
}

fn g2_array_from_strings(points: &[Vec<Vec<String>>]) -> Result<Vec<G2Affine>> {
    points.iter().map(|p| g2_from_strings(p)).collect()
}

fn g1_to_strings(p: &G1Affine) -> Vec<String> {
    if p.infinity {
        return vec!["0".into(), "1".into(), "0".into()];
    }
    vec![
        fq_to_biguint(&p.x).to_string(),
        fq_to_biguint(&p.y).to_string(),
        "1".into(),
    ]
}

fn g2_to_strings(p: &G2Affine) -> Vec<Vec<String>> {
    if p.infinity {
        return vec![
            vec!["0".into(), "0".into()],
            vec!["1".into(), "0".into()],
            vec!["0".into(), "0".into()],
        ];
    }
    vec![
        vec![
            fq_to_biguint(&p.x.c0).to_string(),
            fq_to_biguint(&p.x.c1).to_string(),
        ],
        vec![
            fq_to_biguint(&p.y.c0).to_string(),
            fq_to_biguint(&p.y.c1).to_string(),
        ],
        vec!["1".into(), "0".into()],
    ]
}

fn rows_from_strings(rows: &[BTreeMap<String, String>]) -> Result<Vec<SparseRow>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(key, value)| {
                    let j: usize = key
                        .parse()
                        .map_err(|_| Error::Parse(format!("invalid row index: {key:?}")))?;
                    Ok((j, field::fr_from_biguint(&str_to_biguint(value)?)))
                })
                .collect()
        })
        .collect()
}

fn rows_to_strings(rows: &[SparseRow]) -> Vec<BTreeMap<String, String>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(j, v)| (j.to_string(), field::biguint_from_fr(v).to_string()))
                .collect()
        })
        .collect()
}

/// Parse `proving_key.json`.
pub fn parse_pk(json: &[u8]) -> Result<ProvingKey> {
    let pk: ProvingKeyJson = serde_json::from_slice(json)?;
    pk_from_json(&pk)
}

/// Convert the JSON representation into a [`ProvingKey`].
pub fn pk_from_json(pk: &ProvingKeyJson) -> Result<ProvingKey> {
    Ok(ProvingKey {
        n_vars: pk.n_vars,
        n_public: pk.n_public,
        domain_size: pk.domain_size,
        a_query: g1_array_from_strings(&pk.a)?,
        b_g1_query: g1_array_from_strings(&pk.b1)?,
        b_g2_query: g2_array_from_strings(&pk.b2)?,
        c_query: g1_array_from_strings(&pk.c)?,
        h_query: g1_array_from_strings(&pk.h_exps)?,
        alpha_g1: g1_from_strings(&pk.vk_alfa_1)?,
        beta_g1: g1_from_strings(&pk.vk_beta_1)?,
        delta_g1: g1_from_strings(&pk.vk_delta_1)?,
        beta_g2: g2_from_strings(&pk.vk_beta_2)?,
        delta_g2: g2_from_strings(&pk.vk_delta_2)?,
        pols_a: rows_from_strings(&pk.pols_a)?,
        pols_b: rows_from_strings(&pk.pols_b)?,
    })
}

/// Render a [`ProvingKey`] back into its JSON representation.
pub fn pk_to_json(pk: &ProvingKey) -> ProvingKeyJson {
    ProvingKeyJson {
        a: pk.a_query.iter().map(g1_to_strings).collect(),
        b1: pk.b_g1_query.iter().map(g1_to_strings).collect(),
        b2: pk.b_g2_query.iter().map(g2_to_strings).collect(),
        c: pk.c_query.iter().map(g1_to_strings).collect(),
        n_vars: pk.n_vars,
        n_public: pk.n_public,
        vk_alfa_1: g1_to_strings(&pk.alpha_g1),
        vk_beta_1: g1_to_strings(&pk.beta_g1),
        vk_delta_1: g1_to_strings(&pk.delta_g1),
        vk_beta_2: g2_to_strings(&pk.beta_g2),
        vk_delta_2: g2_to_strings(&pk.delta_g2),
        h_exps: pk.h_query.iter().map(g1_to_strings).collect(),
        domain_size: pk.domain_size,
        pols_a: rows_to_strings(&pk.pols_a),
        pols_b: rows_to_strings(&pk.pols_b),
    }
}

/// Parse `verification_key.json`.
pub fn parse_vk(json: &[u8]) -> Result<VerifyingKey> {
    let vk: VerifyingKeyJson = serde_json::from_slice(json)?;
    Ok(VerifyingKey {
        alpha_g1: g1_from_strings(&vk.vk_alfa_1)?,
        beta_g2: g2_from_strings(&vk.vk_beta_2)?,
        gamma_g2: g2_from_strings(&vk.vk_gamma_2)?,
        delta_g2: g2_from_strings(&vk.vk_delta_2)?,
        ic: g1_array_from_strings(&vk.ic)?,
    })
}

/// Render a [`VerifyingKey`] back into its JSON representation.
pub fn vk_to_json(vk: &VerifyingKey) -> VerifyingKeyJson {
    VerifyingKeyJson {
        vk_alfa_1: g1_to_strings(&vk.alpha_g1),
        vk_beta_2: g2_to_strings(&vk.beta_g2),
        vk_gamma_2: g2_to_strings(&vk.gamma_g2),
        vk_delta_2: g2_to_strings(&vk.delta_g2),
        ic: vk.ic.iter().map(g1_to_strings).collect(),
    }
}

/// Parse `witness.json`, an array of numeric strings.
pub fn parse_witness(json: &[u8]) -> Result<Witness> {
    let strings: Vec<String> = serde_json::from_slice(json)?;
    strings
        .iter()
        .map(|s| Ok(field::fr_from_biguint(&str_to_biguint(s)?)))
        .collect()
}

/// Parse `proof.json`.
pub fn parse_proof(json: &[u8]) -> Result<Proof> {
    let proof: ProofJson = serde_json::from_slice(json)?;
    Ok(Proof {
        a: g1_from_strings(&proof.pi_a)?,
        b: g2_from_strings(&proof.pi_b)?,
        c: g1_from_strings(&proof.pi_c)?,
    })
}

/// Parse `public.json`, keeping the raw integers so the verifier can range
/// check them.
pub fn parse_public_signals(json: &[u8]) -> Result<Vec<BigUint>> {
    let strings: Vec<String> = serde_json::from_slice(json)?;
    strings.iter().map(|s| str_to_biguint(s)).collect()
}

/// Render public signals as the decimal-string array of `public.json`.
pub fn public_signals_to_json(signals: &[Fr]) -> Vec<String> {
    signals
        .iter()
        .map(|s| field::biguint_from_fr(s).to_string())
        .collect()
}

/// Render a proof in the snarkjs `proof.json` layout, decimal strings.
pub fn proof_to_json(proof: &Proof) -> ProofJson {
    let a = g1_to_bytes(&proof.a);
    let b = g2_to_bytes(&proof.b);
    let c = g1_to_bytes(&proof.c);

    let dec = |bytes: &[u8]| BigUint::from_bytes_be(bytes).to_string();

    ProofJson {
        pi_a: vec![dec(&a[..32]), dec(&a[32..]), "1".into()],
        pi_b: vec![
            vec![dec(&b[32..64]), dec(&b[..32])],
            vec![dec(&b[96..]), dec(&b[64..96])],
            vec!["1".into(), "0".into()],
        ],
        pi_c: vec![dec(&c[..32]), dec(&c[32..]), "1".into()],
        protocol: "groth".into(),
    }
}

/// Render a proof with `0x`-prefixed hex coordinates.
pub fn proof_to_json_hex(proof: &Proof) -> ProofJson {
    let a = g1_to_bytes(&proof.a);
    let b = g2_to_bytes(&proof.b);
    let c = g1_to_bytes(&proof.c);

    // Minimal-length hex, as upstream emits it.
    let hexs = |bytes: &[u8]| format!("0x{}", hex::encode(BigUint::from_bytes_be(bytes).to_bytes_be()));

    ProofJson {
        pi_a: vec![hexs(&a[..32]), hexs(&a[32..]), "1".into()],
        pi_b: vec![
            vec![hexs(&b[32..64]), hexs(&b[..32])],
            vec![hexs(&b[96..]), hexs(&b[64..96])],
            vec!["1".into(), "0".into()],
        ],
        pi_c: vec![hexs(&c[..32]), hexs(&c[32..]), "1".into()],
        protocol: "groth".into(),
    }
}

impl ProofJson {
    /// Reorder into the on-chain verifier calling convention: projective
    /// tails dropped and the inner `G2` pairs swapped.
    pub fn to_contract_format(&self) -> ProofJson {
        ProofJson {
            pi_a: self.pi_a[..2].to_vec(),
            pi_b: vec![
                vec![self.pi_b[0][1].clone(), self.pi_b[0][0].clone()],
                vec![self.pi_b[1][1].clone(), self.pi_b[1][0].clone()],
            ],
            pi_c: self.pi_c[..2].to_vec(),
            protocol: self.protocol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::CurveGroup;
    use ark_std::{test_rng, UniformRand};

    #[test]
    fn proof_json_roundtrip() {
        let rng = &mut test_rng();
        let proof = Proof {
            a: ark_bn254::G1Projective::rand(rng).into_affine(),
            b: ark_bn254::G2Projective::rand(rng).into_affine(),
            c: ark_bn254::G1Projective::rand(rng).into_affine(),
        };
        for encoded in [proof_to_json(&proof), proof_to_json_hex(&proof)] {
            let text = serde_json::to_vec(&encoded).unwrap();
            assert_eq!(parse_proof(&text).unwrap(), proof);
        }
    }

    #[test]
    fn contract_format_swaps_inner_pairs() {
        let rng = &mut test_rng();
        let proof = Proof {
            a: ark_bn254::G1Projective::rand(rng).into_affine(),
            b: ark_bn254::G2Projective::rand(rng).into_affine(),
            c: ark_bn254::G1Projective::rand(rng).into_affine(),
        };
        let ps = proof_to_json(&proof);
        let sc = ps.to_contract_format();
        assert_eq!(ps.pi_a[..2], sc.pi_a[..]);
        assert_eq!(ps.pi_b[0][0], sc.pi_b[0][1]);
        assert_eq!(ps.pi_b[0][1], sc.pi_b[0][0]);
        assert_eq!(ps.pi_b[1][0], sc.pi_b[1][1]);
        assert_eq!(ps.pi_b[1][1], sc.pi_b[1][0]);
        assert_eq!(ps.pi_c[..2], sc.pi_c[..]);
        assert_eq!(ps.protocol, sc.protocol);
    }

    #[test]
    fn identity_points_use_the_sentinel_encoding() {
        let id = G1Affine::identity();
        assert_eq!(g1_to_strings(&id), ["0", "1", "0"]);
        assert_eq!(g1_from_strings(&g1_to_strings(&id)).unwrap(), id);

        let id2 = G2Affine::identity();
        assert_eq!(g2_from_strings(&g2_to_strings(&id2)).unwrap(), id2);
    }

    #[test]
    fn witness_strings_parse_in_both_bases() {
        let json = br#"["1", "33", "0x21", "11"]"#;
        let w = parse_witness(json).unwrap();
        assert_eq!(w[0], Fr::from(1u64));
        assert_eq!(w[1], Fr::from(33u64));
        assert_eq!(w[2], Fr::from(33u64));
        assert_eq!(w[3], Fr::from(11u64));
    }

    #[test]
    fn truncated_points_are_rejected() {
        let short = vec!["1".to_string(), "2".to_string()];
        assert!(g1_from_strings(&short).is_err());
    }
}
