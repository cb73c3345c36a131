//! A [`Groth16`] zkSNARK prover and verifier over the BN254 curve, compatible
//! with the proving keys, witnesses and proofs produced by the
//! `circom`/`snarkjs` toolchain.
//!
//! [`Groth16`]: https://eprint.iacr.org/2016/260.pdf
#![warn(
    unused,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![allow(clippy::many_single_char_names, clippy::op_ref)]
#![forbid(unsafe_code)]

/// Data structures shared by the prover, verifier and parsers.
pub mod data_structures;

/// Error types returned across the crate.
pub mod error;

/// Scalar-field helpers over arbitrary-precision integers.
pub mod field;

/// Dense polynomial arithmetic over the scalar field.
pub mod poly;

/// Roots-of-unity cache and the radix-2 FFT/IFFT over the scalar field.
pub mod domain;

/// Windowed multi-scalar multiplication over `G1` and `G2`.
pub mod msm;

/// Evaluate the witness against the QAP and build the quotient polynomial `H`.
pub mod r1cs_to_qap;

/// Create proofs for the Groth16 zkSNARK construction.
pub mod prover;

/// Verify proofs for the Groth16 zkSNARK construction.
pub mod verifier;

/// Parsers and writers for the snarkjs JSON and binary artifact formats.
pub mod parsers;

pub use self::data_structures::*;
pub use self::error::{Error, Result};
pub use self::{prover::*, verifier::*};
