//! Arithmetic over the BN254 scalar field on arbitrary-precision integers.
//!
//! In-memory field elements are [`Fr`]; the functions here operate on
//! [`BigUint`] values instead, which is what the artifact parsers and the
//! verifier range checks work with. Every result is canonical in `[0, r)`.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand::Rng;

use crate::error::Result;

pub use ark_bn254::{Fq, Fr};

/// BN254 scalar field order
/// `r = 21888242871839275222246405745257275088548364400416034343698204186575808495617`.
pub static R: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(
        b"21888242871839275222246405745257275088548364400416034343698204186575808495617",
        10,
    )
    .unwrap()
});

/// BN254 base field modulus
/// `q = 21888242871839275222246405745257275088696311157297823662689037894645226208583`.
pub static Q: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(
        b"21888242871839275222246405745257275088696311157297823662689037894645226208583",
        10,
    )
    .unwrap()
});

/// `a + b mod r`.
pub fn add(a: &BigUint, b: &BigUint) -> BigUint {
    (a + b) % &*R
}

/// `a - b mod r`.
pub fn sub(a: &BigUint, b: &BigUint) -> BigUint {
    ((a % &*R) + &*R - (b % &*R)) % &*R
}

/// `a * b mod r`.
pub fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) % &*R
}

/// `a * b^-1 mod r`.
///
/// Panics if `b ≡ 0 (mod r)`; dividing by zero is a contract violation.
pub fn div(a: &BigUint, b: &BigUint) -> BigUint {
    mul(a, &inv(b))
}

/// `-a mod r`.
pub fn neg(a: &BigUint) -> BigUint {
    sub(&BigUint::zero(), a)
}

/// `a^-1 mod r`, via Fermat's little theorem (`r` is prime).
///
/// Panics if `a ≡ 0 (mod r)`.
pub fn inv(a: &BigUint) -> BigUint {
    assert!(
        !(a % &*R).is_zero(),
        "zero has no inverse in the scalar field"
    );
    a.modpow(&(&*R - 2u32), &R)
}

/// `base^e mod r`, square-and-multiply from the least significant bit.
pub fn exp(base: &BigUint, e: &BigUint) -> BigUint {
    let mut res = BigUint::one();
    let mut exp = base % &*R;
    let mut rem = e.clone();
    while !rem.is_zero() {
        if rem.bit(0) {
            res = mul(&res, &exp);
        }
        exp = mul(&exp, &exp);
        rem >>= 1u32;
    }
    res
}

/// Reduce a big integer into `Fr`.
pub fn fr_from_biguint(a: &BigUint) -> Fr {
    Fr::from_le_bytes_mod_order(&a.to_bytes_le())
}

/// The canonical integer representative of an `Fr` element.
pub fn biguint_from_fr(a: &Fr) -> BigUint {
    BigUint::from_bytes_be(&a.into_bigint().to_bytes_be())
}

/// Sample a uniform scalar the way the upstream toolchain does: draw
/// `bitlen(r)/8 - 1` random bytes, interpret them big-endian and reduce
/// modulo `r`. RNG failure is surfaced to the caller.
pub fn rand_scalar<G: Rng>(rng: &mut G) -> Result<Fr> {
    let nbytes = (Fr::MODULUS_BIT_SIZE as usize) / 8 - 1;
    let mut bytes = vec![0u8; nbytes];
    rng.try_fill(&mut bytes[..])?;
    let k = BigUint::from_bytes_be(&bytes) % &*R;
    Ok(fr_from_biguint(&k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;
    use ark_std::UniformRand;

    fn rand_elem(rng: &mut impl Rng) -> BigUint {
        biguint_from_fr(&Fr::rand(rng))
    }

    #[test]
    fn add_sub_roundtrip() {
        let rng = &mut test_rng();
        for _ in 0..50 {
            let a = rand_elem(rng);
            let b = rand_elem(rng);
            assert_eq!(add(&a, &sub(&b, &a)), b);
            assert_eq!(sub(&add(&a, &b), &b), a);
        }
    }

    #[test]
    fn mul_inv_is_one() {
        let rng = &mut test_rng();
        for _ in 0..50 {
            let a = rand_elem(rng);
            if a.is_zero() {
                continue;
            }
            assert_eq!(mul(&a, &inv(&a)), BigUint::one());
            assert_eq!(div(&a, &a), BigUint::one());
        }
    }

    #[test]
    fn exp_fermat() {
        let rng = &mut test_rng();
        let e = &*R - 1u32;
        for _ in 0..10 {
            let a = rand_elem(rng);
            if a.is_zero() {
                continue;
            }
            assert_eq!(exp(&a, &e), BigUint::one());
        }
    }

    #[test]
    fn neg_cancels() {
        let rng = &mut test_rng();
        let a = rand_elem(rng);
        assert!(add(&a, &neg(&a)).is_zero());
    }

    #[test]
    #[should_panic]
    fn inv_of_zero_panics() {
        inv(&BigUint::zero());
    }

    #[test]
    fn biguint_fr_roundtrip() {
        let rng = &mut test_rng();
        for _ in 0..20 {
            let a = Fr::rand(rng);
            assert_eq!(fr_from_biguint(&biguint_from_fr(&a)), a);
        }
    }

    #[test]
    fn sampled_scalars_are_reduced() {
        let rng = &mut test_rng();
        for _ in 0..20 {
            let k = rand_scalar(rng).unwrap();
            assert!(biguint_from_fr(&k) < *R);
        }
    }
}
