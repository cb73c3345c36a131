//! Dense polynomial arithmetic over `Fr`.
//!
//! Polynomials are coefficient vectors, index `i` holding the coefficient of
//! `x^i`. These routines are schoolbook; the prover multiplies large
//! polynomials through the FFT in [`crate::r1cs_to_qap`] instead.

use ark_bn254::Fr;
use ark_ff::{Field, Zero};

/// `a - b`, with length `max(|a|, |b|)`.
pub fn poly_sub(a: &[Fr], b: &[Fr]) -> Vec<Fr> {
    let mut r = vec![Fr::zero(); a.len().max(b.len())];
    for (ri, ai) in r.iter_mut().zip(a) {
        *ri += ai;
    }
    for (ri, bi) in r.iter_mut().zip(b) {
        *ri -= bi;
    }
    r
}

/// `a * b` by convolution, with length `|a| + |b| - 1`.
pub fn poly_mul(a: &[Fr], b: &[Fr]) -> Vec<Fr> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut r = vec![Fr::zero(); a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        for (j, bj) in b.iter().enumerate() {
            r[i + j] += *ai * bj;
        }
    }
    r
}

/// Long division of `a` by `b`, returning `(quotient, remainder)`.
///
/// Undefined when `|a| < |b|` or the leading coefficient of `b` is zero;
/// both are contract violations and panic.
pub fn poly_div(a: &[Fr], b: &[Fr]) -> (Vec<Fr>, Vec<Fr>) {
    let lead_inv = b
        .last()
        .and_then(|l| l.inverse())
        .expect("divisor must have a nonzero leading coefficient");
    let mut quotient = vec![Fr::zero(); a.len() - b.len() + 1];
    let mut rem = a.to_vec();
    while rem.len() >= b.len() {
        let l = *rem.last().unwrap() * lead_inv;
        let pos = rem.len() - b.len();
        quotient[pos] = l;
        let mut shifted = vec![Fr::zero(); pos];
        shifted.push(l);
        let sub = poly_sub(&rem, &poly_mul(b, &shifted));
        rem = sub[..sub.len() - 1].to_vec();
    }
    (quotient, rem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::{test_rng, UniformRand};

    fn rand_poly(len: usize, rng: &mut impl rand::Rng) -> Vec<Fr> {
        (0..len).map(|_| Fr::rand(rng)).collect()
    }

    #[test]
    fn sub_of_self_is_zero() {
        let rng = &mut test_rng();
        let a = rand_poly(7, rng);
        assert!(poly_sub(&a, &a).iter().all(|c| c.is_zero()));
    }

    #[test]
    fn mul_lengths_and_known_product() {
        // (1 + x)(1 - x) = 1 - x^2
        let one = Fr::from(1u64);
        let a = vec![one, one];
        let b = vec![one, -one];
        let p = poly_mul(&a, &b);
        assert_eq!(p, vec![one, Fr::zero(), -one]);

        let rng = &mut test_rng();
        let a = rand_poly(5, rng);
        let b = rand_poly(9, rng);
        assert_eq!(poly_mul(&a, &b).len(), 13);
    }

    #[test]
    fn div_recovers_factors() {
        let rng = &mut test_rng();
        let a = rand_poly(6, rng);
        let b = rand_poly(3, rng);
        let p = poly_mul(&a, &b);
        let (q, rem) = poly_div(&p, &b);
        assert_eq!(&q[..a.len()], &a[..]);
        assert!(rem.iter().all(|c| c.is_zero()));
    }

    #[test]
    fn div_with_remainder() {
        let rng = &mut test_rng();
        let a = rand_poly(8, rng);
        let b = rand_poly(4, rng);
        let (q, rem) = poly_div(&a, &b);
        // a = q*b + rem
        let mut back = poly_mul(&q, &b);
        for (i, r) in rem.iter().enumerate() {
            back[i] += r;
        }
        assert_eq!(&back[..], &a[..]);
    }
}
