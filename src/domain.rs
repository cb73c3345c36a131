//! Power-of-two evaluation domains over `Fr`: a cache of `2^k`-th roots of
//! unity and a recursive radix-2 Cooley-Tukey FFT/IFFT that reads its
//! twiddles from the cache instead of re-deriving them per call.
//!
//! A domain is owned by the prover invocation that created it, so concurrent
//! provers never contend on shared twiddle tables.

use ark_bn254::Fr;
use ark_ff::{Field, One, Zero};

use crate::field;

/// `r - 1 = 2^28 * t` with `t` odd: the scalar field supports domains of up
/// to `2^28` points.
pub const TWO_ADICITY: usize = 28;

/// Tables of `2^k`-th roots of unity, `k = 0..=TWO_ADICITY`, filled lazily
/// and monotonically: once level `k` exists, all lower levels exist too.
pub struct Radix2Domain {
    /// `w[k]` generates the `2^k`-th roots; `w[k - 1] = w[k]^2`.
    w: Vec<Fr>,
    /// `roots[k][i] = w[k]^i` for `i < 2^k`; empty until populated.
    roots: Vec<Vec<Fr>>,
}

impl Radix2Domain {
    /// Build the generator tower from `5^t` and populate tables up to
    /// `level`.
    pub fn new(level: usize) -> Self {
        let mut t = &*field::R - 1u32;
        let mut s = 0usize;
        while !t.bit(0) {
            t >>= 1u32;
            s += 1;
        }
        debug_assert_eq!(s, TWO_ADICITY);

        let mut w = vec![Fr::zero(); s + 1];
        w[s] = Fr::from(5u64).pow(t.to_u64_digits());
        for k in (0..s).rev() {
            w[k] = w[k + 1].square();
        }

        let mut domain = Self {
            w,
            roots: vec![Vec::new(); s + 1],
        };
        domain.populate(level);
        domain
    }

    /// Fill the root tables for every level down from `level` that is still
    /// empty.
    pub fn populate(&mut self, level: usize) {
        assert!(level <= TWO_ADICITY, "domain level {level} exceeds two-adicity");
        for k in (0..=level).rev() {
            if !self.roots[k].is_empty() {
                break;
            }
            let n = 1usize << k;
            let mut r = Fr::one();
            let mut table = Vec::with_capacity(n);
            for _ in 0..n {
                table.push(r);
                r *= self.w[k];
            }
            self.roots[k] = table;
        }
    }

    /// `w[level]^i`, the `i`-th `2^level`-th root of unity.
    pub fn root(&self, level: usize, i: usize) -> Fr {
        self.roots[level][i]
    }

    /// Evaluate `p` on the subgroup of order `m = 2^ceil(log2(|p|))`,
    /// zero-padding `p` on the right. Returns `[P(1), P(w), .., P(w^(m-1))]`.
    pub fn fft(&self, p: &[Fr]) -> Vec<Fr> {
        if p.len() <= 1 {
            return p.to_vec();
        }
        let bits = log2_ceil(p.len());
        assert!(
            !self.roots[bits].is_empty(),
            "root table not populated to level {bits}"
        );
        let m = 1usize << bits;
        let mut padded = p.to_vec();
        padded.resize(m, Fr::zero());
        self.fft_inner(&padded, bits, 0, 1)
    }

    fn fft_inner(&self, pall: &[Fr], bits: usize, offset: usize, step: usize) -> Vec<Fr> {
        let n = 1usize << bits;
        if n == 1 {
            return vec![pall[offset]];
        }
        if n == 2 {
            return vec![
                pall[offset] + pall[offset + step],
                pall[offset] - pall[offset + step],
            ];
        }

        let half = n >> 1;
        let even = self.fft_inner(pall, bits - 1, offset, step * 2);
        let odd = self.fft_inner(pall, bits - 1, offset + step, step * 2);

        let mut out = vec![Fr::zero(); n];
        for i in 0..half {
            let t = self.roots[bits][i] * odd[i];
            out[i] = even[i] + t;
            out[i + half] = even[i] - t;
        }
        out
    }

    /// Interpolate: the inverse of [`Self::fft`] on the same domain,
    /// `res[i] = fft(p)[(m - i) mod m] * m^-1`.
    pub fn ifft(&self, p: &[Fr]) -> Vec<Fr> {
        if p.len() <= 1 {
            return p.to_vec();
        }
        let evals = self.fft(p);
        let m = 1usize << log2_ceil(p.len());
        let m_inv = Fr::from(m as u64).inverse().expect("m is nonzero");
        (0..m).map(|i| evals[(m - i) % m] * m_inv).collect()
    }
}

pub(crate) fn log2_ceil(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly;
    use ark_std::{test_rng, UniformRand};

    fn rand_poly(len: usize, rng: &mut impl rand::Rng) -> Vec<Fr> {
        (0..len).map(|_| Fr::rand(rng)).collect()
    }

    #[test]
    fn generator_orders() {
        let domain = Radix2Domain::new(10);
        for k in 1..=10usize {
            let w = domain.root(k, 1);
            assert_eq!(w.pow([1u64 << k]), Fr::one());
            assert_ne!(w.pow([1u64 << (k - 1)]), Fr::one());
        }
    }

    #[test]
    fn log2_ceil_rounds_up() {
        assert_eq!(log2_ceil(1), 0);
        assert_eq!(log2_ceil(2), 1);
        assert_eq!(log2_ceil(3), 2);
        assert_eq!(log2_ceil(8), 3);
        assert_eq!(log2_ceil(9), 4);
    }

    #[test]
    fn fft_matches_direct_evaluation() {
        let rng = &mut test_rng();
        let domain = Radix2Domain::new(3);
        let p = rand_poly(8, rng);
        let evals = domain.fft(&p);
        for (i, e) in evals.iter().enumerate() {
            let x = domain.root(3, i);
            let direct = p
                .iter()
                .rev()
                .fold(Fr::zero(), |acc, c| acc * x + c);
            assert_eq!(*e, direct);
        }
    }

    #[test]
    fn ifft_inverts_fft() {
        let rng = &mut test_rng();
        let domain = Radix2Domain::new(5);
        for len in [1usize, 2, 4, 16, 32] {
            let p = rand_poly(len, rng);
            assert_eq!(domain.ifft(&domain.fft(&p)), p);
        }
    }

    #[test]
    fn fft_pads_to_power_of_two() {
        let rng = &mut test_rng();
        let domain = Radix2Domain::new(3);
        let p = rand_poly(5, rng);
        let mut padded = p.clone();
        padded.resize(8, Fr::zero());
        assert_eq!(domain.fft(&p), domain.fft(&padded));
    }

    #[test]
    fn convolution_via_fft() {
        let rng = &mut test_rng();
        let domain = Radix2Domain::new(4);
        let a = rand_poly(6, rng);
        let b = rand_poly(7, rng);

        let mut ea = a.clone();
        let mut eb = b.clone();
        ea.resize(16, Fr::zero());
        eb.resize(16, Fr::zero());
        let fa = domain.fft(&ea);
        let fb = domain.fft(&eb);
        let pointwise: Vec<Fr> = fa.iter().zip(&fb).map(|(x, y)| *x * y).collect();
        let via_fft = domain.ifft(&pointwise);

        let direct = poly::poly_mul(&a, &b);
        assert_eq!(&via_fft[..direct.len()], &direct[..]);
        assert!(via_fft[direct.len()..].iter().all(|c| c.is_zero()));
    }
}
