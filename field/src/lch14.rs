//! LCH14-style additive evaluation over `GF(2^128)`: subspace vanishing polynomials and
//! evaluation at every point of an affine coset, per spec.md §4.2.
//!
//! This repository's circuit producers (SHA-256/ECDSA/CBOR/MDOC) are native reference
//! implementations rather than gate-level arithmetizations (spec.md §1), so nothing in the
//! proving pipeline drives `Binary128` through a hot loop of additive-FFT calls the way the
//! GF(2^128) hash-and-MDOC circuit would. This module implements the vanishing-polynomial
//! construction and coset evaluation directly (`O(n^2)` per coset) rather than LCH14's full
//! `O(n log n)` divide-and-conquer butterfly, which needs a "novel polynomial basis" conversion
//! this module doesn't attempt to reproduce without a reference to check it against — see
//! `DESIGN.md` for the scope decision.

use crate::binary128::Binary128;
use crate::ops::Square;
use crate::types::Field;

/// A subspace vanishing polynomial `W_i`, represented in the "linearized" basis
/// `{X^{2^0}, ..., X^{2^i}}` (spec.md §4.2): `coeffs[j]` is the coefficient of `X^{2^j}`. Every
/// `W_i` is `GF(2)`-linear (additive): `W_i(a + b) = W_i(a) + W_i(b)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VanishingPoly {
    coeffs: Vec<Binary128>,
}

impl VanishingPoly {
    /// `W_0(X) = X`, vanishing on the trivial subspace `{0}`.
    pub fn identity() -> Self {
        VanishingPoly { coeffs: vec![Binary128::ONE] }
    }

    /// Evaluates via `sum_j coeffs[j] * x^(2^j)`, each power obtained by repeated squaring (the
    /// Frobenius map, additive in characteristic two), rather than a generic Horner evaluation.
    pub fn eval(&self, x: Binary128) -> Binary128 {
        let mut power = x;
        let mut acc = Binary128::ZERO;
        for &c in &self.coeffs {
            acc += c * power;
            power = power.square();
        }
        acc
    }

    /// `W_{i+1}(X) = W_i(X) * (W_i(X) + W_i(beta))`, per spec.md §4.2.
    ///
    /// Since `W_i` is additive and squaring is additive in characteristic two
    /// (`(a+b)^2 = a^2+b^2`), `W_i(X)^2` is again a linearized polynomial with every exponent
    /// doubled, and the product above collapses to a closed-form update of the coefficient
    /// vector instead of a generic polynomial multiply. Writing `a = self.coeffs` and
    /// `c = W_i(beta)`:
    /// ```text
    /// new[0]     = c * a[0]
    /// new[j]     = c * a[j] + a[j-1]^2      for 1 <= j < len(a)
    /// new[len(a)] = a[len(a)-1]^2
    /// ```
    pub fn next(&self, beta: Binary128) -> Self {
        let c = self.eval(beta);
        let i = self.coeffs.len();
        let mut new = vec![Binary128::ZERO; i + 1];
        new[0] = c * self.coeffs[0];
        for j in 1..i {
            new[j] = c * self.coeffs[j] + self.coeffs[j - 1].square();
        }
        new[i] = self.coeffs[i - 1].square();
        VanishingPoly { coeffs: new }
    }
}

/// Builds `W_0, ..., W_{basis.len()}` for the ordered subspace basis `{β_0, ..., β_{m-1}}`;
/// `W_i` vanishes exactly on `span{β_0, ..., β_{i-1}}`.
pub fn vanishing_polys(basis: &[Binary128]) -> Vec<VanishingPoly> {
    let mut polys = vec![VanishingPoly::identity()];
    for &beta in basis {
        let next = polys.last().expect("polys is never empty").next(beta);
        polys.push(next);
    }
    polys
}

/// Every point of the affine coset `shift + span{basis}`, in the standard counting order: bit
/// `i` of the index selects whether `basis[i]` is included in the sum.
pub fn coset_points(basis: &[Binary128], shift: Binary128) -> Vec<Binary128> {
    let m = basis.len();
    (0..(1usize << m))
        .map(|idx| {
            let mut acc = shift;
            for (i, &beta) in basis.iter().enumerate() {
                if (idx >> i) & 1 == 1 {
                    acc += beta;
                }
            }
            acc
        })
        .collect()
}

/// Evaluates `f` (monomial coefficients, zero-padded to `2^basis.len()`) at every point of the
/// coset `shift + span{basis}` — spec.md §4.2's "evaluation at all elements of an affine coset
/// of a `2^ℓ`-dimensional subspace".
pub fn additive_evaluate(f: &[Binary128], basis: &[Binary128], shift: Binary128) -> Vec<Binary128> {
    coset_points(basis, shift).into_iter().map(|x| evaluate_monomial(f, x)).collect()
}

fn evaluate_monomial(f: &[Binary128], x: Binary128) -> Binary128 {
    let mut acc = Binary128::ZERO;
    let mut power = Binary128::ONE;
    for &c in f {
        acc += c * power;
        power *= x;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn independent_basis(n: usize) -> Vec<Binary128> {
        (0..n).map(|i| Binary128::from_canonical_u64(1u64 << i)).collect()
    }

    #[test]
    fn vanishing_poly_vanishes_exactly_on_its_span() {
        let basis = independent_basis(4);
        let polys = vanishing_polys(&basis);
        for i in 0..=basis.len() {
            let w = &polys[i];
            for mask in 0u32..(1 << i) {
                let mut v = Binary128::ZERO;
                for (b, &beta) in basis.iter().enumerate().take(i) {
                    if (mask >> b) & 1 == 1 {
                        v += beta;
                    }
                }
                assert_eq!(w.eval(v), Binary128::ZERO, "W_{i} should vanish on its own span");
            }
        }
    }

    #[test]
    fn vanishing_poly_is_additive() {
        let basis = independent_basis(3);
        let w = &vanishing_polys(&basis)[3];
        let a = Binary128::from_canonical_u64(0x1234);
        let b = Binary128::from_canonical_u64(0x5678);
        assert_eq!(w.eval(a + b), w.eval(a) + w.eval(b));
    }

    #[test]
    fn additive_evaluate_matches_naive_monomial_evaluation() {
        let basis = independent_basis(3);
        let shift = Binary128::from_canonical_u64(7);
        let f: Vec<Binary128> = (1..=8).map(Binary128::from_canonical_u64).collect();
        let got = additive_evaluate(&f, &basis, shift);
        let points = coset_points(&basis, shift);
        assert_eq!(got.len(), points.len());
        for (&p, &g) in points.iter().zip(&got) {
            assert_eq!(g, evaluate_monomial(&f, p));
        }
    }

    #[test]
    fn coset_points_are_distinct_for_an_independent_basis() {
        let basis = independent_basis(5);
        let points = coset_points(&basis, Binary128::from_canonical_u64(3));
        let mut seen: Vec<(u64, u64)> = points.iter().map(|p| p.to_limbs()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), points.len());
    }

    #[test]
    fn shifting_the_coset_shifts_every_point_by_the_same_amount() {
        let basis = independent_basis(3);
        let a = coset_points(&basis, Binary128::ZERO);
        let shift = Binary128::from_canonical_u64(42);
        let b = coset_points(&basis, shift);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(*x + shift, *y);
        }
    }
}
