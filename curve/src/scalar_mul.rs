//! Windowed scalar multiplication, per spec.md §4.3: a 16-entry table precomputed from 4-bit
//! nibbles of the scalar, processed most-significant nibble first.

use longfellow_field::types::PrimeField;

use crate::point::{Curve, ProjectivePoint};

const WINDOW_BITS: usize = 4;
const WINDOW_SIZE: usize = 1 << WINDOW_BITS; // 16

/// Precomputes `[0*P, 1*P, ..., 15*P]` for a single base point `p`.
fn window_table<C: Curve>(p: &ProjectivePoint<C>) -> [ProjectivePoint<C>; WINDOW_SIZE] {
    let mut table = [ProjectivePoint::ZERO; WINDOW_SIZE];
    table[0] = ProjectivePoint::ZERO;
    table[1] = *p;
    for i in 2..WINDOW_SIZE {
        table[i] = table[i - 1] + *p;
    }
    table
}

/// `scalar * p`, via a 16-entry windowed table over 4-bit nibbles of `scalar`, most-significant
/// nibble first.
pub fn scalar_mul<C: Curve>(scalar: &C::ScalarField, p: &ProjectivePoint<C>) -> ProjectivePoint<C> {
    let table = window_table(p);
    let bits = C::ScalarField::BITS;
    let nibbles = (bits + WINDOW_BITS - 1) / WINDOW_BITS;
    let digits = to_nibbles::<C>(scalar, nibbles);

    let mut acc = ProjectivePoint::ZERO;
    for &digit in digits.iter().rev() {
        for _ in 0..WINDOW_BITS {
            acc = acc.double();
        }
        acc = acc + table[digit];
    }
    acc
}

/// Decomposes `scalar` into `count` base-16 digits, least-significant first.
fn to_nibbles<C: Curve>(scalar: &C::ScalarField, count: usize) -> Vec<usize> {
    let value = scalar.to_biguint_like();
    let mut digits = Vec::with_capacity(count);
    let mut acc = value;
    for _ in 0..count {
        let digit = (&acc % 16u32).try_into().unwrap_or(0u32) as usize;
        digits.push(digit);
        acc /= 16u32;
    }
    digits
}

/// Adapter giving [`PrimeField`] implementors a `BigUint` view, without requiring every field to
/// expose one directly (only used here, for digit extraction).
trait ToBiguintLike {
    fn to_biguint_like(&self) -> num::BigUint;
}

impl<F: PrimeField> ToBiguintLike for F {
    fn to_biguint_like(&self) -> num::BigUint {
        let bytes = self.to_bytes();
        num::BigUint::from_bytes_le(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use longfellow_field::types::{Field, Sample};

    use super::*;
    use crate::p256::P256;

    #[test]
    fn matches_repeated_doubling() {
        let g = P256::generator();
        let scalar = <P256 as Curve>::ScalarField::from_canonical_u64(12345);
        let windowed = scalar_mul(&scalar, &g);

        let mut naive = ProjectivePoint::ZERO;
        let mut base = g;
        let mut n = 12345u64;
        while n != 0 {
            if n & 1 != 0 {
                naive = naive + base;
            }
            base = base.double();
            n >>= 1;
        }
        assert_eq!(windowed, naive);
    }

    #[test]
    fn zero_scalar_gives_identity() {
        let g = P256::generator();
        let zero = <P256 as Curve>::ScalarField::ZERO;
        assert_eq!(scalar_mul(&zero, &g), ProjectivePoint::ZERO);
    }

    #[test]
    fn one_scalar_is_identity_map() {
        let g = P256::generator();
        let one = <P256 as Curve>::ScalarField::ONE;
        assert_eq!(scalar_mul(&one, &g), g);
    }

    #[test]
    fn random_scalar_round_trips_through_addition() {
        let g = P256::generator();
        let k = <P256 as Curve>::ScalarField::rand();
        let k_plus_one = k + <P256 as Curve>::ScalarField::ONE;
        assert_eq!(scalar_mul(&k_plus_one, &g), scalar_mul(&k, &g) + g);
    }
}
