//! Bos-Coster multi-scalar multiplication, per spec.md §4.3: repeatedly take the top two largest
//! scalars `(s1, p1)`, `(s2, p2)` from a max-heap, push `(s1 - s2, p1)` and `(s2, p1 + p2)`,
//! stopping when only one scalar remains. A separate fallback handles `scalar == 1` entries by
//! direct accumulation, since Bos-Coster alone degenerates into a near-linear scan once most
//! scalars have been reduced to 1 (the "pathological loop" spec.md calls out).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use longfellow_field::types::{Field, PrimeField};

use crate::point::{Curve, ProjectivePoint};

#[derive(Clone)]
struct Entry<C: Curve> {
    scalar: num::BigUint,
    point: ProjectivePoint<C>,
}

impl<C: Curve> PartialEq for Entry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.scalar == other.scalar
    }
}
impl<C: Curve> Eq for Entry<C> {}
impl<C: Curve> PartialOrd for Entry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<C: Curve> Ord for Entry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.scalar.cmp(&other.scalar)
    }
}

/// Computes `sum_i scalars[i] * points[i]` via the Bos-Coster max-heap method.
pub fn multi_scalar_mul<C: Curve>(
    scalars: &[C::ScalarField],
    points: &[ProjectivePoint<C>],
) -> ProjectivePoint<C> {
    assert_eq!(scalars.len(), points.len());
    if scalars.is_empty() {
        return ProjectivePoint::ZERO;
    }

    let mut heap: BinaryHeap<Entry<C>> = BinaryHeap::with_capacity(scalars.len());
    let mut ones_accumulator = ProjectivePoint::ZERO;

    for (s, &p) in scalars.iter().zip(points) {
        let bytes = s.to_bytes();
        let n = num::BigUint::from_bytes_le(&bytes);
        if n == num::BigUint::from(0u32) {
            continue;
        }
        if n == num::BigUint::from(1u32) {
            ones_accumulator = ones_accumulator + p;
            continue;
        }
        heap.push(Entry { scalar: n, point: p });
    }

    loop {
        let Some(top) = heap.pop() else {
            return ones_accumulator;
        };
        let Some(mut second) = heap.pop() else {
            // Only one entry left: finish it off by doubling-and-adding its (possibly large)
            // scalar onto the ones accumulator.
            return ones_accumulator + mul_scalar_by_biguint(&top.scalar, top.point);
        };

        if top.scalar == second.scalar {
            // s1 - s2 == 0: fold both into the combined point and stop tracking the first.
            let combined = top.point + second.point;
            if second.scalar == num::BigUint::from(1u32) {
                ones_accumulator = ones_accumulator + combined;
            } else {
                heap.push(Entry {
                    scalar: second.scalar.clone(),
                    point: combined,
                });
            }
            continue;
        }

        let diff = &top.scalar - &second.scalar;
        let combined = top.point + second.point;

        if diff == num::BigUint::from(1u32) {
            ones_accumulator = ones_accumulator + top.point;
        } else {
            heap.push(Entry {
                scalar: diff,
                point: top.point,
            });
        }

        if second.scalar == num::BigUint::from(1u32) {
            ones_accumulator = ones_accumulator + combined;
        } else {
            second.point = combined;
            heap.push(second);
        }
    }
}

fn mul_scalar_by_biguint<C: Curve>(n: &num::BigUint, p: ProjectivePoint<C>) -> ProjectivePoint<C> {
    let mut acc = ProjectivePoint::ZERO;
    let mut base = p;
    for limb in n.to_u32_digits() {
        for bit in 0..32 {
            if (limb >> bit) & 1 != 0 {
                acc = acc + base;
            }
            base = base.double();
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use longfellow_field::types::Sample;

    use super::*;
    use crate::p256::P256;
    use crate::scalar_mul::scalar_mul;

    #[test]
    fn matches_per_point_scalar_sum() {
        let g = P256::generator();
        let h = g.double() + g;

        let s1 = <P256 as Curve>::ScalarField::from_canonical_u64(7);
        let s2 = <P256 as Curve>::ScalarField::from_canonical_u64(19);

        let got = multi_scalar_mul::<P256>(&[s1, s2], &[g, h]);
        let want = scalar_mul(&s1, &g) + scalar_mul(&s2, &h);
        assert_eq!(got, want);
    }

    #[test]
    fn handles_repeated_and_unit_scalars() {
        let g = P256::generator();
        let s = <P256 as Curve>::ScalarField::from_canonical_u64(5);
        let one = <P256 as Curve>::ScalarField::ONE;

        let got = multi_scalar_mul::<P256>(&[s, s, one], &[g, g, g]);
        let want = scalar_mul(&s, &g) + scalar_mul(&s, &g) + g;
        assert_eq!(got, want);
    }

    #[test]
    fn matches_for_random_skewed_scalars() {
        let g = P256::generator();
        let h = g.double();
        let big = <P256 as Curve>::ScalarField::rand();
        let small = <P256 as Curve>::ScalarField::from_canonical_u64(3);

        let got = multi_scalar_mul::<P256>(&[big, small], &[g, h]);
        let want = scalar_mul(&big, &g) + scalar_mul(&small, &h);
        assert_eq!(got, want);
    }

    #[test]
    fn empty_input_is_zero() {
        let got = multi_scalar_mul::<P256>(&[], &[]);
        assert_eq!(got, ProjectivePoint::ZERO);
    }
}
