//! The base and scalar fields of the NIST P-256 curve, used by `longfellow-curve` for ECDSA
//! verification. Both are plain Montgomery-form prime fields; neither needs the two-adic
//! subgroup structure that [`crate::fft`] relies on, so neither implements `TwoAdicField`.

use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num::BigUint;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::limbs::{add_limbs, less_than, limbs_from_u64, mont_mul, sub_limbs};
use crate::ops::Square;
use crate::types::{Field, PrimeField, Sample};

macro_rules! montgomery_prime_field {
    ($name:ident, $modulus:expr, $inv:expr, $r2:expr, $one:expr, $two:expr, $neg_one:expr) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
        pub struct $name {
            limbs: [u64; 4],
        }

        impl $name {
            const MODULUS: [u64; 4] = $modulus;
            const INV: u64 = $inv;
            const R2: [u64; 4] = $r2;
            const ONE_MONT: [u64; 4] = $one;
            const TWO_MONT: [u64; 4] = $two;
            const NEG_ONE_MONT: [u64; 4] = $neg_one;

            fn to_montgomery(limbs: [u64; 4]) -> [u64; 4] {
                mont_mul(&limbs, &Self::R2, &Self::MODULUS, Self::INV)
            }

            fn from_montgomery(&self) -> [u64; 4] {
                mont_mul(&self.limbs, &[1, 0, 0, 0], &Self::MODULUS, Self::INV)
            }

            /// The four raw 64-bit limbs in canonical (non-Montgomery) form, least-significant
            /// first.
            pub fn to_canonical_limbs(&self) -> [u64; 4] {
                self.from_montgomery()
            }

            pub fn from_canonical_limbs(limbs: [u64; 4]) -> Option<Self> {
                if less_than(&limbs, &Self::MODULUS) {
                    Some($name {
                        limbs: Self::to_montgomery(limbs),
                    })
                } else {
                    None
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ZERO
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let limbs = self.from_montgomery();
                write!(
                    f,
                    concat!(stringify!($name), "(0x{:016x}{:016x}{:016x}{:016x})"),
                    limbs[3], limbs[2], limbs[1], limbs[0]
                )
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let limbs = self.from_montgomery();
                write!(
                    f,
                    "0x{:016x}{:016x}{:016x}{:016x}",
                    limbs[3], limbs[2], limbs[1], limbs[0]
                )
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                let (sum, carry) = add_limbs(&self.limbs, &rhs.limbs);
                let limbs = if carry || !less_than(&sum, &Self::MODULUS) {
                    sub_limbs(&sum, &Self::MODULUS).0
                } else {
                    sum
                };
                $name { limbs }
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                let (diff, borrow) = sub_limbs(&self.limbs, &rhs.limbs);
                let limbs = if borrow {
                    add_limbs(&diff, &Self::MODULUS).0
                } else {
                    diff
                };
                $name { limbs }
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                if self.is_zero() {
                    self
                } else {
                    $name {
                        limbs: sub_limbs(&Self::MODULUS, &self.limbs).0,
                    }
                }
            }
        }

        impl Mul for $name {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                $name {
                    limbs: mont_mul(&self.limbs, &rhs.limbs, &Self::MODULUS, Self::INV),
                }
            }
        }

        impl MulAssign for $name {
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl Div for $name {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                self * rhs.inverse()
            }
        }

        impl DivAssign for $name {
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }

        impl Square for $name {
            fn square(&self) -> Self {
                *self * *self
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |a, b| a + b)
            }
        }

        impl Product for $name {
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, |a, b| a * b)
            }
        }

        impl Field for $name {
            const ZERO: Self = $name { limbs: [0, 0, 0, 0] };
            const ONE: Self = $name {
                limbs: Self::ONE_MONT,
            };
            const NEG_ONE: Self = $name {
                limbs: Self::NEG_ONE_MONT,
            };
            const TWO: Self = $name {
                limbs: Self::TWO_MONT,
            };
            const BYTES: usize = 32;

            fn try_inverse(&self) -> Option<Self> {
                if self.is_zero() {
                    return None;
                }
                let exponent = Self::order() - BigUint::from(2u32);
                Some(self.exp_biguint(&exponent))
            }

            fn from_canonical_u64(n: u64) -> Self {
                $name {
                    limbs: Self::to_montgomery(limbs_from_u64(n)),
                }
            }

            fn to_bytes(&self) -> Vec<u8> {
                let limbs = self.from_montgomery();
                let mut out = Vec::with_capacity(32);
                for limb in limbs {
                    out.extend_from_slice(&limb.to_le_bytes());
                }
                out
            }

            fn from_bytes(bytes: &[u8]) -> Option<Self> {
                if bytes.len() != 32 {
                    return None;
                }
                let mut limbs = [0u64; 4];
                for i in 0..4 {
                    limbs[i] = u64::from_le_bytes(bytes[8 * i..8 * i + 8].try_into().ok()?);
                }
                Self::from_canonical_limbs(limbs)
            }
        }

        impl PrimeField for $name {
            const BITS: usize = 256;

            fn order() -> BigUint {
                let mut acc = BigUint::from(0u32);
                for &limb in Self::MODULUS.iter().rev() {
                    acc = (acc << 64) + BigUint::from(limb);
                }
                acc
            }
        }

        impl Sample for $name {
            fn sample<R: RngCore + ?Sized>(rng: &mut R) -> Self {
                loop {
                    let mut limbs = [0u64; 4];
                    for limb in limbs.iter_mut() {
                        *limb = rng.next_u64();
                    }
                    if less_than(&limbs, &Self::MODULUS) {
                        return $name {
                            limbs: Self::to_montgomery(limbs),
                        };
                    }
                }
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.from_montgomery().cmp(&other.from_montgomery())
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }
    };
}

montgomery_prime_field!(
    P256Base,
    [
        0xffffffffffffffff,
        0x00000000ffffffff,
        0x0000000000000000,
        0xffffffff00000001
    ],
    0x0000000000000001,
    [
        0x0000000000000003,
        0xfffffffbffffffff,
        0xfffffffffffffffe,
        0x00000004fffffffd
    ],
    [
        0x0000000000000001,
        0xffffffff00000000,
        0xffffffffffffffff,
        0x00000000fffffffe
    ],
    [
        0x0000000000000002,
        0xfffffffe00000000,
        0xffffffffffffffff,
        0x00000001fffffffd
    ],
    [
        0xfffffffffffffffe,
        0x00000001ffffffff,
        0x0000000000000000,
        0xfffffffe00000002
    ]
);

montgomery_prime_field!(
    P256Scalar,
    [
        0xf3b9cac2fc632551,
        0xbce6faada7179e84,
        0xffffffffffffffff,
        0xffffffff00000000
    ],
    0xccd1c8aaee00bc4f,
    [
        0x83244c95be79eea2,
        0x4699799c49bd6fa6,
        0x2845b2392b6bec59,
        0x66e12d94f3d95620
    ],
    [
        0x0c46353d039cdaaf,
        0x4319055258e8617b,
        0x0000000000000000,
        0x00000000ffffffff
    ],
    [
        0x188c6a7a0739b55e,
        0x86320aa4b1d0c2f6,
        0x0000000000000000,
        0x00000001fffffffe
    ],
    [
        0xe7739585f8c64aa2,
        0x79cdf55b4e2f3d09,
        0xffffffffffffffff,
        0xfffffffe00000001
    ]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_round_trip() {
        for n in [0u64, 1, 2, 1337, u64::MAX] {
            let x = P256Base::from_canonical_u64(n);
            assert_eq!(x.to_canonical_limbs(), [n, 0, 0, 0]);
        }
    }

    #[test]
    fn scalar_round_trip() {
        for n in [0u64, 1, 2, 1337, u64::MAX] {
            let x = P256Scalar::from_canonical_u64(n);
            assert_eq!(x.to_canonical_limbs(), [n, 0, 0, 0]);
        }
    }

    #[test]
    fn base_inverse() {
        for n in 1u64..40 {
            let x = P256Base::from_canonical_u64(n);
            assert_eq!(x * x.inverse(), P256Base::ONE);
        }
    }

    #[test]
    fn scalar_inverse() {
        for n in 1u64..40 {
            let x = P256Scalar::from_canonical_u64(n);
            assert_eq!(x * x.inverse(), P256Scalar::ONE);
        }
    }

    #[test]
    fn base_add_sub_consistency() {
        let a = P256Base::from_canonical_u64(0xffff_ffff_ffff_ffff);
        let b = P256Base::from_canonical_u64(3);
        let r = a + b;
        assert_eq!(r - a, b);
        assert_eq!(r - b, a);
    }

    #[test]
    fn order_matches_known_modulus() {
        assert_eq!(
            P256Base::order().to_str_radix(16),
            "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"
        );
        assert_eq!(
            P256Scalar::order().to_str_radix(16),
            "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"
        );
    }
}
