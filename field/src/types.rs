use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::iter::{Product, Sum};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num::BigUint;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::ops::Square;

/// Common behavior of every field used in the proving stack: prime fields of a few shapes
/// (`Fp128`, the P-256 base/scalar fields) and the binary extension field `Binary128`.
///
/// This does not assume a two-adic multiplicative structure by itself; `PrimeField` and the
/// binary fields layer their own FFT-friendly structure on top.
pub trait Field:
    'static
    + Copy
    + Clone
    + Debug
    + Display
    + Default
    + Eq
    + Hash
    + Send
    + Sync
    + Sum
    + Product
    + Square
    + Neg<Output = Self>
    + Add<Self, Output = Self>
    + AddAssign<Self>
    + Sub<Self, Output = Self>
    + SubAssign<Self>
    + Mul<Self, Output = Self>
    + MulAssign<Self>
    + Div<Self, Output = Self>
    + DivAssign<Self>
{
    const ZERO: Self;
    const ONE: Self;
    const NEG_ONE: Self;
    const TWO: Self;

    /// Number of bytes in the canonical little-endian wire encoding.
    const BYTES: usize;

    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    fn is_one(&self) -> bool {
        *self == Self::ONE
    }

    fn is_nonzero(&self) -> bool {
        !self.is_zero()
    }

    fn double(&self) -> Self {
        *self + *self
    }

    fn cube(&self) -> Self {
        self.square() * *self
    }

    fn try_inverse(&self) -> Option<Self>;

    fn inverse(&self) -> Self {
        self.try_inverse().expect("tried to invert zero")
    }

    /// Montgomery's trick: invert a whole batch with a single field inversion.
    fn batch_multiplicative_inverse(x: &[Self]) -> Vec<Self> {
        let n = x.len();
        let mut x_nonzero = Vec::with_capacity(n);
        let mut index = Vec::with_capacity(n);
        for (i, &xi) in x.iter().enumerate() {
            if xi.is_nonzero() {
                x_nonzero.push(xi);
                index.push(i);
            }
        }

        let mut prefix = Vec::with_capacity(x_nonzero.len());
        let mut acc = Self::ONE;
        for &xi in &x_nonzero {
            prefix.push(acc);
            acc *= xi;
        }

        let mut acc_inv = acc.inverse();
        let mut result = vec![Self::ZERO; n];
        for (k, &i) in index.iter().enumerate().rev() {
            result[i] = prefix[k] * acc_inv;
            acc_inv *= x_nonzero[k];
        }
        result
    }

    fn exp_u64(&self, power: u64) -> Self {
        let mut current = *self;
        let mut product = Self::ONE;
        let mut power = power;
        while power != 0 {
            if power & 1 != 0 {
                product *= current;
            }
            current = current.square();
            power >>= 1;
        }
        product
    }

    fn exp_biguint(&self, power: &BigUint) -> Self {
        let mut current = *self;
        let mut product = Self::ONE;
        for limb in power.to_u32_digits() {
            for bit in 0..32 {
                if limb & (1 << bit) != 0 {
                    product *= current;
                }
                current = current.square();
            }
        }
        product
    }

    fn from_canonical_u64(n: u64) -> Self;

    fn from_canonical_u32(n: u32) -> Self {
        Self::from_canonical_u64(n as u64)
    }

    fn from_canonical_usize(n: usize) -> Self {
        Self::from_canonical_u64(n as u64)
    }

    fn from_bool(b: bool) -> Self {
        Self::from_canonical_u64(b as u64)
    }

    /// Canonical little-endian byte encoding used on the wire and in Fiat-Shamir transcripts.
    fn to_bytes(&self) -> Vec<u8>;

    fn from_bytes(bytes: &[u8]) -> Option<Self>;

    fn powers(&self) -> Powers<Self> {
        Powers {
            base: *self,
            current: Self::ONE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Powers<F: Field> {
    base: F,
    current: F,
}

impl<F: Field> Iterator for Powers<F> {
    type Item = F;

    fn next(&mut self) -> Option<F> {
        let result = self.current;
        self.current *= self.base;
        Some(result)
    }
}

/// A field whose additive group has prime order, with a known two-adic subgroup used by the
/// radix-2 FFT (see [`crate::fft`]).
pub trait PrimeField: Field + Ord {
    /// Bit length of the modulus.
    const BITS: usize;

    fn order() -> BigUint;

    fn characteristic() -> BigUint {
        Self::order()
    }

    /// Parses a decimal or `0x`-prefixed hex string, reducing it modulo the field's
    /// characteristic. Panics on malformed input; see [`Self::try_of_string`] for a
    /// non-panicking variant.
    fn of_string(s: &str) -> Self {
        Self::try_of_string(s).expect("invalid field literal")
    }

    /// Non-panicking variant of [`Self::of_string`], for callers parsing attacker-controlled
    /// or user-supplied literals (e.g. test-vector loaders).
    fn try_of_string(s: &str) -> Result<Self, crate::error::FieldError> {
        let value = if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
        {
            BigUint::parse_bytes(hex_digits.as_bytes(), 16)
        } else {
            BigUint::parse_bytes(s.as_bytes(), 10)
        }
        .ok_or_else(|| crate::error::FieldError::InvalidLiteral(s.to_string()))?;
        Ok(Self::from_biguint(&value))
    }

    fn from_biguint(value: &BigUint) -> Self {
        let modulus = Self::order();
        let reduced = value % &modulus;
        let mut acc = Self::ZERO;
        for limb in reduced.to_u32_digits().iter().rev() {
            for _ in 0..32 {
                acc = acc.double();
            }
            acc += Self::from_canonical_u32(*limb);
        }
        acc
    }
}

/// A prime field with a known two-adic subgroup, used by the radix-2 FFT (see [`crate::fft`]).
/// Only `Fp128` implements this among the concrete fields in this crate: the P-256 base and
/// scalar fields are used solely for elliptic-curve arithmetic, never for FFTs.
pub trait TwoAdicField: PrimeField {
    /// Largest `k` such that `2^k` divides `p - 1`.
    const TWO_ADICITY: usize;

    /// A generator of the two-adic subgroup of order `2^TWO_ADICITY`.
    const POWER_OF_TWO_GENERATOR: Self;

    /// A generator of a multiplicative subgroup of the given power-of-two order.
    fn primitive_root_of_unity(n_log: usize) -> Self {
        assert!(n_log <= Self::TWO_ADICITY);
        let mut base = Self::POWER_OF_TWO_GENERATOR;
        for _ in n_log..Self::TWO_ADICITY {
            base = base.square();
        }
        base
    }

    fn two_adic_subgroup(n_log: usize) -> Vec<Self> {
        let generator = Self::primitive_root_of_unity(n_log);
        generator.powers().take(1 << n_log).collect()
    }
}

/// Deterministic embedding of small non-negative integers ("counters") into a field, used by
/// circuits that count occurrences (e.g. the CBOR walker) without colliding with witness values.
///
/// Prime fields embed counters additively; characteristic-two fields instead use a multiplicative
/// embedding, since the additive embedding of small integers collapses mod 2.
pub trait CounterGroup: Field {
    fn from_counter(i: u64) -> Self;

    /// A value that is zero iff the counter embeds `0`, used by the CBOR circuit to test
    /// nonzeroness of a count via a single product gate instead of a full inverse.
    fn znz_indicator(&self) -> Self;
}

/// Uniform random sampling, used by the prover for masking randomness and by tests.
pub trait Sample: Sized {
    fn sample<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    fn rand() -> Self {
        Self::sample(&mut OsRng)
    }

    fn rand_vec(n: usize) -> Vec<Self> {
        (0..n).map(|_| Self::rand()).collect()
    }

    fn rand_array<const N: usize>() -> [Self; N]
    where
        Self: Copy + Default,
    {
        let mut arr = [Self::default(); N];
        for slot in arr.iter_mut() {
            *slot = Self::rand();
        }
        arr
    }
}
