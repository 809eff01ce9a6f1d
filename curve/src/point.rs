//! Short Weierstrass curve points in projective coordinates, per spec.md §4.3.
//!
//! Group law uses the complete (exception-free) formulas of Renes, Costello, and Batina
//! ("Complete addition formulas for prime order elliptic curves", EUROCRYPT 2016), Algorithms 3
//! and 4, generalized for `a != 0`. `Z == 0` denotes the point at infinity; `add`/`double` never
//! branch on special cases, so the prover's arithmetic has no side-channel-relevant data flow
//! (not that timing matters here, since this is prover-side only — see spec.md §4.3).

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg};

use longfellow_field::ops::Square;
use longfellow_field::types::{Field, PrimeField};
use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// A short Weierstrass curve `y^2 = x^3 + A*x + B` over `BaseField`, with a distinguished
/// generator of prime order `ScalarField::order()`.
pub trait Curve: 'static + Sync + Send + Sized + Copy + Debug + Eq {
    type BaseField: PrimeField;
    type ScalarField: PrimeField;

    /// Curve coefficients and generator coordinates. These are plain functions rather than
    /// associated consts: building a `Self::BaseField` value generally requires a Montgomery
    /// conversion, which isn't something field implementations make available as a `const fn`.
    /// Implementors should cache the computed value behind a `OnceLock` if called often.
    fn a() -> Self::BaseField;
    fn b() -> Self::BaseField;

    fn generator_x() -> Self::BaseField;
    fn generator_y() -> Self::BaseField;

    fn generator() -> ProjectivePoint<Self> {
        ProjectivePoint {
            x: Self::generator_x(),
            y: Self::generator_y(),
            z: Self::BaseField::ONE,
        }
    }
}

/// A point in projective (X, Y, Z) coordinates. `Z == 0` is the identity (point at infinity).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ProjectivePoint<C: Curve> {
    pub x: C::BaseField,
    pub y: C::BaseField,
    pub z: C::BaseField,
}

impl<C: Curve> ProjectivePoint<C> {
    pub const ZERO: Self = ProjectivePoint {
        x: C::BaseField::ZERO,
        y: C::BaseField::ONE,
        z: C::BaseField::ZERO,
    };

    pub fn is_zero(&self) -> bool {
        self.z.is_zero()
    }

    /// Normalizes to affine coordinates `(x/z, y/z)`. Returns `None` for the identity.
    pub fn to_affine(&self) -> Option<(C::BaseField, C::BaseField)> {
        if self.is_zero() {
            return None;
        }
        let z_inv = self.z.inverse();
        Some((self.x * z_inv, self.y * z_inv))
    }

    pub fn from_affine(x: C::BaseField, y: C::BaseField) -> Self {
        ProjectivePoint {
            x,
            y,
            z: C::BaseField::ONE,
        }
    }

    /// `is_on_curve` per spec.md §3: normalizes first, then checks the Weierstrass equation.
    /// The identity is always considered on-curve.
    pub fn is_on_curve(&self) -> bool {
        match self.to_affine() {
            None => true,
            Some((x, y)) => y.square() == x.cube() + C::a() * x + C::b(),
        }
    }

    pub fn from_affine_checked(
        x: C::BaseField,
        y: C::BaseField,
    ) -> Result<Self, CurveError> {
        let p = Self::from_affine(x, y);
        if p.is_on_curve() {
            Ok(p)
        } else {
            Err(CurveError::NotOnCurve)
        }
    }

    /// Renes-Costello-Batina Algorithm 3 (exception-free doubling, general `a`).
    #[must_use]
    pub fn double(&self) -> Self {
        let a = C::a();
        let b3 = C::b() + C::b() + C::b();
        let (x, y, z) = (self.x, self.y, self.z);

        let mut t0 = x.square(); // 1
        let mut t1 = y.square(); // 2
        let mut t2 = z.square(); // 3
        let mut t3 = x * y; // 4
        t3 += t3; // 5
        let mut z3 = x * z; // 6
        z3 += z3; // 7
        let mut x3 = a * z3; // 8
        let mut y3 = b3 * t2; // 9
        y3 = x3 + y3; // 10
        x3 = t1 - y3; // 11
        y3 = t1 + y3; // 12
        y3 = x3 * y3; // 13
        x3 = t3 * x3; // 14
        z3 = b3 * z3; // 15
        t2 = a * t2; // 16
        t3 = t0 - t2; // 17
        t3 = a * t3; // 18
        t3 += z3; // 19
        z3 = t0 + t0; // 20
        t0 = z3 + t0; // 21
        t0 += t2; // 22
        t0 *= t3; // 23
        y3 += t0; // 24
        t2 = y * z; // 25
        t2 += t2; // 26
        t0 = t2 * t3; // 27
        x3 -= t0; // 28
        z3 = t2 * t1; // 29
        z3 += z3; // 30
        z3 += z3; // 31

        ProjectivePoint { x: x3, y: y3, z: z3 }
    }

    /// Renes-Costello-Batina Algorithm 4 (exception-free, unified addition, general `a`).
    #[must_use]
    pub fn add_complete(&self, rhs: &Self) -> Self {
        let a = C::a();
        let b3 = C::b() + C::b() + C::b();
        let (x1, y1, z1) = (self.x, self.y, self.z);
        let (x2, y2, z2) = (rhs.x, rhs.y, rhs.z);

        let mut t0 = x1 * x2; // 1
        let mut t1 = y1 * y2; // 2
        let mut t2 = z1 * z2; // 3
        let mut t3 = x1 + y1; // 4
        let mut t4 = x2 + y2; // 5
        t3 *= t4; // 6
        t4 = t0 + t1; // 7
        t3 -= t4; // 8
        t4 = x1 + z1; // 9
        let mut t5 = x2 + z2; // 10
        t4 *= t5; // 11
        t5 = t0 + t2; // 12
        t4 -= t5; // 13
        t5 = y1 + z1; // 14
        let mut x3 = y2 + z2; // 15
        t5 *= x3; // 16
        x3 = t1 + t2; // 17
        t5 -= x3; // 18
        let mut z3 = a * t4; // 19
        x3 = b3 * t2; // 20
        z3 = x3 + z3; // 21
        x3 = t1 - z3; // 22
        z3 = t1 + z3; // 23
        let mut y3 = x3 * z3; // 24
        t1 = t0 + t0; // 25
        t1 += t0; // 26
        t2 = a * t2; // 27
        t4 = b3 * t4; // 28
        t1 += t2; // 29
        t2 = t0 - t2; // 30
        t2 = a * t2; // 31
        t4 += t2; // 32
        t0 = t1 * t4; // 33
        y3 += t0; // 34
        t0 = t5 * t4; // 35
        x3 = t3 * x3; // 36
        x3 -= t0; // 37
        t0 = t3 * t1; // 38
        z3 = t5 * z3; // 39
        z3 += t0; // 40

        ProjectivePoint { x: x3, y: y3, z: z3 }
    }
}

impl<C: Curve> Default for ProjectivePoint<C> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<C: Curve> PartialEq for ProjectivePoint<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => true,
            (true, false) | (false, true) => false,
            (false, false) => self.x * other.z == other.x * self.z && self.y * other.z == other.y * self.z,
        }
    }
}

impl<C: Curve> Eq for ProjectivePoint<C> {}

impl<C: Curve> Add for ProjectivePoint<C> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.add_complete(&rhs)
    }
}

impl<C: Curve> Neg for ProjectivePoint<C> {
    type Output = Self;
    fn neg(self) -> Self {
        ProjectivePoint {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }
}

/// Scalar multiplication by repeated doubling (used only as the naive reference in tests; real
/// code uses the windowed table in [`crate::scalar_mul`]).
impl<C: Curve> Mul<ProjectivePoint<C>> for C::ScalarField {
    type Output = ProjectivePoint<C>;
    fn mul(self, rhs: ProjectivePoint<C>) -> ProjectivePoint<C> {
        crate::scalar_mul::scalar_mul(&self, &rhs)
    }
}
