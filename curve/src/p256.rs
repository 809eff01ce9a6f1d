//! The NIST P-256 curve, `y^2 = x^3 - 3x + b`, used by the MDOC ECDSA-P256 signature circuit.

use std::sync::OnceLock;

use longfellow_field::p256::{P256Base, P256Scalar};
use longfellow_field::types::Field;

use crate::point::Curve;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct P256;

impl Curve for P256 {
    type BaseField = P256Base;
    type ScalarField = P256Scalar;

    // A = -3, the standard NIST curve choice (enables the `a == -3` doubling speedup some
    // implementations use; this crate uses the general-`a` complete formulas uniformly instead).
    fn a() -> P256Base {
        static A: OnceLock<P256Base> = OnceLock::new();
        *A.get_or_init(|| -(P256Base::ONE + P256Base::ONE + P256Base::ONE))
    }

    fn b() -> P256Base {
        static B: OnceLock<P256Base> = OnceLock::new();
        // 41058363725152142129326129780047268409114441015993725554835256314039467401291
        *B.get_or_init(|| {
            P256Base::from_canonical_limbs([
                0x3bce3c3e27d2604b,
                0x651d06b0cc53b0f6,
                0xb3ebbd55769886bc,
                0x5ac635d8aa3a93e7,
            ])
            .expect("P-256 b is a canonical field element")
        })
    }

    fn generator_x() -> P256Base {
        static GX: OnceLock<P256Base> = OnceLock::new();
        // 48439561293906451759052585252797914202762949526041747995844080717082404635286
        *GX.get_or_init(|| {
            P256Base::from_canonical_limbs([
                0xf4a13945d898c296,
                0x77037d812deb33a0,
                0xf8bce6e563a440f2,
                0x6b17d1f2e12c4247,
            ])
            .expect("P-256 generator x is a canonical field element")
        })
    }

    fn generator_y() -> P256Base {
        static GY: OnceLock<P256Base> = OnceLock::new();
        // 36134250956749795798585127919587881956611106672985015071877198253568414405109
        *GY.get_or_init(|| {
            P256Base::from_canonical_limbs([
                0xcbb6406837bf51f5,
                0x2bce33576b315ece,
                0x8ee7eb4a7c0f9e16,
                0x4fe342e2fe1a7f9b,
            ])
            .expect("P-256 generator y is a canonical field element")
        })
    }
}

#[cfg(test)]
mod tests {
    use longfellow_field::ops::Square;

    use super::*;
    use crate::point::{Curve, ProjectivePoint};

    #[test]
    fn curve_constants_satisfy_nonsingularity() {
        // 4A^3 + 27B^2 != 0, i.e. the curve is smooth.
        let a = P256::a();
        let b = P256::b();
        let lhs = a.cube() * P256Base::from_canonical_u64(4)
            + b.square() * P256Base::from_canonical_u64(27);
        assert!(lhs.is_nonzero());
    }

    #[test]
    fn generator_satisfies_curve_equation() {
        let g: ProjectivePoint<P256> = P256::generator();
        assert!(g.is_on_curve());
    }
}
