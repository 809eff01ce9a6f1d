//! ECDSA signing and verification over a [`Curve`], grounding the `EcdsaP256VerifyCircuit`
//! native reference implementation described in spec.md §4.9.
//!
//! This is deliberately curve-generic (it is exercised here only over [`crate::p256::P256`]),
//! following the same shape as conventional native ECDSA reference code: `verify_message` takes
//! the message hash pre-reduced to a scalar, matching how the MDOC circuit producer feeds it
//! the SHA-256 digest of the signed payload, already interpreted as a big-endian integer.

use longfellow_field::types::{Field, PrimeField, Sample};
use serde::{Deserialize, Serialize};

use crate::msm::multi_scalar_mul;
use crate::point::{Curve, ProjectivePoint};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound = "")]
pub struct Signature<C: Curve> {
    pub r: C::ScalarField,
    pub s: C::ScalarField,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound = "")]
pub struct SecretKey<C: Curve>(pub C::ScalarField);

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(bound = "")]
pub struct PublicKey<C: Curve> {
    pub x: C::BaseField,
    pub y: C::BaseField,
}

impl<C: Curve> SecretKey<C> {
    pub fn to_public(&self) -> PublicKey<C> {
        let p = self.0 * C::generator();
        let (x, y) = p.to_affine().expect("generator times nonzero scalar is never the identity");
        PublicKey { x, y }
    }
}

impl<C: Curve> PublicKey<C> {
    pub fn to_projective(&self) -> ProjectivePoint<C> {
        ProjectivePoint::from_affine(self.x, self.y)
    }

    pub fn is_on_curve(&self) -> bool {
        self.to_projective().is_on_curve()
    }
}

/// Reduces a base-field element's canonical integer representation modulo the scalar field's
/// order, the step ECDSA uses to turn a curve point's x-coordinate into a scalar for `r`.
fn base_to_scalar<C: Curve>(x: C::BaseField) -> C::ScalarField {
    let bytes = x.to_bytes();
    let value = num::BigUint::from_bytes_le(&bytes);
    C::ScalarField::from_biguint(&value)
}

/// Signs `msg` (already reduced to a scalar, e.g. a truncated SHA-256 digest) with `sk`,
/// resampling the nonce `k` on the zero-probability event that `r` comes out to zero.
pub fn sign_message<C: Curve>(msg: C::ScalarField, sk: &SecretKey<C>) -> Signature<C> {
    loop {
        let k = C::ScalarField::rand();
        let r_point = k * C::generator();
        let Some((rx, _)) = r_point.to_affine() else {
            continue;
        };
        let r = base_to_scalar::<C>(rx);
        if r.is_zero() {
            continue;
        }

        let s = k.inverse() * (msg + r * sk.0);
        if s.is_zero() {
            continue;
        }
        return Signature { r, s };
    }
}

/// Verifies `sig` over `msg` under `pk`, per the standard ECDSA verification equation:
/// checks that `r == x(u1*G + u2*Q) mod n`, where `u1 = msg/s`, `u2 = r/s`.
pub fn verify_message<C: Curve>(msg: C::ScalarField, sig: &Signature<C>, pk: &PublicKey<C>) -> bool {
    if sig.r.is_zero() || sig.s.is_zero() {
        return false;
    }
    if !pk.is_on_curve() {
        return false;
    }

    let c = sig.s.inverse();
    let u1 = msg * c;
    let u2 = sig.r * c;

    let point = multi_scalar_mul::<C>(&[u1, u2], &[C::generator(), pk.to_projective()]);
    match point.to_affine() {
        None => false,
        Some((x, _)) => sig.r == base_to_scalar::<C>(x),
    }
}

#[cfg(test)]
mod tests {
    use longfellow_field::p256::{P256Base, P256Scalar};

    use super::*;
    use crate::p256::P256;

    #[test]
    fn round_trips_sign_and_verify() {
        let sk = SecretKey::<P256>(P256Scalar::rand());
        let pk = sk.to_public();

        let msg = P256Scalar::rand();
        let sig = sign_message(msg, &sk);
        assert!(verify_message(msg, &sig, &pk));
    }

    #[test]
    fn rejects_wrong_message() {
        let sk = SecretKey::<P256>(P256Scalar::rand());
        let pk = sk.to_public();

        let msg = P256Scalar::rand();
        let sig = sign_message(msg, &sk);
        let other_msg = msg + P256Scalar::ONE;
        assert!(!verify_message(other_msg, &sig, &pk));
    }

    #[test]
    fn rejects_flipped_signature_byte() {
        let sk = SecretKey::<P256>(P256Scalar::rand());
        let pk = sk.to_public();

        let msg = P256Scalar::rand();
        let sig = sign_message(msg, &sk);
        let tampered = Signature {
            r: sig.r,
            s: sig.s + P256Scalar::ONE,
        };
        assert!(!verify_message(msg, &tampered, &pk));
    }

    /// Mirrors the ECDSA-P256 scenario named in spec.md §8 scenario 1: a signature verifies
    /// against `(pk_x, pk_y, e, r, s)`, and flipping a single byte of any one of them breaks
    /// verification.
    #[test]
    fn flipping_any_single_input_byte_breaks_verification() {
        let sk = SecretKey::<P256>(P256Scalar::rand());
        let pk = sk.to_public();
        let e = P256Scalar::rand();
        let sig = sign_message(e, &sk);

        assert!(verify_message(e, &sig, &pk));

        let flip_high_bit = |f: P256Scalar| f + P256Scalar::ONE;
        let flip_base = |f: P256Base| f + P256Base::ONE;

        assert!(!verify_message(flip_high_bit(e), &sig, &pk));
        assert!(!verify_message(
            e,
            &Signature { r: flip_high_bit(sig.r), s: sig.s },
            &pk
        ));
        assert!(!verify_message(
            e,
            &Signature { r: sig.r, s: flip_high_bit(sig.s) },
            &pk
        ));
        assert!(!verify_message(
            e,
            &sig,
            &PublicKey { x: flip_base(pk.x), y: pk.y }
        ));
        assert!(!verify_message(
            e,
            &sig,
            &PublicKey { x: pk.x, y: flip_base(pk.y) }
        ));
    }
}
