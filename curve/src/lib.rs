//! Elliptic curve arithmetic over the fields in `longfellow-field`, per spec.md §4.3.
//!
//! [`point::ProjectivePoint`] implements the Renes-Costello-Batina complete formulas so the
//! prover never has to branch on point-at-infinity or doubling-vs-addition special cases.
//! [`scalar_mul`] and [`msm`] build ordinary and multi-scalar multiplication on top, and
//! [`p256`] supplies the one concrete curve this stack needs: NIST P-256, used by the
//! ECDSA-P256 signature circuit described in spec.md §4.9.

pub mod ecdsa;
pub mod error;
pub mod msm;
pub mod p256;
pub mod point;
pub mod scalar_mul;

pub use error::CurveError;
pub use point::{Curve, ProjectivePoint};
