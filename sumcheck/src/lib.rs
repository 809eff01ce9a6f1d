//! GKR-style layered sumcheck, per spec.md §4.6: proves that every copy of a witness satisfies
//! a [`longfellow_circuit::Circuit`] (every output wire is zero) by reducing, layer by layer
//! from the output down to the base/input layer, a claim about one layer's wires to a claim
//! about the next (deeper) layer's wires. The final claims (see [`ReducedClaims`]) are two
//! evaluation points against the resolved base/input vector — exactly what
//! [`longfellow_ligero`](../../ligero) opens against the committed witness tableau.

pub mod eq;
pub mod error;
pub mod phase;
pub mod proof;
pub mod prover;
pub mod quad;
pub mod util;
pub mod verifier;

pub use error::SumcheckError;
pub use proof::{LayerProof, SumcheckProof};
pub use prover::{prove, ReducedClaims};
pub use verifier::verify;
