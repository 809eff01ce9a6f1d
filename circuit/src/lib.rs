//! Layered quadratic arithmetic circuits, per spec.md §4.4/§6: a canonicalizing builder
//! ([`builder::QuadCircuit`]) that turns a sequence of gate requests into a [`circuit::Circuit`],
//! the wire-format data type consumed by the sumcheck prover and verifier.

pub mod builder;
pub mod circuit;
pub mod error;
pub mod layer;
pub mod term;
pub mod wire;

pub use builder::QuadCircuit;
pub use circuit::{BaseSource, Circuit};
pub use error::CircuitError;
pub use layer::Layer;
pub use term::QuadTerm;
pub use wire::WireId;
