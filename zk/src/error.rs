use thiserror::Error;

/// One typed status per spec.md §7 taxonomy entry, aggregating every lower layer's error via
/// `#[from]` so callers of [`crate::api`] see one error type.
#[derive(Debug, Error)]
pub enum ZkError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("circuit error: {0}")]
    Circuit(#[from] longfellow_circuit::CircuitError),

    #[error("sumcheck error: {0}")]
    Sumcheck(#[from] longfellow_sumcheck::SumcheckError),

    #[error("ligero error: {0}")]
    Ligero(#[from] longfellow_ligero::LigeroError),

    #[error("transcript error: {0}")]
    Transcript(#[from] longfellow_transcript::TranscriptError),

    /// Prover-side "witness failure": the circuit evaluated to a non-zero output, i.e. the
    /// credential does not satisfy the requested policy (spec.md §7, §8 scenario 3).
    #[error("witness does not satisfy the circuit: {0}")]
    WitnessFailure(String),

    /// `generate_circuit` was asked for a version older than `ZkSpec::for_attributes` already
    /// has on file for that attribute count (spec.md §9, "no regeneration of legacy circuits").
    #[error("spec version {requested} is stale; latest for {num_attributes} attributes is {latest}")]
    StaleVersion {
        num_attributes: usize,
        requested: u32,
        latest: u32,
    },

    /// The circuit hash computed from `circuit_bytes` does not match the hash the requested
    /// `ZkSpec` names (spec.md §7, "spec mismatch").
    #[error("circuit hash does not match the requested spec")]
    SpecMismatch,

    /// No `ZkSpec` entry exists for the requested `(system, num_attributes)` pair.
    #[error("no ZkSpec entry for system {system:?} with {num_attributes} attributes")]
    UnknownSpec { system: String, num_attributes: usize },
}
