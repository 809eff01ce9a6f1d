use thiserror::Error;

/// Errors surfaced while committing to or discharging claims against a Ligero tableau, per
/// spec.md §7 ("Ligero response/opening mismatch, Merkle path authentication failure").
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LigeroError {
    #[error("witness longer than the tableau can hold: {len} > {capacity}")]
    WitnessTooLarge { len: usize, capacity: usize },
    #[error("evaluation point has {got} bits, tableau expects {want}")]
    PointLength { got: usize, want: usize },
    #[error("column {index} failed Merkle authentication")]
    MerkleMismatch { index: usize },
    #[error("column {index} failed the row-combination consistency check for claim {claim}")]
    ColumnConsistency { index: usize, claim: usize },
    #[error("claim {claim}'s value check failed: response does not reconstruct the claimed evaluation")]
    ValueCheck { claim: usize },
    #[error("quadratic claim {claim}'s Hadamard check failed at opened column {index}")]
    QuadraticMismatch { claim: usize, index: usize },
    #[error("proof carries {got} responses, expected {want}")]
    ResponseCountMismatch { got: usize, want: usize },
    #[error("transcript error: {0}")]
    Transcript(#[from] longfellow_transcript::TranscriptError),
}
