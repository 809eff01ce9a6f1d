use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("circuit bytes truncated: expected at least {expected} more bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("wire or constant index {index} out of range (max {max})")]
    OutOfRange { index: u64, max: u64 },

    #[error("quadratic terms are not in canonical sorted order at layer {layer}")]
    NonCanonicalOrder { layer: usize },

    #[error("field element at constant-table index {index} does not decode")]
    BadConstant { index: usize },

    #[error("circuit evaluated to a nonzero output: witness does not satisfy the circuit")]
    NonzeroOutput,
}
