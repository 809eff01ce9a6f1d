use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("point is not on the curve")]
    NotOnCurve,

    #[error("coordinate bytes have wrong length: expected {expected}, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("coordinate is out of range for the base field")]
    OutOfRange,
}
