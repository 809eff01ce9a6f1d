//! Error taxonomy for field-level parsing, per spec §7 ("Invalid input" / "Parse failure").

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("field element bytes have wrong length: expected {expected}, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("decoded integer is out of range for the field modulus")]
    OutOfRange,

    #[error("invalid decimal or hex literal: {0}")]
    InvalidLiteral(String),
}
