use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SumcheckError {
    #[error("layer {layer} round {round}: p(0) + p(1) = {got} does not match the running claim {want}")]
    RoundMismatch {
        layer: usize,
        round: usize,
        got: String,
        want: String,
    },

    #[error("layer {layer}: final check wc0 * wc1 * Quad(rx, ry) does not match the reduced claim")]
    FinalCheckFailed { layer: usize },

    #[error("layer {layer}: expected {expected} round polynomials for this phase, found {found}")]
    WrongRoundCount {
        layer: usize,
        expected: usize,
        found: usize,
    },

    #[error("proof is missing the layer at index {0}")]
    MissingLayer(usize),

    #[error(transparent)]
    Transcript(#[from] longfellow_transcript::TranscriptError),
}
