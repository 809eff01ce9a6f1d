use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("exhausted rejection-sampling budget squeezing a field element")]
    RejectionSamplingExhausted,
}
