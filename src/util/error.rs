//! Error types for detpost.

use thiserror::Error;

/// Result alias for detpost operations.
pub type DetPostResult<T> = std::result::Result<T, DetPostError>;

/// Errors raised when the inputs of a decode call disagree with each other.
///
/// Per-candidate rejections (low confidence, out-of-frame boxes) are routine
/// filtering and never surface as errors; an empty detection list is a
/// normal result.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DetPostError {
    /// The flat tensor length is not `num_channels * num_elements`.
    #[error(
        "tensor shape mismatch: expected {expected} values for {num_channels} channels x {num_elements} elements, got {got}"
    )]
    TensorShapeMismatch {
        expected: usize,
        got: usize,
        num_channels: usize,
        num_elements: usize,
    },
    /// The label list length is not `num_channels - 4`.
    #[error("label count mismatch: tensor has {expected} class channels, got {got} labels")]
    LabelCountMismatch { expected: usize, got: usize },
    /// The tensor cannot hold the four geometry channels.
    #[error("tensor has {num_channels} channels, at least 4 geometry channels are required")]
    TooFewChannels { num_channels: usize },
    /// The post-processing configuration is unusable.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}
