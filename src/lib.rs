pub mod bank;
pub mod data;
pub mod hmm;
pub mod model;
pub mod recognizer;

pub use bank::ModelBank;
pub use data::{Frame, TestSequence};
pub use model::SequenceModel;
pub use recognizer::{recognize, Recognition, ScoreMap};

/// Errors surfaced by this crate.
///
/// `Evaluation` is special: inside [`recognize`] it is caught per
/// (sequence, label) pair and recorded as a negative-infinity score, never
/// propagated. Everything else reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input collection (empty frames, bad partition, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A model could not produce a log-likelihood for a sequence.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
    /// Pretrained model data could not be parsed.
    #[error("invalid model: {0}")]
    InvalidModel(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
