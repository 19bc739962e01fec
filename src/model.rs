use crate::data::Frame;
use crate::Error;

/// The one capability a bank entry must provide: evaluate the
/// log-likelihood of an observation matrix whose rows are partitioned into
/// independent sub-sequences by `lengths`.
///
/// How the model was trained and which probability family it uses are the
/// trainer's business; the recognizer only ever calls this method.
/// Evaluation may fail for numerically degenerate model/input combinations
/// and such failures are expected and non-fatal.
pub trait SequenceModel {
    fn score(&self, frames: &[Frame], lengths: &[usize]) -> Result<f64, Error>;
}

impl<'a, M: SequenceModel + ?Sized> SequenceModel for &'a M {
    fn score(&self, frames: &[Frame], lengths: &[usize]) -> Result<f64, Error> {
        (**self).score(frames, lengths)
    }
}

impl<M: SequenceModel + ?Sized> SequenceModel for Box<M> {
    fn score(&self, frames: &[Frame], lengths: &[usize]) -> Result<f64, Error> {
        (**self).score(frames, lengths)
    }
}
