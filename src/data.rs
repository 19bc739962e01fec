use crate::Error;

/// One observation: a feature vector.
pub type Frame = Vec<f64>;

/// One evaluation unit: an ordered observation matrix plus the segment
/// lengths partitioning it into independent sub-sequences (e.g. repeated
/// recordings of the same item).
///
/// Construction validates the structural preconditions; a `TestSequence`
/// that exists is well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSequence {
    frames: Vec<Frame>,
    lengths: Vec<usize>,
}

impl TestSequence {
    pub fn new(frames: Vec<Frame>, lengths: Vec<usize>) -> Result<Self, Error> {
        if frames.is_empty() {
            return Err(Error::InvalidInput("no frames".into()));
        }
        if lengths.is_empty() {
            return Err(Error::InvalidInput("no segment lengths".into()));
        }
        if lengths.iter().any(|&n| n == 0) {
            return Err(Error::InvalidInput("zero-length segment".into()));
        }
        let total: usize = lengths.iter().sum();
        if total != frames.len() {
            return Err(Error::InvalidInput(format!(
                "segment lengths sum to {total}, expected {}",
                frames.len()
            )));
        }
        let dim = frames[0].len();
        if dim == 0 {
            return Err(Error::InvalidInput("zero-dimensional frames".into()));
        }
        if let Some(t) = frames.iter().position(|f| f.len() != dim) {
            return Err(Error::InvalidInput(format!(
                "frame {t} has {} features, expected {dim}",
                frames[t].len()
            )));
        }
        Ok(Self { frames, lengths })
    }

    /// Build a sequence that is one single segment.
    pub fn whole(frames: Vec<Frame>) -> Result<Self, Error> {
        let n = frames.len();
        Self::new(frames, vec![n])
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Total number of frames across all segments.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.frames[0].len()
    }

    /// The sub-sequences the segment lengths carve out, in order.
    pub fn segments(&self) -> impl Iterator<Item = &[Frame]> {
        self.lengths.iter().scan(0usize, move |offset, &n| {
            let segment = &self.frames[*offset..*offset + n];
            *offset += n;
            Some(segment)
        })
    }
}
