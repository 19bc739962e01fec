use std::collections::HashMap;

use crate::bank::ModelBank;
use crate::data::TestSequence;
use crate::model::SequenceModel;

/// Per-class log-likelihoods for one test sequence. Holds an entry for
/// every label in the bank; failed evaluations hold `f64::NEG_INFINITY`.
pub type ScoreMap = HashMap<String, f64>;

/// Output of [`recognize`]: both vectors are index-aligned with the input
/// test sequences. A guess is `""` when no model scored above the
/// negative-infinity sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recognition {
    pub score_maps: Vec<ScoreMap>,
    pub guesses: Vec<String>,
}

/// Score every test sequence against every model in the bank and pick the
/// maximum-likelihood label per sequence.
///
/// A model that fails to evaluate a sequence contributes the sentinel
/// `f64::NEG_INFINITY` for that (sequence, label) pair and the batch keeps
/// going; such failures are recorded at debug level only. Ties keep the
/// earliest label in the bank's insertion order. Inputs are never mutated
/// and calling twice with the same inputs yields the same outputs.
pub fn recognize<M: SequenceModel>(bank: &ModelBank<M>, test_set: &[TestSequence]) -> Recognition {
    let mut score_maps = Vec::with_capacity(test_set.len());
    let mut guesses = Vec::with_capacity(test_set.len());
    for (idx, seq) in test_set.iter().enumerate() {
        let mut scores = ScoreMap::with_capacity(bank.len());
        let mut best_score = f64::NEG_INFINITY;
        let mut best_label = String::new();
        for (label, model) in bank.iter() {
            let logl = match model.score(seq.frames(), seq.lengths()) {
                Ok(logl) => logl,
                Err(e) => {
                    log::debug!("model '{label}' failed on sequence {idx}: {e}");
                    f64::NEG_INFINITY
                }
            };
            scores.insert(label.to_string(), logl);
            /* Strict greater-than: equal scores keep the earlier label. */
            if logl > best_score {
                best_score = logl;
                best_label = label.to_string();
            }
        }
        score_maps.push(scores);
        guesses.push(best_label);
    }
    Recognition { score_maps, guesses }
}
