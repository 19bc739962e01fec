//! Diagonal-covariance Gaussian-emission HMM scoring.
//!
//! Parameters are estimated elsewhere; this module only evaluates
//! log-likelihoods. All recurrences run in log space so long sequences do
//! not underflow.

use std::{fs::File, io::Read, path::Path};

use serde::{Deserialize, Serialize};

use super::math::{ln_prob, log_sum_exp, log_sum_exp_slice};
use crate::{bank::ModelBank, data::Frame, model::SequenceModel, Error};

/// Probability-sum tolerance when validating pretrained parameters.
const PROB_TOL: f64 = 1e-6;

/// A pretrained hidden Markov model with diagonal-covariance Gaussian
/// emissions.
///
/// `start` has one entry per state; `trans` is `n_states * n_states`
/// row-major; `means` and `vars` are `n_states * n_features` row-major.
/// Probabilities are stored in probability space and mapped to log space
/// during evaluation.
///
/// Degenerate parameter estimates (a collapsed variance, say) are accepted
/// at construction and surface as recoverable [`Error::Evaluation`] when
/// the model is asked to score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianHmm {
    n_states: usize,
    n_features: usize,
    start: Vec<f64>,
    trans: Vec<f64>,
    means: Vec<f64>,
    vars: Vec<f64>,
}

impl GaussianHmm {
    pub fn new(
        n_states: usize,
        n_features: usize,
        start: Vec<f64>,
        trans: Vec<f64>,
        means: Vec<f64>,
        vars: Vec<f64>,
    ) -> Result<Self, Error> {
        let this = Self { n_states, n_features, start, trans, means, vars };
        this.validate()?;
        Ok(this)
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn validate(&self) -> Result<(), Error> {
        if self.n_states == 0 {
            return Err(Error::InvalidInput("n_states must be > 0".into()));
        }
        if self.n_features == 0 {
            return Err(Error::InvalidInput("n_features must be > 0".into()));
        }
        if self.start.len() != self.n_states {
            return Err(Error::InvalidInput(format!(
                "start length {} != n_states {}",
                self.start.len(),
                self.n_states
            )));
        }
        if self.trans.len() != self.n_states * self.n_states {
            return Err(Error::InvalidInput(format!(
                "trans length {} != n_states^2 {}",
                self.trans.len(),
                self.n_states * self.n_states
            )));
        }
        let expected = self.n_states * self.n_features;
        if self.means.len() != expected || self.vars.len() != expected {
            return Err(Error::InvalidInput(format!(
                "means/vars lengths {}/{} != n_states*n_features {expected}",
                self.means.len(),
                self.vars.len()
            )));
        }
        check_distribution("start", &self.start)?;
        for i in 0..self.n_states {
            let row = &self.trans[i * self.n_states..(i + 1) * self.n_states];
            check_distribution(&format!("trans row {i}"), row)?;
        }
        Ok(())
    }

    /// Log-density of `frame` under the given state's diagonal Gaussian.
    fn log_emission(&self, state: usize, frame: &[f64]) -> Result<f64, Error> {
        if frame.len() != self.n_features {
            return Err(Error::Evaluation(format!(
                "frame has {} features, model expects {}",
                frame.len(),
                self.n_features
            )));
        }
        let mut acc = 0.0;
        for d in 0..self.n_features {
            let mean = self.means[state * self.n_features + d];
            let var = self.vars[state * self.n_features + d];
            if !var.is_finite() || var <= 0.0 {
                return Err(Error::Evaluation(format!(
                    "degenerate variance {var} in state {state}"
                )));
            }
            let diff = frame[d] - mean;
            acc += (2.0 * std::f64::consts::PI * var).ln() + diff * diff / var;
        }
        let logp = -0.5 * acc;
        if logp.is_nan() {
            return Err(Error::Evaluation("emission density is NaN".into()));
        }
        Ok(logp)
    }

    /// Forward algorithm over one segment, in log space.
    fn forward(&self, segment: &[Frame]) -> Result<f64, Error> {
        let n = self.n_states;
        let mut alpha = vec![f64::NEG_INFINITY; n];
        for i in 0..n {
            alpha[i] = ln_prob(self.start[i]) + self.log_emission(i, &segment[0])?;
        }
        let mut next = vec![f64::NEG_INFINITY; n];
        for frame in &segment[1..] {
            for j in 0..n {
                let mut acc = f64::NEG_INFINITY;
                for i in 0..n {
                    acc = log_sum_exp(acc, alpha[i] + ln_prob(self.trans[i * n + j]));
                }
                next[j] = acc + self.log_emission(j, frame)?;
            }
            std::mem::swap(&mut alpha, &mut next);
        }
        Ok(log_sum_exp_slice(&alpha))
    }
}

fn check_distribution(what: &str, row: &[f64]) -> Result<(), Error> {
    if row.iter().any(|&p| !p.is_finite() || p < 0.0) {
        return Err(Error::InvalidInput(format!("{what} has a bad probability")));
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > PROB_TOL {
        return Err(Error::InvalidInput(format!(
            "{what} sums to {sum}, expected ~1.0"
        )));
    }
    Ok(())
}

impl SequenceModel for GaussianHmm {
    /// Sum of per-segment forward log-likelihoods.
    fn score(&self, frames: &[Frame], lengths: &[usize]) -> Result<f64, Error> {
        if frames.is_empty() || lengths.is_empty() {
            return Err(Error::InvalidInput("empty observation sequence".into()));
        }
        let total: usize = lengths.iter().sum();
        if total != frames.len() {
            return Err(Error::InvalidInput(format!(
                "segment lengths sum to {total}, expected {}",
                frames.len()
            )));
        }
        let mut logl = 0.0;
        let mut offset = 0;
        for &n in lengths {
            if n == 0 {
                return Err(Error::InvalidInput("zero-length segment".into()));
            }
            logl += self.forward(&frames[offset..offset + n])?;
            offset += n;
        }
        if logl.is_nan() {
            return Err(Error::Evaluation("log-likelihood is NaN".into()));
        }
        Ok(logl)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BankEntry {
    label: String,
    model: GaussianHmm,
}

/// Load a pretrained model bank from a JSON array of `{label, model}`
/// entries. Entry order becomes bank order.
pub fn bank_from_memory(bytes: &[u8]) -> Result<ModelBank<GaussianHmm>, Error> {
    let entries: Vec<BankEntry> = serde_json::from_slice(bytes)?;
    if entries.is_empty() {
        log::warn!("model bank is empty");
    }
    let mut bank = ModelBank::new();
    for entry in entries {
        entry.model.validate()?;
        if bank.contains(&entry.label) {
            return Err(Error::InvalidInput(format!(
                "duplicate label '{}'",
                entry.label
            )));
        }
        bank.insert(entry.label, entry.model);
    }
    Ok(bank)
}

pub fn bank_from_path(path: impl AsRef<Path>) -> Result<ModelBank<GaussianHmm>, Error> {
    let mut buf = Vec::new();
    File::open(path)?.read_to_end(&mut buf)?;
    bank_from_memory(&buf)
}
