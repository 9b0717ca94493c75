//! Seeded, traceable randomness.
//!
//! Every random decision in the engine flows through [`TraceRng`] so a whole
//! generation run can be replayed from a seed, and each decision leaves a
//! `(label, outcome)` entry behind for diagnostics.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use super::errors::{EngineError, Result};

/// One recorded random decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub label: String,
    pub outcome: String,
}

/// Deterministic RNG wrapper around ChaCha8.
///
/// ChaCha8 keeps the stream identical across platforms and releases, which is
/// what makes "same seed, same call sequence, same session" hold. One instance
/// must be consumed strictly in call order; independent sessions each own
/// their own instance.
#[derive(Debug, Clone)]
pub struct TraceRng {
    rng: ChaCha8Rng,
    trace: Vec<TraceEntry>,
}

impl TraceRng {
    pub fn seed_from(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            trace: Vec::new(),
        }
    }

    /// All decisions recorded so far, in call order.
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Pick exactly one candidate with probability proportional to its weight.
    ///
    /// Zero candidates, mismatched lengths, a negative weight, or an all-zero
    /// weight vector is a contract violation and propagates as
    /// [`EngineError::InvalidSamplingInput`], never silently resolved.
    pub fn weighted_choice<T>(
        &mut self,
        candidates: &[T],
        weights: &[f64],
        label: &str,
    ) -> Result<T>
    where
        T: Clone + std::fmt::Display,
    {
        if candidates.is_empty() {
            return Err(invalid(label, "no candidates"));
        }
        if candidates.len() != weights.len() {
            return Err(invalid(label, "candidates/weights length mismatch"));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(label, "negative or non-finite weight"));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(invalid(label, "non-positive total weight"));
        }

        let x = self.rng.gen::<f64>() * total;
        let mut acc = 0.0;
        let mut chosen = candidates.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            acc += w;
            if x < acc {
                chosen = i;
                break;
            }
        }
        // Floating-point edge: if x landed past the accumulated total, fall
        // back to the last candidate with positive weight.
        if weights[chosen] == 0.0 {
            if let Some(i) = weights.iter().rposition(|w| *w > 0.0) {
                chosen = i;
            }
        }

        let outcome = candidates[chosen].clone();
        trace!(label, outcome = %outcome, "weighted_choice");
        self.trace.push(TraceEntry {
            label: label.to_string(),
            outcome: outcome.to_string(),
        });
        Ok(outcome)
    }

    /// Uniform integer draw over `lo..=hi`, recorded in the trace.
    pub fn roll_range(&mut self, lo: i64, hi: i64, label: &str) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let value = if lo == hi {
            lo
        } else {
            self.rng.gen_range(lo..=hi)
        };
        trace!(label, value, "roll_range");
        self.trace.push(TraceEntry {
            label: label.to_string(),
            outcome: value.to_string(),
        });
        value
    }
}

fn invalid(label: &str, reason: &str) -> EngineError {
    EngineError::InvalidSamplingInput {
        label: label.to_string(),
        reason: reason.to_string(),
    }
}
