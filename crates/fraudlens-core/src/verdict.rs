//! Labels, predictor roles, and the verdict type shared across the ensemble.
//!
//! A verdict is one predictor's `(label, confidence)` output for a message.
//! Confidence is always the probability mass assigned to the *returned*
//! label, never to the positive class — the normalisation lives in
//! [`Verdict::from_fraud_probability`] so every predictor reports on the
//! same scale and confidences are comparable across the ensemble.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary classification label: fraud = 1, legit = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Legit,
    Fraud,
}

#[derive(Debug, Error)]
#[error("invalid label value {0}, expected 0 or 1")]
pub struct LabelError(pub i64);

impl Label {
    /// Integer wire/storage form: legit = 0, fraud = 1.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Legit => 0,
            Self::Fraud => 1,
        }
    }

    pub fn from_i64(v: i64) -> Result<Self, LabelError> {
        match v {
            0 => Ok(Self::Legit),
            1 => Ok(Self::Fraud),
            other => Err(LabelError(other)),
        }
    }
}

/// The three fixed predictor roles in the ensemble.
///
/// Declaration order is the tie-break priority order: when two verdicts
/// carry equal confidence, the earlier role wins. This keeps best-verdict
/// selection and label arbitration deterministic for degenerate inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorRole {
    Centroid,
    Bayes,
    Logistic,
}

impl PredictorRole {
    /// All roles in priority order.
    pub const ALL: [PredictorRole; 3] = [Self::Centroid, Self::Bayes, Self::Logistic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Centroid => "centroid",
            Self::Bayes => "bayes",
            Self::Logistic => "logistic",
        }
    }

    /// Position in the priority order (0 = highest priority).
    pub fn priority(self) -> usize {
        Self::ALL
            .iter()
            .position(|r| *r == self)
            .unwrap_or(Self::ALL.len())
    }
}

/// One predictor's output for a message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub role: PredictorRole,
    pub label: Label,
    /// Probability mass assigned to `label`, in [0, 1].
    pub confidence: f32,
}

impl Verdict {
    /// Build a verdict from a model's fraud-class probability.
    ///
    /// `p > 0.5` yields `(Fraud, p)`, otherwise `(Legit, 1 − p)`. The input
    /// is clamped to [0, 1] so a model numerically overshooting the range
    /// cannot produce an out-of-range confidence.
    pub fn from_fraud_probability(role: PredictorRole, p: f32) -> Self {
        let p = p.clamp(0.0, 1.0);
        if p > 0.5 {
            Self {
                role,
                label: Label::Fraud,
                confidence: p,
            }
        } else {
            Self {
                role,
                label: Label::Legit,
                confidence: 1.0 - p,
            }
        }
    }
}
