//! Ensemble coordinator: one message in, three verdicts and a best pick out.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use fraudlens_ai::{PredictError, Predictor};
use fraudlens_core::{PredictorRole, Verdict};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no message provided")]
    EmptyMessage,

    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Combined result of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// All three verdicts, in [`PredictorRole::ALL`] order.
    pub verdicts: [Verdict; 3],
    /// The highest-confidence verdict.
    pub best: Verdict,
}

/// The fixed three-predictor ensemble.
///
/// Holds shared handles to the predictors loaded at process start; analysis
/// takes `&self` and the predictors are read-only, so concurrent requests
/// share one ensemble.
pub struct Ensemble {
    predictors: [Arc<dyn Predictor>; 3],
}

impl Ensemble {
    /// Build an ensemble from predictors in [`PredictorRole::ALL`] order.
    pub fn new(predictors: [Arc<dyn Predictor>; 3]) -> Self {
        debug_assert!(
            predictors
                .iter()
                .zip(PredictorRole::ALL)
                .all(|(p, role)| p.role() == role),
            "predictors must be supplied in role priority order"
        );
        Self { predictors }
    }

    /// Run all three predictors on a message and select the best verdict.
    ///
    /// Fails on the empty message, and on any single predictor failure —
    /// a two-of-three partial result is not an accepted degraded mode.
    ///
    /// Best selection takes the maximum-confidence verdict; equal
    /// confidences resolve to the earliest role in [`PredictorRole::ALL`]
    /// order, so degenerate inputs still produce a deterministic pick.
    pub fn analyze(&self, message: &str) -> Result<Analysis, AnalyzeError> {
        if message.is_empty() {
            return Err(AnalyzeError::EmptyMessage);
        }

        let verdicts = [
            self.predictors[0].predict(message)?,
            self.predictors[1].predict(message)?,
            self.predictors[2].predict(message)?,
        ];

        // Strict comparison: the first verdict at the maximum wins ties.
        let mut best = verdicts[0];
        for v in &verdicts[1..] {
            if v.confidence > best.confidence {
                best = *v;
            }
        }

        Ok(Analysis { verdicts, best })
    }
}
