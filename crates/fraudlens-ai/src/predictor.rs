//! The uniform predictor interface the ensemble coordinates over.
//!
//! Each model is loaded once from its artifact and held for the process
//! lifetime; `predict` takes `&self` and touches no shared mutable state,
//! so concurrent read-only inference is safe.

use std::sync::Arc;

use thiserror::Error;

use fraudlens_core::{PredictorRole, Verdict};

use crate::artifact::{ArtifactError, ArtifactStore};
use crate::bayes::BayesModel;
use crate::centroid::CentroidModel;
use crate::linear::LogisticModel;

#[derive(Debug, Error)]
pub enum PredictError {
    /// The model artifact was loaded but carries no usable training state.
    #[error("{role} predictor has no trained state")]
    Untrained { role: &'static str },
}

/// Uniform interface over the three classifiers.
///
/// Implementations normalise their native output through
/// [`Verdict::from_fraud_probability`], so confidence always means the
/// probability mass assigned to the returned label and is comparable
/// across predictors.
pub trait Predictor: Send + Sync {
    fn role(&self) -> PredictorRole;

    fn predict(&self, text: &str) -> Result<Verdict, PredictError>;
}

impl Predictor for CentroidModel {
    fn role(&self) -> PredictorRole {
        PredictorRole::Centroid
    }

    fn predict(&self, text: &str) -> Result<Verdict, PredictError> {
        if !self.is_trained() {
            return Err(PredictError::Untrained { role: "centroid" });
        }
        Ok(Verdict::from_fraud_probability(
            self.role(),
            self.fraud_probability(text),
        ))
    }
}

impl Predictor for BayesModel {
    fn role(&self) -> PredictorRole {
        PredictorRole::Bayes
    }

    fn predict(&self, text: &str) -> Result<Verdict, PredictError> {
        if !self.is_trained() {
            return Err(PredictError::Untrained { role: "bayes" });
        }
        Ok(Verdict::from_fraud_probability(
            self.role(),
            self.fraud_probability(text),
        ))
    }
}

impl Predictor for LogisticModel {
    fn role(&self) -> PredictorRole {
        PredictorRole::Logistic
    }

    fn predict(&self, text: &str) -> Result<Verdict, PredictError> {
        if !self.is_trained() {
            return Err(PredictError::Untrained { role: "logistic" });
        }
        Ok(Verdict::from_fraud_probability(
            self.role(),
            self.fraud_probability(text),
        ))
    }
}

/// Load all three predictors from their deployed artifacts.
///
/// The returned array is in [`PredictorRole::ALL`] order. Called once at
/// process start by the composition root; a swap performed by a retraining
/// cycle is picked up by the next call, not by already-loaded instances.
pub fn load_predictors(store: &ArtifactStore) -> Result<[Arc<dyn Predictor>; 3], ArtifactError> {
    let centroid: CentroidModel = store.load(PredictorRole::Centroid)?;
    let bayes: BayesModel = store.load(PredictorRole::Bayes)?;
    let logistic: LogisticModel = store.load(PredictorRole::Logistic)?;
    Ok([Arc::new(centroid), Arc::new(bayes), Arc::new(logistic)])
}
