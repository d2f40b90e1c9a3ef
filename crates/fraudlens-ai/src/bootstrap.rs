//! Initial offline fit of all three predictors.
//!
//! Serving needs deployed artifacts to load; this is the one-shot path that
//! creates them from a labelled starter set before the feedback loop has
//! produced anything.

use tracing::info;

use fraudlens_core::{Label, PredictorRole};

use crate::artifact::{ArtifactError, ArtifactStore};
use crate::bayes::BayesModel;
use crate::centroid::CentroidModel;
use crate::linear::LogisticModel;

/// Fit all three models on a labelled dataset and deploy their artifacts.
///
/// Overwrites any existing artifacts (each through the staged atomic swap).
pub fn bootstrap(store: &ArtifactStore, data: &[(String, Label)]) -> Result<(), ArtifactError> {
    let mut centroid = CentroidModel::default();
    centroid.fit(data);
    store.save(PredictorRole::Centroid, &centroid)?;

    let mut bayes = BayesModel::new();
    bayes.fit(data);
    store.save(PredictorRole::Bayes, &bayes)?;

    let mut logistic = LogisticModel::default();
    logistic.fit(data);
    store.save(PredictorRole::Logistic, &logistic)?;

    info!(examples = data.len(), dir = %store.dir().display(), "bootstrapped predictor artifacts");
    Ok(())
}
