//! Feedback-driven retraining cycle.
//!
//! One cycle walks `Fetching → Arbitrating → Balancing → Training(×3) →
//! Swapping → MarkingConsumed` and exits to idle on failure at any stage
//! with no partial state carried over: staged artifacts are discarded, no
//! consumption flag is set, and the next cycle re-fetches from scratch.
//! Consumption is all-or-nothing — a record is only marked used after all
//! three predictors trained and swapped, so a failed cycle retries with the
//! same data plus anything newly verified since.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use fraudlens_ai::{
    ArtifactError, ArtifactStore, BayesModel, CentroidModel, LogisticModel, StagedArtifact,
};
use fraudlens_core::{
    ClassPlaceholders, Label, PredictorRole, ensure_both_classes, resolve_training_label,
};
use fraudlens_store::{MessageStore, StoreError};

#[derive(Debug, Error)]
pub enum RetrainError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// One or more predictors failed to train; none was swapped.
    #[error("training failed for: {0}")]
    Training(String),

    #[error("artifact swap failed for {role}: {source}")]
    Swap {
        role: &'static str,
        source: ArtifactError,
    },
}

/// Outcome of one retraining cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No verified, unconsumed records existed; nothing was touched.
    NoCandidates,
    /// All three predictors retrained and swapped; records consumed.
    Completed { records: usize },
}

/// Drives the retraining cycle over the store and artifact directory.
///
/// Runs as an infrequent batch job beside serving. It takes no lock shared
/// with `/analyze` or verification traffic; the only touch point is the
/// artifact swap, and adapters already loaded keep serving the old model
/// until their process reloads.
pub struct Retrainer {
    store: Arc<MessageStore>,
    artifacts: ArtifactStore,
    placeholders: ClassPlaceholders,
}

impl Retrainer {
    pub fn new(store: Arc<MessageStore>, artifacts: ArtifactStore) -> Self {
        Self {
            store,
            artifacts,
            placeholders: ClassPlaceholders::default(),
        }
    }

    pub fn with_placeholders(mut self, placeholders: ClassPlaceholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Run one full retraining cycle.
    pub fn run_cycle(&self) -> Result<CycleOutcome, RetrainError> {
        // Fetching.
        let records = self.store.training_candidates()?;
        if records.is_empty() {
            info!("no verified unconsumed records, skipping retraining");
            return Ok(CycleOutcome::NoCandidates);
        }
        info!(count = records.len(), "fetched records for retraining");

        // Arbitrating: one ground-truth label per record, fed to all three
        // predictors uniformly.
        let batch: Vec<(String, Label)> = records
            .iter()
            .map(|r| (r.content.clone(), resolve_training_label(r)))
            .collect();

        // Balancing + Training, isolated per role: one role's failure must
        // not stop the others from attempting their fit.
        let mut staged: Vec<StagedArtifact> = Vec::new();
        let mut failures: Vec<String> = Vec::new();
        for role in PredictorRole::ALL {
            let balanced = ensure_both_classes(batch.clone(), &self.placeholders);
            match self.train_role(role, &balanced) {
                Ok(s) => {
                    info!(role = role.as_str(), examples = balanced.len(), "trained predictor");
                    staged.push(s);
                }
                Err(e) => {
                    warn!(role = role.as_str(), error = %e, "predictor training failed");
                    failures.push(format!("{}: {}", role.as_str(), e));
                }
            }
        }
        if !failures.is_empty() {
            // Dropping the staged artifacts discards them; every deployed
            // artifact stays as it was and no record is consumed.
            return Err(RetrainError::Training(failures.join("; ")));
        }

        // Swapping: all three trained, deploy each atomically.
        for s in staged {
            let role = s.role();
            s.swap().map_err(|source| RetrainError::Swap {
                role: role.as_str(),
                source,
            })?;
        }

        // MarkingConsumed: only now, after every swap landed.
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        self.store.mark_consumed(&ids)?;
        info!(records = ids.len(), "retraining cycle complete");
        Ok(CycleOutcome::Completed {
            records: ids.len(),
        })
    }

    /// Load the deployed model for a role, fold in the batch, stage the
    /// replacement artifact without deploying it.
    fn train_role(
        &self,
        role: PredictorRole,
        batch: &[(String, Label)],
    ) -> Result<StagedArtifact, ArtifactError> {
        match role {
            PredictorRole::Centroid => {
                let mut model: CentroidModel = self.artifacts.load(role)?;
                model.fit(batch);
                self.artifacts.stage(role, &model)
            }
            PredictorRole::Bayes => {
                let mut model: BayesModel = self.artifacts.load(role)?;
                model.fit(batch);
                self.artifacts.stage(role, &model)
            }
            PredictorRole::Logistic => {
                let mut model: LogisticModel = self.artifacts.load(role)?;
                model.fit(batch);
                self.artifacts.stage(role, &model)
            }
        }
    }
}
