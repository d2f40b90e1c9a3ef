//! Model artifact storage with atomic swap.
//!
//! Each predictor role owns one JSON artifact in the model directory
//! (`centroid.json`, `bayes.json`, `logistic.json`), independently
//! swappable. Replacement is staged: the new artifact is written to a
//! temporary file in the same directory, then renamed over the serving
//! path in a single step, so a reader opening the path sees either the
//! fully old or fully new artifact, never a partial write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use fraudlens_core::PredictorRole;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact for {role} not found at {path}")]
    Missing { role: &'static str, path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Filesystem layout for the three predictor artifacts.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serving path for a role's artifact.
    pub fn path(&self, role: PredictorRole) -> PathBuf {
        self.dir.join(format!("{}.json", role.as_str()))
    }

    pub fn exists(&self, role: PredictorRole) -> bool {
        self.path(role).is_file()
    }

    /// Load the deployed artifact for a role.
    pub fn load<M: DeserializeOwned>(&self, role: PredictorRole) -> Result<M, ArtifactError> {
        let path = self.path(role);
        if !path.is_file() {
            return Err(ArtifactError::Missing {
                role: role.as_str(),
                path,
            });
        }
        let bytes = fs::read(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write an artifact directly to its serving path, staged and swapped.
    ///
    /// Used by the bootstrap path where there is no previous artifact to
    /// protect; still goes through the staged rename so a crash mid-write
    /// never leaves a truncated file at the serving path.
    pub fn save<M: Serialize>(&self, role: PredictorRole, model: &M) -> Result<(), ArtifactError> {
        self.stage(role, model)?.swap()
    }

    /// Stage a new artifact next to the serving path without deploying it.
    ///
    /// The temporary file lives in the artifact directory so the final
    /// rename stays on one filesystem and remains atomic. Dropping the
    /// returned [`StagedArtifact`] without calling [`swap`](StagedArtifact::swap)
    /// discards the staged file and leaves the deployed artifact untouched.
    pub fn stage<M: Serialize>(
        &self,
        role: PredictorRole,
        model: &M,
    ) -> Result<StagedArtifact, ArtifactError> {
        fs::create_dir_all(&self.dir)?;
        let mut file = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut file, model)?;
        file.flush()?;
        Ok(StagedArtifact {
            role,
            target: self.path(role),
            file,
        })
    }
}

/// A fully written replacement artifact awaiting deployment.
pub struct StagedArtifact {
    role: PredictorRole,
    target: PathBuf,
    file: NamedTempFile,
}

impl StagedArtifact {
    pub fn role(&self) -> PredictorRole {
        self.role
    }

    /// Atomically rename the staged file over the serving path.
    pub fn swap(self) -> Result<(), ArtifactError> {
        self.file
            .persist(&self.target)
            .map_err(|e| ArtifactError::Io(e.error))?;
        info!(role = self.role.as_str(), path = %self.target.display(), "artifact swapped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centroid::CentroidModel;
    use fraudlens_core::Label;

    fn model() -> CentroidModel {
        let mut m = CentroidModel::default();
        m.fit(&[
            ("free prize now".into(), Label::Fraud),
            ("lunch at noon".into(), Label::Legit),
        ]);
        m
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        store.save(PredictorRole::Centroid, &model()).unwrap();
        assert!(store.exists(PredictorRole::Centroid));

        let loaded: CentroidModel = store.load(PredictorRole::Centroid).unwrap();
        assert!(loaded.is_trained());
    }

    #[test]
    fn load_missing_artifact_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        let result: Result<CentroidModel, _> = store.load(PredictorRole::Bayes);
        assert!(matches!(result, Err(ArtifactError::Missing { role: "bayes", .. })));
    }

    #[test]
    fn staged_artifact_does_not_deploy_until_swap() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        let staged = store.stage(PredictorRole::Centroid, &model()).unwrap();
        assert!(!store.exists(PredictorRole::Centroid));

        staged.swap().unwrap();
        assert!(store.exists(PredictorRole::Centroid));
    }

    #[test]
    fn dropped_stage_leaves_deployed_artifact_untouched() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        store.save(PredictorRole::Centroid, &model()).unwrap();
        let before = fs::read(store.path(PredictorRole::Centroid)).unwrap();

        let mut replacement = CentroidModel::default();
        replacement.fit(&[("other text".into(), Label::Fraud)]);
        let staged = store.stage(PredictorRole::Centroid, &replacement).unwrap();
        drop(staged);

        let after = fs::read(store.path(PredictorRole::Centroid)).unwrap();
        assert_eq!(before, after);
        // No stray temp files left behind.
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn swap_replaces_previous_artifact() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        store.save(PredictorRole::Centroid, &model()).unwrap();

        let mut updated = model();
        updated.fit(&[("wire transfer fee".into(), Label::Fraud)]);
        store
            .stage(PredictorRole::Centroid, &updated)
            .unwrap()
            .swap()
            .unwrap();

        let loaded: CentroidModel = store.load(PredictorRole::Centroid).unwrap();
        let p_new = loaded.fraud_probability("wire transfer fee");
        let p_old = model().fraud_probability("wire transfer fee");
        assert!(p_new > p_old);
    }

    #[test]
    fn roles_swap_independently() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path());

        store.save(PredictorRole::Centroid, &model()).unwrap();
        let centroid_bytes = fs::read(store.path(PredictorRole::Centroid)).unwrap();

        store
            .save(PredictorRole::Bayes, &crate::BayesModel::new())
            .unwrap();

        assert_eq!(
            fs::read(store.path(PredictorRole::Centroid)).unwrap(),
            centroid_bytes
        );
    }
}
