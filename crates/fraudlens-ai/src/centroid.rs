//! Centroid predictor: hashed bag-of-words embeddings, one centroid per
//! class, cosine similarity to decide which side a message falls on.
//!
//! The model keeps per-class accumulator sums and counts rather than the
//! finished centroids, so retraining folds new examples into the existing
//! state instead of starting over.

use serde::{Deserialize, Serialize};

use fraudlens_core::Label;

use crate::tokenize::{dot, hashed_counts, normalize, tokenize};

/// Default embedding dimensionality for the hashed bag-of-words space.
pub const DEFAULT_DIM: usize = 256;

/// Centroid-based fraud classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentroidModel {
    dim: usize,
    /// Accumulated (unnormalised) embedding sums, indexed legit = 0, fraud = 1.
    sums: [Vec<f32>; 2],
    /// Example counts per class, same indexing.
    counts: [u64; 2],
}

impl CentroidModel {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            sums: [vec![0.0; dim], vec![0.0; dim]],
            counts: [0, 0],
        }
    }

    /// Whether both class centroids have at least one contributing example.
    pub fn is_trained(&self) -> bool {
        self.counts[0] > 0 && self.counts[1] > 0
    }

    /// Fold a batch of labelled examples into the class accumulators.
    pub fn fit(&mut self, batch: &[(String, Label)]) {
        for (text, label) in batch {
            let v = hashed_counts(&tokenize(text), self.dim);
            let idx = *label as usize;
            for (acc, val) in self.sums[idx].iter_mut().zip(&v) {
                *acc += val;
            }
            self.counts[idx] += 1;
        }
    }

    /// Probability mass assigned to the fraud class, in [0, 1].
    ///
    /// Cosine similarities to the two centroids are shifted into [0, 2] and
    /// renormalised against each other. A message equidistant from both
    /// centroids (including the empty message) scores 0.5.
    pub fn fraud_probability(&self, text: &str) -> f32 {
        let v = hashed_counts(&tokenize(text), self.dim);
        let legit = self.similarity(&v, Label::Legit);
        let fraud = self.similarity(&v, Label::Fraud);

        let legit_mass = legit + 1.0;
        let fraud_mass = fraud + 1.0;
        let total = legit_mass + fraud_mass;
        if total <= 0.0 {
            return 0.5;
        }
        fraud_mass / total
    }

    fn similarity(&self, v: &[f32], class: Label) -> f32 {
        let idx = class as usize;
        if self.counts[idx] == 0 {
            return 0.0;
        }
        let mut centroid = self.sums[idx].clone();
        for x in centroid.iter_mut() {
            *x /= self.counts[idx] as f32;
        }
        normalize(&mut centroid);
        dot(v, &centroid)
    }
}

impl Default for CentroidModel {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}
