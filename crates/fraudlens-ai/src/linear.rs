//! Logistic-regression predictor over hashed features.
//!
//! Stochastic gradient descent with a fixed learning rate; retraining
//! continues from the deployed weights (warm start) rather than refitting
//! from zero, so accumulated feedback nudges the boundary instead of
//! replacing it.

use serde::{Deserialize, Serialize};

use fraudlens_core::Label;

use crate::tokenize::{dot, hashed_counts, tokenize};

/// Default feature-space dimensionality.
pub const DEFAULT_DIM: usize = 1024;

const LEARNING_RATE: f32 = 0.5;
const EPOCHS: usize = 20;

/// Logistic-regression fraud classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    dim: usize,
    weights: Vec<f32>,
    bias: f32,
    /// Total examples seen across all fits.
    seen: u64,
}

impl LogisticModel {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            weights: vec![0.0; dim],
            bias: 0.0,
            seen: 0,
        }
    }

    /// Whether the model has seen any training examples.
    pub fn is_trained(&self) -> bool {
        self.seen > 0
    }

    /// Run SGD over the batch, continuing from the current weights.
    pub fn fit(&mut self, batch: &[(String, Label)]) {
        let features: Vec<(Vec<f32>, f32)> = batch
            .iter()
            .map(|(text, label)| {
                let x = hashed_counts(&tokenize(text), self.dim);
                (x, label.as_i64() as f32)
            })
            .collect();

        for _ in 0..EPOCHS {
            for (x, y) in &features {
                let p = sigmoid(dot(&self.weights, x) + self.bias);
                let g = p - y;
                for (w, xi) in self.weights.iter_mut().zip(x) {
                    *w -= LEARNING_RATE * g * xi;
                }
                self.bias -= LEARNING_RATE * g;
            }
        }
        self.seen += batch.len() as u64;
    }

    /// Probability mass assigned to the fraud class, in [0, 1].
    pub fn fraud_probability(&self, text: &str) -> f32 {
        let x = hashed_counts(&tokenize(text), self.dim);
        sigmoid(dot(&self.weights, &x) + self.bias)
    }
}

impl Default for LogisticModel {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}
