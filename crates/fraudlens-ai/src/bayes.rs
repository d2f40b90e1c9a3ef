//! Multinomial naive Bayes predictor with Laplace smoothing.
//!
//! Counts are additive, so retraining folds new examples into the deployed
//! counts rather than refitting from scratch. Scoring runs in log space and
//! converts back to a fraud probability at the end.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use fraudlens_core::Label;

use crate::tokenize::tokenize;

/// Naive Bayes fraud classifier over the shared token stream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BayesModel {
    /// token → occurrence counts, indexed legit = 0, fraud = 1.
    token_counts: HashMap<String, [u64; 2]>,
    /// Total token occurrences per class.
    class_tokens: [u64; 2],
    /// Document counts per class.
    class_docs: [u64; 2],
}

impl BayesModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both classes have at least one training document.
    pub fn is_trained(&self) -> bool {
        self.class_docs[0] > 0 && self.class_docs[1] > 0
    }

    /// Fold a batch of labelled examples into the counts.
    pub fn fit(&mut self, batch: &[(String, Label)]) {
        for (text, label) in batch {
            let idx = *label as usize;
            self.class_docs[idx] += 1;
            for token in tokenize(text) {
                self.token_counts.entry(token).or_insert([0, 0])[idx] += 1;
                self.class_tokens[idx] += 1;
            }
        }
    }

    /// Probability mass assigned to the fraud class, in [0, 1].
    pub fn fraud_probability(&self, text: &str) -> f32 {
        let total_docs = self.class_docs[0] + self.class_docs[1];
        if total_docs == 0 {
            return 0.5;
        }

        let vocab = self.token_counts.len() as f64;
        let tokens = tokenize(text);

        // Smoothed log priors; the +1/+2 keeps a never-seen class finite.
        let mut scores = [0.0f64; 2];
        for (idx, score) in scores.iter_mut().enumerate() {
            *score = ((self.class_docs[idx] + 1) as f64 / (total_docs + 2) as f64).ln();
            for token in &tokens {
                let count = self
                    .token_counts
                    .get(token)
                    .map(|c| c[idx])
                    .unwrap_or(0);
                let p = (count + 1) as f64 / (self.class_tokens[idx] as f64 + vocab + 1.0);
                *score += p.ln();
            }
        }

        // Softmax of the two log scores, max-subtracted for stability.
        let max = scores[0].max(scores[1]);
        let legit = (scores[0] - max).exp();
        let fraud = (scores[1] - max).exp();
        (fraud / (legit + fraud)) as f32
    }
}
