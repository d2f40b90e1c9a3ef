//! Class-balance safeguard for retraining batches.
//!
//! A batch containing only one class makes an update step ill-defined or
//! destructive — a classifier trained on a single class drifts toward
//! constant output. The safeguard appends one synthetic counter-example per
//! absent class. It is a minimal correctness guard, not a remedy for broader
//! class imbalance.

use tracing::info;

use crate::verdict::Label;

/// Caller-supplied synthetic examples, one per class.
///
/// Supplied by the retraining orchestrator's configuration rather than baked
/// into the safeguard, so tests and deployments can choose their own
/// placeholder text.
#[derive(Debug, Clone)]
pub struct ClassPlaceholders {
    /// Known-safe example text, injected with [`Label::Legit`].
    pub legit: String,
    /// Known-fraud example text, injected with [`Label::Fraud`].
    pub fraud: String,
}

impl Default for ClassPlaceholders {
    fn default() -> Self {
        Self {
            legit: "Are we still on for lunch tomorrow?".into(),
            fraud: "URGENT: your account is locked, send your password to unlock".into(),
        }
    }
}

/// Ensure a training batch contains at least one example of each class.
///
/// Appends at most one synthetic example per absent class; a batch already
/// containing both classes is returned unchanged. The empty batch is also
/// returned unchanged — skipping empty retraining sets is the caller's
/// decision, and injecting two synthetic rows into nothing would train on
/// pure placeholders.
pub fn ensure_both_classes(
    mut batch: Vec<(String, Label)>,
    placeholders: &ClassPlaceholders,
) -> Vec<(String, Label)> {
    if batch.is_empty() {
        return batch;
    }

    let has_legit = batch.iter().any(|(_, l)| *l == Label::Legit);
    let has_fraud = batch.iter().any(|(_, l)| *l == Label::Fraud);

    if !has_legit {
        info!(class = "legit", "batch missing class, injecting synthetic example");
        batch.push((placeholders.legit.clone(), Label::Legit));
    }
    if !has_fraud {
        info!(class = "fraud", "batch missing class, injecting synthetic example");
        batch.push((placeholders.fraud.clone(), Label::Fraud));
    }

    batch
}
