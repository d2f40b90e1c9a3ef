//! Training-label arbitration from multi-model disagreement.
//!
//! When a verified record's three verdicts disagree, retraining needs a
//! single ground-truth label. The rule is highest-confidence delegation:
//! trust whichever model was most certain, not majority vote. Majority vote
//! would be an equally defensible policy — two models may agree while the
//! third is most confident in the minority label, and that third model wins
//! here. This is a deliberate choice, kept simple and deterministic.

use crate::record::AnalysisRecord;
use crate::verdict::Label;

/// Resolve the single training label for a record.
///
/// Returns the label of the maximum-confidence verdict. Equal confidences
/// resolve to the earliest role in [`PredictorRole::ALL`] order, so the
/// result is deterministic for degenerate inputs.
///
/// The arbitrated label feeds retraining of all three predictors uniformly,
/// including the ones it overrules.
///
/// [`PredictorRole::ALL`]: crate::verdict::PredictorRole::ALL
pub fn resolve_training_label(record: &AnalysisRecord) -> Label {
    // Verdicts are stored in priority order; a strict comparison means the
    // first verdict at the maximum confidence wins ties.
    let mut best = &record.verdicts[0];
    for v in &record.verdicts[1..] {
        if v.confidence > best.confidence {
            best = v;
        }
    }
    best.label
}
