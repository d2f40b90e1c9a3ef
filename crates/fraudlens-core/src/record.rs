//! The persisted analysis record: one row per distinct message content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verdict::{PredictorRole, Verdict};

/// One analysis record per distinct message content.
///
/// Created once when a message is first analysed; the three verdicts are
/// written together at creation and never refreshed, even after the
/// predictors are retrained — re-submitting known content returns the
/// original predictions. `verified` and `used_for_training` are the only
/// mutable fields, and each transitions false → true exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub content: String,
    /// One verdict per role, in [`PredictorRole::ALL`] order.
    pub verdicts: [Verdict; 3],
    pub verified: bool,
    pub used_for_training: bool,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisRecord {
    /// The verdict for a given role.
    pub fn verdict(&self, role: PredictorRole) -> &Verdict {
        &self.verdicts[role.priority()]
    }
}
