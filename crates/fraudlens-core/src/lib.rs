pub mod arbitrate;
pub mod balance;
pub mod record;
pub mod verdict;

pub use arbitrate::resolve_training_label;
pub use balance::{ClassPlaceholders, ensure_both_classes};
pub use record::AnalysisRecord;
pub use verdict::{Label, LabelError, PredictorRole, Verdict};
