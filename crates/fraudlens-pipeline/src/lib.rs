//! Serving and retraining pipeline: ensemble coordination, record
//! persistence, and the feedback-driven retraining cycle.

pub mod ensemble;
pub mod retrain;
pub mod service;

pub use ensemble::{Analysis, AnalyzeError, Ensemble};
pub use retrain::{CycleOutcome, RetrainError, Retrainer};
pub use service::AnalysisService;
