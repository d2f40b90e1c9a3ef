//! Analysis service: ensemble inference plus record persistence.

use std::sync::Arc;

use tracing::warn;

use fraudlens_store::MessageStore;

use crate::ensemble::{Analysis, AnalyzeError, Ensemble};

/// Serving-side composition of the ensemble and the record store.
pub struct AnalysisService {
    ensemble: Ensemble,
    store: Arc<MessageStore>,
}

impl AnalysisService {
    pub fn new(ensemble: Ensemble, store: Arc<MessageStore>) -> Self {
        Self { ensemble, store }
    }

    /// Analyse a message and persist the result.
    ///
    /// The response is independent of persistence: inference succeeded, so
    /// the caller gets the analysis even when the store write fails (logged,
    /// not fatal) or the content was already on file (deduplicated).
    pub fn analyze(&self, message: &str) -> Result<Analysis, AnalyzeError> {
        let analysis = self.ensemble.analyze(message)?;

        if let Err(e) = self.store.get_or_create(message, &analysis.verdicts) {
            warn!(error = %e, "failed to persist analysis record");
        }

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraudlens_ai::{PredictError, Predictor};
    use fraudlens_core::{Label, PredictorRole, Verdict};

    struct Stub {
        role: PredictorRole,
        p: f32,
    }

    impl Predictor for Stub {
        fn role(&self) -> PredictorRole {
            self.role
        }

        fn predict(&self, _text: &str) -> Result<Verdict, PredictError> {
            Ok(Verdict::from_fraud_probability(self.role, self.p))
        }
    }

    fn service(store: Arc<MessageStore>) -> AnalysisService {
        let roles = PredictorRole::ALL;
        let ensemble = Ensemble::new([
            Arc::new(Stub {
                role: roles[0],
                p: 0.9,
            }) as Arc<dyn Predictor>,
            Arc::new(Stub {
                role: roles[1],
                p: 0.3,
            }),
            Arc::new(Stub {
                role: roles[2],
                p: 0.6,
            }),
        ]);
        AnalysisService::new(ensemble, store)
    }

    #[test]
    fn analyze_persists_one_record() {
        let store = Arc::new(MessageStore::in_memory().unwrap());
        let svc = service(store.clone());

        let a = svc.analyze("you've won a free iphone, click here").unwrap();
        assert_eq!(a.best.label, Label::Fraud);
        assert!(a.best.confidence > 0.0 && a.best.confidence <= 1.0);

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "you've won a free iphone, click here");
    }

    #[test]
    fn duplicate_submission_does_not_create_second_record() {
        let store = Arc::new(MessageStore::in_memory().unwrap());
        let svc = service(store.clone());

        svc.analyze("same message").unwrap();
        svc.analyze("same message").unwrap();

        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn empty_message_creates_no_record() {
        let store = Arc::new(MessageStore::in_memory().unwrap());
        let svc = service(store.clone());

        assert!(matches!(svc.analyze(""), Err(AnalyzeError::EmptyMessage)));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn storage_failure_does_not_fail_the_request() {
        let store = Arc::new(MessageStore::in_memory().unwrap());
        // Sabotage persistence: the analysis must still come back.
        store.execute_batch("DROP TABLE messages").unwrap();

        let svc = service(store);
        let a = svc.analyze("still analysed").unwrap();
        assert_eq!(a.verdicts.len(), 3);
    }
}
