//! Predictor layer: three independently trained text classifiers behind a
//! uniform [`Predictor`] interface, plus artifact load/stage/swap.

pub mod artifact;
pub mod bayes;
pub mod bootstrap;
pub mod centroid;
pub mod linear;
pub mod predictor;
pub mod tokenize;

pub use artifact::{ArtifactError, ArtifactStore, StagedArtifact};
pub use bayes::BayesModel;
pub use bootstrap::bootstrap;
pub use centroid::CentroidModel;
pub use linear::LogisticModel;
pub use predictor::{PredictError, Predictor, load_predictors};
