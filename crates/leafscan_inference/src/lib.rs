pub mod classifier;
pub mod confidence;
pub mod engine;
pub mod fallback;
pub mod fusion;
pub mod registry;

pub use classifier::{Classifier, LinearClassifier, ModelChoice, ModelKind, ARCHITECTURES};
pub use engine::PredictionEngine;
pub use registry::ModelRegistry;

pub mod prelude {
    pub use crate::engine::PredictionEngine;
    pub use leafscan_core::{Error, PredictionResult, Result};
}
