pub mod error;
pub mod labels;
pub mod types;

pub use error::Error;
pub use labels::{load_class_names, ClassLabel, DEFAULT_CLASS_NAMES};
pub use types::{
    DiseaseInfo, Health, HeuristicMetrics, HeuristicVerdict, Nudge, Plant, PredictionResult,
};

pub type Result<T> = std::result::Result<T, Error>;
