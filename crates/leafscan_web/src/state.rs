use std::path::PathBuf;

use leafscan_inference::PredictionEngine;

pub struct AppState {
    pub engine: PredictionEngine,
}

impl AppState {
    pub fn new(models_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine: PredictionEngine::new(models_dir, data_dir),
        }
    }
}
