use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use leafscan_core::{load_class_names, ClassLabel};
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, LinearClassifier, ModelKind, ARCHITECTURES};

/// Immutable view of everything loaded from the models directory: the
/// ordered class list and whichever classifiers had usable weight files.
pub struct Snapshot {
    pub class_names: Vec<ClassLabel>,
    models: HashMap<ModelKind, Box<dyn Classifier>>,
}

impl Snapshot {
    pub fn model(&self, kind: ModelKind) -> Option<&dyn Classifier> {
        self.models.get(&kind).map(|m| m.as_ref())
    }

    pub fn loaded_count(&self) -> usize {
        self.models.len()
    }
}

/// Lazy process-wide model cache. Populated on first use, read-only after,
/// never invalidated. A duplicate load under a first-request race would be
/// wasteful, not corrupting; `OnceLock` removes even that.
pub struct ModelRegistry {
    models_dir: PathBuf,
    snapshot: OnceLock<Snapshot>,
}

impl ModelRegistry {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            snapshot: OnceLock::new(),
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.snapshot.get_or_init(|| self.load())
    }

    fn load(&self) -> Snapshot {
        let class_names = load_class_names(&self.models_dir);
        let mut models: HashMap<ModelKind, Box<dyn Classifier>> = HashMap::new();
        for kind in ARCHITECTURES {
            let path = self.models_dir.join(kind.weights_file());
            if !path.exists() {
                debug!("no weights for {} at {:?}, will use sampled fallback", kind, path);
                continue;
            }
            match LinearClassifier::load(kind, &path, class_names.len()) {
                Ok(model) => {
                    info!("loaded {} from {:?}", kind, path);
                    models.insert(kind, Box::new(model));
                }
                Err(e) => warn!("skipping {}: {}", kind, e),
            }
        }
        info!(
            "model registry ready: {}/{} classifiers, {} classes",
            models.len(),
            ARCHITECTURES.len(),
            class_names.len()
        );
        Snapshot { class_names, models }
    }

    /// Model names offered on the API, independent of what loaded.
    pub fn model_names() -> Vec<String> {
        let mut names = vec!["Ensemble".to_string()];
        names.extend(ARCHITECTURES.iter().map(|k| k.as_str().to_string()));
        names
    }
}
