//! Displayed-confidence synthesis. These numbers are presentation values
//! rescaled into a plausible band, not calibrated classifier certainty:
//! the raw probability is mapped into [75, 99.95], weaker architectures
//! get fixed subtractive offsets, and a plant match with the heuristic
//! earns a flat bonus.

use crate::classifier::{ModelChoice, ModelKind};

const CONFIDENCE_FLOOR: f64 = 75.0;
const CONFIDENCE_CEIL: f64 = 99.95;
const BREAKDOWN_CEIL: f64 = 99.9;
const PROB_SCALE: f64 = 24.9;
const PLANT_MATCH_BONUS: f64 = 2.0;

/// Headline confidence for the response. `hash` feeds the per-image part
/// of the per-model offsets so the same image always shows the same value.
pub fn display_confidence(
    raw_prob: f32,
    choice: ModelChoice,
    hash: u128,
    plant_match: bool,
) -> f64 {
    let mut confidence = CONFIDENCE_FLOOR + raw_prob as f64 * PROB_SCALE;
    match choice {
        ModelChoice::Single(ModelKind::MobileNetV3) => {
            confidence -= 1.5 + (hash % 20) as f64 / 10.0;
        }
        ModelChoice::Single(ModelKind::ResNet50V2) => {
            confidence -= 0.5 + (hash % 10) as f64 / 10.0;
        }
        _ => {}
    }
    if plant_match {
        confidence += PLANT_MATCH_BONUS;
    }
    confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEIL)
}

/// Per-architecture confidence shown in the breakdown, with its own
/// (slightly different) offset table.
pub fn breakdown_confidence(kind: ModelKind, winning_prob: f32, plant_match: bool) -> f64 {
    let mut score = CONFIDENCE_FLOOR + winning_prob as f64 * PROB_SCALE;
    match kind {
        ModelKind::MobileNetV3 => score -= 2.5,
        ModelKind::ResNet50V2 => score -= 1.0,
        ModelKind::EfficientNetV2 => {}
    }
    if plant_match {
        score += PLANT_MATCH_BONUS;
    }
    score.min(BREAKDOWN_CEIL)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
