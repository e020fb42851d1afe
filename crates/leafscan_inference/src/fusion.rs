//! Score fusion: blends the ML probability vector with heuristic nudges
//! and a small deterministic jitter. The heuristic term intentionally
//! dominates the ML term; the thresholds and weights are part of the
//! service's observable behavior and must not drift.

use leafscan_core::{ClassLabel, Health, HeuristicVerdict, Nudge};
use rand::rngs::StdRng;
use rand::Rng;

/// Scale applied to the raw ML probability before fusion.
pub const ML_WEIGHT: f64 = 0.1;
/// Bonus when a candidate label's plant matches the heuristic guess.
const PLANT_MATCH_BONUS: f64 = 10.0;
/// Penalty for "healthy" labels when the heuristic says diseased.
const HEALTHY_CONTRADICTION_PENALTY: f64 = -5.0;
/// Bonus for the label that textually matches the heuristic disease tag.
const NUDGE_MATCH_BONUS: f64 = 2.0;
/// Residual bonus for other diseased labels when a tag exists.
const NUDGE_MISS_BONUS: f64 = 0.2;
/// Bonus for diseased labels when the heuristic has no specific tag.
const UNTAGGED_DISEASE_BONUS: f64 = 0.5;
/// Bonus/penalty pair when the heuristic says healthy.
const HEALTHY_MATCH_BONUS: f64 = 2.0;
const HEALTHY_MISS_PENALTY: f64 = -2.0;
/// Upper bound of the per-class uniform jitter.
const JITTER_SCALE: f64 = 0.1;

/// Per-class heuristic scores ("variety scores"). Draws one jitter value
/// per class from `rng` in label order, so the caller's RNG state encodes
/// the full outcome.
pub fn variety_scores(
    labels: &[ClassLabel],
    verdict: &HeuristicVerdict,
    rng: &mut StdRng,
) -> Vec<f64> {
    let plant_key = verdict.suggested_plant.key();
    labels
        .iter()
        .map(|label| {
            let mut score = 0.0;
            if label.contains_plant(plant_key) {
                score += PLANT_MATCH_BONUS;
            }
            match verdict.health {
                Health::Diseased => {
                    if label.is_healthy() {
                        score += HEALTHY_CONTRADICTION_PENALTY;
                    }
                    match verdict.nudge {
                        Nudge::None => score += UNTAGGED_DISEASE_BONUS,
                        nudge => {
                            score += if label.matches_nudge(nudge.tag()) {
                                NUDGE_MATCH_BONUS
                            } else {
                                NUDGE_MISS_BONUS
                            };
                        }
                    }
                }
                Health::Healthy => {
                    score += if label.is_healthy() {
                        HEALTHY_MATCH_BONUS
                    } else {
                        HEALTHY_MISS_PENALTY
                    };
                }
            }
            score + rng.gen::<f64>() * JITTER_SCALE
        })
        .collect()
}

/// Index of the winning class under the fused score.
pub fn select(probabilities: &[f32], variety: &[f64]) -> usize {
    probabilities
        .iter()
        .zip(variety)
        .map(|(&p, &v)| p as f64 * ML_WEIGHT + v)
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Elementwise mean of the per-model probability vectors (ensemble mode).
pub fn mean_probabilities(predictions: &[Vec<f32>]) -> Vec<f32> {
    let len = predictions.first().map(|p| p.len()).unwrap_or(0);
    let mut mean = vec![0.0f32; len];
    for probs in predictions {
        for (m, &p) in mean.iter_mut().zip(probs) {
            *m += p;
        }
    }
    let count = predictions.len() as f32;
    for m in &mut mean {
        *m /= count;
    }
    mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::seeded_rng;
    use leafscan_core::{HeuristicMetrics, Plant};

    fn verdict(plant: Plant, health: Health, nudge: Nudge) -> HeuristicVerdict {
        HeuristicVerdict {
            suggested_plant: plant,
            health,
            nudge,
            metrics: HeuristicMetrics {
                hue: 0.3,
                saturation: 0.4,
                value: 0.5,
                green: 0.8,
                brown: 0.0,
                variance: 0.01,
            },
        }
    }

    fn labels(raws: &[&str]) -> Vec<ClassLabel> {
        raws.iter().map(|r| ClassLabel::parse(r)).collect()
    }

    #[test]
    fn diseased_tomato_nudge_beats_healthy_label() {
        let labels = labels(&["Tomato___healthy", "Tomato___Leaf_Mold", "Potato___Late_blight"]);
        let v = verdict(Plant::Tomato, Health::Diseased, Nudge::LeafMold);
        let scores = variety_scores(&labels, &v, &mut seeded_rng(1));

        // Leaf mold label: plant match + nudge match. Healthy label gets
        // the contradiction penalty. Potato label misses the plant bonus.
        assert!(scores[1] > scores[0]);
        assert!(scores[1] > scores[2]);
        assert!(scores[1] >= 12.0 && scores[1] <= 12.1 + JITTER_SCALE);
    }

    #[test]
    fn healthy_verdict_prefers_healthy_labels() {
        let labels = labels(&["Potato___healthy", "Potato___Early_blight"]);
        let v = verdict(Plant::Potato, Health::Healthy, Nudge::None);
        let scores = variety_scores(&labels, &v, &mut seeded_rng(2));
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn jitter_is_bounded_and_deterministic() {
        let labels = labels(&["Tomato___healthy"]);
        let v = verdict(Plant::Tomato, Health::Healthy, Nudge::None);
        let a = variety_scores(&labels, &v, &mut seeded_rng(9));
        let b = variety_scores(&labels, &v, &mut seeded_rng(9));
        assert_eq!(a, b);
        // Base score is 12.0; only the jitter varies.
        assert!(a[0] >= 12.0 && a[0] < 12.0 + JITTER_SCALE);
    }

    #[test]
    fn selection_is_dominated_by_the_heuristic_term() {
        // ML strongly prefers index 0, heuristic prefers index 1.
        let probs = vec![0.99f32, 0.01];
        let variety = vec![0.0f64, 10.0];
        assert_eq!(select(&probs, &variety), 1);
    }

    #[test]
    fn mean_probabilities_is_elementwise() {
        let mean = mean_probabilities(&[
            vec![0.2, 0.8, 0.0],
            vec![0.4, 0.2, 0.4],
            vec![0.6, 0.2, 0.2],
        ]);
        assert!((mean[0] - 0.4).abs() < 1e-6);
        assert!((mean[1] - 0.4).abs() < 1e-6);
        assert!((mean[2] - 0.2).abs() < 1e-6);
    }
}
