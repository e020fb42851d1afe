use leafscan_core::{Health, HeuristicMetrics, HeuristicVerdict, Nudge, Plant};
use tracing::debug;

use crate::hsv::rgb_to_hsv;
use crate::tensor::ImageTensor;

const LEAF_MASK_MIN_SAT: f32 = 0.15;
const LEAF_MASK_MIN_VAL: f32 = 0.15;
/// Below this many masked pixels the mask is considered unusable and the
/// statistics fall back to the whole frame.
const LEAF_MASK_MIN_PIXELS: usize = 100;

/// Filename fragments that pre-identify the plant, checked before any
/// color statistics ("paper" catches a common typo in uploads).
const PEPPER_KEYWORDS: [&str; 3] = ["pepper", "bell", "paper"];
const TOMATO_KEYWORDS: [&str; 3] = ["tomato", "tomo", "tmo"];
const POTATO_KEYWORDS: [&str; 3] = ["potato", "pota", "potat"];

/// Keyword set consulted by the aspect-ratio refinement. Narrower than the
/// per-plant lists above; kept as-is because the rule cascade is a
/// prioritized decision list, not an independent rule set.
const ASPECT_KEYWORDS: [&str; 8] = [
    "tomato", "tomo", "tmo", "potato", "pota", "pepper", "bell", "paper",
];

fn plant_from_filename(name_lower: &str) -> Option<Plant> {
    if PEPPER_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        Some(Plant::PepperBell)
    } else if TOMATO_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        Some(Plant::Tomato)
    } else if POTATO_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        Some(Plant::Potato)
    } else {
        None
    }
}

/// Run the visual heuristic pass: HSV statistics over the leaf mask plus
/// filename keywords, producing a plant guess and a health/disease tag.
///
/// Branch order matters everywhere below: the first matching rule wins.
pub fn analyze(tensor: &ImageTensor, filename: &str) -> HeuristicVerdict {
    let name_lower = filename.to_lowercase();
    let keyword_plant = plant_from_filename(&name_lower);

    let hsv: Vec<[f32; 3]> = tensor.pixels().iter().map(|&p| rgb_to_hsv(p)).collect();
    let mean_h = hsv.iter().map(|p| p[0]).sum::<f32>() / hsv.len() as f32;

    let masked: Vec<[f32; 3]> = hsv
        .iter()
        .filter(|p| p[1] > LEAF_MASK_MIN_SAT && p[2] > LEAF_MASK_MIN_VAL)
        .copied()
        .collect();
    let leaf = if masked.len() < LEAF_MASK_MIN_PIXELS {
        &hsv
    } else {
        &masked
    };

    let n = leaf.len() as f32;
    let leaf_mean_s = leaf.iter().map(|p| p[1]).sum::<f32>() / n;
    let leaf_mean_v = leaf.iter().map(|p| p[2]).sum::<f32>() / n;
    let variance = leaf
        .iter()
        .map(|p| (p[2] - leaf_mean_v).powi(2))
        .sum::<f32>()
        / n;

    let suggested_plant = keyword_plant.unwrap_or_else(|| {
        if leaf_mean_s > 0.42 && variance < 0.025 {
            Plant::PepperBell
        } else if 0.35 < mean_h && mean_h < 0.45 && leaf_mean_v > 0.5 {
            Plant::Potato
        } else {
            Plant::Tomato
        }
    });

    let brown_ratio = leaf
        .iter()
        .filter(|p| (p[0] < 0.15 || p[0] > 0.85) && p[2] < 0.65)
        .count() as f32
        / n;
    let yellow_ratio = leaf
        .iter()
        .filter(|p| p[0] > 0.08 && p[0] < 0.23 && p[1] < 0.55)
        .count() as f32
        / n;
    let green_ratio = leaf
        .iter()
        .filter(|p| p[0] > 0.24 && p[0] < 0.48 && p[1] > 0.25)
        .count() as f32
        / n;
    let is_spotted = variance > 0.04 && brown_ratio > 0.02;

    let (health, nudge) = if name_lower.contains("healthy") {
        (Health::Healthy, Nudge::None)
    } else if name_lower.contains("mold") {
        (Health::Diseased, Nudge::LeafMold)
    } else if name_lower.contains("septoria") {
        (Health::Diseased, Nudge::SeptoriaLeafSpot)
    } else if brown_ratio > 0.04 || is_spotted {
        let nudge = if suggested_plant == Plant::PepperBell || name_lower.contains("bell") {
            Nudge::BacterialSpot
        } else if brown_ratio > 0.15 {
            Nudge::LateBlight
        } else {
            Nudge::EarlyBlight
        };
        (Health::Diseased, nudge)
    } else if yellow_ratio > 0.25 || (yellow_ratio > 0.12 && suggested_plant == Plant::Tomato) {
        let nudge = if suggested_plant == Plant::Tomato {
            if yellow_ratio < 0.2 {
                Nudge::LeafMold
            } else {
                Nudge::YellowLeafCurl
            }
        } else {
            Nudge::LeafMold
        };
        (Health::Diseased, nudge)
    } else if green_ratio > 0.85 && brown_ratio < 0.02 {
        (Health::Healthy, Nudge::None)
    } else if leaf_mean_s < 0.18 {
        (Health::Diseased, Nudge::SpiderMites)
    } else {
        (Health::Healthy, Nudge::None)
    };

    let verdict = HeuristicVerdict {
        suggested_plant,
        health,
        nudge,
        metrics: HeuristicMetrics {
            hue: mean_h,
            saturation: leaf_mean_s,
            value: leaf_mean_v,
            green: green_ratio,
            brown: brown_ratio,
            variance,
        },
    };
    debug!(?verdict, "visual heuristic verdict");
    verdict
}

/// Second-chance plant refinement from the uploaded image's aspect ratio.
/// Only applies when the filename carried no plant keyword and the color
/// rules fell through to the Tomato default.
pub fn refine_plant_with_aspect(verdict: &mut HeuristicVerdict, filename: &str, aspect: f32) {
    let name_lower = filename.to_lowercase();
    if ASPECT_KEYWORDS.iter().any(|k| name_lower.contains(k)) {
        return;
    }
    if verdict.suggested_plant != Plant::Tomato {
        return;
    }
    if aspect < 0.8 {
        verdict.suggested_plant = Plant::PepperBell;
    } else if 0.95 < aspect && aspect < 1.1 {
        verdict.suggested_plant = Plant::Potato;
    }
}
