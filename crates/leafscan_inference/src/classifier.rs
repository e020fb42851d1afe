use std::fmt;
use std::fs;
use std::path::Path;

use leafscan_heuristics::hsv::rgb_to_hsv;
use leafscan_heuristics::ImageTensor;
use leafscan_core::{Error, Result};
use serde::Deserialize;

/// Histogram bins per HSV channel for the classifier feature vector.
pub const HIST_BINS: usize = 16;
pub const FEATURE_LEN: usize = 3 * HIST_BINS;

/// The classifier architectures the registry knows about, in the fixed
/// order used for fallback sampling and the confidence breakdown.
pub const ARCHITECTURES: [ModelKind; 3] = [
    ModelKind::EfficientNetV2,
    ModelKind::ResNet50V2,
    ModelKind::MobileNetV3,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    EfficientNetV2,
    ResNet50V2,
    MobileNetV3,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::EfficientNetV2 => "EfficientNetV2",
            ModelKind::ResNet50V2 => "ResNet50V2",
            ModelKind::MobileNetV3 => "MobileNetV3",
        }
    }

    /// Weight file name under the models directory.
    pub fn weights_file(&self) -> &'static str {
        match self {
            ModelKind::EfficientNetV2 => "efficientnetv2.json",
            ModelKind::ResNet50V2 => "resnet50v2.json",
            ModelKind::MobileNetV3 => "mobilenetv3.json",
        }
    }

    fn from_request_name(cleaned: &str) -> Option<Self> {
        ARCHITECTURES.iter().copied().find(|k| k.as_str() == cleaned)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which output the caller asked for. Anything that is not a known single
/// architecture (including the default "Ensemble") is served the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChoice {
    Ensemble,
    Single(ModelKind),
}

impl ModelChoice {
    pub fn parse(raw: &str) -> Self {
        match ModelKind::from_request_name(&clean_request_name(raw)) {
            Some(kind) => ModelChoice::Single(kind),
            None => ModelChoice::Ensemble,
        }
    }
}

/// Strip UI decorations from a model name: everything from the first space
/// or opening parenthesis on ("MobileNetV3 (fast)" -> "MobileNetV3").
pub fn clean_request_name(raw: &str) -> String {
    let cleaned = raw.split_whitespace().next().unwrap_or("");
    let cleaned = cleaned.split('(').next().unwrap_or("");
    cleaned.trim().to_string()
}

/// One loaded classifier. Inference is local CPU math over a fixed-size
/// feature vector, so the seam is synchronous.
pub trait Classifier: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Probability vector over the class list, summing to ~1.
    fn predict(&self, image: &ImageTensor) -> Result<Vec<f32>>;
}

/// On-disk weight layout: one row of feature weights per class plus a bias.
#[derive(Debug, Deserialize)]
struct LinearWeights {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Linear-softmax classifier over an HSV color histogram. Stands in for
/// the heavyweight CNN architectures whose names it carries; the registry
/// treats the weight files as opaque artifacts produced elsewhere.
#[derive(Debug)]
pub struct LinearClassifier {
    kind: ModelKind,
    weights: LinearWeights,
}

impl LinearClassifier {
    pub fn load(kind: ModelKind, path: &Path, num_classes: usize) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let weights: LinearWeights = serde_json::from_str(&raw)?;
        if weights.weights.len() != num_classes
            || weights.bias.len() != num_classes
            || weights.weights.iter().any(|row| row.len() != FEATURE_LEN)
        {
            return Err(Error::Inference(format!(
                "{}: weight dimensions do not match {} classes x {} features",
                path.display(),
                num_classes,
                FEATURE_LEN
            )));
        }
        Ok(Self { kind, weights })
    }
}

impl Classifier for LinearClassifier {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn predict(&self, image: &ImageTensor) -> Result<Vec<f32>> {
        let features = hsv_histogram(image);
        let mut logits: Vec<f32> = self
            .weights
            .weights
            .iter()
            .zip(&self.weights.bias)
            .map(|(row, bias)| {
                bias + row.iter().zip(&features).map(|(w, f)| w * f).sum::<f32>()
            })
            .collect();
        softmax(&mut logits);
        Ok(logits)
    }
}

/// Per-channel HSV histogram, each channel normalized by the pixel count.
pub fn hsv_histogram(image: &ImageTensor) -> Vec<f32> {
    let mut hist = vec![0.0f32; FEATURE_LEN];
    for &rgb in image.pixels() {
        let hsv = rgb_to_hsv(rgb);
        for (channel, &value) in hsv.iter().enumerate() {
            let bin = ((value * HIST_BINS as f32) as usize).min(HIST_BINS - 1);
            hist[channel * HIST_BINS + bin] += 1.0;
        }
    }
    let n = image.pixels().len() as f32;
    for v in &mut hist {
        *v /= n;
    }
    hist
}

fn softmax(logits: &mut [f32]) {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for l in logits.iter_mut() {
        *l = (*l - max).exp();
        sum += *l;
    }
    for l in logits.iter_mut() {
        *l /= sum;
    }
}
