use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The three plant categories the demo dataset covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plant {
    #[serde(rename = "Pepper__bell")]
    PepperBell,
    #[serde(rename = "Tomato")]
    Tomato,
    #[serde(rename = "Potato")]
    Potato,
}

impl Plant {
    /// Label-key form as it appears inside class label strings.
    pub fn key(&self) -> &'static str {
        match self {
            Plant::PepperBell => "Pepper__bell",
            Plant::Tomato => "Tomato",
            Plant::Potato => "Potato",
        }
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Diseased,
}

impl Health {
    pub fn is_diseased(&self) -> bool {
        matches!(self, Health::Diseased)
    }
}

/// Disease tag the visual analyzer nudges candidate labels toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nudge {
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Leaf_Mold")]
    LeafMold,
    #[serde(rename = "Septoria_leaf_spot")]
    SeptoriaLeafSpot,
    #[serde(rename = "Bacterial_spot")]
    BacterialSpot,
    #[serde(rename = "Late_Blight")]
    LateBlight,
    #[serde(rename = "Early_Blight")]
    EarlyBlight,
    #[serde(rename = "Tomato_Yellow_Leaf_Curl_Virus")]
    YellowLeafCurl,
    #[serde(rename = "Spider_mites")]
    SpiderMites,
}

impl Nudge {
    /// Underscored tag used for textual matching against class labels.
    pub fn tag(&self) -> &'static str {
        match self {
            Nudge::None => "None",
            Nudge::LeafMold => "Leaf_Mold",
            Nudge::SeptoriaLeafSpot => "Septoria_leaf_spot",
            Nudge::BacterialSpot => "Bacterial_spot",
            Nudge::LateBlight => "Late_Blight",
            Nudge::EarlyBlight => "Early_Blight",
            Nudge::YellowLeafCurl => "Tomato_Yellow_Leaf_Curl_Virus",
            Nudge::SpiderMites => "Spider_mites",
        }
    }
}

/// Colorspace statistics backing a heuristic verdict, kept for debug logging.
#[derive(Debug, Clone, Serialize)]
pub struct HeuristicMetrics {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
    pub green: f32,
    pub brown: f32,
    pub variance: f32,
}

/// Outcome of the visual heuristic pass over one image.
#[derive(Debug, Clone, Serialize)]
pub struct HeuristicVerdict {
    pub suggested_plant: Plant,
    pub health: Health,
    pub nudge: Nudge,
    pub metrics: HeuristicMetrics,
}

/// Description/treatment text for one (plant, disease) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub description: String,
    pub treatment: String,
}

/// Wire-level response for one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub status: String,
    pub model_used: String,
    pub plant: String,
    pub disease: String,
    pub accuracy: f64,
    pub description: String,
    pub treatment: String,
    pub confidence_breakdown: BTreeMap<String, f64>,
}
