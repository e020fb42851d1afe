use std::fs;
use std::path::Path;

use tracing::{info, warn};

/// Class set the demo models were trained on, used when no persisted list
/// exists. Index order matters: output probabilities are indexed by it.
pub const DEFAULT_CLASS_NAMES: [&str; 15] = [
    "Pepper__bell___Bacterial_spot",
    "Pepper__bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites_Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

/// One class label of the form `Plant___Disease` (double and single
/// underscore separators are tolerated for older exports).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabel {
    raw: String,
    plant: String,
    disease: String,
}

impl ClassLabel {
    pub fn parse(raw: &str) -> Self {
        let (plant, disease) = if let Some((p, d)) = raw.split_once("___") {
            (p.to_string(), d.to_string())
        } else if let Some((p, d)) = raw.split_once("__") {
            (p.to_string(), d.to_string())
        } else {
            match raw.split_once('_') {
                Some((p, d)) => (p.to_string(), d.to_string()),
                None => (raw.to_string(), "healthy".to_string()),
            }
        };
        Self {
            raw: raw.to_string(),
            plant,
            disease,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn plant(&self) -> &str {
        &self.plant
    }

    pub fn disease(&self) -> &str {
        &self.disease
    }

    /// Plant name as presented in responses (`Pepper__bell` -> `Pepper bell`).
    pub fn plant_display(&self) -> String {
        self.plant.replace("__", " ")
    }

    /// Disease name as presented in responses: first letter upper-cased,
    /// rest lower-cased, underscores kept.
    pub fn disease_display(&self) -> String {
        let mut chars = self.disease.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
            None => String::new(),
        }
    }

    pub fn contains_plant(&self, plant_key: &str) -> bool {
        self.raw.to_lowercase().contains(&plant_key.to_lowercase())
    }

    pub fn is_healthy(&self) -> bool {
        self.raw.to_lowercase().contains("healthy")
    }

    /// Textual nudge match: underscores are treated as spaces on both sides.
    pub fn matches_nudge(&self, tag: &str) -> bool {
        let label = self.raw.to_lowercase().replace('_', " ");
        let tag = tag.to_lowercase().replace('_', " ");
        label.contains(&tag)
    }
}

fn default_class_names() -> Vec<ClassLabel> {
    DEFAULT_CLASS_NAMES.iter().map(|s| ClassLabel::parse(s)).collect()
}

/// Load the ordered class-name list from `<models_dir>/class_names.json`.
///
/// The persisted list is authoritative when present (it fixes the index
/// order the model outputs were trained against); otherwise the hardcoded
/// default set is used.
pub fn load_class_names(models_dir: &Path) -> Vec<ClassLabel> {
    let path = models_dir.join("class_names.json");
    if !path.exists() {
        return default_class_names();
    }
    let names: Vec<String> = match fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(anyhow::Error::from))
    {
        Ok(names) => names,
        Err(e) => {
            warn!("could not read class names from {:?}: {}, using defaults", path, e);
            return default_class_names();
        }
    };
    if names.is_empty() {
        warn!("class name list at {:?} is empty, using defaults", path);
        return default_class_names();
    }
    info!("loaded {} class names from {:?}", names.len(), path);
    names.iter().map(|s| ClassLabel::parse(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triple_underscore_labels() {
        let label = ClassLabel::parse("Tomato___Early_blight");
        assert_eq!(label.plant(), "Tomato");
        assert_eq!(label.disease(), "Early_blight");
        assert_eq!(label.plant_display(), "Tomato");
        assert_eq!(label.disease_display(), "Early_blight");
    }

    #[test]
    fn parses_double_underscore_plant_names() {
        let label = ClassLabel::parse("Pepper__bell___Bacterial_spot");
        assert_eq!(label.plant(), "Pepper__bell");
        assert_eq!(label.disease(), "Bacterial_spot");
        assert_eq!(label.plant_display(), "Pepper bell");
    }

    #[test]
    fn parses_single_underscore_fallback() {
        let label = ClassLabel::parse("Potato_blight");
        assert_eq!(label.plant(), "Potato");
        assert_eq!(label.disease(), "blight");

        let bare = ClassLabel::parse("Potato");
        assert_eq!(bare.plant(), "Potato");
        assert_eq!(bare.disease(), "healthy");
    }

    #[test]
    fn disease_display_lowercases_tail() {
        let label = ClassLabel::parse("Tomato___Tomato_Yellow_Leaf_Curl_Virus");
        assert_eq!(label.disease_display(), "Tomato_yellow_leaf_curl_virus");
    }

    #[test]
    fn healthy_and_plant_matching() {
        let label = ClassLabel::parse("Pepper__bell___healthy");
        assert!(label.is_healthy());
        assert!(label.contains_plant("Pepper__bell"));
        assert!(!label.contains_plant("Tomato"));
    }

    #[test]
    fn nudge_matching_normalizes_underscores() {
        let label = ClassLabel::parse("Tomato___Leaf_Mold");
        assert!(label.matches_nudge("Leaf_Mold"));
        assert!(label.matches_nudge("leaf mold"));
        assert!(!label.matches_nudge("Septoria_leaf_spot"));
    }

    #[test]
    fn default_set_has_fifteen_entries() {
        assert_eq!(DEFAULT_CLASS_NAMES.len(), 15);
        let labels = default_class_names();
        assert_eq!(labels[8].raw(), "Tomato___Leaf_Mold");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let labels = load_class_names(dir.path());
        assert_eq!(labels.len(), 15);
    }

    #[test]
    fn persisted_list_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("class_names.json"),
            r#"["Tomato___healthy", "Potato___Late_blight"]"#,
        )
        .unwrap();
        let labels = load_class_names(dir.path());
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].plant(), "Potato");
    }

    #[test]
    fn corrupt_list_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("class_names.json"), "not json").unwrap();
        assert_eq!(load_class_names(dir.path()).len(), 15);
    }
}
