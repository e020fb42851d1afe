//! JSON-backed disease description lookup.
//!
//! The table is read from disk on every call (it is tiny and the service is
//! a demo); any failure along the way degrades to generated placeholder
//! text, so lookups never fail from the caller's point of view.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use leafscan_core::DiseaseInfo;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DiseaseInfoDb {
    path: PathBuf,
}

impl DiseaseInfoDb {
    /// `data_dir` is expected to contain `disease_info.json`, a map from
    /// `Plant___Disease` keys to description/treatment entries.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: data_dir.into().join("disease_info.json"),
        }
    }

    /// Look up info for a (plant, disease) pair. Tries the exact compound
    /// key first, then a case-insensitive containment scan over all keys,
    /// and finally falls back to generated text.
    pub fn lookup(&self, plant: &str, disease: &str) -> DiseaseInfo {
        match self.try_lookup(plant, disease) {
            Some(info) => info,
            None => {
                debug!("no info entry for {}/{}, generating fallback", plant, disease);
                fallback_info(plant, disease)
            }
        }
    }

    fn try_lookup(&self, plant: &str, disease: &str) -> Option<DiseaseInfo> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let db: BTreeMap<String, DiseaseInfo> = serde_json::from_str(&raw).ok()?;

        let key = format!("{}___{}", plant, disease.replace(' ', "_"));
        if let Some(info) = db.get(&key) {
            return Some(info.clone());
        }

        let plant_lower = plant.to_lowercase();
        let disease_lower = disease.to_lowercase();
        db.iter()
            .find(|(k, _)| {
                let k = k.to_lowercase();
                k.contains(&plant_lower) && k.contains(&disease_lower)
            })
            .map(|(_, v)| v.clone())
    }
}

/// Placeholder text for pairs the table does not cover.
pub fn fallback_info(plant: &str, disease: &str) -> DiseaseInfo {
    let plant = plant.replace('_', " ");
    let disease = disease.replace('_', " ");
    DiseaseInfo {
        description: format!(
            "Analysis indicates {} may be affected by {}. The symptom pattern matches common pathogens.",
            plant.trim(),
            disease.trim()
        ),
        treatment: "Maintain plant isolation. Apply general-purpose fungicide. Ensure soil is not waterlogged."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_db(dir: &std::path::Path) {
        fs::write(
            dir.join("disease_info.json"),
            r#"{
                "Tomato___Leaf_Mold": {
                    "description": "Fungal growth on the underside of leaves.",
                    "treatment": "Improve ventilation and reduce humidity."
                },
                "Potato___Late_blight": {
                    "description": "Water-soaked lesions spreading fast.",
                    "treatment": "Remove affected foliage, apply copper spray."
                }
            }"#,
        )
        .unwrap();
    }

    #[test]
    fn exact_key_lookup() {
        let dir = tempfile::tempdir().unwrap();
        write_db(dir.path());
        let db = DiseaseInfoDb::new(dir.path());
        let info = db.lookup("Tomato", "Leaf_Mold");
        assert_eq!(info.description, "Fungal growth on the underside of leaves.");
    }

    #[test]
    fn containment_scan_catches_spaced_names() {
        let dir = tempfile::tempdir().unwrap();
        write_db(dir.path());
        let db = DiseaseInfoDb::new(dir.path());
        // "late blight" has no exact key form but both terms appear in one.
        let info = db.lookup("potato", "late_blight");
        assert_eq!(info.treatment, "Remove affected foliage, apply copper spray.");
    }

    #[test]
    fn unknown_pair_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        write_db(dir.path());
        let db = DiseaseInfoDb::new(dir.path());
        let info = db.lookup("Cucumber", "Weird_rot");
        assert!(info.description.contains("Cucumber"));
        assert!(info.description.contains("Weird rot"));
        assert!(!info.treatment.is_empty());
    }

    #[test]
    fn missing_file_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let db = DiseaseInfoDb::new(dir.path());
        let info = db.lookup("Tomato", "Leaf_Mold");
        assert!(!info.description.is_empty());
        assert!(!info.treatment.is_empty());
    }

    #[test]
    fn corrupt_file_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("disease_info.json"), "{{nope").unwrap();
        let db = DiseaseInfoDb::new(dir.path());
        let info = db.lookup("Tomato", "Leaf_Mold");
        assert!(!info.description.is_empty());
    }
}
