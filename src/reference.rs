use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ReferenceError;

const BUILTIN_TOML: &str = include_str!("../reference_data.toml");

static BUILTIN: LazyLock<ReferenceData> = LazyLock::new(|| {
    ReferenceData::from_toml_str(BUILTIN_TOML).expect("embedded reference_data.toml is invalid")
});

/// Reference tables shipped with the crate, parsed once on first use.
pub fn builtin() -> &'static ReferenceData {
    &BUILTIN
}

// Nutrients with banded reference ranges
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Nitrogen,
    Phosphorous,
    Potassium,
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nutrient::Nitrogen => f.write_str("nitrogen"),
            Nutrient::Phosphorous => f.write_str("phosphorous"),
            Nutrient::Potassium => f.write_str("potassium"),
        }
    }
}

// Qualitative nutrient level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for NutrientLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientLevel::Low => f.write_str("low"),
            NutrientLevel::Medium => f.write_str("medium"),
            NutrientLevel::High => f.write_str("high"),
        }
    }
}

fn unbounded() -> f64 {
    f64::INFINITY
}

// One band of a nutrient scale, bounds inclusive [PPM]
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ReferenceBand {
    pub min: f64,
    #[serde(default = "unbounded")]
    pub max: f64, // +inf for the open-ended high band
}

// Low/medium/high bands of one nutrient
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct NutrientBands {
    pub low: ReferenceBand,
    pub medium: ReferenceBand,
    pub high: ReferenceBand,
}

impl NutrientBands {
    // A value belongs to the first band whose upper bound it does not exceed
    pub fn level_of(&self, value: f64) -> NutrientLevel {
        if value <= self.low.max {
            NutrientLevel::Low
        } else if value <= self.medium.max {
            NutrientLevel::Medium
        } else {
            NutrientLevel::High
        }
    }

    pub fn band(&self, level: NutrientLevel) -> &ReferenceBand {
        match level {
            NutrientLevel::Low => &self.low,
            NutrientLevel::Medium => &self.medium,
            NutrientLevel::High => &self.high,
        }
    }

    fn check_contiguous(&self, nutrient: Nutrient) -> Result<(), ReferenceError> {
        let gap = |detail: String| ReferenceError::Bands { nutrient, detail };
        if self.low.max + 1.0 != self.medium.min {
            return Err(gap(format!(
                "low ends at {} but medium starts at {}",
                self.low.max, self.medium.min
            )));
        }
        if self.medium.max + 1.0 != self.high.min {
            return Err(gap(format!(
                "medium ends at {} but high starts at {}",
                self.medium.max, self.high.min
            )));
        }
        if self.high.max != f64::INFINITY {
            return Err(gap(format!("high is capped at {}", self.high.max)));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct NutrientTable {
    pub nitrogen: NutrientBands,
    pub phosphorous: NutrientBands,
    pub potassium: NutrientBands,
}

impl NutrientTable {
    pub fn bands(&self, nutrient: Nutrient) -> &NutrientBands {
        match nutrient {
            Nutrient::Nitrogen => &self.nitrogen,
            Nutrient::Phosphorous => &self.phosphorous,
            Nutrient::Potassium => &self.potassium,
        }
    }
}

// Closed interval used for pH and humidity ranges
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

// Typical chemistry of a soil type
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SoilProperties {
    pub ph: ValueRange,
    pub nitrogen: NutrientLevel,
    pub phosphorous: NutrientLevel,
    pub potassium: NutrientLevel,
    pub characteristics: String,
}

// Growing conditions a crop expects
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CropRequirements {
    pub ph: ValueRange,
    pub nitrogen: NutrientLevel,
    pub phosphorous: NutrientLevel,
    pub potassium: NutrientLevel,
    pub humidity: ValueRange, // [%]
}

impl CropRequirements {
    pub fn nutrient(&self, nutrient: Nutrient) -> NutrientLevel {
        match nutrient {
            Nutrient::Nitrogen => self.nitrogen,
            Nutrient::Phosphorous => self.phosphorous,
            Nutrient::Potassium => self.potassium,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SoilOption {
    pub id: String,
    pub label: String,        // Label offered in selection lists
    pub name: Option<String>, // Display name used in recommendations
    pub properties: Option<SoilProperties>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CropOption {
    pub id: String,
    pub label: String,
    pub name: Option<String>,
    pub category: String,
    pub requirements: Option<CropRequirements>,
}

// Crops of one category, in catalogue order
#[derive(Clone, Debug, PartialEq)]
pub struct CropCategory<'a> {
    pub label: &'a str,
    pub crops: Vec<&'a CropOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CompatibilityEntry {
    pub suitable: bool,
    pub message: String,
    pub action: String,
}

#[derive(Deserialize)]
struct CompatibilityRow {
    crop: String,
    soil: String,
    #[serde(flatten)]
    entry: CompatibilityEntry,
}

// On-disk layout of the reference tables
#[derive(Deserialize)]
struct ReferenceFile {
    soils: Vec<SoilOption>,
    crops: Vec<CropOption>,
    nutrients: NutrientTable,
    #[serde(default)]
    compatibility: Vec<CompatibilityRow>,
}

// Read-only agronomic reference tables
#[derive(Clone, Debug)]
pub struct ReferenceData {
    soils: Vec<SoilOption>,
    crops: Vec<CropOption>,
    nutrients: NutrientTable,
    compatibility: HashMap<(String, String), CompatibilityEntry>, // keyed by (crop, soil)
}

impl ReferenceData {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ReferenceError> {
        let file: ReferenceFile = toml::from_str(toml_str)?;
        Self::from_file(file)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let toml_str = fs::read_to_string(path).map_err(|source| ReferenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml_str)
    }

    fn from_file(file: ReferenceFile) -> Result<Self, ReferenceError> {
        check_unique("soil", file.soils.iter().map(|s| s.id.as_str()))?;
        check_unique("crop", file.crops.iter().map(|c| c.id.as_str()))?;

        for nutrient in [Nutrient::Nitrogen, Nutrient::Phosphorous, Nutrient::Potassium] {
            file.nutrients.bands(nutrient).check_contiguous(nutrient)?;
        }

        let mut compatibility = HashMap::with_capacity(file.compatibility.len());
        for row in file.compatibility {
            match compatibility.entry((row.crop, row.soil)) {
                Entry::Occupied(occupied) => {
                    let (crop, soil) = occupied.key().clone();
                    return Err(ReferenceError::DuplicateCompatibility { crop, soil });
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(row.entry);
                }
            }
        }

        info!(
            soils = file.soils.len(),
            crops = file.crops.len(),
            compatibility = compatibility.len(),
            "loaded reference data"
        );

        Ok(ReferenceData {
            soils: file.soils,
            crops: file.crops,
            nutrients: file.nutrients,
            compatibility,
        })
    }

    pub fn soil_options(&self) -> &[SoilOption] {
        &self.soils
    }

    pub fn crop_options(&self) -> &[CropOption] {
        &self.crops
    }

    pub fn soil(&self, id: &str) -> Option<&SoilOption> {
        self.soils.iter().find(|s| s.id == id)
    }

    pub fn crop(&self, id: &str) -> Option<&CropOption> {
        self.crops.iter().find(|c| c.id == id)
    }

    pub fn is_known_soil(&self, id: &str) -> bool {
        self.soil(id).is_some()
    }

    pub fn is_known_crop(&self, id: &str) -> bool {
        self.crop(id).is_some()
    }

    // Crops grouped by category, categories in order of first appearance
    pub fn crop_categories(&self) -> Vec<CropCategory<'_>> {
        let mut categories: Vec<CropCategory<'_>> = Vec::new();
        for crop in &self.crops {
            match categories.iter_mut().find(|c| c.label == crop.category) {
                Some(category) => category.crops.push(crop),
                None => categories.push(CropCategory {
                    label: &crop.category,
                    crops: vec![crop],
                }),
            }
        }
        categories
    }

    // Explicit display names only; `None` for unmapped identifiers
    pub fn soil_name(&self, id: &str) -> Option<&str> {
        self.soil(id).and_then(|s| s.name.as_deref())
    }

    pub fn crop_name(&self, id: &str) -> Option<&str> {
        self.crop(id).and_then(|c| c.name.as_deref())
    }

    pub fn soil_display_name(&self, id: &str) -> String {
        match self.soil_name(id) {
            Some(name) => name.to_string(),
            None => {
                debug!(soil = id, "no display name for soil, formatting identifier");
                format_identifier(id)
            }
        }
    }

    pub fn crop_display_name(&self, id: &str) -> String {
        match self.crop_name(id) {
            Some(name) => name.to_string(),
            None => {
                debug!(crop = id, "no display name for crop, formatting identifier");
                format_identifier(id)
            }
        }
    }

    pub fn nutrients(&self) -> &NutrientTable {
        &self.nutrients
    }

    pub fn nutrient_bands(&self, nutrient: Nutrient) -> &NutrientBands {
        self.nutrients.bands(nutrient)
    }

    pub fn soil_properties(&self, id: &str) -> Option<&SoilProperties> {
        self.soil(id).and_then(|s| s.properties.as_ref())
    }

    pub fn crop_requirements(&self, id: &str) -> Option<&CropRequirements> {
        self.crop(id).and_then(|c| c.requirements.as_ref())
    }

    pub fn compatibility(&self, crop: &str, soil: &str) -> Option<&CompatibilityEntry> {
        self.compatibility
            .get(&(crop.to_string(), soil.to_string()))
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ReferenceError> {
    let mut seen = Vec::new();
    for id in ids {
        if seen.contains(&id) {
            return Err(ReferenceError::DuplicateIdentifier {
                kind,
                id: id.to_string(),
            });
        }
        seen.push(id);
    }
    Ok(())
}

/**
Formats a raw identifier for display when no explicit name is mapped.

The first character is upper-cased and every later `_` becomes a space, so
`alluvial_soil` reads as `Alluvial soil`.
*/
pub fn format_identifier(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => {
            let mut formatted: String = first.to_uppercase().collect();
            formatted.push_str(&chars.as_str().replace('_', " "));
            formatted
        }
        None => String::new(),
    }
}
