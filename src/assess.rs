use serde::Serialize;

use crate::reference::{Nutrient, ReferenceData, ValueRange};
use crate::sample::InputSample;

// Comparison of one measurement with what the crop expects
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequirementCheck {
    pub parameter: &'static str,
    pub expected: String, // Range such as "5.5-6.5" or a level such as "high"
    pub observed: String,
    pub met: bool,
}

// Crop requirements checked against a sample
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequirementReport {
    pub crop: String, // Display name
    pub checks: Vec<RequirementCheck>,
}

impl RequirementReport {
    pub fn all_met(&self) -> bool {
        self.checks.iter().all(|c| c.met)
    }

    pub fn unmet(&self) -> impl Iterator<Item = &RequirementCheck> {
        self.checks.iter().filter(|c| !c.met)
    }
}

/**
Compares a sample with the growing requirements recorded for its crop.

Nutrient values are placed in the reference bands and compared with the
level the crop needs; pH and humidity must fall within the crop's ranges
(bounds inclusive).

# Returns
`None` when no requirements are recorded for the crop, otherwise checks for
pH, nitrogen, phosphorous, potassium and humidity in that order.
*/
pub fn assess_requirements(
    reference: &ReferenceData,
    sample: &InputSample,
) -> Option<RequirementReport> {
    let requirements = reference.crop_requirements(&sample.crop_type)?;

    let mut checks = Vec::with_capacity(5);
    checks.push(range_check("pH", requirements.ph, sample.ph));
    for (parameter, nutrient, value) in [
        ("Nitrogen", Nutrient::Nitrogen, sample.nitrogen),
        ("Phosphorous", Nutrient::Phosphorous, sample.phosphorous),
        ("Potassium", Nutrient::Potassium, sample.potassium),
    ] {
        let required = requirements.nutrient(nutrient);
        let observed = reference.nutrient_bands(nutrient).level_of(value);
        checks.push(RequirementCheck {
            parameter,
            expected: required.to_string(),
            observed: format!("{observed} ({value} PPM)"),
            met: observed == required,
        });
    }
    checks.push(range_check("Humidity", requirements.humidity, sample.humidity));

    Some(RequirementReport {
        crop: reference.crop_display_name(&sample.crop_type),
        checks,
    })
}

fn range_check(parameter: &'static str, range: ValueRange, value: f64) -> RequirementCheck {
    RequirementCheck {
        parameter,
        expected: range.to_string(),
        observed: value.to_string(),
        met: range.contains(value),
    }
}
