use tracing::debug;

use crate::error::ValidationError;
use crate::recommendation::Recommendation;
use crate::reference::{self, ReferenceData};
use crate::sample::InputSample;

// Advisory thresholds. Comparisons are strict, so a value equal to a
// threshold belongs to the favorable band.
const PH_ACIDIC: f64 = 5.5;
const PH_ALKALINE: f64 = 7.5;
const NITROGEN_LOW: f64 = 140.0; // [PPM]
const NITROGEN_HIGH: f64 = 280.0; // [PPM]
const PHOSPHOROUS_LOW: f64 = 10.0; // [PPM]
const PHOSPHOROUS_HIGH: f64 = 25.0; // [PPM], excess is informational only
const POTASSIUM_LOW: f64 = 110.0; // [PPM]
const POTASSIUM_HIGH: f64 = 280.0; // [PPM], excess is informational only
const HUMIDITY_LOW: f64 = 40.0; // [%]
const HUMIDITY_HIGH: f64 = 80.0; // [%]

/// Evaluates a sample against the built-in reference tables.
///
/// Always returns six recommendations, in order: pH, nitrogen, phosphorous,
/// potassium, humidity and crop-soil compatibility.
pub fn evaluate(sample: &InputSample) -> Vec<Recommendation> {
    evaluate_with(reference::builtin(), sample)
}

/// Same as [`evaluate`], against caller-supplied reference tables.
pub fn evaluate_with(reference: &ReferenceData, sample: &InputSample) -> Vec<Recommendation> {
    vec![
        check_ph(sample.ph),
        check_nitrogen(sample.nitrogen),
        check_phosphorous(sample.phosphorous),
        check_potassium(sample.potassium),
        check_humidity(sample.humidity),
        check_compatibility(reference, &sample.crop_type, &sample.soil_type),
    ]
}

/// Validates the sample first and only evaluates it when it is well formed.
pub fn evaluate_checked(sample: &InputSample) -> Result<Vec<Recommendation>, ValidationError> {
    sample.validate()?;
    Ok(evaluate(sample))
}

pub(crate) fn check_ph(ph: f64) -> Recommendation {
    if ph < PH_ACIDIC {
        Recommendation::advisory(
            "Soil pH (Acidic)",
            format!(
                "Your soil pH of {ph} is too acidic for most crops. This can limit nutrient availability and affect plant growth."
            ),
            "Apply agricultural lime to raise pH. The recommended application rate is 2-3 tons per hectare, depending on soil type and current pH level.",
        )
    } else if ph > PH_ALKALINE {
        Recommendation::advisory(
            "Soil pH (Alkaline)",
            format!(
                "Your soil pH of {ph} is too alkaline for most crops. This can cause micronutrient deficiencies and affect plant growth."
            ),
            "Apply agricultural sulfur or gypsum to lower pH. For sulfur, apply 300-500 kg per hectare. For gypsum, apply 1-2 tons per hectare.",
        )
    } else {
        Recommendation::favorable(
            "Soil pH (Optimal)",
            format!("Your soil pH of {ph} is within the optimal range for most crops."),
            "Continue monitoring pH levels annually to ensure they remain in the optimal range.",
        )
    }
}

pub(crate) fn check_nitrogen(nitrogen: f64) -> Recommendation {
    if nitrogen < NITROGEN_LOW {
        Recommendation::advisory(
            "Nitrogen (N) - Low",
            format!(
                "Your nitrogen level of {nitrogen} PPM is low. Nitrogen is essential for leaf and stem growth and overall plant development."
            ),
            "Apply nitrogen-rich fertilizers such as urea (46-0-0) at 100-150 kg per hectare or ammonium sulfate (21-0-0) at 200-300 kg per hectare. Consider split applications for better efficiency.",
        )
    } else if nitrogen > NITROGEN_HIGH {
        Recommendation::advisory(
            "Nitrogen (N) - High",
            format!(
                "Your nitrogen level of {nitrogen} PPM is high. Excessive nitrogen can lead to lush foliage but poor fruit development and increased susceptibility to pests and diseases."
            ),
            "Reduce nitrogen fertilizer applications. Plant cover crops like legumes that can help balance nitrogen levels. Consider crops that are heavy nitrogen feeders for the next growing season.",
        )
    } else {
        Recommendation::favorable(
            "Nitrogen (N) - Optimal",
            format!("Your nitrogen level of {nitrogen} PPM is within the optimal range."),
            "Maintain current nitrogen management practices. Apply maintenance fertilizer based on crop requirements.",
        )
    }
}

// High phosphorous is reported as favorable: excess is a note, not a problem.
pub(crate) fn check_phosphorous(phosphorous: f64) -> Recommendation {
    if phosphorous < PHOSPHOROUS_LOW {
        Recommendation::advisory(
            "Phosphorous (P) - Low",
            format!(
                "Your phosphorous level of {phosphorous} PPM is low. Phosphorous is critical for root development, flowering, and fruiting."
            ),
            "Apply phosphate fertilizers such as single superphosphate (0-16-0) at 300-400 kg per hectare or diammonium phosphate (18-46-0) at 100-150 kg per hectare.",
        )
    } else if phosphorous > PHOSPHOROUS_HIGH {
        Recommendation::favorable(
            "Phosphorous (P) - High",
            format!(
                "Your phosphorous level of {phosphorous} PPM is high. While not typically harmful, excessive phosphorous can interfere with the uptake of other nutrients."
            ),
            "Avoid additional phosphorous applications. Consider crops with high phosphorous demands for the next growing season.",
        )
    } else {
        Recommendation::favorable(
            "Phosphorous (P) - Optimal",
            format!("Your phosphorous level of {phosphorous} PPM is within the optimal range."),
            "Maintain current phosphorous management practices. Apply maintenance fertilizer based on crop requirements.",
        )
    }
}

// Same policy as phosphorous: only a deficit calls for action.
pub(crate) fn check_potassium(potassium: f64) -> Recommendation {
    if potassium < POTASSIUM_LOW {
        Recommendation::advisory(
            "Potassium (K) - Low",
            format!(
                "Your potassium level of {potassium} PPM is low. Potassium is essential for overall plant health, disease resistance, and water regulation."
            ),
            "Apply potassium-rich fertilizers such as muriate of potash (0-0-60) at 100-150 kg per hectare or potassium sulfate (0-0-50) at 150-200 kg per hectare.",
        )
    } else if potassium > POTASSIUM_HIGH {
        Recommendation::favorable(
            "Potassium (K) - High",
            format!(
                "Your potassium level of {potassium} PPM is high. While generally not harmful, excessive potassium can interfere with the uptake of other nutrients."
            ),
            "Avoid additional potassium applications. Consider crops with high potassium demands for the next growing season.",
        )
    } else {
        Recommendation::favorable(
            "Potassium (K) - Optimal",
            format!("Your potassium level of {potassium} PPM is within the optimal range."),
            "Maintain current potassium management practices. Apply maintenance fertilizer based on crop requirements.",
        )
    }
}

pub(crate) fn check_humidity(humidity: f64) -> Recommendation {
    if humidity < HUMIDITY_LOW {
        Recommendation::advisory(
            "Humidity - Low",
            format!(
                "Your humidity level of {humidity}% is low. Low humidity can lead to increased water stress and reduced crop yield."
            ),
            "Consider irrigation methods that increase humidity such as drip irrigation or micro-sprinklers. Mulching can also help retain soil moisture and increase local humidity.",
        )
    } else if humidity > HUMIDITY_HIGH {
        Recommendation::advisory(
            "Humidity - High",
            format!(
                "Your humidity level of {humidity}% is high. High humidity can increase the risk of fungal diseases and affect pollination."
            ),
            "Ensure good air circulation by proper spacing between plants. Consider raised beds for better drainage. Monitor for fungal diseases and apply preventative fungicides if necessary.",
        )
    } else {
        Recommendation::favorable(
            "Humidity - Optimal",
            format!("Your humidity level of {humidity}% is within the optimal range for most crops."),
            "Continue monitoring humidity levels and adjust irrigation practices as needed based on weather conditions.",
        )
    }
}

/**
Looks up the crop/soil pair in the compatibility matrix.

# Arguments
* `reference` - Reference tables holding the matrix and display names.
* `crop` - Crop identifier, e.g. "rice".
* `soil` - Soil identifier, e.g. "clay_soil".

# Returns
The entry's verdict when the pair is listed, otherwise an advisory notice
that no specific data exists for the pair. Unknown identifiers are displayed
by formatting them.
*/
pub(crate) fn check_compatibility(
    reference: &ReferenceData,
    crop: &str,
    soil: &str,
) -> Recommendation {
    let crop_name = reference.crop_display_name(crop);
    let soil_name = reference.soil_display_name(soil);

    match reference.compatibility(crop, soil) {
        Some(entry) if entry.suitable => Recommendation::favorable(
            format!("{crop_name} on {soil_name}"),
            entry.message.as_str(),
            entry.action.as_str(),
        ),
        Some(entry) => Recommendation::advisory(
            format!("{crop_name} on {soil_name}"),
            entry.message.as_str(),
            entry.action.as_str(),
        ),
        None => {
            debug!(crop, soil, "no compatibility entry for pair");
            Recommendation::advisory(
                "Crop-Soil Compatibility",
                format!(
                    "We don't have specific data for {crop_name} on {soil_name}. Consider consulting with a local agricultural extension service for tailored advice."
                ),
                "Conduct a small test plot before full-scale planting. Monitor crop performance closely and adjust practices as needed.",
            )
        }
    }
}
