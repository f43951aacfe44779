use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// Upper bounds of the bounded measurements
pub(crate) const PH_MAX: f64 = 14.0;
pub(crate) const HUMIDITY_MAX: f64 = 100.0;

// Input fields, named as they appear on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    SoilType,
    CropType,
    Nitrogen,
    Phosphorous,
    Potassium,
    Ph,
    Humidity,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::SoilType => "soilType",
            Field::CropType => "cropType",
            Field::Nitrogen => "nitrogen",
            Field::Phosphorous => "phosphorous",
            Field::Potassium => "potassium",
            Field::Ph => "ph",
            Field::Humidity => "humidity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// One soil/crop measurement sample
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSample {
    pub soil_type: String, // Soil identifier, e.g. "loamy_soil"
    pub crop_type: String, // Crop identifier, e.g. "wheat"
    pub nitrogen: f64,     // Available nitrogen [PPM]
    pub phosphorous: f64,  // Available phosphorous [PPM]
    pub potassium: f64,    // Available potassium [PPM]
    pub ph: f64,           // Soil pH [0-14]
    pub humidity: f64,     // Relative humidity [%]
}

impl InputSample {
    pub fn new(
        soil_type: impl Into<String>,
        crop_type: impl Into<String>,
        nitrogen: f64,
        phosphorous: f64,
        potassium: f64,
        ph: f64,
        humidity: f64,
    ) -> Self {
        InputSample {
            soil_type: soil_type.into(),
            crop_type: crop_type.into(),
            nitrogen,
            phosphorous,
            potassium,
            ph,
            humidity,
        }
    }

    /**
    Checks the sample against the input contract of the engine.

    Identifiers must be non-empty, nutrients finite and non-negative, pH within
    0-14 and humidity within 0-100 (bounds inclusive). Fields are checked in
    declaration order and the first failure is returned.

    Unknown soil or crop identifiers are accepted: the engine answers them with
    a generic compatibility notice.
    */
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_identifier(Field::SoilType, &self.soil_type)?;
        check_identifier(Field::CropType, &self.crop_type)?;
        check_non_negative(Field::Nitrogen, self.nitrogen)?;
        check_non_negative(Field::Phosphorous, self.phosphorous)?;
        check_non_negative(Field::Potassium, self.potassium)?;
        check_bounded(Field::Ph, self.ph, PH_MAX)?;
        check_bounded(Field::Humidity, self.humidity, HUMIDITY_MAX)?;
        Ok(())
    }
}

fn check_identifier(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier { field });
    }
    Ok(())
}

fn check_non_negative(field: Field, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        Err(ValidationError::NotFinite { field })
    } else if value < 0.0 {
        Err(ValidationError::Negative { field, value })
    } else {
        Ok(())
    }
}

fn check_bounded(field: Field, value: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        Err(ValidationError::NotFinite { field })
    } else if !(0.0..=max).contains(&value) {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: 0.0,
            max,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InputSample {
        InputSample::new("loamy_soil", "wheat", 200.0, 15.0, 150.0, 6.5, 60.0)
    }

    #[test]
    fn valid_sample_passes() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut s = sample();
        s.ph = 0.0;
        s.humidity = 100.0;
        s.nitrogen = 0.0;
        assert!(s.validate().is_ok());
        s.ph = 14.0;
        s.humidity = 0.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn negative_nutrient_is_rejected() {
        let mut s = sample();
        s.potassium = -1.0;
        let err = s.validate().unwrap_err();
        assert_eq!(err.field(), Field::Potassium);
        assert!(matches!(err, ValidationError::Negative { value, .. } if value == -1.0));
    }

    #[test]
    fn ph_above_scale_is_rejected() {
        let mut s = sample();
        s.ph = 14.01;
        assert_eq!(s.validate().unwrap_err().field(), Field::Ph);
    }

    #[test]
    fn humidity_above_hundred_is_rejected() {
        let mut s = sample();
        s.humidity = 100.5;
        assert_eq!(s.validate().unwrap_err().field(), Field::Humidity);
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        let mut s = sample();
        s.nitrogen = f64::NAN;
        assert_eq!(
            s.validate(),
            Err(ValidationError::NotFinite {
                field: Field::Nitrogen
            })
        );

        let mut s = sample();
        s.ph = f64::INFINITY;
        assert_eq!(
            s.validate(),
            Err(ValidationError::NotFinite { field: Field::Ph })
        );
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        let mut s = sample();
        s.crop_type = "  ".to_string();
        assert_eq!(
            s.validate(),
            Err(ValidationError::EmptyIdentifier {
                field: Field::CropType
            })
        );
    }

    #[test]
    fn first_failing_field_is_reported() {
        let mut s = sample();
        s.soil_type.clear();
        s.humidity = 120.0;
        assert_eq!(s.validate().unwrap_err().field(), Field::SoilType);
    }

    #[test]
    fn unknown_identifiers_are_accepted() {
        let s = InputSample::new("moon_dust", "kale", 200.0, 15.0, 150.0, 6.5, 60.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{"soilType":"clay_soil","cropType":"rice","nitrogen":150,
            "phosphorous":12.5,"potassium":200,"ph":6.1,"humidity":70}"#;
        let s: InputSample = serde_json::from_str(json).unwrap();
        assert_eq!(s.soil_type, "clay_soil");
        assert_eq!(s.crop_type, "rice");
        assert_eq!(s.phosphorous, 12.5);
    }
}
