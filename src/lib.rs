mod assess;
mod config;
mod engine;
mod error;
mod recommendation;
mod reference;
mod sample;

pub use assess::{RequirementCheck, RequirementReport, assess_requirements};
pub use config::{AdvisorConfig, OutputFormat, reference_or_builtin};
pub use engine::{evaluate, evaluate_checked, evaluate_with};
pub use error::{ConfigError, ReferenceError, ValidationError};
pub use recommendation::{Classification, Recommendation};
pub use reference::{
    CompatibilityEntry, CropCategory, CropOption, CropRequirements, Nutrient, NutrientBands,
    NutrientLevel, NutrientTable, ReferenceBand, ReferenceData, SoilOption, SoilProperties,
    ValueRange, builtin, format_identifier,
};
pub use sample::{Field, InputSample};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::Classification::{Advisory, Favorable};

    fn sample(soil: &str, crop: &str, n: f64, p: f64, k: f64, ph: f64, humidity: f64) -> InputSample {
        InputSample::new(soil, crop, n, p, k, ph, humidity)
    }

    fn classifications(recs: &[Recommendation]) -> Vec<Classification> {
        recs.iter().map(|r| r.classification).collect()
    }

    #[test]
    fn wheat_on_loamy_soil() {
        let recs = evaluate(&sample("loamy_soil", "wheat", 100.0, 30.0, 300.0, 8.0, 90.0));
        assert_eq!(
            classifications(&recs),
            [Advisory, Advisory, Favorable, Favorable, Advisory, Favorable]
        );
        let parameters: Vec<&str> = recs.iter().map(|r| r.parameter.as_str()).collect();
        assert_eq!(
            parameters,
            [
                "Soil pH (Alkaline)",
                "Nitrogen (N) - Low",
                "Phosphorous (P) - High",
                "Potassium (K) - High",
                "Humidity - High",
                "Wheat on Loamy Soil",
            ]
        );
        assert!(recs[0].message.starts_with("Your soil pH of 8 is too alkaline"));
        assert!(recs[5].message.contains("ideal for wheat"));
    }

    #[test]
    fn always_six_in_fixed_order() {
        let inputs = [
            sample("clay_soil", "rice", 0.0, 0.0, 0.0, 0.0, 0.0),
            sample("black_soil", "cotton", 200.0, 15.0, 200.0, 6.5, 60.0),
            sample("moon_dust", "dragon_fruit", 1e6, 1e6, 1e6, 14.0, 100.0),
            sample("", "", 140.0, 10.0, 110.0, 5.5, 40.0),
        ];
        for input in &inputs {
            let recs = evaluate(input);
            assert_eq!(recs.len(), 6);
            assert!(recs[0].parameter.starts_with("Soil pH"));
            assert!(recs[1].parameter.starts_with("Nitrogen"));
            assert!(recs[2].parameter.starts_with("Phosphorous"));
            assert!(recs[3].parameter.starts_with("Potassium"));
            assert!(recs[4].parameter.starts_with("Humidity"));
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let input = sample("red_soil", "cotton", 150.5, 12.25, 99.0, 6.8, 81.0);
        assert_eq!(evaluate(&input), evaluate(&input));
    }

    #[test]
    fn all_favorable_sample() {
        let recs = evaluate(&sample("clay_soil", "rice", 200.0, 15.0, 150.0, 6.0, 70.0));
        assert!(recs.iter().all(Recommendation::is_favorable));
    }

    #[test]
    fn incompatible_pair_end_to_end() {
        let recs = evaluate(&sample("sandy_soil", "rice", 200.0, 15.0, 150.0, 6.0, 70.0));
        assert_eq!(recs[5].classification, Advisory);
        assert_eq!(recs[5].parameter, "Rice on Sandy Soil");
        assert!(recs[5].message.contains("poor water retention"));
    }

    #[test]
    fn unknown_pair_never_fails() {
        let recs = evaluate(&sample("moon_dust", "kale", 200.0, 15.0, 150.0, 6.0, 70.0));
        assert_eq!(recs[5].classification, Advisory);
        assert_eq!(recs[5].parameter, "Crop-Soil Compatibility");
        assert!(recs[5].message.contains("We don't have specific data for Kale on Moon dust"));
    }

    #[test]
    fn custom_reference_tables_are_used() {
        let toml_str = include_str!("../reference_data.toml").replace(
            "crop = \"wheat\"\nsoil = \"loamy_soil\"\nsuitable = true",
            "crop = \"wheat\"\nsoil = \"loamy_soil\"\nsuitable = false",
        );
        let reference = ReferenceData::from_toml_str(&toml_str).unwrap();
        let input = sample("loamy_soil", "wheat", 200.0, 15.0, 150.0, 6.5, 60.0);
        assert_eq!(evaluate_with(&reference, &input)[5].classification, Advisory);
        assert_eq!(evaluate(&input)[5].classification, Favorable);
    }

    #[test]
    fn concurrent_evaluations_agree() {
        let input = sample("black_soil", "cotton", 120.0, 8.0, 90.0, 4.9, 35.0);
        let expected = evaluate(&input);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| evaluate(&input))).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn recommendations_serialize_for_display() {
        let recs = evaluate(&sample("clay_soil", "rice", 200.0, 15.0, 150.0, 6.0, 70.0));
        let json = serde_json::to_value(&recs).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 6);
        assert_eq!(json[5]["parameter"], "Rice on Clay Soil");
        assert_eq!(json[5]["classification"], "favorable");
    }
}
