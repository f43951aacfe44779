use std::fmt;

use serde::{Deserialize, Serialize};

// Whether a finding is acceptable as-is or calls for action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Favorable,
    Advisory,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Favorable => f.write_str("favorable"),
            Classification::Advisory => f.write_str("advisory"),
        }
    }
}

// One evaluated parameter and the guidance that goes with it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub parameter: String, // What was evaluated, including its band
    pub classification: Classification,
    pub message: String, // Finding, quoting the measured value
    pub action: String,  // Remedial or maintenance guidance
}

impl Recommendation {
    pub fn new(
        parameter: impl Into<String>,
        classification: Classification,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Recommendation {
            parameter: parameter.into(),
            classification,
            message: message.into(),
            action: action.into(),
        }
    }

    pub fn favorable(
        parameter: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new(parameter, Classification::Favorable, message, action)
    }

    pub fn advisory(
        parameter: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new(parameter, Classification::Advisory, message, action)
    }

    pub fn is_favorable(&self) -> bool {
        self.classification == Classification::Favorable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_serializes_lowercase() {
        let rec = Recommendation::advisory("Humidity - High", "msg", "act");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["classification"], "advisory");
        assert_eq!(json["parameter"], "Humidity - High");
        assert!(!rec.is_favorable());
    }

    #[test]
    fn favorable_constructor() {
        let rec = Recommendation::favorable("Soil pH (Optimal)", "msg", "act");
        assert!(rec.is_favorable());
        assert_eq!(rec.classification.to_string(), "favorable");
    }
}
