//! Customer record schema and categorical encoding.
//!
//! The classifier consumes fixed-width numeric vectors. Categorical fields
//! are ordinal-encoded against a known vocabulary; values outside the
//! vocabulary map to a sentinel index one past the end, so serving never
//! rejects a row for an unexpected category string.

use serde::{Deserialize, Serialize};

/// Number of input features after encoding.
pub const FEATURE_COUNT: usize = 8;

/// Ordered names of the input fields, matching the feature vector layout.
pub const FIELD_NAMES: [&str; FEATURE_COUNT] = [
    "tenure",
    "monthly_charges",
    "total_charges",
    "contract_type",
    "payment_method",
    "internet_service",
    "online_security",
    "tech_support",
];

/// Vocabulary for the `contract_type` field.
const CONTRACT_TYPES: [&str; 3] = ["Month-to-month", "One year", "Two year"];

/// Vocabulary for the `payment_method` field.
const PAYMENT_METHODS: [&str; 4] = [
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
];

/// Vocabulary for the `internet_service` field.
const INTERNET_SERVICES: [&str; 3] = ["DSL", "Fiber optic", "No"];

/// Vocabulary shared by the yes/no service flags.
const SERVICE_FLAGS: [&str; 3] = ["No", "Yes", "No internet service"];

/// A single customer row as accepted by training and serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub tenure: i64,
    pub monthly_charges: f64,
    pub total_charges: f64,
    pub contract_type: String,
    pub payment_method: String,
    pub internet_service: String,
    pub online_security: String,
    pub tech_support: String,
}

impl CustomerRecord {
    /// Encodes the record into the fixed-width numeric feature vector.
    #[must_use]
    pub fn encode(&self) -> [f32; FEATURE_COUNT] {
        [
            self.tenure as f32,
            self.monthly_charges as f32,
            self.total_charges as f32,
            encode_category(&CONTRACT_TYPES, &self.contract_type),
            encode_category(&PAYMENT_METHODS, &self.payment_method),
            encode_category(&INTERNET_SERVICES, &self.internet_service),
            encode_category(&SERVICE_FLAGS, &self.online_security),
            encode_category(&SERVICE_FLAGS, &self.tech_support),
        ]
    }
}

/// Maps a category string to its ordinal index in the vocabulary.
///
/// Unknown values encode to `vocabulary.len()`.
fn encode_category(vocabulary: &[&str], value: &str) -> f32 {
    vocabulary
        .iter()
        .position(|known| *known == value)
        .unwrap_or(vocabulary.len()) as f32
}

/// Field data types recorded in the model signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Long,
    Double,
    String,
}

/// One named field in the model signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub dtype: FieldType,
}

impl FieldSpec {
    fn new(name: &str, dtype: FieldType) -> Self {
        Self {
            name: name.to_string(),
            dtype,
        }
    }
}

/// Input/output schema stored alongside a trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSignature {
    pub inputs: Vec<FieldSpec>,
    pub outputs: Vec<FieldSpec>,
}

/// Builds the signature for the churn input schema.
#[must_use]
pub fn signature() -> ModelSignature {
    let inputs = vec![
        FieldSpec::new("tenure", FieldType::Long),
        FieldSpec::new("monthly_charges", FieldType::Double),
        FieldSpec::new("total_charges", FieldType::Double),
        FieldSpec::new("contract_type", FieldType::String),
        FieldSpec::new("payment_method", FieldType::String),
        FieldSpec::new("internet_service", FieldType::String),
        FieldSpec::new("online_security", FieldType::String),
        FieldSpec::new("tech_support", FieldType::String),
    ];

    let outputs = vec![FieldSpec::new("churn_probability", FieldType::Double)];

    ModelSignature { inputs, outputs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CustomerRecord {
        CustomerRecord {
            tenure: 12,
            monthly_charges: 51.2,
            total_charges: 512.0,
            contract_type: "Month-to-month".to_string(),
            payment_method: "Electronic check".to_string(),
            internet_service: "Fiber optic".to_string(),
            online_security: "No".to_string(),
            tech_support: "Yes".to_string(),
        }
    }

    #[test]
    fn test_encode_known_categories() {
        let features = sample_record().encode();

        assert!((features[0] - 12.0).abs() < f32::EPSILON);
        assert!((features[1] - 51.2).abs() < f32::EPSILON);
        assert!((features[2] - 512.0).abs() < f32::EPSILON);
        // Month-to-month is index 0, Electronic check index 0, Fiber optic index 1
        assert!((features[3] - 0.0).abs() < f32::EPSILON);
        assert!((features[4] - 0.0).abs() < f32::EPSILON);
        assert!((features[5] - 1.0).abs() < f32::EPSILON);
        // online_security "No" = 0, tech_support "Yes" = 1
        assert!((features[6] - 0.0).abs() < f32::EPSILON);
        assert!((features[7] - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_encode_unknown_category_maps_to_sentinel() {
        let mut record = sample_record();
        record.contract_type = "Decade-to-decade".to_string();

        let features = record.encode();

        assert!((features[3] - CONTRACT_TYPES.len() as f32).abs() < f32::EPSILON);
    }

    #[test]
    fn test_signature_matches_field_order() {
        let signature = signature();

        assert_eq!(signature.inputs.len(), FEATURE_COUNT);
        for (spec, name) in signature.inputs.iter().zip(FIELD_NAMES) {
            assert_eq!(spec.name, name);
        }
        assert_eq!(signature.outputs.len(), 1);
        assert_eq!(signature.outputs[0].dtype, FieldType::Double);
    }
}
