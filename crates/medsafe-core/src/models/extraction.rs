//! Drug information extraction records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use medsafe_llm::{make_extraction_prompt, TemplateId};

use crate::adapter::PromptInput;
use crate::schema::{OutputSchema, Validate, Validator};

/// Shortest medical text worth sending.
pub const MIN_MEDICAL_TEXT_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractDrugInformationInput {
    /// Unstructured medical text containing drug information.
    pub medical_text: String,
}

impl ExtractDrugInformationInput {
    pub fn new(medical_text: impl Into<String>) -> Self {
        Self {
            medical_text: medical_text.into(),
        }
    }
}

impl Validate for ExtractDrugInformationInput {
    fn check(&self, validator: &mut Validator) {
        validator.min_chars("medicalText", &self.medical_text, MIN_MEDICAL_TEXT_CHARS);
    }
}

impl PromptInput for ExtractDrugInformationInput {
    const TEMPLATE: TemplateId = TemplateId::ExtractDrugInformation;

    fn render_prompt(&self) -> String {
        make_extraction_prompt(&self.medical_text)
    }
}

/// One drug mention found in medical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDrug {
    pub drug_name: String,
    pub dosage: String,
    pub frequency: String,
}

/// An empty list is a valid answer: nothing was found.
impl OutputSchema for Vec<ExtractedDrug> {
    fn schema() -> Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "drugName": {"type": "STRING", "description": "The name of the drug."},
                    "dosage": {"type": "STRING", "description": "The dosage of the drug."},
                    "frequency": {"type": "STRING", "description": "The frequency of administration."}
                },
                "required": ["drugName", "dosage", "frequency"]
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{check_conformance, Constraint};

    #[test]
    fn test_validation() {
        assert!(ExtractDrugInformationInput::new("Patient takes metformin 500mg BID.")
            .validate()
            .is_ok());

        let err = ExtractDrugInformationInput::new("aspirin").validate().unwrap_err();
        assert_eq!(err.errors[0].constraint, Constraint::MinLength(MIN_MEDICAL_TEXT_CHARS));

        let err = ExtractDrugInformationInput::new("   ").validate().unwrap_err();
        assert_eq!(err.errors[0].constraint, Constraint::NonEmpty);
    }

    #[test]
    fn test_empty_array_conforms() {
        let schema = <Vec<ExtractedDrug>>::schema();
        assert!(check_conformance(&schema, &json!([])).is_ok());
        let drugs: Vec<ExtractedDrug> = serde_json::from_value(json!([])).unwrap();
        assert!(drugs.is_empty());
    }

    #[test]
    fn test_object_root_does_not_conform() {
        let schema = <Vec<ExtractedDrug>>::schema();
        let err = check_conformance(&schema, &json!({"drugs": []})).unwrap_err();
        assert_eq!(err.errors[0].field, "response");
    }

    #[test]
    fn test_prompt() {
        let prompt = ExtractDrugInformationInput::new("Take amlodipine 5mg daily").render_prompt();
        assert!(prompt.contains("Medical Text: Take amlodipine 5mg daily"));
    }
}
