//! Age-specific dosage records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use medsafe_llm::{make_dosage_prompt, TemplateId};

use super::RenalFunction;
use crate::adapter::PromptInput;
use crate::schema::{OutputSchema, Validate, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeSpecificDosageInput {
    pub drug_name: String,
    /// Age in years
    pub patient_age: i64,
    pub renal_function: RenalFunction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_conditions: Option<String>,
}

impl AgeSpecificDosageInput {
    pub fn new(drug_name: impl Into<String>, patient_age: i64, renal_function: RenalFunction) -> Self {
        Self {
            drug_name: drug_name.into(),
            patient_age,
            renal_function,
            other_conditions: None,
        }
    }

    pub fn with_conditions(mut self, conditions: impl Into<String>) -> Self {
        self.other_conditions = Some(conditions.into());
        self
    }
}

impl Validate for AgeSpecificDosageInput {
    fn check(&self, validator: &mut Validator) {
        validator
            .non_blank("drugName", &self.drug_name)
            .positive_integer("patientAge", self.patient_age);
    }
}

impl PromptInput for AgeSpecificDosageInput {
    const TEMPLATE: TemplateId = TemplateId::AgeSpecificDosage;

    fn render_prompt(&self) -> String {
        make_dosage_prompt(
            &self.drug_name,
            self.patient_age,
            self.renal_function.as_str(),
            self.other_conditions.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeSpecificDosageOutput {
    pub recommended_dosage: String,
    pub dosage_justification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renal_dosing_guidance: Option<String>,
}

impl OutputSchema for AgeSpecificDosageOutput {
    fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "recommendedDosage": {
                    "type": "STRING",
                    "description": "The recommended dosage of the drug for the patient."
                },
                "dosageJustification": {
                    "type": "STRING",
                    "description": "A detailed justification for the dosage recommendation based on the patient's age, renal function, and drug safety profile."
                },
                "renalDosingGuidance": {
                    "type": "STRING",
                    "description": "Specific guidance on adjusting the dosage based on renal function, if applicable."
                }
            },
            "required": ["recommendedDosage", "dosageJustification"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(AgeSpecificDosageInput::new("amoxicillin", 6, RenalFunction::Normal)
            .validate()
            .is_ok());

        let err = AgeSpecificDosageInput::new("amoxicillin", 0, RenalFunction::Normal)
            .validate()
            .unwrap_err();
        assert_eq!(err.errors[0].to_string(), "patientAge must be a positive integer");

        let err = AgeSpecificDosageInput::new(" ", -4, RenalFunction::Mild)
            .validate()
            .unwrap_err();
        assert!(err.has_field("drugName"));
        assert!(err.has_field("patientAge"));
    }

    #[test]
    fn test_prompt() {
        let input = AgeSpecificDosageInput::new("gentamicin", 78, RenalFunction::Severe)
            .with_conditions("heart failure");
        let prompt = input.render_prompt();
        assert!(prompt.contains("Drug Name: gentamicin"));
        assert!(prompt.contains("Patient Age: 78 years"));
        assert!(prompt.contains("Renal Function: severe"));
        assert!(prompt.contains("Other Conditions: heart failure"));
    }

    #[test]
    fn test_output_optional_guidance() {
        let output: AgeSpecificDosageOutput = serde_json::from_str(
            r#"{"recommendedDosage":"5mg","dosageJustification":"Reduced for age.","renalDosingGuidance":null}"#,
        )
        .unwrap();
        assert_eq!(output.renal_dosing_guidance, None);
        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("renalDosingGuidance").is_none());
    }

    #[test]
    fn test_wire_rejects_unknown_renal_function() {
        let result = serde_json::from_str::<AgeSpecificDosageInput>(
            r#"{"drugName":"x","patientAge":5,"renalFunction":"awful"}"#,
        );
        assert!(result.is_err());
    }
}
