//! Alternative medication records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use medsafe_llm::{make_alternative_prompt, TemplateId};

use super::{split_list, PatientProfile};
use crate::adapter::PromptInput;
use crate::normalizer::format_patient_details;
use crate::schema::{OutputSchema, Validate, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeMedicationInput {
    /// Formatted patient profile (see [`format_patient_details`]).
    pub patient_profile: String,
    pub medications: Vec<String>,
    /// The harmful interactions or contraindications identified so far.
    pub interaction_details: String,
}

impl AlternativeMedicationInput {
    pub fn new(
        patient_profile: impl Into<String>,
        medications: Vec<String>,
        interaction_details: impl Into<String>,
    ) -> Self {
        Self {
            patient_profile: patient_profile.into(),
            medications,
            interaction_details: interaction_details.into(),
        }
    }

    /// Input built the way the alternatives form builds it: profile through the
    /// normalizer, medications split from comma-separated text.
    pub fn for_patient(
        profile: Option<&PatientProfile>,
        medications: &str,
        interaction_details: impl Into<String>,
    ) -> Self {
        Self::new(
            format_patient_details(profile),
            split_list(medications),
            interaction_details,
        )
    }
}

impl Validate for AlternativeMedicationInput {
    fn check(&self, validator: &mut Validator) {
        validator
            .non_blank("patientProfile", &self.patient_profile)
            .non_empty_list("medications", &self.medications)
            .non_blank("interactionDetails", &self.interaction_details);
    }
}

impl PromptInput for AlternativeMedicationInput {
    const TEMPLATE: TemplateId = TemplateId::AlternativeMedication;

    fn render_prompt(&self) -> String {
        make_alternative_prompt(&self.patient_profile, &self.medications, &self.interaction_details)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeMedicationOutput {
    pub suggested_alternatives: Vec<String>,
    pub reasoning: String,
}

impl OutputSchema for AlternativeMedicationOutput {
    fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "suggestedAlternatives": {
                    "type": "ARRAY",
                    "items": {"type": "STRING"},
                    "description": "A list of suggested alternative medications that are safer given the patient profile and interaction details."
                },
                "reasoning": {
                    "type": "STRING",
                    "description": "The reasoning behind the suggested alternatives, explaining why they are safer."
                }
            },
            "required": ["suggestedAlternatives", "reasoning"]
        })
    }
}
