//! Drug interaction analysis records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use medsafe_llm::{make_interaction_prompt, TemplateId};

use super::{split_list, PatientProfile};
use crate::adapter::PromptInput;
use crate::normalizer::format_patient_details;
use crate::schema::{Constraint, OutputSchema, Validate, Validator};

/// Drugs to check against each other for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteractionInput {
    /// Details of the patient including age, sex, weight, and renal function.
    pub patient_details: String,
    /// Comma separated list of drugs the patient is taking.
    pub drug_list: String,
}

impl DrugInteractionInput {
    pub fn new(patient_details: impl Into<String>, drug_list: impl Into<String>) -> Self {
        Self {
            patient_details: patient_details.into(),
            drug_list: drug_list.into(),
        }
    }

    /// Input with the session profile folded in through the normalizer.
    pub fn for_patient(profile: Option<&PatientProfile>, drug_list: impl Into<String>) -> Self {
        Self::new(format_patient_details(profile), drug_list)
    }

    /// Individual drug names in `drug_list`.
    pub fn drugs(&self) -> Vec<String> {
        split_list(&self.drug_list)
    }
}

impl Validate for DrugInteractionInput {
    fn check(&self, validator: &mut Validator) {
        validator.non_blank("patientDetails", &self.patient_details);
        if self.drugs().is_empty() {
            validator.push("drugList", Constraint::NonEmpty);
        }
    }
}

impl PromptInput for DrugInteractionInput {
    const TEMPLATE: TemplateId = TemplateId::DrugInteractionAnalysis;

    fn render_prompt(&self) -> String {
        make_interaction_prompt(&self.patient_details, &self.drugs())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugInteractionOutput {
    pub interaction_report: String,
}

impl OutputSchema for DrugInteractionOutput {
    fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "interactionReport": {
                    "type": "STRING",
                    "description": "A report detailing potential harmful interactions between the listed drugs, and recommendations."
                }
            },
            "required": ["interactionReport"]
        })
    }
}
