//! Prompt templates for the four assistant operations.
//!
//! Templates are plain functions over already-validated field values. They are
//! deterministic and side-effect free.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator used when a list-valued field is rendered into a prompt.
pub const LIST_SEPARATOR: &str = ", ";

/// Rendered in place of an optional field the user left empty.
pub const NOT_REPORTED: &str = "None reported";

/// Identifies which template produced a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    DrugInteractionAnalysis,
    AgeSpecificDosage,
    AlternativeMedication,
    ExtractDrugInformation,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::DrugInteractionAnalysis,
        TemplateId::AgeSpecificDosage,
        TemplateId::AlternativeMedication,
        TemplateId::ExtractDrugInformation,
    ];

    /// Stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            TemplateId::DrugInteractionAnalysis => "drug_interaction_analysis",
            TemplateId::AgeSpecificDosage => "age_specific_dosage",
            TemplateId::AlternativeMedication => "alternative_medication",
            TemplateId::ExtractDrugInformation => "extract_drug_information",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render list items as a delimited enumeration, no trailing separator.
pub fn render_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| item.as_ref().trim())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Interaction analysis between the drugs a patient is taking.
pub fn make_interaction_prompt(patient_details: &str, drugs: &[String]) -> String {
    format!(
        r#"You are a clinical pharmacist expert in drug interactions.

You will receive a list of drugs that a patient is taking, along with patient details. You will use this information to identify any potential harmful interactions between the drugs, in the context of the specific patient. Provide an interaction report which includes specific, actionable recommendations.

Patient Details: {}
Drug List: {}"#,
        patient_details.trim(),
        render_list(drugs)
    )
}

/// Dosage recommendation for a given age and renal function.
pub fn make_dosage_prompt(
    drug_name: &str,
    patient_age: i64,
    renal_function: &str,
    other_conditions: Option<&str>,
) -> String {
    let other_conditions = other_conditions
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NOT_REPORTED);

    format!(
        r#"You are an expert pharmacist specializing in dosage recommendations for various patient populations.

Based on the drug name, patient age, renal function, and other conditions, provide a dosage recommendation and a detailed justification.

Drug Name: {}
Patient Age: {} years
Renal Function: {}
Other Conditions: {}

Please provide the recommended dosage, a detailed justification, and any specific renal dosing guidance if applicable.
Format the dosage as a number followed by the units. E.g. "10mg"."#,
        drug_name.trim(),
        patient_age,
        renal_function,
        other_conditions
    )
}

/// Safer alternatives given a profile, current medications and known interactions.
pub fn make_alternative_prompt(
    patient_profile: &str,
    medications: &[String],
    interaction_details: &str,
) -> String {
    format!(
        r#"You are an expert pharmacist providing alternative medication suggestions.

Based on the patient's profile: {},
current medications: {},
and the following interaction details: {},

suggest alternative medications that are safer for the patient. Explain your reasoning."#,
        patient_profile.trim(),
        render_list(medications),
        interaction_details.trim()
    )
}

/// Structured drug extraction from unstructured medical text.
pub fn make_extraction_prompt(medical_text: &str) -> String {
    format!(
        r#"You are an expert medical assistant. Your task is to extract drug name, dosage, and frequency from the given medical text. Return a JSON array of objects, where each object contains the drugName, dosage, and frequency. If the text mentions no drugs, return an empty array.

Medical Text: {}"#,
        medical_text.trim()
    )
}

/// Instruction block describing the expected response shape.
///
/// Appended to every prompt so services without native schema support still see
/// the contract.
pub fn output_format_instructions(response_schema: &serde_json::Value) -> String {
    let schema = serde_json::to_string_pretty(response_schema)
        .unwrap_or_else(|_| response_schema.to_string());
    format!(
        "Output should be in JSON format and conform to the following schema:\n\n```\n{}\n```",
        schema
    )
}

/// Prompt text followed by the output-format block.
pub fn build_full_prompt(prompt: &str, response_schema: &serde_json::Value) -> String {
    let mut full = String::with_capacity(prompt.len() + 256);
    full.push_str(prompt);
    full.push_str("\n\n");
    full.push_str(&output_format_instructions(response_schema));
    full
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_interaction_prompt() {
        let drugs = vec!["warfarin".to_string(), "aspirin".to_string()];
        let prompt = make_interaction_prompt("Age: 72", &drugs);
        assert!(prompt.contains("Patient Details: Age: 72"));
        assert!(prompt.contains("Drug List: warfarin, aspirin"));
    }

    #[test]
    fn test_dosage_prompt_fields() {
        let prompt = make_dosage_prompt("amoxicillin", 8, "mild", Some("asthma"));
        assert!(prompt.contains("Drug Name: amoxicillin"));
        assert!(prompt.contains("Patient Age: 8 years"));
        assert!(prompt.contains("Renal Function: mild"));
        assert!(prompt.contains("Other Conditions: asthma"));
    }

    #[test]
    fn test_dosage_prompt_without_conditions() {
        let prompt = make_dosage_prompt("metformin", 60, "severe", None);
        assert!(prompt.contains("Other Conditions: None reported"));

        let blank = make_dosage_prompt("metformin", 60, "severe", Some("   "));
        assert_eq!(prompt, blank);
    }

    #[test]
    fn test_alternative_prompt() {
        let meds = vec!["ibuprofen".to_string(), "lisinopril".to_string()];
        let prompt = make_alternative_prompt("Age: 70", &meds, "NSAID reduces ACE inhibitor effect");
        assert!(prompt.contains("patient's profile: Age: 70,"));
        assert!(prompt.contains("current medications: ibuprofen, lisinopril,"));
        assert!(prompt.contains("interaction details: NSAID reduces ACE inhibitor effect,"));
    }

    #[test]
    fn test_extraction_prompt() {
        let prompt = make_extraction_prompt("Start lisinopril 10mg daily");
        assert!(prompt.contains("Medical Text: Start lisinopril 10mg daily"));
        assert!(prompt.contains("drugName"));
    }

    #[test]
    fn test_full_prompt_appends_schema() {
        let schema = serde_json::json!({"type": "OBJECT", "properties": {"reasoning": {"type": "STRING"}}});
        let prompt = build_full_prompt("Base prompt", &schema);
        assert!(prompt.starts_with("Base prompt\n\n"));
        assert!(prompt.contains("\"reasoning\""));
        assert!(prompt.contains("conform to the following schema"));
    }

    #[test]
    fn test_template_names_unique() {
        let names: std::collections::HashSet<_> = TemplateId::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), TemplateId::ALL.len());
        assert_eq!(TemplateId::AgeSpecificDosage.to_string(), "age_specific_dosage");
    }

    #[test]
    fn test_render_list_single_item() {
        assert_eq!(render_list(&["warfarin"]), "warfarin");
        assert_eq!(render_list::<&str>(&[]), "");
    }

    proptest! {
        #[test]
        fn render_list_has_no_trailing_separator(items in prop::collection::vec("[a-z]{1,12}", 1..8)) {
            let rendered = render_list(&items);
            prop_assert!(!rendered.ends_with(LIST_SEPARATOR));
            prop_assert!(!rendered.ends_with(','));
            prop_assert_eq!(rendered.matches(LIST_SEPARATOR).count(), items.len() - 1);
        }

        #[test]
        fn interaction_prompt_is_deterministic(details in "[A-Za-z0-9 :]{1,40}", drugs in prop::collection::vec("[a-z]{1,12}", 1..6)) {
            let first = make_interaction_prompt(&details, &drugs);
            let second = make_interaction_prompt(&details, &drugs);
            prop_assert_eq!(&first, &second);
            for drug in &drugs {
                prop_assert!(first.contains(drug.as_str()));
            }
        }
    }
}
