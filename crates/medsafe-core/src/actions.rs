//! Action envelope for the presentation layer.
//!
//! [`run_action`] is the single place operation failures are caught. The detail is
//! logged; the caller only ever sees the action's fixed failure message.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use medsafe_llm::TextGenerator;

use crate::models::{
    AgeSpecificDosageInput, AgeSpecificDosageOutput, AlternativeMedicationInput,
    AlternativeMedicationOutput, DrugInteractionInput, DrugInteractionOutput,
    ExtractDrugInformationInput, ExtractedDrug,
};
use crate::operations::MedicationAssistant;

/// The presentation-layer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    DrugInteractionReport,
    DosageRecommendation,
    AlternativeMedication,
    ExtractedDrugInfo,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::DrugInteractionReport => "get_drug_interaction_report",
            ActionKind::DosageRecommendation => "get_dosage_recommendation",
            ActionKind::AlternativeMedication => "get_alternative_medication",
            ActionKind::ExtractedDrugInfo => "get_extracted_drug_info",
        }
    }

    /// User-visible message for any failure of this action.
    pub fn failure_message(&self) -> &'static str {
        match self {
            ActionKind::DrugInteractionReport => "Failed to analyze drug interactions.",
            ActionKind::DosageRecommendation => "Failed to get dosage recommendation.",
            ActionKind::AlternativeMedication => "Failed to suggest alternative medications.",
            ActionKind::ExtractedDrugInfo => "Failed to extract drug information.",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tagged result handed to the presentation layer.
///
/// Serializes as `{"success":true,"data":...}` or `{"success":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ActionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ActionResult::Success(data) => Some(data),
            ActionResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ActionResult::Success(_) => None,
            ActionResult::Failure(error) => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ActionResult::Success(data) => Ok(data),
            ActionResult::Failure(error) => Err(error),
        }
    }
}

#[derive(Serialize)]
struct WireOut<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Deserialize)]
struct WireIn<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireOut {
            success: self.is_success(),
            data: self.data(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ActionResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireIn::<T>::deserialize(deserializer)?;
        match (wire.success, wire.data, wire.error) {
            (true, Some(data), None) => Ok(ActionResult::Success(data)),
            (false, None, Some(error)) => Ok(ActionResult::Failure(error)),
            _ => Err(de::Error::custom(
                "action result must carry data on success or error on failure",
            )),
        }
    }
}

/// Run one operation and wrap its outcome.
pub fn run_action<I, O, E, F>(kind: ActionKind, input: I, operation: F) -> ActionResult<O>
where
    F: FnOnce(I) -> Result<O, E>,
    E: fmt::Display,
{
    let request_id = uuid::Uuid::new_v4();
    let _span = tracing::info_span!("action", action = kind.name(), %request_id).entered();

    match operation(input) {
        Ok(data) => {
            tracing::debug!("action succeeded");
            ActionResult::Success(data)
        }
        Err(error) => {
            tracing::error!(%error, "action failed");
            ActionResult::Failure(kind.failure_message().to_string())
        }
    }
}

pub fn get_drug_interaction_report<G: TextGenerator>(
    assistant: &MedicationAssistant<G>,
    input: DrugInteractionInput,
) -> ActionResult<DrugInteractionOutput> {
    run_action(ActionKind::DrugInteractionReport, input, |i| {
        assistant.analyze_drug_interactions(i)
    })
}

pub fn get_dosage_recommendation<G: TextGenerator>(
    assistant: &MedicationAssistant<G>,
    input: AgeSpecificDosageInput,
) -> ActionResult<AgeSpecificDosageOutput> {
    run_action(ActionKind::DosageRecommendation, input, |i| {
        assistant.get_age_specific_dosage(i)
    })
}

pub fn get_alternative_medication<G: TextGenerator>(
    assistant: &MedicationAssistant<G>,
    input: AlternativeMedicationInput,
) -> ActionResult<AlternativeMedicationOutput> {
    run_action(ActionKind::AlternativeMedication, input, |i| {
        assistant.suggest_alternative_medication(i)
    })
}

pub fn get_extracted_drug_info<G: TextGenerator>(
    assistant: &MedicationAssistant<G>,
    input: ExtractDrugInformationInput,
) -> ActionResult<Vec<ExtractedDrug>> {
    run_action(ActionKind::ExtractedDrugInfo, input, |i| {
        assistant.extract_drug_information(i)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_wire_shape() {
        let result = ActionResult::Success(DrugInteractionOutput {
            interaction_report: "None found.".into(),
        });
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "data": {"interactionReport": "None found."}})
        );
    }

    #[test]
    fn test_failure_wire_shape() {
        let result: ActionResult<Vec<ExtractedDrug>> =
            ActionResult::Failure("Failed to extract drug information.".into());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": false, "error": "Failed to extract drug information."})
        );
    }

    #[test]
    fn test_empty_list_success_wire_shape() {
        let result: ActionResult<Vec<ExtractedDrug>> = ActionResult::Success(vec![]);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"success": true, "data": []})
        );
    }

    #[test]
    fn test_deserialize_rejects_mixed_branches() {
        let mixed = json!({"success": true, "data": [], "error": "x"});
        assert!(serde_json::from_value::<ActionResult<Vec<ExtractedDrug>>>(mixed).is_err());

        let failure: ActionResult<Vec<ExtractedDrug>> =
            serde_json::from_value(json!({"success": false, "error": "nope"})).unwrap();
        assert_eq!(failure.error(), Some("nope"));
    }

    #[test]
    fn test_run_action_hides_error_detail() {
        let result: ActionResult<()> = run_action(ActionKind::DosageRecommendation, 3, |n: i32| {
            Err::<(), _>(format!("upstream exploded with code {}", n))
        });
        assert_eq!(result, ActionResult::Failure("Failed to get dosage recommendation.".into()));
    }

    #[test]
    fn test_run_action_passes_data_through() {
        let result = run_action(ActionKind::ExtractedDrugInfo, "abc", |s: &str| Ok::<_, String>(s.len()));
        assert_eq!(result, ActionResult::Success(3));
    }

    #[test]
    fn test_failure_messages_are_distinct() {
        let kinds = [
            ActionKind::DrugInteractionReport,
            ActionKind::DosageRecommendation,
            ActionKind::AlternativeMedication,
            ActionKind::ExtractedDrugInfo,
        ];
        let messages: std::collections::HashSet<_> = kinds.iter().map(|k| k.failure_message()).collect();
        assert_eq!(messages.len(), kinds.len());
        assert!(messages.iter().all(|m| !m.is_empty()));
    }
}
