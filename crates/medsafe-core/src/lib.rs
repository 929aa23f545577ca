//! Medsafe Core Library
//!
//! Request/response contract layer of the medication-safety assistant: typed
//! schemas, validation and normalization between free-form user input and the
//! external text-generation service, with a uniform success/failure envelope.
//!
//! # Architecture
//!
//! ```text
//! Presentation layer
//!        │
//!        ▼
//!  Action Envelope ───────────── catches, logs, fixed message
//!        │
//!        ▼
//!  Operation Façade
//!        │
//!        ├── Schema validation ──── ValidationError (no external call)
//!        ├── Prompt template
//!        └── Generation adapter ─── GenerationError
//!                   │
//!                   ▼
//!          Generation service (Gemini)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Patient profile and per-operation input/output records
//! - [`schema`]: Field validation and output contracts
//! - [`normalizer`]: Patient-detail formatting for prompts
//! - [`adapter`]: Prompt dispatch and response checking
//! - [`operations`]: The four operations
//! - [`actions`]: Success/failure envelope for callers

pub mod actions;
pub mod adapter;
pub mod models;
pub mod normalizer;
pub mod operations;
pub mod schema;

// Re-export commonly used types
pub use actions::{
    get_alternative_medication, get_dosage_recommendation, get_drug_interaction_report,
    get_extracted_drug_info, run_action, ActionKind, ActionResult,
};
pub use adapter::{GenerationAdapter, PromptInput};
pub use models::{
    AgeSpecificDosageInput, AgeSpecificDosageOutput, AlternativeMedicationInput,
    AlternativeMedicationOutput, DrugInteractionInput, DrugInteractionOutput,
    ExtractDrugInformationInput, ExtractedDrug, PatientProfile, RenalFunction, Sex,
};
pub use normalizer::{format_patient_details, NO_PATIENT_DETAILS};
pub use operations::{MedicationAssistant, OperationError, OperationResult};
pub use schema::{Validate, Validated, ValidationError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use medsafe_llm::{GeminiClient, GenerationConfig};

// =========================================================================
// FFI Error Type
// =========================================================================

/// Errors surfaced to the host. Messages are safe to show to a user.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedsafeError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    ActionFailed { message: String },
}

impl From<medsafe_llm::ConfigError> for MedsafeError {
    fn from(e: medsafe_llm::ConfigError) -> Self {
        MedsafeError::Configuration {
            message: e.to_string(),
        }
    }
}

impl From<ValidationError> for MedsafeError {
    fn from(e: ValidationError) -> Self {
        MedsafeError::InvalidInput {
            message: e.to_string(),
        }
    }
}

fn action_failed(message: String) -> MedsafeError {
    MedsafeError::ActionFailed { message }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Build the assistant from the process environment. Fails if the service
/// credential is missing.
#[uniffi::export]
pub fn open_assistant() -> Result<Arc<MedsafeCore>, MedsafeError> {
    let config = GenerationConfig::from_env()?;
    tracing::info!(model = %config.model, "opening medication assistant");
    Ok(Arc::new(MedsafeCore {
        assistant: MedicationAssistant::with_config(&config)?,
    }))
}

/// Patient details as they will appear in prompts.
#[uniffi::export]
pub fn describe_patient(profile: Option<FfiPatientProfile>) -> Result<String, MedsafeError> {
    let profile = profile.map(PatientProfile::try_from).transpose()?;
    Ok(format_patient_details(profile.as_ref()))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Assistant handle for the host application.
#[derive(uniffi::Object)]
pub struct MedsafeCore {
    assistant: MedicationAssistant<GeminiClient>,
}

#[uniffi::export]
impl MedsafeCore {
    /// Interaction report for the comma-separated `drug_list`.
    pub fn drug_interaction_report(
        &self,
        profile: Option<FfiPatientProfile>,
        drug_list: String,
    ) -> Result<String, MedsafeError> {
        run_action(
            ActionKind::DrugInteractionReport,
            (profile, drug_list),
            |(profile, drug_list)| -> OperationResult<DrugInteractionOutput> {
                let profile = profile.map(PatientProfile::try_from).transpose()?;
                self.assistant
                    .analyze_drug_interactions(DrugInteractionInput::for_patient(profile.as_ref(), drug_list))
            },
        )
        .into_result()
        .map(|output| output.interaction_report)
        .map_err(action_failed)
    }

    /// Dosage recommendation. `renal_function` is one of normal, mild, moderate, severe.
    pub fn dosage_recommendation(
        &self,
        drug_name: String,
        patient_age: i64,
        renal_function: String,
        other_conditions: Option<String>,
    ) -> Result<FfiDosageRecommendation, MedsafeError> {
        run_action(
            ActionKind::DosageRecommendation,
            (drug_name, patient_age, renal_function, other_conditions),
            |(drug_name, patient_age, renal_function, other_conditions)| -> OperationResult<AgeSpecificDosageOutput> {
                let renal_function = RenalFunction::parse_field("renalFunction", &renal_function)?;
                let input = AgeSpecificDosageInput {
                    drug_name,
                    patient_age,
                    renal_function,
                    other_conditions,
                };
                self.assistant.get_age_specific_dosage(input)
            },
        )
        .into_result()
        .map(FfiDosageRecommendation::from)
        .map_err(action_failed)
    }

    /// Safer alternatives to `medications`.
    pub fn alternative_medication(
        &self,
        profile: Option<FfiPatientProfile>,
        medications: Vec<String>,
        interaction_details: String,
    ) -> Result<FfiAlternativeSuggestions, MedsafeError> {
        run_action(
            ActionKind::AlternativeMedication,
            (profile, medications, interaction_details),
            |(profile, medications, interaction_details)| -> OperationResult<AlternativeMedicationOutput> {
                let profile = profile.map(PatientProfile::try_from).transpose()?;
                let input = AlternativeMedicationInput::new(
                    format_patient_details(profile.as_ref()),
                    medications,
                    interaction_details,
                );
                self.assistant.suggest_alternative_medication(input)
            },
        )
        .into_result()
        .map(FfiAlternativeSuggestions::from)
        .map_err(action_failed)
    }

    /// Drugs mentioned in `medical_text`. Empty when none are found.
    pub fn extracted_drug_info(&self, medical_text: String) -> Result<Vec<FfiExtractedDrug>, MedsafeError> {
        run_action(
            ActionKind::ExtractedDrugInfo,
            ExtractDrugInformationInput::new(medical_text),
            |input| self.assistant.extract_drug_information(input),
        )
        .into_result()
        .map(|drugs| drugs.into_iter().map(FfiExtractedDrug::from).collect())
        .map_err(action_failed)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient profile. Enum fields are plain strings.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiPatientProfile {
    pub age: Option<i64>,
    pub sex: Option<String>,
    pub weight_kg: Option<f64>,
    pub renal_function: Option<String>,
    pub other_conditions: Option<String>,
}

impl TryFrom<FfiPatientProfile> for PatientProfile {
    type Error = ValidationError;

    fn try_from(profile: FfiPatientProfile) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let sex = non_blank(profile.sex).and_then(|s| {
            Sex::parse_field("sex", &s)
                .map_err(|e| errors.extend(e.errors))
                .ok()
        });
        let renal_function = non_blank(profile.renal_function).and_then(|r| {
            RenalFunction::parse_field("renalFunction", &r)
                .map_err(|e| errors.extend(e.errors))
                .ok()
        });

        let converted = PatientProfile {
            age: profile.age,
            sex,
            weight: profile.weight_kg,
            renal_function,
            other_conditions: profile.other_conditions,
        };

        if let Err(e) = converted.clone().validate() {
            errors.extend(e.errors);
        }
        if errors.is_empty() {
            Ok(converted)
        } else {
            Err(ValidationError { errors })
        }
    }
}

/// FFI-safe dosage recommendation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDosageRecommendation {
    pub recommended_dosage: String,
    pub dosage_justification: String,
    pub renal_dosing_guidance: Option<String>,
}

impl From<AgeSpecificDosageOutput> for FfiDosageRecommendation {
    fn from(output: AgeSpecificDosageOutput) -> Self {
        Self {
            recommended_dosage: output.recommended_dosage,
            dosage_justification: output.dosage_justification,
            renal_dosing_guidance: output.renal_dosing_guidance,
        }
    }
}

/// FFI-safe alternative suggestions.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAlternativeSuggestions {
    pub suggested_alternatives: Vec<String>,
    pub reasoning: String,
}

impl From<AlternativeMedicationOutput> for FfiAlternativeSuggestions {
    fn from(output: AlternativeMedicationOutput) -> Self {
        Self {
            suggested_alternatives: output.suggested_alternatives,
            reasoning: output.reasoning,
        }
    }
}

/// FFI-safe extracted drug.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExtractedDrug {
    pub drug_name: String,
    pub dosage: String,
    pub frequency: String,
}

impl From<ExtractedDrug> for FfiExtractedDrug {
    fn from(drug: ExtractedDrug) -> Self {
        Self {
            drug_name: drug.drug_name,
            dosage: drug.dosage,
            frequency: drug.frequency,
        }
    }
}
