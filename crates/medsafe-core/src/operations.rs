//! Operation façade: one method per assistant feature.
//!
//! Each call validates its input, then makes exactly one round trip through the
//! [`GenerationAdapter`]. Nothing is caught here; errors go to the caller.

use thiserror::Error;

use medsafe_llm::{ConfigResult, GeminiClient, GenerationConfig, GenerationError, TextGenerator};

use crate::adapter::GenerationAdapter;
use crate::models::{
    AgeSpecificDosageInput, AgeSpecificDosageOutput, AlternativeMedicationInput,
    AlternativeMedicationOutput, DrugInteractionInput, DrugInteractionOutput,
    ExtractDrugInformationInput, ExtractedDrug,
};
use crate::schema::{Validate, ValidationError};

/// Operation errors.
#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}

pub type OperationResult<T> = Result<T, OperationError>;

/// The four assistant operations over one generator.
pub struct MedicationAssistant<G> {
    adapter: GenerationAdapter<G>,
}

impl MedicationAssistant<GeminiClient> {
    /// Assistant backed by the Gemini API.
    pub fn with_config(config: &GenerationConfig) -> ConfigResult<Self> {
        Ok(Self::new(GeminiClient::new(config)?))
    }
}

impl<G: TextGenerator> MedicationAssistant<G> {
    pub fn new(generator: G) -> Self {
        Self {
            adapter: GenerationAdapter::new(generator),
        }
    }

    pub fn generator(&self) -> &G {
        self.adapter.generator()
    }

    /// Potential harmful interactions between the listed drugs.
    pub fn analyze_drug_interactions(
        &self,
        input: DrugInteractionInput,
    ) -> OperationResult<DrugInteractionOutput> {
        let input = input.validate()?;
        Ok(self.adapter.generate(&input)?)
    }

    /// Dosage recommendation for the patient's age and renal function.
    pub fn get_age_specific_dosage(
        &self,
        input: AgeSpecificDosageInput,
    ) -> OperationResult<AgeSpecificDosageOutput> {
        let input = input.validate()?;
        Ok(self.adapter.generate(&input)?)
    }

    /// Safer alternatives to the current medications.
    pub fn suggest_alternative_medication(
        &self,
        input: AlternativeMedicationInput,
    ) -> OperationResult<AlternativeMedicationOutput> {
        let input = input.validate()?;
        Ok(self.adapter.generate(&input)?)
    }

    /// Drug name, dosage and frequency triples found in free text. May be empty.
    pub fn extract_drug_information(
        &self,
        input: ExtractDrugInformationInput,
    ) -> OperationResult<Vec<ExtractedDrug>> {
        let input = input.validate()?;
        Ok(self.adapter.generate(&input)?)
    }
}
