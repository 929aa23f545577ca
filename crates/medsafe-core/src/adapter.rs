//! Generation client adapter.
//!
//! Turns a validated input into a typed output: render the input's template, send
//! it with the output's schema, locate the JSON payload, check it against the
//! schema, deserialize. Either a fully conforming value comes back or an error.

use medsafe_llm::{
    build_full_prompt, parse_json_payload, GenerationError, GenerationRequest, GenerationResult,
    TemplateId, TextGenerator,
};

use crate::schema::{check_conformance, OutputSchema, Validated};

/// An input record that knows which template renders it.
pub trait PromptInput {
    const TEMPLATE: TemplateId;

    fn render_prompt(&self) -> String;
}

/// Bridges typed operations and a [`TextGenerator`].
pub struct GenerationAdapter<G> {
    generator: G,
}

impl<G: TextGenerator> GenerationAdapter<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// One round trip to the generation service.
    pub fn generate<I, O>(&self, input: &Validated<I>) -> GenerationResult<O>
    where
        I: PromptInput,
        O: OutputSchema,
    {
        let response_schema = O::schema();
        let request = GenerationRequest {
            template: I::TEMPLATE,
            prompt: build_full_prompt(&input.render_prompt(), &response_schema),
            response_schema,
        };

        tracing::debug!(template = %I::TEMPLATE, prompt_chars = request.prompt.len(), "dispatching prompt");
        let raw = self.generator.generate(&request)?;

        decode_output(I::TEMPLATE, &request.response_schema, &raw)
    }
}

/// Parse, check and deserialize raw generated text.
pub fn decode_output<O: OutputSchema>(
    template: TemplateId,
    response_schema: &serde_json::Value,
    raw: &str,
) -> GenerationResult<O> {
    let payload = parse_json_payload(raw)?;

    if let Err(violation) = check_conformance(response_schema, &payload) {
        tracing::warn!(template = %template, %violation, "response violates output contract");
        return Err(GenerationError::ContractViolation(violation.to_string()));
    }

    serde_json::from_value(payload).map_err(|e| GenerationError::ContractViolation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DrugInteractionInput, DrugInteractionOutput, ExtractedDrug};
    use crate::schema::Validate;
    use medsafe_llm::MockGenerator;

    fn validated_input() -> Validated<DrugInteractionInput> {
        DrugInteractionInput::new("Age: 80", "warfarin, aspirin").validate().unwrap()
    }

    #[test]
    fn test_generate_sends_schema_and_prompt() {
        let mock = MockGenerator::replying(r#"{"interactionReport":"Bleeding risk."}"#);
        let adapter = GenerationAdapter::new(&mock);

        let output: DrugInteractionOutput = adapter.generate(&validated_input()).unwrap();
        assert_eq!(output.interaction_report, "Bleeding risk.");

        let request = mock.last_request().unwrap();
        assert_eq!(request.template, TemplateId::DrugInteractionAnalysis);
        assert!(request.prompt.contains("Drug List: warfarin, aspirin"));
        assert!(request.prompt.contains("interactionReport"));
        assert_eq!(request.response_schema, DrugInteractionOutput::schema());
    }

    #[test]
    fn test_generate_rejects_missing_field() {
        let mock = MockGenerator::replying(r#"{"report":"Bleeding risk."}"#);
        let adapter = GenerationAdapter::new(&mock);

        let result: GenerationResult<DrugInteractionOutput> = adapter.generate(&validated_input());
        assert!(matches!(result, Err(GenerationError::ContractViolation(_))));
    }

    #[test]
    fn test_generate_propagates_client_failure() {
        let mock = MockGenerator::failing("503");
        let adapter = GenerationAdapter::new(&mock);

        let result: GenerationResult<DrugInteractionOutput> = adapter.generate(&validated_input());
        assert!(matches!(result, Err(GenerationError::Transport(_))));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_decode_output_array() {
        let schema = <Vec<ExtractedDrug>>::schema();
        let drugs: Vec<ExtractedDrug> = decode_output(
            TemplateId::ExtractDrugInformation,
            &schema,
            r#"```json
[{"drugName":"lisinopril","dosage":"10mg","frequency":"once daily"}]
```"#,
        )
        .unwrap();
        assert_eq!(drugs.len(), 1);
        assert_eq!(drugs[0].drug_name, "lisinopril");
    }

    #[test]
    fn test_decode_output_unparseable() {
        let schema = DrugInteractionOutput::schema();
        let result: GenerationResult<DrugInteractionOutput> =
            decode_output(TemplateId::DrugInteractionAnalysis, &schema, "no json here");
        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }
}
