//! Generation client abstraction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use thiserror::Error;

use crate::prompts::TemplateId;

/// Failures talking to, or interpreting, the generation service.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("generation service returned error (status {status}): {body}")]
    Service { status: u16, body: String },

    #[error("generation blocked by the service: {0}")]
    Blocked(String),

    #[error("generation service returned no content")]
    EmptyResponse,

    #[error("unparseable response: {0}")]
    Parse(String),

    #[error("response violates output contract: {0}")]
    ContractViolation(String),
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::Parse(e.to_string())
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// A rendered prompt ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub template: TemplateId,
    pub prompt: String,
    /// Expected response shape, in the service's schema dialect.
    pub response_schema: serde_json::Value,
}

/// Anything that can turn a rendered prompt into raw generated text.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        (**self).generate(request)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        (**self).generate(request)
    }
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// In-memory generator for tests: scripted reply, call counting.
#[derive(Debug)]
pub struct MockGenerator {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl MockGenerator {
    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Text(text.into()))
    }

    /// Always answer with the JSON serialization of `value`.
    pub fn replying_json(value: &serde_json::Value) -> Self {
        Self::replying(value.to_string())
    }

    /// Always fail with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(MockReply::Fail(message.into()))
    }

    fn with_reply(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.last_request.lock() {
            Ok(mut guard) => *guard = Some(request.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(request.clone()),
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(GenerationError::Transport(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            template: TemplateId::ExtractDrugInformation,
            prompt: "Medical Text: none".into(),
            response_schema: serde_json::json!({"type": "ARRAY"}),
        }
    }

    #[test]
    fn test_mock_counts_calls() {
        let mock = MockGenerator::replying("[]");
        assert_eq!(mock.call_count(), 0);
        assert!(mock.last_request().is_none());

        assert_eq!(mock.generate(&request()).unwrap(), "[]");
        assert_eq!(mock.generate(&request()).unwrap(), "[]");
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.last_request().unwrap().template, TemplateId::ExtractDrugInformation);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockGenerator::failing("connection reset");
        let err = mock.generate(&request()).unwrap_err();
        assert!(matches!(err, GenerationError::Transport(ref m) if m == "connection reset"));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_generator_through_reference() {
        let mock = MockGenerator::replying_json(&serde_json::json!({"reasoning": "ok"}));
        let by_ref: &dyn TextGenerator = &mock;
        let text = (&by_ref).generate(&request()).unwrap();
        assert_eq!(text, r#"{"reasoning":"ok"}"#);
    }
}
