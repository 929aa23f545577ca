//! Generation-service plumbing for the medication-safety assistant.
//!
//! This crate owns everything that talks to (or pretends to be) the external
//! text-generation service: prompt templates, configuration, the client trait with
//! its Gemini and mock implementations, and extraction of JSON payloads from raw
//! generated text. It knows nothing about the domain's input/output types.

pub mod client;
pub mod config;
pub mod gemini;
pub mod prompts;
pub mod response;

pub use client::*;
pub use config::*;
pub use gemini::GeminiClient;
pub use prompts::*;
pub use response::*;
