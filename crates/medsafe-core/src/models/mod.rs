//! Domain models: the patient profile and the input/output records of the four
//! assistant operations.

mod alternative;
mod dosage;
mod extraction;
mod interaction;
mod patient;

pub use alternative::*;
pub use dosage::*;
pub use extraction::*;
pub use interaction::*;
pub use patient::*;

/// Split comma-separated user text into trimmed, non-empty entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
