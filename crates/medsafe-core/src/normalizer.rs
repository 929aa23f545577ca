//! Patient-detail normalizer.
//!
//! Renders an optional [`PatientProfile`] as the sentence fragment the prompts
//! expect. Fields appear in a fixed order and absent fields are skipped:
//!
//! ```text
//! Age: 65, Sex: female, Weight: 58.5 kg, Renal Function: moderate impairment, Other Conditions: CHF
//! ```

use crate::models::PatientProfile;

/// Used when there is no profile, or nothing in it.
pub const NO_PATIENT_DETAILS: &str = "No patient details provided.";

/// Format a profile for inclusion in a prompt.
pub fn format_patient_details(profile: Option<&PatientProfile>) -> String {
    let Some(profile) = profile else {
        return NO_PATIENT_DETAILS.to_string();
    };

    let mut details = Vec::with_capacity(5);

    // Zero and negative values carry no information; treat them like absent fields.
    if let Some(age) = profile.age_years() {
        details.push(format!("Age: {}", age));
    }
    if let Some(sex) = profile.sex {
        details.push(format!("Sex: {}", sex));
    }
    if let Some(weight) = profile.weight_kg() {
        details.push(format!("Weight: {} kg", weight));
    }
    if let Some(renal) = profile.renal_function {
        details.push(format!("Renal Function: {} impairment", renal));
    }
    if let Some(conditions) = profile.conditions() {
        details.push(format!("Other Conditions: {}", conditions));
    }

    if details.is_empty() {
        NO_PATIENT_DETAILS.to_string()
    } else {
        details.join(", ")
    }
}
