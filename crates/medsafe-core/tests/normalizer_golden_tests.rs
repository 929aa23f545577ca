//! Golden tests for the patient-detail normalizer.

use medsafe_core::{format_patient_details, PatientProfile, RenalFunction, Sex, NO_PATIENT_DETAILS};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    profile: Option<PatientProfile>,
    expected: &'static str,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "no-profile",
            profile: None,
            expected: NO_PATIENT_DETAILS,
        },
        GoldenCase {
            id: "empty-profile",
            profile: Some(PatientProfile::default()),
            expected: NO_PATIENT_DETAILS,
        },
        GoldenCase {
            id: "age-and-renal",
            profile: Some(PatientProfile {
                age: Some(65),
                renal_function: Some(RenalFunction::Moderate),
                ..Default::default()
            }),
            expected: "Age: 65, Renal Function: moderate impairment",
        },
        GoldenCase {
            id: "sex-only",
            profile: Some(PatientProfile {
                sex: Some(Sex::Other),
                ..Default::default()
            }),
            expected: "Sex: other",
        },
        GoldenCase {
            id: "pediatric-weight",
            profile: Some(PatientProfile {
                age: Some(4),
                weight: Some(16.2),
                ..Default::default()
            }),
            expected: "Age: 4, Weight: 16.2 kg",
        },
        GoldenCase {
            id: "normal-renal-still-suffixed",
            profile: Some(PatientProfile {
                renal_function: Some(RenalFunction::Normal),
                ..Default::default()
            }),
            expected: "Renal Function: normal impairment",
        },
        GoldenCase {
            id: "conditions-trimmed",
            profile: Some(PatientProfile {
                sex: Some(Sex::Male),
                other_conditions: Some("  type 2 diabetes, gout ".into()),
                ..Default::default()
            }),
            expected: "Sex: male, Other Conditions: type 2 diabetes, gout",
        },
        GoldenCase {
            id: "blank-conditions-only",
            profile: Some(PatientProfile {
                other_conditions: Some("   ".into()),
                ..Default::default()
            }),
            expected: NO_PATIENT_DETAILS,
        },
        GoldenCase {
            id: "everything",
            profile: Some(PatientProfile {
                age: Some(88),
                sex: Some(Sex::Female),
                weight: Some(49.0),
                renal_function: Some(RenalFunction::Severe),
                other_conditions: Some("dementia".into()),
            }),
            expected: "Age: 88, Sex: female, Weight: 49 kg, Renal Function: severe impairment, Other Conditions: dementia",
        },
    ]
}

#[test]
fn test_golden_cases() {
    for case in get_golden_cases() {
        let actual = format_patient_details(case.profile.as_ref());
        assert_eq!(actual, case.expected, "Golden case '{}' failed", case.id);
    }
}

#[test]
fn test_profile_json_round_trip_matches_golden() {
    let profile: PatientProfile =
        serde_json::from_str(r#"{"age":65,"renalFunction":"moderate"}"#).unwrap();
    assert_eq!(
        format_patient_details(Some(&profile)),
        "Age: 65, Renal Function: moderate impairment"
    );

    let empty: PatientProfile = serde_json::from_str("{}").unwrap();
    assert_eq!(format_patient_details(Some(&empty)), NO_PATIENT_DETAILS);
}
