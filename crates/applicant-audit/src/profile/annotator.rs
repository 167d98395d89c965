use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::domain::{AnnotatedProfile, AuditError, ProfileField, RawProfile};
use super::validators::{validator_for, ValidatorContext};

/// Run the full validator registry over a raw profile.
///
/// Coverage is total: every canonical field appears in the result, with
/// absent raw fields judged on the absent sentinel. Fails with
/// [`AuditError::MissingIdentity`] before any validator runs when the raw
/// input carries no applicant id.
pub fn annotate_profile(
    raw: &RawProfile,
    today: NaiveDate,
) -> Result<AnnotatedProfile, AuditError> {
    if raw.id.trim().is_empty() {
        return Err(AuditError::MissingIdentity);
    }

    let ctx = ValidatorContext::new(raw, today);
    let mut fields = BTreeMap::new();
    for field in ProfileField::ALL {
        let verdict = validator_for(field)(raw.field(field), &ctx);
        fields.insert(field, verdict);
    }

    Ok(AnnotatedProfile::new(raw.id.clone(), fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::doubtful::ValidationStatus;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).expect("valid date")
    }

    #[test]
    fn empty_id_fails_before_validation() {
        let raw = RawProfile {
            id: "   ".to_string(),
            fields: BTreeMap::new(),
        };
        assert!(matches!(
            annotate_profile(&raw, today()),
            Err(AuditError::MissingIdentity)
        ));
    }

    #[test]
    fn annotation_covers_the_full_schema_even_for_empty_input() {
        let raw = RawProfile {
            id: "777".to_string(),
            fields: BTreeMap::new(),
        };
        let profile = annotate_profile(&raw, today()).expect("annotation succeeds");

        let covered: Vec<_> = profile.fields().map(|(field, _)| field).collect();
        assert_eq!(covered, ProfileField::ALL.to_vec());
        for (_, verdict) in profile.fields() {
            assert!(verdict.status() >= ValidationStatus::Warn);
        }
    }

    #[test]
    fn flawed_sample_produces_the_expected_verdicts() {
        let mut fields = BTreeMap::new();
        fields.insert(ProfileField::BirthDate, json!(2022));
        fields.insert(ProfileField::PassSeries, json!("47"));
        fields.insert(ProfileField::ResidenceAddress, json!("Alpha-Centauri"));
        fields.insert(ProfileField::JobExperience, json!("-3 years"));
        let raw = RawProfile {
            id: "123".to_string(),
            fields,
        };

        let profile = annotate_profile(&raw, today()).expect("annotation succeeds");

        let expectations = [
            (ProfileField::BirthDate, ValidationStatus::Warn),
            (ProfileField::PassSeries, ValidationStatus::Warn),
            (ProfileField::ResidenceAddress, ValidationStatus::Error),
            (ProfileField::JobExperience, ValidationStatus::Error),
        ];
        for (field, expected) in expectations {
            let verdict = profile.field(field).expect("field covered");
            assert_eq!(verdict.status(), expected, "{}", field.as_str());
            assert!(verdict.message().is_some_and(|m| !m.is_empty()));
        }
    }
}
