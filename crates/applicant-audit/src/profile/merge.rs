//! Reconciliation of local and remote verdicts into one response.
//!
//! The merge policy is deterministic and monotone: when two sources assess
//! the same logical field the result takes the more severe status and keeps
//! every non-empty message, so adding an opinion can raise or hold a field's
//! status but never lower it. Values always come from the local side; the
//! remote service asserts pass/fail, not corrected values.

use serde::{Deserialize, Serialize};

use super::domain::{AnnotatedProfile, ProfileField};
use super::doubtful::ValidationStatus;
use crate::remote::wire::RemoteAttribute;
use crate::remote::ValidationVerdict;

/// Whether the remote verdicts made it into the merged profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteCheckStatus {
    Completed,
    Degraded,
}

/// The profile field each remotely checked attribute vouches for.
pub fn remote_target(attribute: RemoteAttribute) -> ProfileField {
    match attribute {
        RemoteAttribute::Passport => ProfileField::PassNumber,
        RemoteAttribute::Registration => ProfileField::RegistrationAddress,
        RemoteAttribute::Residence => ProfileField::ResidenceAddress,
        RemoteAttribute::PresenceOfChildren => ProfileField::HaveChildren,
        RemoteAttribute::Job => ProfileField::JobPlace,
        RemoteAttribute::Salary => ProfileField::MonthOfficialIncome,
        RemoteAttribute::BridePrice => ProfileField::MaritalStatus,
        RemoteAttribute::Saving => ProfileField::HaveBankSavings,
    }
}

/// Fold a completed remote verdict into the locally annotated profile.
///
/// A flagged attribute raises its target field to `Error` with a message
/// naming the attribute; a clean attribute contributes nothing, so locally
/// flagged fields stay flagged.
pub fn apply_verdict(profile: &mut AnnotatedProfile, verdict: &ValidationVerdict) {
    for attribute in RemoteAttribute::WIRE_ORDER {
        if !verdict.flagged(attribute) {
            continue;
        }
        if let Some(field) = profile.field_mut(remote_target(attribute)) {
            field.merge_opinion(
                ValidationStatus::Error,
                Some(&format!(
                    "{} failed remote validation",
                    attribute.wire_name()
                )),
            );
        }
    }
}

/// Degradation policy for a remote check that could not be completed.
///
/// Every field the remote validator is responsible for is raised to at least
/// `Warn`; all other fields keep their local verdicts untouched, so the
/// response stays complete.
pub fn apply_outage(profile: &mut AnnotatedProfile) {
    for attribute in RemoteAttribute::WIRE_ORDER {
        if let Some(field) = profile.field_mut(remote_target(attribute)) {
            field.merge_opinion(
                ValidationStatus::Warn,
                Some("remote check could not be completed"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::annotate_profile;
    use crate::profile::domain::RawProfile;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).expect("valid date")
    }

    fn clean_profile() -> AnnotatedProfile {
        let mut fields = BTreeMap::new();
        fields.insert(ProfileField::RegistrationAddress, json!("Moscow"));
        fields.insert(ProfileField::HaveBankSavings, json!(true));
        let raw = RawProfile {
            id: "123".to_string(),
            fields,
        };
        annotate_profile(&raw, today()).expect("annotation succeeds")
    }

    #[test]
    fn every_attribute_maps_into_the_profile_schema() {
        let profile = clean_profile();
        for attribute in RemoteAttribute::WIRE_ORDER {
            assert!(profile.field(remote_target(attribute)).is_some());
        }
    }

    #[test]
    fn flagged_attribute_overrides_local_ok() {
        let mut profile = clean_profile();
        assert_eq!(
            profile
                .field(ProfileField::RegistrationAddress)
                .expect("covered")
                .status(),
            ValidationStatus::Ok
        );

        let mut verdict = ValidationVerdict::clean();
        verdict.set(RemoteAttribute::Registration, true);
        apply_verdict(&mut profile, &verdict);

        let merged = profile
            .field(ProfileField::RegistrationAddress)
            .expect("covered");
        assert_eq!(merged.status(), ValidationStatus::Error);
        assert!(merged
            .message()
            .is_some_and(|m| m.contains("registration")));
    }

    #[test]
    fn clean_verdict_never_lowers_a_local_status() {
        let mut profile = clean_profile();
        let before: Vec<_> = profile.fields().map(|(_, v)| v.status()).collect();

        apply_verdict(&mut profile, &ValidationVerdict::clean());

        let after: Vec<_> = profile.fields().map(|(_, v)| v.status()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn merge_is_monotone_for_every_status_pair() {
        let mut profile = clean_profile();
        let locals: Vec<_> = RemoteAttribute::WIRE_ORDER
            .iter()
            .map(|attribute| {
                profile
                    .field(remote_target(*attribute))
                    .expect("covered")
                    .status()
            })
            .collect();

        let mut verdict = ValidationVerdict::clean();
        for attribute in RemoteAttribute::WIRE_ORDER {
            verdict.set(attribute, true);
        }
        apply_verdict(&mut profile, &verdict);

        for (attribute, local) in RemoteAttribute::WIRE_ORDER.iter().zip(locals) {
            let merged = profile
                .field(remote_target(*attribute))
                .expect("covered")
                .status();
            assert!(merged >= local);
            assert!(merged >= ValidationStatus::Error);
        }
    }

    #[test]
    fn outage_degrades_remote_fields_to_at_least_warn() {
        let mut profile = clean_profile();
        apply_outage(&mut profile);

        for attribute in RemoteAttribute::WIRE_ORDER {
            let verdict = profile.field(remote_target(attribute)).expect("covered");
            assert!(verdict.status() >= ValidationStatus::Warn);
            assert!(verdict
                .message()
                .is_some_and(|m| m.contains("could not be completed")));
        }
        // Fields outside the remote validator's responsibility are untouched.
        assert_eq!(
            profile
                .field(ProfileField::FirstName)
                .expect("covered")
                .message(),
            Some("first name not supplied")
        );
    }

    #[test]
    fn outage_does_not_erase_local_errors() {
        let mut fields = BTreeMap::new();
        fields.insert(ProfileField::ResidenceAddress, json!("Alpha-Centauri"));
        let raw = RawProfile {
            id: "123".to_string(),
            fields,
        };
        let mut profile = annotate_profile(&raw, today()).expect("annotation succeeds");

        apply_outage(&mut profile);

        let verdict = profile
            .field(ProfileField::ResidenceAddress)
            .expect("covered");
        assert_eq!(verdict.status(), ValidationStatus::Error);
        assert!(verdict.message().is_some_and(|m| m.contains("does not exist")));
        assert!(verdict
            .message()
            .is_some_and(|m| m.contains("could not be completed")));
    }
}
