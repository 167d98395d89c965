use std::future::Future;
use std::sync::Arc;

use applicant_audit::profile::{
    AuditService, AuditServiceError, InMemoryProfileStore, ProfileField, RemoteCheckStatus,
    ValidationStatus,
};
use applicant_audit::remote::wire::{RemoteAttribute, WireError};
use applicant_audit::remote::{
    RemoteValidationError, RemoteValidator, ValidationRequest, ValidationVerdict,
};
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 25).expect("valid date")
}

fn service<V: RemoteValidator + 'static>(
    validator: V,
) -> AuditService<InMemoryProfileStore, V> {
    AuditService::new(
        Arc::new(InMemoryProfileStore::with_samples()),
        Arc::new(validator),
    )
}

struct CleanValidator;

impl RemoteValidator for CleanValidator {
    fn validate(
        &self,
        _request: ValidationRequest,
    ) -> impl Future<Output = Result<ValidationVerdict, RemoteValidationError>> + Send {
        async { Ok(ValidationVerdict::clean()) }
    }
}

struct FlaggingValidator(Vec<RemoteAttribute>);

impl RemoteValidator for FlaggingValidator {
    fn validate(
        &self,
        _request: ValidationRequest,
    ) -> impl Future<Output = Result<ValidationVerdict, RemoteValidationError>> + Send {
        let flagged = self.0.clone();
        async move {
            let mut verdict = ValidationVerdict::clean();
            for attribute in flagged {
                verdict.set(attribute, true);
            }
            Ok(verdict)
        }
    }
}

struct OfflineValidator;

impl RemoteValidator for OfflineValidator {
    fn validate(
        &self,
        _request: ValidationRequest,
    ) -> impl Future<Output = Result<ValidationVerdict, RemoteValidationError>> + Send {
        async {
            Err(RemoteValidationError::Unavailable(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }
}

struct GarblingValidator;

impl RemoteValidator for GarblingValidator {
    fn validate(
        &self,
        _request: ValidationRequest,
    ) -> impl Future<Output = Result<ValidationVerdict, RemoteValidationError>> + Send {
        async { Err(RemoteValidationError::Malformed(WireError::Truncated)) }
    }
}

#[tokio::test]
async fn clean_applicant_with_clean_validator_is_all_ok() {
    let audit = service(CleanValidator)
        .audit_profile("124", today())
        .await
        .expect("audit succeeds");

    assert_eq!(audit.remote_check, RemoteCheckStatus::Completed);
    for (field, verdict) in audit.profile.fields() {
        assert_eq!(
            verdict.status(),
            ValidationStatus::Ok,
            "{} unexpectedly flagged",
            field.as_str()
        );
    }
}

#[tokio::test]
async fn flawed_applicant_keeps_local_verdicts_after_clean_remote_check() {
    let audit = service(CleanValidator)
        .audit_profile("123", today())
        .await
        .expect("audit succeeds");

    assert_eq!(audit.remote_check, RemoteCheckStatus::Completed);
    let expectations = [
        (ProfileField::BirthDate, ValidationStatus::Warn),
        (ProfileField::PassSeries, ValidationStatus::Warn),
        (ProfileField::ResidenceAddress, ValidationStatus::Error),
        (ProfileField::JobExperience, ValidationStatus::Error),
        (ProfileField::FirstName, ValidationStatus::Ok),
    ];
    for (field, expected) in expectations {
        let verdict = audit.profile.field(field).expect("field covered");
        assert_eq!(verdict.status(), expected, "{}", field.as_str());
    }
}

#[tokio::test]
async fn remote_flag_escalates_a_locally_clean_field() {
    let audit = service(FlaggingValidator(vec![
        RemoteAttribute::BridePrice,
        RemoteAttribute::Salary,
    ]))
    .audit_profile("124", today())
    .await
    .expect("audit succeeds");

    assert_eq!(audit.remote_check, RemoteCheckStatus::Completed);

    let marital = audit
        .profile
        .field(ProfileField::MaritalStatus)
        .expect("field covered");
    assert_eq!(marital.status(), ValidationStatus::Error);
    assert!(marital
        .message()
        .is_some_and(|m| m.contains("remote validation")));

    let income = audit
        .profile
        .field(ProfileField::MonthOfficialIncome)
        .expect("field covered");
    assert_eq!(income.status(), ValidationStatus::Error);

    // Untouched attributes stay as locally judged.
    let name = audit
        .profile
        .field(ProfileField::FirstName)
        .expect("field covered");
    assert_eq!(name.status(), ValidationStatus::Ok);
}

#[tokio::test]
async fn validator_outage_degrades_every_remotely_checked_field() {
    let audit = service(OfflineValidator)
        .audit_profile("124", today())
        .await
        .expect("audit still succeeds");

    assert_eq!(audit.remote_check, RemoteCheckStatus::Degraded);

    for attribute in RemoteAttribute::WIRE_ORDER {
        let field = applicant_audit::profile::remote_target(attribute);
        let verdict = audit.profile.field(field).expect("field covered");
        assert!(
            verdict.status() >= ValidationStatus::Warn,
            "{} not degraded",
            field.as_str()
        );
    }

    // Fields outside the remote contract keep their local verdicts.
    let name = audit
        .profile
        .field(ProfileField::FirstName)
        .expect("field covered");
    assert_eq!(name.status(), ValidationStatus::Ok);
}

#[tokio::test]
async fn malformed_remote_response_degrades_instead_of_failing() {
    let audit = service(GarblingValidator)
        .audit_profile("124", today())
        .await
        .expect("audit still succeeds");

    assert_eq!(audit.remote_check, RemoteCheckStatus::Degraded);

    for attribute in RemoteAttribute::WIRE_ORDER {
        let field = applicant_audit::profile::remote_target(attribute);
        let verdict = audit.profile.field(field).expect("field covered");
        assert!(
            verdict.status() >= ValidationStatus::Warn,
            "{} not degraded",
            field.as_str()
        );
        assert!(verdict
            .message()
            .is_some_and(|m| m.contains("could not be completed")));
    }

    let name = audit
        .profile
        .field(ProfileField::FirstName)
        .expect("field covered");
    assert_eq!(name.status(), ValidationStatus::Ok);
}

#[tokio::test]
async fn blank_identifier_is_rejected_before_any_lookup() {
    let err = service(CleanValidator)
        .audit_profile("  ", today())
        .await
        .expect_err("blank id must fail");
    assert!(matches!(err, AuditServiceError::Audit(_)));
}

#[tokio::test]
async fn unknown_applicant_is_a_distinct_failure() {
    let err = service(CleanValidator)
        .audit_profile("999", today())
        .await
        .expect_err("unknown id must fail");
    assert!(matches!(err, AuditServiceError::UnknownApplicant(id) if id == "999"));
}

#[test]
fn risk_weights_are_deterministic_and_read_assertions_only() {
    let service = service(OfflineValidator);

    let first = service.risk("124", today()).expect("risk succeeds");
    let second = service.risk("124", today()).expect("risk succeeds");
    assert_eq!(first, second);

    let total: u32 = first
        .factors
        .values()
        .map(|entry| entry.score_points)
        .sum();
    assert_eq!(total, 40);
}

#[test]
fn flawed_applicant_scores_worse_than_clean_one() {
    let service = service(CleanValidator);

    let clean: u32 = service
        .risk("124", today())
        .expect("risk succeeds")
        .factors
        .values()
        .map(|entry| entry.score_points)
        .sum();
    let flawed: u32 = service
        .risk("123", today())
        .expect("risk succeeds")
        .factors
        .values()
        .map(|entry| entry.score_points)
        .sum();

    assert_eq!(flawed, 120);
    assert!(flawed > clean);
}
