use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use super::annotator::annotate_profile;
use super::domain::{AnnotatedProfile, AuditError, RawProfile, RiskReport};
use super::merge::{apply_outage, apply_verdict, RemoteCheckStatus};
use super::risk::risk_report;
use super::store::{ProfileStore, StoreError};
use crate::remote::{RemoteValidationError, RemoteValidator, ValidationRequest};

/// Service composing the profile store, local annotation, remote validation,
/// and the merge policy into per-request audits.
pub struct AuditService<S, V> {
    store: Arc<S>,
    validator: Arc<V>,
}

/// Fully merged audit for one applicant, including whether the remote check
/// completed or the degradation policy applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAudit {
    #[serde(flatten)]
    pub profile: AnnotatedProfile,
    pub remote_check: RemoteCheckStatus,
}

impl<S, V> AuditService<S, V>
where
    S: ProfileStore + 'static,
    V: RemoteValidator + 'static,
{
    pub fn new(store: Arc<S>, validator: Arc<V>) -> Self {
        Self { store, validator }
    }

    /// Annotate an applicant's profile locally and fold in the remote
    /// verdicts. A failed remote call degrades the remotely covered fields
    /// to `Warn` instead of failing the audit.
    pub async fn audit_profile(
        &self,
        id: &str,
        today: NaiveDate,
    ) -> Result<ProfileAudit, AuditServiceError> {
        let raw = self.fetch(id)?;
        let mut profile = annotate_profile(&raw, today)?;

        let remote_check = match self
            .validator
            .validate(ValidationRequest::for_applicant(id))
            .await
        {
            Ok(verdict) => {
                apply_verdict(&mut profile, &verdict);
                RemoteCheckStatus::Completed
            }
            Err(error @ RemoteValidationError::Malformed(_)) => {
                warn!(applicant = id, %error, "discarding malformed remote validation response");
                apply_outage(&mut profile);
                RemoteCheckStatus::Degraded
            }
            Err(error) => {
                warn!(applicant = id, %error, "remote validation unavailable");
                apply_outage(&mut profile);
                RemoteCheckStatus::Degraded
            }
        };

        Ok(ProfileAudit {
            profile,
            remote_check,
        })
    }

    /// Annotate locally and compute the risk report over the asserted
    /// values. The remote validator is not consulted: risk weighting only
    /// reads what the applicant claimed.
    pub fn risk(&self, id: &str, today: NaiveDate) -> Result<RiskReport, AuditServiceError> {
        let raw = self.fetch(id)?;
        let profile = annotate_profile(&raw, today)?;
        Ok(risk_report(&profile, today))
    }

    fn fetch(&self, id: &str) -> Result<RawProfile, AuditServiceError> {
        if id.trim().is_empty() {
            return Err(AuditError::MissingIdentity.into());
        }
        self.store
            .fetch(id)?
            .ok_or_else(|| AuditServiceError::UnknownApplicant(id.to_string()))
    }
}

/// Error raised by the audit service.
#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error(transparent)]
    Audit(#[from] AuditError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no profile recorded for applicant '{0}'")]
    UnknownApplicant(String),
}
