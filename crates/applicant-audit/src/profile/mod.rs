//! Applicant profile model, field validation, remote-verdict merging, and
//! risk weighting.

pub mod annotator;
pub mod doubtful;
pub mod domain;
pub mod merge;
pub mod risk;
pub mod service;
pub mod store;
pub mod validators;

pub use annotator::annotate_profile;
pub use domain::{
    AnnotatedProfile, AuditError, PartialProfileError, ProfileField, RawProfile, RiskEntry,
    RiskFactor, RiskReport,
};
pub use doubtful::{DoubtfulValue, DoubtfulValueError, ValidationStatus};
pub use merge::{apply_outage, apply_verdict, remote_target, RemoteCheckStatus};
pub use risk::risk_report;
pub use service::{AuditService, AuditServiceError, ProfileAudit};
pub use store::{InMemoryProfileStore, ProfileStore, StoreError};
