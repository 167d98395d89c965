//! Risk weighting over the asserted profile.
//!
//! Scorers read the asserted value of each field and ignore its validation
//! status: a flagged field still carries risk weight, because a validator
//! verdict and a risk contribution answer different questions. Scorers are
//! independent of one another, so evaluation order cannot affect the report.

mod scorers;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::domain::{AnnotatedProfile, RiskFactor, RiskReport};

/// Assemble the risk report for one applicant: every canonical factor,
/// scored by its registered scorer.
pub fn risk_report(profile: &AnnotatedProfile, today: NaiveDate) -> RiskReport {
    let mut factors = BTreeMap::new();
    for factor in RiskFactor::ALL {
        factors.insert(factor, scorers::score(factor, profile, today));
    }
    RiskReport {
        id: profile.id().to_string(),
        factors,
    }
}
