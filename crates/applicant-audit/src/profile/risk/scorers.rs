use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::profile::domain::{AnnotatedProfile, ProfileField, RiskEntry, RiskFactor};
use crate::profile::validators::{parse_birth_year, parse_years};

/// Dispatch one factor to its scorer. Each scorer is pure over the asserted
/// values it reads and declares fixed non-negative weights.
pub(crate) fn score(
    factor: RiskFactor,
    profile: &AnnotatedProfile,
    today: NaiveDate,
) -> RiskEntry {
    match factor {
        RiskFactor::Age => score_age(profile, today),
        RiskFactor::Dependents => score_dependents(profile),
        RiskFactor::Employment => score_employment(profile),
        RiskFactor::OfficialIncome => score_official_income(profile),
        RiskFactor::AdditionalIncome => score_additional_income(profile),
        RiskFactor::MaritalStatus => score_marital_status(profile),
        RiskFactor::Savings => score_savings(profile),
    }
}

fn asserted(profile: &AnnotatedProfile, field: ProfileField) -> Value {
    profile
        .field(field)
        .map(|verdict| verdict.value().clone())
        .unwrap_or(Value::Null)
}

fn entry(score_points: u32, value: Value) -> RiskEntry {
    RiskEntry {
        score_points,
        value,
    }
}

fn score_age(profile: &AnnotatedProfile, today: NaiveDate) -> RiskEntry {
    let value = asserted(profile, ProfileField::BirthDate);
    let points = match parse_birth_year(&value).map(|year| today.year() - year) {
        Some(age) if age < 21 => 30,
        Some(age) if age <= 25 => 15,
        Some(age) if age <= 60 => 5,
        Some(_) => 20,
        None => 25,
    };
    entry(points, value)
}

fn score_dependents(profile: &AnnotatedProfile) -> RiskEntry {
    let value = asserted(profile, ProfileField::HaveChildren);
    let points = match value.as_bool() {
        Some(true) => 15,
        Some(false) => 5,
        None => 10,
    };
    entry(points, value)
}

fn score_employment(profile: &AnnotatedProfile) -> RiskEntry {
    let value = asserted(profile, ProfileField::JobExperience);
    let points = match parse_years(&value) {
        Some(years) if years < 1.0 => 30,
        Some(years) if years < 3.0 => 15,
        Some(_) => 5,
        None => 20,
    };
    entry(points, value)
}

fn score_official_income(profile: &AnnotatedProfile) -> RiskEntry {
    let value = asserted(profile, ProfileField::MonthOfficialIncome);
    let points = match value.as_f64() {
        Some(amount) if amount < 30_000.0 => 30,
        Some(amount) if amount < 80_000.0 => 15,
        Some(_) => 5,
        None => 25,
    };
    entry(points, value)
}

fn score_additional_income(profile: &AnnotatedProfile) -> RiskEntry {
    let value = asserted(profile, ProfileField::MonthAdditionalIncome);
    let approved = asserted(profile, ProfileField::IsAdditionalIncomeApproved)
        .as_bool()
        .unwrap_or(false);
    let points = match value.as_f64() {
        Some(amount) if amount > 0.0 && approved => 5,
        Some(amount) if amount > 0.0 => 20,
        _ => 10,
    };
    entry(points, value)
}

fn score_marital_status(profile: &AnnotatedProfile) -> RiskEntry {
    let value = asserted(profile, ProfileField::MaritalStatus);
    let points = match value.as_str() {
        Some(status) if status.eq_ignore_ascii_case("MARRIED") => 5,
        _ => 15,
    };
    entry(points, value)
}

fn score_savings(profile: &AnnotatedProfile) -> RiskEntry {
    let value = asserted(profile, ProfileField::HaveBankSavings);
    let points = match value.as_bool() {
        Some(true) => 0,
        _ => 25,
    };
    entry(points, value)
}
