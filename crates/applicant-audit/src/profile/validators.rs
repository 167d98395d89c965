//! One pure validator per canonical profile field.
//!
//! Every validator is total over its input: any value it cannot make sense of
//! becomes a `Warn` or `Error` verdict with a message, never an error return.
//! An absent raw field is passed in as `None` and always rates at least
//! `Warn`. Severity policy: structurally impossible values are `Error`,
//! plausible-but-suspicious ones are `Warn`.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use super::domain::{ProfileField, RawProfile};
use super::doubtful::DoubtfulValue;

/// Youngest age at which an application is considered at all.
const MINIMUM_APPLICANT_AGE: i32 = 16;
/// Oldest birth date still treated as plausible.
const MAXIMUM_APPLICANT_AGE: i32 = 120;
/// Age at which an identity document can first be issued.
const DOCUMENT_ISSUE_AGE: i32 = 14;

const MARITAL_STATUSES: [&str; 4] = ["SINGLE", "MARRIED", "DIVORCED", "WIDOWED"];

/// Localities that cannot appear on a real address. The original intake rules
/// flag fictional or extraterrestrial places outright.
const IMPOSSIBLE_LOCALITIES: [&str; 6] = [
    "alpha-centauri",
    "alpha centauri",
    "atlantis",
    "hogwarts",
    "mordor",
    "narnia",
];

pub(crate) struct ValidatorContext<'a> {
    raw: &'a RawProfile,
    today: NaiveDate,
}

impl<'a> ValidatorContext<'a> {
    pub(crate) fn new(raw: &'a RawProfile, today: NaiveDate) -> Self {
        Self { raw, today }
    }

    fn peer(&self, field: ProfileField) -> Option<&Value> {
        self.raw.field(field)
    }

    fn birth_year(&self) -> Option<i32> {
        self.peer(ProfileField::BirthDate).and_then(parse_birth_year)
    }

    fn additional_income(&self) -> Option<f64> {
        self.peer(ProfileField::MonthAdditionalIncome)
            .and_then(Value::as_f64)
    }

    fn additional_income_approved(&self) -> Option<bool> {
        self.peer(ProfileField::IsAdditionalIncomeApproved)
            .and_then(Value::as_bool)
    }
}

pub(crate) type Validator =
    fn(Option<&Value>, &ValidatorContext<'_>) -> DoubtfulValue<Value>;

/// The declared validator registry: one entry per schema field, so adding a
/// field means registering one function here.
pub(crate) fn validator_for(field: ProfileField) -> Validator {
    match field {
        ProfileField::FirstName => |value, _| required_text(value, "first name"),
        ProfileField::SecondName => |value, _| required_text(value, "second name"),
        ProfileField::MiddleName => |value, _| required_text(value, "middle name"),
        ProfileField::BirthDate => validate_birth_date,
        ProfileField::PassSeries => validate_pass_series,
        ProfileField::PassNumber => validate_pass_number,
        ProfileField::RegistrationAddress => {
            |value, _| validate_address(value, "registration address")
        }
        ProfileField::ResidenceAddress => {
            |value, _| validate_address(value, "residence address")
        }
        ProfileField::MaritalStatus => validate_marital_status,
        ProfileField::HaveChildren => {
            |value, _| required_flag(value, "children declaration")
        }
        ProfileField::JobPlace => |value, _| required_text(value, "employer"),
        ProfileField::JobExperience => validate_job_experience,
        ProfileField::JobPosition => |value, _| required_text(value, "job position"),
        ProfileField::MonthOfficialIncome => validate_official_income,
        ProfileField::IncomeDocument => |value, _| required_text(value, "income document"),
        ProfileField::MonthAdditionalIncome => validate_additional_income,
        ProfileField::IsAdditionalIncomeApproved => validate_income_approval,
        ProfileField::AdditionalIncomeSource => validate_income_source,
        ProfileField::HaveBankSavings => validate_savings,
    }
}

fn absent(what: &str) -> DoubtfulValue<Value> {
    DoubtfulValue::warn(Value::Null, format!("{what} not supplied"))
}

fn required_text(value: Option<&Value>, what: &str) -> DoubtfulValue<Value> {
    match value {
        None | Some(Value::Null) => absent(what),
        Some(Value::String(text)) if text.trim().is_empty() => {
            DoubtfulValue::warn(value.cloned().unwrap_or(Value::Null), format!("{what} is empty"))
        }
        Some(text @ Value::String(_)) => DoubtfulValue::ok(text.clone()),
        Some(other) => DoubtfulValue::error(other.clone(), format!("{what} must be text")),
    }
}

fn required_flag(value: Option<&Value>, what: &str) -> DoubtfulValue<Value> {
    match value {
        None | Some(Value::Null) => absent(what),
        Some(flag @ Value::Bool(_)) => DoubtfulValue::ok(flag.clone()),
        Some(other) => {
            DoubtfulValue::error(other.clone(), format!("{what} must be a yes/no flag"))
        }
    }
}

fn validate_birth_date(
    value: Option<&Value>,
    ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("birth date");
    };
    let Some(year) = parse_birth_year(raw) else {
        return DoubtfulValue::error(raw.clone(), "unrecognized birth date format");
    };

    let age = ctx.today.year() - year;
    if age < 0 {
        DoubtfulValue::error(raw.clone(), "birth date lies in the future")
    } else if age > MAXIMUM_APPLICANT_AGE {
        DoubtfulValue::error(raw.clone(), "implausible birth date")
    } else if age < MINIMUM_APPLICANT_AGE {
        DoubtfulValue::warn(
            raw.clone(),
            format!("applicant is younger than {MINIMUM_APPLICANT_AGE}"),
        )
    } else {
        DoubtfulValue::ok(raw.clone())
    }
}

fn validate_pass_series(
    value: Option<&Value>,
    ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("passport series");
    };
    let text = match raw {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        other => {
            return DoubtfulValue::error(other.clone(), "malformed passport series");
        }
    };

    if text.is_empty() {
        return DoubtfulValue::warn(raw.clone(), "passport series is empty");
    }

    if text.chars().all(|c| c.is_ascii_uppercase()) {
        return DoubtfulValue::ok(raw.clone());
    }

    if text.chars().all(|c| c.is_ascii_digit()) {
        // Numeric series are only issued once the holder is of document age;
        // cross-check against the declared birth date.
        return match ctx.birth_year() {
            Some(year) if ctx.today.year() - year < DOCUMENT_ISSUE_AGE => {
                DoubtfulValue::warn(raw.clone(), "series does not match birth date")
            }
            Some(_) => DoubtfulValue::ok(raw.clone()),
            None => DoubtfulValue::warn(
                raw.clone(),
                "series cannot be cross-checked without a birth date",
            ),
        };
    }

    DoubtfulValue::error(raw.clone(), "malformed passport series")
}

fn validate_pass_number(
    value: Option<&Value>,
    _ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("passport number");
    };
    let digits = match raw {
        Value::Number(number) => {
            return match number.as_i64() {
                Some(n) if n > 0 => DoubtfulValue::ok(raw.clone()),
                _ => DoubtfulValue::error(raw.clone(), "passport number must be positive"),
            };
        }
        Value::String(text) => text.trim(),
        other => {
            return DoubtfulValue::error(other.clone(), "malformed passport number");
        }
    };

    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        DoubtfulValue::ok(raw.clone())
    } else {
        DoubtfulValue::error(raw.clone(), "malformed passport number")
    }
}

fn validate_address(value: Option<&Value>, what: &str) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent(what);
    };
    let Value::String(text) = raw else {
        return DoubtfulValue::error(raw.clone(), format!("{what} must be text"));
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return DoubtfulValue::warn(raw.clone(), format!("{what} is empty"));
    }

    let lowered = trimmed.to_lowercase();
    if IMPOSSIBLE_LOCALITIES
        .iter()
        .any(|place| lowered.contains(place))
    {
        DoubtfulValue::error(
            raw.clone(),
            format!("{what} refers to a place that does not exist"),
        )
    } else {
        DoubtfulValue::ok(raw.clone())
    }
}

fn validate_marital_status(
    value: Option<&Value>,
    _ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("marital status");
    };
    match raw {
        Value::String(text)
            if MARITAL_STATUSES
                .iter()
                .any(|status| status.eq_ignore_ascii_case(text.trim())) =>
        {
            DoubtfulValue::ok(raw.clone())
        }
        Value::String(_) => DoubtfulValue::warn(raw.clone(), "unrecognized marital status"),
        other => DoubtfulValue::error(other.clone(), "marital status must be text"),
    }
}

fn validate_job_experience(
    value: Option<&Value>,
    ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("job experience");
    };
    let Some(years) = parse_years(raw) else {
        return DoubtfulValue::warn(raw.clone(), "unrecognized experience format");
    };

    if years < 0.0 {
        return DoubtfulValue::error(raw.clone(), "negative experience");
    }

    if let Some(birth_year) = ctx.birth_year() {
        let working_years = (ctx.today.year() - birth_year - MINIMUM_APPLICANT_AGE).max(0);
        if years > working_years as f64 {
            return DoubtfulValue::warn(raw.clone(), "experience exceeds working age");
        }
    }

    DoubtfulValue::ok(raw.clone())
}

fn validate_official_income(
    value: Option<&Value>,
    _ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("official income");
    };
    match raw.as_f64() {
        Some(amount) if amount < 0.0 => {
            DoubtfulValue::error(raw.clone(), "income cannot be negative")
        }
        Some(amount) if amount == 0.0 => {
            DoubtfulValue::warn(raw.clone(), "no official income declared")
        }
        Some(_) => DoubtfulValue::ok(raw.clone()),
        None => DoubtfulValue::error(raw.clone(), "income must be a number"),
    }
}

fn validate_additional_income(
    value: Option<&Value>,
    ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("additional income");
    };
    match raw.as_f64() {
        Some(amount) if amount < 0.0 => {
            DoubtfulValue::error(raw.clone(), "income cannot be negative")
        }
        Some(amount) if amount > 0.0 && ctx.additional_income_approved() != Some(true) => {
            DoubtfulValue::warn(raw.clone(), "additional income is not confirmed")
        }
        Some(_) => DoubtfulValue::ok(raw.clone()),
        None => DoubtfulValue::error(raw.clone(), "income must be a number"),
    }
}

fn validate_income_approval(
    value: Option<&Value>,
    ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("income confirmation");
    };
    match raw {
        Value::Bool(false) if ctx.additional_income().unwrap_or(0.0) > 0.0 => {
            DoubtfulValue::warn(raw.clone(), "unconfirmed additional income")
        }
        Value::Bool(_) => DoubtfulValue::ok(raw.clone()),
        other => DoubtfulValue::error(
            other.clone(),
            "income confirmation must be a yes/no flag",
        ),
    }
}

fn validate_income_source(
    value: Option<&Value>,
    ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    match value.filter(|v| !v.is_null()) {
        Some(raw) => required_text(Some(raw), "additional income source"),
        None if ctx.additional_income().unwrap_or(0.0) > 0.0 => DoubtfulValue::warn(
            Value::Null,
            "additional income declared without a source",
        ),
        None => absent("additional income source"),
    }
}

fn validate_savings(
    value: Option<&Value>,
    _ctx: &ValidatorContext<'_>,
) -> DoubtfulValue<Value> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        return absent("savings declaration");
    };
    match raw {
        Value::Bool(true) => DoubtfulValue::ok(raw.clone()),
        Value::Bool(false) => DoubtfulValue::warn(raw.clone(), "applicant has no savings"),
        other => DoubtfulValue::error(
            other.clone(),
            "savings declaration must be a yes/no flag",
        ),
    }
}

/// Accepts either a bare year or an ISO `YYYY-MM-DD` string.
pub(crate) fn parse_birth_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().map(|year| year as i32),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(year) = trimmed.parse::<i32>() {
                return Some(year);
            }
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(|date| date.year())
        }
        _ => None,
    }
}

/// Accepts a bare number or a `"<n> years"`-style string.
pub(crate) fn parse_years(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<f64>().ok()),
        _ => None,
    }
}
