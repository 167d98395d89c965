use serde::{Deserialize, Serialize};

/// Ordered severity of a validation verdict. `Ok < Warn < Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Ok,
    Warn,
    Error,
}

impl ValidationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationStatus::Ok => "OK",
            ValidationStatus::Warn => "WARN",
            ValidationStatus::Error => "ERROR",
        }
    }
}

/// A field value paired with the verdict of whoever inspected it.
///
/// The value is always present, even when the status is not `Ok`: consumers
/// see what the applicant asserted together with how much it can be trusted.
/// Invariant: `Ok` carries no message; `Warn` and `Error` always carry a
/// non-empty one. The constructors enforce this, and deserialization rejects
/// payloads that violate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "DoubtfulValueRepr<T>",
    into = "DoubtfulValueRepr<T>",
    bound(
        serialize = "T: Serialize + Clone",
        deserialize = "T: serde::Deserialize<'de>"
    )
)]
pub struct DoubtfulValue<T> {
    value: T,
    status: ValidationStatus,
    message: Option<String>,
}

impl<T> DoubtfulValue<T> {
    /// Verdict for a value that passed every check.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            status: ValidationStatus::Ok,
            message: None,
        }
    }

    /// Verdict for a plausible but suspicious or unverifiable value.
    ///
    /// Panics if the message is empty; a `Warn` without an explanation is a
    /// programming error, not a runtime condition.
    pub fn warn(value: T, message: impl Into<String>) -> Self {
        Self::flagged(value, ValidationStatus::Warn, message.into())
    }

    /// Verdict for a structurally impossible value.
    ///
    /// Panics if the message is empty, as with [`DoubtfulValue::warn`].
    pub fn error(value: T, message: impl Into<String>) -> Self {
        Self::flagged(value, ValidationStatus::Error, message.into())
    }

    fn flagged(value: T, status: ValidationStatus, message: String) -> Self {
        assert!(
            !message.trim().is_empty(),
            "{} verdict requires a non-empty message",
            status.label()
        );
        Self {
            value,
            status,
            message: Some(message),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Fold another validator's opinion into this verdict.
    ///
    /// The status becomes the more severe of the two and every non-empty
    /// message is preserved, so stacking opinions can only hold or raise
    /// severity. The asserted value is untouched: remote validators assert
    /// pass/fail, not corrected values.
    pub fn merge_opinion(&mut self, status: ValidationStatus, message: Option<&str>) {
        if status > self.status {
            self.status = status;
        }
        if let Some(incoming) = message.map(str::trim).filter(|text| !text.is_empty()) {
            match &mut self.message {
                Some(existing) => {
                    existing.push_str("; ");
                    existing.push_str(incoming);
                }
                None => self.message = Some(incoming.to_string()),
            }
        }
        debug_assert!(
            self.status == ValidationStatus::Ok || self.message.is_some(),
            "merged verdict lost its message"
        );
    }
}

/// Raised when a serialized verdict breaks the status/message invariant.
#[derive(Debug, thiserror::Error)]
pub enum DoubtfulValueError {
    #[error("status {} requires a non-empty message", .0.label())]
    MissingMessage(ValidationStatus),
    #[error("status OK must not carry a message")]
    UnexpectedMessage,
}

#[derive(Serialize, Deserialize)]
struct DoubtfulValueRepr<T> {
    value: T,
    status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T> TryFrom<DoubtfulValueRepr<T>> for DoubtfulValue<T> {
    type Error = DoubtfulValueError;

    fn try_from(repr: DoubtfulValueRepr<T>) -> Result<Self, Self::Error> {
        match (repr.status, &repr.message) {
            (ValidationStatus::Ok, Some(_)) => Err(DoubtfulValueError::UnexpectedMessage),
            (status @ (ValidationStatus::Warn | ValidationStatus::Error), message) => {
                if message.as_deref().is_some_and(|m| !m.trim().is_empty()) {
                    Ok(DoubtfulValue {
                        value: repr.value,
                        status,
                        message: repr.message,
                    })
                } else {
                    Err(DoubtfulValueError::MissingMessage(status))
                }
            }
            (ValidationStatus::Ok, None) => Ok(DoubtfulValue::ok(repr.value)),
        }
    }
}

impl<T> From<DoubtfulValue<T>> for DoubtfulValueRepr<T> {
    fn from(verdict: DoubtfulValue<T>) -> Self {
        Self {
            value: verdict.value,
            status: verdict.status,
            message: verdict.message,
        }
    }
}
