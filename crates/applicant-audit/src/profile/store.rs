use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use super::domain::{ProfileField, RawProfile};

/// Storage abstraction for raw applicant profiles so the audit service can
/// be exercised in isolation. Persistence itself is out of scope; the
/// service only ever reads.
pub trait ProfileStore: Send + Sync {
    fn fetch(&self, id: &str) -> Result<Option<RawProfile>, StoreError>;
}

/// Error enumeration for profile store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory store seeded with sample applicants for demos and tests.
#[derive(Default, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<Mutex<BTreeMap<String, RawProfile>>>,
}

impl InMemoryProfileStore {
    /// Store preloaded with the two reference applicants: `123` carries the
    /// known intake flaws, `124` is clean.
    pub fn with_samples() -> Self {
        let store = Self::default();
        store.insert(flawed_sample());
        store.insert(clean_sample());
        store
    }

    pub fn insert(&self, profile: RawProfile) {
        // A poisoned lock still guards a structurally sound map; keep
        // serving seed data rather than propagating the panic.
        let mut guard = match self.profiles.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(profile.id.clone(), profile);
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn fetch(&self, id: &str) -> Result<Option<RawProfile>, StoreError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| StoreError::Unavailable("profile store lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

fn sample(id: &str, entries: &[(ProfileField, Value)]) -> RawProfile {
    let mut fields = BTreeMap::new();
    for (field, value) in entries {
        fields.insert(*field, value.clone());
    }
    RawProfile {
        id: id.to_string(),
        fields,
    }
}

fn flawed_sample() -> RawProfile {
    sample(
        "123",
        &[
            (ProfileField::FirstName, json!("John")),
            (ProfileField::SecondName, json!("Doe")),
            (ProfileField::MiddleName, json!("Smith")),
            (ProfileField::BirthDate, json!(2022)),
            (ProfileField::PassSeries, json!("47")),
            (ProfileField::PassNumber, json!(12234)),
            (ProfileField::RegistrationAddress, json!("Moscow")),
            (ProfileField::ResidenceAddress, json!("Alpha-Centauri")),
            (ProfileField::MaritalStatus, json!("MARRIED")),
            (ProfileField::HaveChildren, json!(false)),
            (ProfileField::JobPlace, json!("OOO Vasilyok")),
            (ProfileField::JobExperience, json!("-3 years")),
            (ProfileField::JobPosition, json!("Manager")),
            (ProfileField::MonthOfficialIncome, json!(100000)),
            (ProfileField::IncomeDocument, json!("2-NDFL")),
            (ProfileField::MonthAdditionalIncome, json!(42069)),
            (ProfileField::IsAdditionalIncomeApproved, json!(false)),
            (ProfileField::AdditionalIncomeSource, json!("Freelance")),
            (ProfileField::HaveBankSavings, json!(false)),
        ],
    )
}

fn clean_sample() -> RawProfile {
    sample(
        "124",
        &[
            (ProfileField::FirstName, json!("John")),
            (ProfileField::SecondName, json!("Doe")),
            (ProfileField::MiddleName, json!("Smith")),
            (ProfileField::BirthDate, json!("1990-01-01")),
            (ProfileField::PassSeries, json!("AB")),
            (ProfileField::PassNumber, json!(123456)),
            (ProfileField::RegistrationAddress, json!("123 Main St")),
            (ProfileField::ResidenceAddress, json!("456 Oak St")),
            (ProfileField::MaritalStatus, json!("MARRIED")),
            (ProfileField::HaveChildren, json!(true)),
            (ProfileField::JobPlace, json!("ABC Corporation")),
            (ProfileField::JobExperience, json!("5 years")),
            (ProfileField::JobPosition, json!("Software Engineer")),
            (ProfileField::MonthOfficialIncome, json!(95000)),
            (ProfileField::IncomeDocument, json!("Paystub")),
            (ProfileField::MonthAdditionalIncome, json!(1000)),
            (ProfileField::IsAdditionalIncomeApproved, json!(true)),
            (ProfileField::AdditionalIncomeSource, json!("Freelancing")),
            (ProfileField::HaveBankSavings, json!(true)),
        ],
    )
}
