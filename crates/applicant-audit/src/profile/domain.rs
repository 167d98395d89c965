use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::doubtful::DoubtfulValue;

/// Canonical applicant profile schema. An [`AnnotatedProfile`] always carries
/// exactly this set of fields, regardless of what the raw input supplied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    FirstName,
    SecondName,
    MiddleName,
    BirthDate,
    PassSeries,
    PassNumber,
    RegistrationAddress,
    ResidenceAddress,
    MaritalStatus,
    HaveChildren,
    JobPlace,
    JobExperience,
    JobPosition,
    MonthOfficialIncome,
    IncomeDocument,
    MonthAdditionalIncome,
    IsAdditionalIncomeApproved,
    AdditionalIncomeSource,
    HaveBankSavings,
}

impl ProfileField {
    pub const ALL: [ProfileField; 19] = [
        ProfileField::FirstName,
        ProfileField::SecondName,
        ProfileField::MiddleName,
        ProfileField::BirthDate,
        ProfileField::PassSeries,
        ProfileField::PassNumber,
        ProfileField::RegistrationAddress,
        ProfileField::ResidenceAddress,
        ProfileField::MaritalStatus,
        ProfileField::HaveChildren,
        ProfileField::JobPlace,
        ProfileField::JobExperience,
        ProfileField::JobPosition,
        ProfileField::MonthOfficialIncome,
        ProfileField::IncomeDocument,
        ProfileField::MonthAdditionalIncome,
        ProfileField::IsAdditionalIncomeApproved,
        ProfileField::AdditionalIncomeSource,
        ProfileField::HaveBankSavings,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ProfileField::FirstName => "firstName",
            ProfileField::SecondName => "secondName",
            ProfileField::MiddleName => "middleName",
            ProfileField::BirthDate => "birthDate",
            ProfileField::PassSeries => "passSeries",
            ProfileField::PassNumber => "passNumber",
            ProfileField::RegistrationAddress => "registrationAddress",
            ProfileField::ResidenceAddress => "residenceAddress",
            ProfileField::MaritalStatus => "maritalStatus",
            ProfileField::HaveChildren => "haveChildren",
            ProfileField::JobPlace => "jobPlace",
            ProfileField::JobExperience => "jobExperience",
            ProfileField::JobPosition => "jobPosition",
            ProfileField::MonthOfficialIncome => "monthOfficialIncome",
            ProfileField::IncomeDocument => "incomeDocument",
            ProfileField::MonthAdditionalIncome => "monthAdditionalIncome",
            ProfileField::IsAdditionalIncomeApproved => "isAdditionalIncomeApproved",
            ProfileField::AdditionalIncomeSource => "additionalIncomeSource",
            ProfileField::HaveBankSavings => "haveBankSavings",
        }
    }
}

/// Canonical risk factor schema. Independent of [`ProfileField`]: the two may
/// overlap in name but are separate namespaces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum RiskFactor {
    Age,
    Dependents,
    Employment,
    OfficialIncome,
    AdditionalIncome,
    MaritalStatus,
    Savings,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 7] = [
        RiskFactor::Age,
        RiskFactor::Dependents,
        RiskFactor::Employment,
        RiskFactor::OfficialIncome,
        RiskFactor::AdditionalIncome,
        RiskFactor::MaritalStatus,
        RiskFactor::Savings,
    ];
}

/// Applicant-supplied input as it arrives from the profile store, keyed by
/// the canonical schema. Fields the applicant never supplied are simply
/// absent here; the annotator still covers them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfile {
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<ProfileField, Value>,
}

impl RawProfile {
    pub fn field(&self, field: ProfileField) -> Option<&Value> {
        self.fields.get(&field)
    }
}

/// A profile where every canonical field carries a validation verdict.
///
/// Built by the annotator and only ever mutated by the result aggregator,
/// which can raise severities but never remove fields, so the key set stays
/// equal to [`ProfileField::ALL`] for the life of the value.
/// Deserialization rejects partial key sets so the guarantee also holds for
/// profiles read back from their serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnnotatedProfileRepr")]
pub struct AnnotatedProfile {
    id: String,
    fields: BTreeMap<ProfileField, DoubtfulValue<Value>>,
}

impl AnnotatedProfile {
    pub(crate) fn new(id: String, fields: BTreeMap<ProfileField, DoubtfulValue<Value>>) -> Self {
        debug_assert_eq!(fields.len(), ProfileField::ALL.len());
        Self { id, fields }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn field(&self, field: ProfileField) -> Option<&DoubtfulValue<Value>> {
        self.fields.get(&field)
    }

    pub(crate) fn field_mut(
        &mut self,
        field: ProfileField,
    ) -> Option<&mut DoubtfulValue<Value>> {
        self.fields.get_mut(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (ProfileField, &DoubtfulValue<Value>)> {
        self.fields.iter().map(|(field, verdict)| (*field, verdict))
    }
}

/// Raised when a serialized profile does not cover the canonical schema.
#[derive(Debug, thiserror::Error)]
#[error("annotated profile covers {covered} of {} canonical fields", ProfileField::ALL.len())]
pub struct PartialProfileError {
    covered: usize,
}

#[derive(Deserialize)]
struct AnnotatedProfileRepr {
    id: String,
    fields: BTreeMap<ProfileField, DoubtfulValue<Value>>,
}

impl TryFrom<AnnotatedProfileRepr> for AnnotatedProfile {
    type Error = PartialProfileError;

    fn try_from(repr: AnnotatedProfileRepr) -> Result<Self, Self::Error> {
        // Keys are schema variants, so a full-length map is a full key set.
        if repr.fields.len() != ProfileField::ALL.len() {
            return Err(PartialProfileError {
                covered: repr.fields.len(),
            });
        }
        Ok(Self {
            id: repr.id,
            fields: repr.fields,
        })
    }
}

/// A single factor's contribution to the risk picture: the weight assigned
/// and the asserted value it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskEntry {
    pub score_points: u32,
    pub value: Value,
}

/// Risk contributions for every canonical factor of one applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub id: String,
    pub factors: BTreeMap<RiskFactor, RiskEntry>,
}

/// Failures of the annotation pipeline itself.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("applicant id missing from request")]
    MissingIdentity,
}
