pub mod api;
pub mod corrections;
pub mod cv;
pub mod ingest;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod run_id;
pub mod service;
pub mod skill_normalizer;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Remote-work arrangement of a posting, or a candidate preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RemoteType {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    Unknown,
}

/// Contract form as the French job market names them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ContractType {
    #[serde(rename = "CDI")]
    #[strum(serialize = "CDI")]
    Cdi,
    #[serde(rename = "CDD")]
    #[strum(serialize = "CDD")]
    Cdd,
    Freelance,
    Internship,
    #[serde(rename = "unknown")]
    #[strum(serialize = "unknown")]
    #[default]
    Unknown,
}

/// Period a salary figure refers to. Sources that omit it overwhelmingly
/// quote yearly figures, so `Year` is the default rather than an unknown.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SalaryPeriod {
    #[default]
    Year,
    Month,
    Day,
    Hour,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Lead,
    #[default]
    Unknown,
}

/// Canonical, deduplicated representation of one job opening.
///
/// `id` is the `"{source}:{native_id}"` of the first raw record that created
/// the canonical posting and stays stable across re-ingestion; later records
/// from other sources may merge into it without changing the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub remote_type: RemoteType,
    #[serde(default)]
    pub contract_type: ContractType,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub salary_period: SalaryPeriod,
    pub apply_url: Option<String>,
    /// Normalized canonical skill tokens, set semantics.
    #[serde(default)]
    pub skills: Vec<String>,
    pub source_id: String,
    pub raw_hash: String,
    pub ingested_at: DateTime<Utc>,
}

impl JobPosting {
    /// `true` when both salary bounds are present and inverted. Such a
    /// posting is kept searchable; only its salary signal degrades.
    pub fn salary_bounds_corrupt(&self) -> bool {
        matches!((self.salary_min, self.salary_max), (Some(min), Some(max)) if min > max)
    }
}

/// Candidate profile: contact data, the raw CV text, the attributes derived
/// from it, and search preferences. Writes are full-replace per `user_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub cv_text: Option<String>,
    /// Derived from `cv_text`; ordered by confidence (first occurrence).
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience_years: Option<u8>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Spoken languages, not programming skills.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub preferred_contract_types: Vec<ContractType>,
    #[serde(default)]
    pub preferred_remote: RemoteType,
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub preferred_countries: Vec<String>,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Transient input to one search or ingest call. Category tags arriving
/// mixed into free keywords are lifted into `categories` at the DTO
/// boundary so the keyword-overlap signal stays meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub contract_types: Vec<ContractType>,
    pub remote_preference: Option<RemoteType>,
    pub salary_min: Option<i64>,
    /// Ad-hoc CV text used for profile signals when no stored profile exists.
    pub cv_summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_serialize_with_contract_casing() {
        assert_eq!(serde_json::to_string(&RemoteType::Remote).unwrap(), "\"remote\"");
        assert_eq!(serde_json::to_string(&ContractType::Cdi).unwrap(), "\"CDI\"");
        assert_eq!(
            serde_json::to_string(&ContractType::Unknown).unwrap(),
            "\"unknown\""
        );
        assert_eq!(serde_json::to_string(&SalaryPeriod::Year).unwrap(), "\"year\"");
        assert_eq!(
            serde_json::to_string(&ExperienceLevel::Senior).unwrap(),
            "\"senior\""
        );
    }

    #[test]
    fn enums_parse_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(RemoteType::from_str("Remote").unwrap(), RemoteType::Remote);
        assert_eq!(ContractType::from_str("cdi").unwrap(), ContractType::Cdi);
        assert_eq!(SalaryPeriod::from_str("MONTH").unwrap(), SalaryPeriod::Month);
    }

    #[test]
    fn corrupt_salary_bounds_are_detected() {
        let posting = JobPosting {
            id: "x:1".into(),
            title: "Dev".into(),
            company: None,
            country: None,
            city: None,
            remote_type: RemoteType::Unknown,
            contract_type: ContractType::Unknown,
            salary_min: Some(70_000),
            salary_max: Some(50_000),
            currency: None,
            salary_period: SalaryPeriod::Year,
            apply_url: None,
            skills: vec![],
            source_id: "x".into(),
            raw_hash: "00".into(),
            ingested_at: Utc::now(),
        };
        assert!(posting.salary_bounds_corrupt());
    }
}
