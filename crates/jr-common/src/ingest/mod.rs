use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::corrections::contract_type::correct_contract_type;
use crate::corrections::country::correct_country;
use crate::corrections::remote_type::correct_remote_type;
use crate::corrections::salary_period::correct_salary_period;
use crate::cv::extract_skills;
use crate::normalize::content_hash;
use crate::skill_normalizer::normalize_skills_vec;
use crate::{ContractType, JobPosting, RemoteType};

/// One raw posting as a source connector delivered it. Field completeness
/// varies per source; everything except identity is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source_id: String,
    pub source_native_id: String,
    #[serde(default)]
    pub raw: RawFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub remote_type: Option<String>,
    pub contract_type: Option<String>,
    /// Salary bounds as the source printed them ("60000", "60 000", "60k").
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    pub currency: Option<String>,
    pub salary_period: Option<String>,
    pub apply_url: Option<String>,
    pub description: Option<String>,
    pub skills: Vec<String>,
}

impl SourceRecord {
    /// Content fingerprint over every raw field; an unchanged record
    /// re-ingested from the same source is detected through this.
    pub fn raw_hash(&self) -> String {
        let raw = &self.raw;
        let key = [
            raw.title.as_deref().unwrap_or(""),
            raw.company.as_deref().unwrap_or(""),
            raw.country.as_deref().unwrap_or(""),
            raw.city.as_deref().unwrap_or(""),
            raw.remote_type.as_deref().unwrap_or(""),
            raw.contract_type.as_deref().unwrap_or(""),
            raw.salary_min.as_deref().unwrap_or(""),
            raw.salary_max.as_deref().unwrap_or(""),
            raw.currency.as_deref().unwrap_or(""),
            raw.salary_period.as_deref().unwrap_or(""),
            raw.apply_url.as_deref().unwrap_or(""),
            raw.description.as_deref().unwrap_or(""),
            &raw.skills.join(","),
        ]
        .join("|");
        content_hash(&key)
    }

    pub fn canonical_id(&self) -> String {
        format!("{}:{}", self.source_id, self.source_native_id)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("record has no source identity")]
    MissingIdentity,
    #[error("record has no usable title")]
    MissingTitle,
    #[error("unparseable salary value in {field}: {value:?}")]
    InvalidSalary { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub source_id: String,
    pub source_native_id: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub postings: Vec<JobPosting>,
    pub skipped: Vec<SkippedRecord>,
}

// "60000" / "60 000" / "60,000" / "60k" / "60 K€"
static SALARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[€$£\s]*(\d{1,3}(?:[ ,.]\d{3})*|\d+)\s*([kK])?\s*[€$£]?\s*$").unwrap());

/// Parse one salary figure as the sources print them.
pub fn parse_salary(field: &'static str, value: &str) -> Result<i64, NormalizeError> {
    let caps = SALARY_RE
        .captures(value.trim())
        .ok_or_else(|| NormalizeError::InvalidSalary {
            field,
            value: value.to_string(),
        })?;

    let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
    let mut amount: i64 = digits
        .parse()
        .map_err(|_| NormalizeError::InvalidSalary {
            field,
            value: value.to_string(),
        })?;

    if caps.get(2).is_some() {
        amount *= 1_000;
    }
    Ok(amount)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Map one raw record into its canonical shape. Missing fields become
/// unknown/None; only records without a usable identity, title, or salary
/// figure are rejected.
pub fn normalize_record(
    record: &SourceRecord,
    ingested_at: DateTime<Utc>,
) -> Result<JobPosting, NormalizeError> {
    if record.source_id.trim().is_empty() || record.source_native_id.trim().is_empty() {
        return Err(NormalizeError::MissingIdentity);
    }

    let title = non_empty(&record.raw.title).ok_or(NormalizeError::MissingTitle)?;

    let mut salary_min = record
        .raw
        .salary_min
        .as_deref()
        .map(|v| parse_salary("salary_min", v))
        .transpose()?;
    let mut salary_max = record
        .raw
        .salary_max
        .as_deref()
        .map(|v| parse_salary("salary_max", v))
        .transpose()?;

    if let (Some(min), Some(max)) = (salary_min, salary_max) {
        if min > max {
            debug!(
                record = %record.canonical_id(),
                min, max, "inverted salary bounds, swapping"
            );
            salary_min = Some(max);
            salary_max = Some(min);
        }
    }

    let remote_type = match non_empty(&record.raw.remote_type) {
        Some(value) => correct_remote_type(&value),
        None => RemoteType::Unknown,
    };
    // Sources often bury the arrangement in the description instead.
    let remote_type = match (remote_type, record.raw.description.as_deref()) {
        (RemoteType::Unknown, Some(description)) => correct_remote_type(description),
        (resolved, _) => resolved,
    };

    let contract_type = non_empty(&record.raw.contract_type)
        .map(|value| correct_contract_type(&value))
        .unwrap_or(ContractType::Unknown);

    let mut skills = record.raw.skills.clone();
    let mut text = title.clone();
    if let Some(description) = record.raw.description.as_deref() {
        text.push(' ');
        text.push_str(description);
    }
    skills.extend(extract_skills(&text));

    Ok(JobPosting {
        id: record.canonical_id(),
        title,
        company: non_empty(&record.raw.company),
        country: record
            .raw
            .country
            .as_deref()
            .and_then(correct_country),
        city: non_empty(&record.raw.city),
        remote_type,
        contract_type,
        salary_min,
        salary_max,
        currency: non_empty(&record.raw.currency).map(|c| c.to_uppercase()),
        salary_period: record
            .raw
            .salary_period
            .as_deref()
            .map(correct_salary_period)
            .unwrap_or_default(),
        apply_url: non_empty(&record.raw.apply_url),
        skills: normalize_skills_vec(&skills),
        source_id: record.source_id.clone(),
        raw_hash: record.raw_hash(),
        ingested_at,
    })
}

/// Normalize a whole batch. A malformed record is skipped and logged with
/// its reason; it never aborts the remaining records.
pub fn normalize_batch(records: &[SourceRecord], ingested_at: DateTime<Utc>) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for record in records {
        match normalize_record(record, ingested_at) {
            Ok(posting) => batch.postings.push(posting),
            Err(err) => {
                warn!(
                    source_id = %record.source_id,
                    source_native_id = %record.source_native_id,
                    reason = %err,
                    "skipping malformed source record"
                );
                batch.skipped.push(SkippedRecord {
                    source_id: record.source_id.clone(),
                    source_native_id: record.source_native_id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    batch
}
