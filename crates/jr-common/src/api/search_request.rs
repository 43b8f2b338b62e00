use serde::Deserialize;

use crate::corrections::country::correct_country;
use crate::{ContractType, RemoteType, SearchQuery};

/// Global category tags the front-end mixes into the free keyword list.
/// They are lifted into their own query dimension so the keyword-overlap
/// signal only sees genuine free-text tokens.
pub const CATEGORY_TAGS: &[&str] = &[
    "backend", "frontend", "fullstack", "mobile", "data", "devops", "cloud", "security",
    "embedded", "qa",
];

/// Search/ingest request as the UI sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub contract_types: Vec<String>,
    #[serde(default)]
    pub remote_preference: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub cv_summary: Option<String>,
}

impl SearchRequest {
    /// Build the internal query: category tags are separated from free
    /// keywords, countries become ISO codes (unrecognized ones are kept
    /// verbatim uppercased so a strange-but-consistent UI value still
    /// filters consistently), and enum-ish strings are coerced.
    pub fn into_query(self) -> SearchQuery {
        let mut keywords = Vec::new();
        let mut categories = Vec::new();
        for token in self.keywords {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                continue;
            }
            let lowered = trimmed.to_lowercase();
            if CATEGORY_TAGS.contains(&lowered.as_str()) {
                categories.push(lowered);
            } else {
                keywords.push(trimmed.to_string());
            }
        }

        let countries = self
            .countries
            .iter()
            .filter_map(|c| {
                let trimmed = c.trim();
                if trimmed.is_empty() {
                    return None;
                }
                Some(correct_country(trimmed).unwrap_or_else(|| trimmed.to_uppercase()))
            })
            .collect();

        let contract_types = self
            .contract_types
            .iter()
            .filter_map(|c| c.trim().parse::<ContractType>().ok())
            .filter(|c| *c != ContractType::Unknown)
            .collect();

        let remote_preference = self
            .remote_preference
            .as_deref()
            .and_then(|r| r.trim().parse::<RemoteType>().ok())
            .filter(|r| *r != RemoteType::Unknown);

        SearchQuery {
            keywords,
            categories,
            countries,
            contract_types,
            remote_preference,
            salary_min: self.salary_min,
            cv_summary: self
                .cv_summary
                .filter(|summary| !summary.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tags_are_lifted_out_of_keywords() {
        let request = SearchRequest {
            keywords: vec!["rust".into(), "Backend".into(), "kafka".into()],
            ..SearchRequest::default()
        };
        let query = request.into_query();

        assert_eq!(query.keywords, vec!["rust".to_string(), "kafka".to_string()]);
        assert_eq!(query.categories, vec!["backend".to_string()]);
    }

    #[test]
    fn countries_become_iso_codes() {
        let request = SearchRequest {
            countries: vec!["France".into(), "de".into(), "Neverland".into()],
            ..SearchRequest::default()
        };
        let query = request.into_query();

        assert_eq!(
            query.countries,
            vec!["FR".to_string(), "DE".to_string(), "NEVERLAND".to_string()]
        );
    }

    #[test]
    fn enum_strings_are_coerced_and_garbage_dropped() {
        let request = SearchRequest {
            contract_types: vec!["CDI".into(), "freelance".into(), "whatever".into()],
            remote_preference: Some("remote".into()),
            ..SearchRequest::default()
        };
        let query = request.into_query();

        assert_eq!(
            query.contract_types,
            vec![ContractType::Cdi, ContractType::Freelance]
        );
        assert_eq!(query.remote_preference, Some(RemoteType::Remote));
    }

    #[test]
    fn blank_cv_summary_is_dropped() {
        let request = SearchRequest {
            cv_summary: Some("   ".into()),
            ..SearchRequest::default()
        };
        assert_eq!(request.into_query().cv_summary, None);
    }

    #[test]
    fn deserializes_the_ui_payload_shape() {
        let query: SearchRequest = serde_json::from_str(
            r#"{
                "keywords": ["python", "data"],
                "countries": ["fr"],
                "contract_types": ["CDI"],
                "remote_preference": "hybrid",
                "salary_min": 45000
            }"#,
        )
        .unwrap();

        let query = query.into_query();
        assert_eq!(query.keywords, vec!["python".to_string()]);
        assert_eq!(query.categories, vec!["data".to_string()]);
        assert_eq!(query.salary_min, Some(45_000));
    }
}
