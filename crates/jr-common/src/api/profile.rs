use serde::{Deserialize, Serialize};

use crate::cv::CvExtraction;
use crate::{CandidateProfile, ContractType, ExperienceLevel, RemoteType};

/// Full-replace profile write, as the UI submits it. Derived fields
/// (skills, experience, languages) are not accepted from the caller; they
/// come out of the CV parse on save.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpsertRequest {
    pub user_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub cv_text: Option<String>,
    #[serde(default)]
    pub preferred_contract_types: Vec<String>,
    #[serde(default)]
    pub preferred_remote: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub preferred_countries: Vec<String>,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
}

impl ProfileUpsertRequest {
    /// Build the profile to store; derived fields stay empty here and are
    /// filled by the CV parse in the service layer.
    pub fn into_profile(self) -> CandidateProfile {
        CandidateProfile {
            user_id: self.user_id.trim().to_string(),
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            location: self.location,
            cv_text: self.cv_text.filter(|t| !t.trim().is_empty()),
            preferred_contract_types: self
                .preferred_contract_types
                .iter()
                .filter_map(|c| c.trim().parse::<ContractType>().ok())
                .filter(|c| *c != ContractType::Unknown)
                .collect(),
            preferred_remote: self
                .preferred_remote
                .as_deref()
                .and_then(|r| r.trim().parse::<RemoteType>().ok())
                .unwrap_or_default(),
            salary_min: self.salary_min,
            preferred_countries: self
                .preferred_countries
                .iter()
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
            preferred_categories: self
                .preferred_categories
                .iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
            ..CandidateProfile::default()
        }
    }
}

/// CV parse preview request: raw text in, extraction out, nothing stored.
#[derive(Debug, Clone, Deserialize)]
pub struct CvParseRequest {
    pub cv_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CvParseResponse {
    pub skills: Vec<String>,
    pub experience_years: Option<u8>,
    pub experience_level: ExperienceLevel,
    pub languages: Vec<String>,
}

impl From<CvExtraction> for CvParseResponse {
    fn from(extraction: CvExtraction) -> Self {
        Self {
            skills: extraction.skills,
            experience_years: extraction.experience_years,
            experience_level: extraction.experience_level,
            languages: extraction.languages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_request_coerces_preferences() {
        let request = ProfileUpsertRequest {
            user_id: " ada@example.test ".into(),
            preferred_contract_types: vec!["CDI".into(), "nope".into()],
            preferred_remote: Some("remote".into()),
            preferred_countries: vec!["fr".into(), " ".into()],
            preferred_categories: vec!["Backend".into()],
            cv_text: Some("  ".into()),
            ..ProfileUpsertRequest::default()
        };

        let profile = request.into_profile();
        assert_eq!(profile.user_id, "ada@example.test");
        assert_eq!(profile.preferred_contract_types, vec![ContractType::Cdi]);
        assert_eq!(profile.preferred_remote, RemoteType::Remote);
        assert_eq!(profile.preferred_countries, vec!["FR".to_string()]);
        assert_eq!(profile.preferred_categories, vec!["backend".to_string()]);
        // Blank CV text is no CV text.
        assert_eq!(profile.cv_text, None);
    }

    #[test]
    fn parse_response_carries_the_extraction() {
        let response: CvParseResponse = CvExtraction {
            skills: vec!["python".into()],
            experience_years: Some(5),
            experience_level: ExperienceLevel::Senior,
            languages: vec!["english".into()],
        }
        .into();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["skills"][0], "python");
        assert_eq!(value["experience_years"], 5);
        assert_eq!(value["experience_level"], "senior");
    }
}
