use std::collections::HashSet;

use crate::normalize::normalize_title;
use crate::skill_normalizer::{normalize_skill, normalize_skill_set};
use crate::JobPosting;

/// Where a query keyword was found on a posting. A hit in the normalized
/// skill set is worth more than a free-text title hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordHit {
    Skills,
    Title,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub keyword: String,
    pub hit: KeywordHit,
}

/// Match free query keywords against a posting's skill set and title.
/// Case-insensitive; the skill set is consulted through the alias
/// vocabulary so "js" finds a "javascript" posting.
pub fn match_keywords(keywords: &[String], posting: &JobPosting) -> Vec<KeywordMatch> {
    if keywords.is_empty() {
        return vec![];
    }

    let posting_skills: HashSet<&str> = posting.skills.iter().map(String::as_str).collect();
    let title = normalize_title(&posting.title);

    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for keyword in keywords {
        let lowered = keyword.trim().to_lowercase();
        if lowered.is_empty() || !seen.insert(lowered.clone()) {
            continue;
        }

        let canonical = normalize_skill(&lowered);
        if posting_skills.contains(canonical.as_str()) {
            matches.push(KeywordMatch {
                keyword: lowered,
                hit: KeywordHit::Skills,
            });
        } else if title.contains(&lowered) {
            matches.push(KeywordMatch {
                keyword: lowered,
                hit: KeywordHit::Title,
            });
        }
    }
    matches
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillOverlap {
    /// Matched canonical skills, in the profile's confidence order.
    pub matched: Vec<String>,
    /// Distinct profile skills considered.
    pub total: usize,
}

/// Fraction of the profile's skills the posting requires. `None` when the
/// profile declares no skills — the signal is then absent, not zero.
pub fn profile_skill_overlap(
    profile_skills: &[String],
    posting_skills: &[String],
) -> Option<SkillOverlap> {
    let posting_set = normalize_skill_set(posting_skills);

    let mut seen = HashSet::new();
    let mut considered = 0usize;
    let mut matched = Vec::new();
    for skill in profile_skills {
        let canonical = normalize_skill(skill);
        if canonical.is_empty() || !seen.insert(canonical.clone()) {
            continue;
        }
        considered += 1;
        if posting_set.contains(&canonical) {
            matched.push(canonical);
        }
    }

    if considered == 0 {
        return None;
    }
    Some(SkillOverlap {
        matched,
        total: considered,
    })
}

/// Category tags found on a posting (skill-set membership or title text).
pub fn category_hits(categories: &[String], posting: &JobPosting) -> Vec<String> {
    if categories.is_empty() {
        return vec![];
    }

    let posting_skills: HashSet<&str> = posting.skills.iter().map(String::as_str).collect();
    let title = normalize_title(&posting.title);

    let mut seen = HashSet::new();
    categories
        .iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty() && seen.insert(c.clone()))
        .filter(|c| posting_skills.contains(c.as_str()) || title.contains(c.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::{ContractType, RemoteType, SalaryPeriod};

    fn posting(title: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            id: "a:1".into(),
            title: title.into(),
            company: None,
            country: None,
            city: None,
            remote_type: RemoteType::Unknown,
            contract_type: ContractType::Unknown,
            salary_min: None,
            salary_max: None,
            currency: None,
            salary_period: SalaryPeriod::Year,
            apply_url: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            source_id: "a".into(),
            raw_hash: "0".into(),
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn keywords_prefer_skill_hits_over_title_hits() {
        let p = posting("Backend Engineer Python", &["python", "postgresql"]);
        let matches = match_keywords(
            &["Python".into(), "backend".into(), "kafka".into()],
            &p,
        );

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].keyword, "python");
        assert_eq!(matches[0].hit, KeywordHit::Skills);
        assert_eq!(matches[1].keyword, "backend");
        assert_eq!(matches[1].hit, KeywordHit::Title);
    }

    #[test]
    fn keyword_aliases_reach_the_skill_set() {
        let p = posting("Frontend Developer", &["javascript", "react"]);
        let matches = match_keywords(&["JS".into()], &p);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].hit, KeywordHit::Skills);
    }

    #[test]
    fn duplicate_keywords_count_once() {
        let p = posting("Rust Engineer", &["rust"]);
        let matches = match_keywords(&["rust".into(), "Rust".into()], &p);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn overlap_is_fraction_of_profile_skills() {
        let overlap = profile_skill_overlap(
            &["Rust".into(), "K8s".into(), "graphql".into()],
            &["rust".into(), "kubernetes".into()],
        )
        .unwrap();

        assert_eq!(overlap.total, 3);
        assert_eq!(overlap.matched, vec!["rust".to_string(), "kubernetes".to_string()]);
    }

    #[test]
    fn empty_profile_skills_yield_no_signal() {
        assert_eq!(profile_skill_overlap(&[], &["rust".into()]), None);
        assert_eq!(profile_skill_overlap(&["  ".into()], &["rust".into()]), None);
    }

    #[test]
    fn categories_match_skills_or_title() {
        let p = posting("Backend Engineer", &["python"]);
        let hits = category_hits(&["backend".into(), "data".into()], &p);
        assert_eq!(hits, vec!["backend".to_string()]);
    }
}
