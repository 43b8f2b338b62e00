use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::skill_normalizer::lookup_in_prose;
use crate::ExperienceLevel;

/// Structured attributes extracted from free CV text.
///
/// Pure text analysis: no I/O, deterministic for identical input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvExtraction {
    /// Canonical skill names in first-occurrence order, deduplicated.
    pub skills: Vec<String>,
    pub experience_years: Option<u8>,
    pub experience_level: ExperienceLevel,
    /// Spoken languages (canonical English names), not programming skills.
    pub languages: Vec<String>,
}

/// Plausibility ceiling for extracted experience years.
const MAX_EXPERIENCE_YEARS: u8 = 50;

lazy_static! {
    // "5 ans d'expérience" / "5 years of experience" / "5+ ans d'exp"
    static ref EXP_NEAR_RE: Regex = Regex::new(
        r"(?i)(\d{1,2})\s*\+?\s*(?:ans?|ann[ée]es?|years?)\s*(?:d['’]\s*exp[ée]rience|of\s+experience|d['’]\s*exp\b|exp\b)"
    )
    .unwrap();
    // "expérience : 5" / "experience: 5"
    static ref EXP_LABEL_RE: Regex =
        Regex::new(r"(?i)exp[ée]rience\s*[:\-]?\s*(\d{1,2})").unwrap();
    // bare "5 ans" / "5 years" fallback
    static ref EXP_BARE_RE: Regex =
        Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:ans\b|an\b|ann[ée]es?\b|years?\b)").unwrap();

    // Explicit level keywords, FR + EN. Checked strongest-first.
    static ref LEAD_RE: Regex =
        Regex::new(r"(?i)\b(lead|principal|architecte?|staff|head)\b").unwrap();
    static ref SENIOR_RE: Regex = Regex::new(r"(?i)\b(senior|expert)\b").unwrap();
    static ref MID_RE: Regex =
        Regex::new(r"(?i)\b(mid|intermediate|interm[ée]diaire|confirm[ée]e?)\b").unwrap();
    static ref JUNIOR_RE: Regex =
        Regex::new(r"(?i)\b(junior|d[ée]butante?|entry|beginner|stagiaire)\b").unwrap();

    // Word-ish tokens, keeping the characters skills are spelled with.
    static ref TOKEN_RE: Regex = Regex::new(r"[A-Za-z0-9+#àâäéèêëîïôöùûüç]+(?:[./][A-Za-z0-9+#]+)*").unwrap();
}

/// Spoken-language vocabulary, deliberately disjoint from the technical
/// skill vocabulary so a token is never counted as both.
const LANGUAGES: &[(&str, &str)] = &[
    ("english", r"(?i)\b(english|anglais)\b"),
    ("french", r"(?i)\b(french|fran[çc]ais)\b"),
    ("german", r"(?i)\b(german|allemand|deutsch)\b"),
    ("spanish", r"(?i)\b(spanish|espagnol)\b"),
    ("italian", r"(?i)\b(italian|italien)\b"),
    ("portuguese", r"(?i)\b(portuguese|portugais)\b"),
    ("dutch", r"(?i)\b(dutch|n[ée]erlandais)\b"),
    ("chinese", r"(?i)\b(chinese|chinois|mandarin)\b"),
    ("japanese", r"(?i)\b(japanese|japonais)\b"),
    ("arabic", r"(?i)\b(arabic|arabe)\b"),
];

lazy_static! {
    static ref LANGUAGE_RES: Vec<(&'static str, Regex)> = LANGUAGES
        .iter()
        .map(|(canonical, pattern)| (*canonical, Regex::new(pattern).unwrap()))
        .collect();
}

/// Parse free CV text into structured candidate attributes.
pub fn parse_cv_text(cv_text: &str) -> CvExtraction {
    let experience_years = extract_experience_years(cv_text);
    let keyword_level = detect_level_keyword(cv_text);

    let experience_level = if keyword_level != ExperienceLevel::Unknown {
        keyword_level
    } else {
        experience_years.map(level_from_years).unwrap_or_default()
    };

    CvExtraction {
        skills: extract_skills(cv_text),
        experience_years,
        experience_level,
        languages: extract_languages(cv_text),
    }
}

/// Vocabulary skill hits in first-occurrence order, deduplicated.
/// Bigrams are tried before unigrams so "machine learning" is one hit.
pub fn extract_skills(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect();

    let mut seen = std::collections::HashSet::new();
    let mut skills = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if i + 1 < tokens.len() {
            let bigram = format!("{} {}", tokens[i], tokens[i + 1]);
            if let Some(canonical) = lookup_in_prose(&bigram) {
                if seen.insert(canonical) {
                    skills.push(canonical.to_string());
                }
                i += 2;
                continue;
            }
        }
        if let Some(canonical) = lookup_in_prose(tokens[i]) {
            if seen.insert(canonical) {
                skills.push(canonical.to_string());
            }
        }
        i += 1;
    }
    skills
}

/// Maximum plausible explicit year figure, or None when no usable pattern
/// exists — absence must never be guessed at.
pub fn extract_experience_years(text: &str) -> Option<u8> {
    let mut candidates: Vec<u8> = Vec::new();

    for re in [&*EXP_NEAR_RE, &*EXP_LABEL_RE, &*EXP_BARE_RE] {
        for caps in re.captures_iter(text) {
            if let Some(years) = caps.get(1).and_then(|m| m.as_str().parse::<u8>().ok()) {
                if years <= MAX_EXPERIENCE_YEARS {
                    candidates.push(years);
                }
            }
        }
    }

    candidates.into_iter().max()
}

/// Explicit level keyword, strongest claim first; `Unknown` when absent.
pub fn detect_level_keyword(text: &str) -> ExperienceLevel {
    if LEAD_RE.is_match(text) {
        ExperienceLevel::Lead
    } else if SENIOR_RE.is_match(text) {
        ExperienceLevel::Senior
    } else if MID_RE.is_match(text) {
        ExperienceLevel::Mid
    } else if JUNIOR_RE.is_match(text) {
        ExperienceLevel::Junior
    } else {
        ExperienceLevel::Unknown
    }
}

/// Numeric inference used only when no explicit keyword is present.
pub fn level_from_years(years: u8) -> ExperienceLevel {
    match years {
        0..=1 => ExperienceLevel::Junior,
        2..=4 => ExperienceLevel::Mid,
        5..=8 => ExperienceLevel::Senior,
        _ => ExperienceLevel::Lead,
    }
}

/// Seniority a posting title implies, for the experience-fit signal.
pub fn title_seniority(title: &str) -> ExperienceLevel {
    detect_level_keyword(title)
}

/// Spoken languages in first-occurrence order.
pub fn extract_languages(text: &str) -> Vec<String> {
    let mut found: Vec<(usize, &'static str)> = LANGUAGE_RES
        .iter()
        .filter_map(|(canonical, re)| re.find(text).map(|m| (m.start(), *canonical)))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, lang)| lang.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_reference_cv_line() {
        let parsed = parse_cv_text("5 ans d'expérience backend Python, niveau senior");
        assert_eq!(parsed.experience_years, Some(5));
        assert_eq!(parsed.experience_level, ExperienceLevel::Senior);
        assert!(parsed.skills.contains(&"python".to_string()));
    }

    #[test]
    fn skills_keep_first_occurrence_order_and_dedupe() {
        let parsed = parse_cv_text("Rust, Kubernetes (k8s), PostgreSQL, rust again");
        assert_eq!(parsed.skills, vec!["rust", "kubernetes", "postgresql"]);
    }

    #[test]
    fn bigram_skills_match_as_one_token() {
        let skills = extract_skills("Projets de machine learning avec TensorFlow");
        assert_eq!(skills, vec!["ml", "tensorflow"]);
    }

    #[test]
    fn ambiguous_prose_words_are_not_skills() {
        let skills = extract_skills("I go to work every spring and express myself");
        assert!(skills.is_empty());
    }

    #[test]
    fn experience_takes_max_plausible_candidate() {
        assert_eq!(
            extract_experience_years("2 ans chez A puis 7 years of experience chez B"),
            Some(7)
        );
        assert_eq!(extract_experience_years("expérience : 12"), Some(12));
        assert_eq!(extract_experience_years("99 ans d'expérience"), None);
        assert_eq!(extract_experience_years("motivé et rigoureux"), None);
    }

    #[test]
    fn explicit_level_beats_numeric_inference() {
        let parsed = parse_cv_text("Junior développeur, 10 ans de piano");
        assert_eq!(parsed.experience_level, ExperienceLevel::Junior);

        let parsed = parse_cv_text("Lead engineer, 3 years experience");
        assert_eq!(parsed.experience_level, ExperienceLevel::Lead);
    }

    #[test]
    fn numeric_thresholds_apply_without_keywords() {
        assert_eq!(level_from_years(1), ExperienceLevel::Junior);
        assert_eq!(level_from_years(3), ExperienceLevel::Mid);
        assert_eq!(level_from_years(6), ExperienceLevel::Senior);
        assert_eq!(level_from_years(12), ExperienceLevel::Lead);

        let parsed = parse_cv_text("6 ans d'expérience en développement web");
        assert_eq!(parsed.experience_level, ExperienceLevel::Senior);
    }

    #[test]
    fn languages_are_distinct_from_skills() {
        let parsed = parse_cv_text("Anglais courant, espagnol notions. Python, Django.");
        assert_eq!(parsed.languages, vec!["english", "spanish"]);
        assert_eq!(parsed.skills, vec!["python", "django"]);
    }

    #[test]
    fn title_seniority_reads_title_keywords() {
        assert_eq!(title_seniority("Senior Backend Engineer"), ExperienceLevel::Senior);
        assert_eq!(title_seniority("Développeur junior (H/F)"), ExperienceLevel::Junior);
        assert_eq!(title_seniority("Staff Engineer, Platform"), ExperienceLevel::Lead);
        assert_eq!(title_seniority("Backend Engineer"), ExperienceLevel::Unknown);
    }
}
