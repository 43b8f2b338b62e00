use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

/// Gender-neutrality suffixes French boards append to titles: "(H/F)",
/// "(F/H)", "H/F", "(M/W)".
static GENDER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(?\s*[hmf]\s*/\s*[hwf]\s*\)?").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Title normalization for fingerprinting and fuzzy comparison.
///
/// Never returns an empty string for non-empty input: if stripping the
/// gender tag empties the title, the trimmed original is returned instead.
pub fn normalize_title(title: &str) -> String {
    let original_trimmed = title.trim();
    if original_trimmed.is_empty() {
        return String::new();
    }

    let stripped = GENDER_TAG.replace_all(original_trimmed, " ");
    let collapsed = WHITESPACE.replace_all(stripped.trim(), " ").to_lowercase();

    if collapsed.is_empty() {
        original_trimmed.to_lowercase()
    } else {
        collapsed
    }
}

/// Token set of a normalized title, alphanumeric runs only.
pub fn title_tokens(title: &str) -> HashSet<String> {
    normalize_title(title)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Jaccard overlap of two title token sets, 0.0 when either is empty.
pub fn token_set_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

fn short_sha256(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let bytes = hasher.finalize();
    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(16);
    hex
}

fn lower_or_empty(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

/// Exact dedup fingerprint over the case-normalized
/// (title, company, city, country) tuple.
pub fn posting_fingerprint(
    title: &str,
    company: Option<&str>,
    city: Option<&str>,
    country: Option<&str>,
) -> String {
    let key = [
        normalize_title(title),
        lower_or_empty(company),
        lower_or_empty(city),
        lower_or_empty(country),
    ]
    .join("|");
    short_sha256(&key)
}

/// Bucket key for fuzzy dedup candidates: postings sharing
/// (company, city, country) are the only ones worth a title comparison.
pub fn dedup_bucket_key(
    company: Option<&str>,
    city: Option<&str>,
    country: Option<&str>,
) -> String {
    let key = [
        lower_or_empty(company),
        lower_or_empty(city),
        lower_or_empty(country),
    ]
    .join("|");
    short_sha256(&key)
}

/// Content hash of a raw record's serialized fields, for unchanged-record
/// no-op detection on re-ingestion.
pub fn content_hash(serialized: &str) -> String {
    short_sha256(serialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_gender_tags_and_case() {
        assert_eq!(
            normalize_title("Développeur Backend (H/F)"),
            "développeur backend"
        );
        assert_eq!(normalize_title("Data Engineer H/F"), "data engineer");
        assert_eq!(normalize_title("  Rust   Engineer  "), "rust engineer");
    }

    #[test]
    fn normalize_falls_back_when_strip_empties() {
        assert_eq!(normalize_title("(H/F)"), "(h/f)");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn overlap_is_one_for_identical_and_zero_for_disjoint() {
        let a = title_tokens("Senior Backend Engineer");
        let b = title_tokens("senior backend engineer (H/F)");
        assert!((token_set_overlap(&a, &b) - 1.0).abs() < f64::EPSILON);

        let c = title_tokens("Product Designer");
        assert_eq!(token_set_overlap(&a, &c), 0.0);
        assert_eq!(token_set_overlap(&a, &HashSet::new()), 0.0);
    }

    #[test]
    fn overlap_is_fractional_for_partial_match() {
        let a = title_tokens("senior backend engineer");
        let b = title_tokens("backend engineer");
        // intersection 2, union 3
        assert!((token_set_overlap(&a, &b) - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn fingerprint_is_case_insensitive_and_16_hex() {
        let a = posting_fingerprint("Backend Engineer (H/F)", Some("ACME"), Some("Paris"), Some("FR"));
        let b = posting_fingerprint("backend engineer", Some("acme"), Some("paris"), Some("fr"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_distinguishes_cities() {
        let a = posting_fingerprint("Backend Engineer", Some("ACME"), Some("Paris"), Some("FR"));
        let b = posting_fingerprint("Backend Engineer", Some("ACME"), Some("Lyon"), Some("FR"));
        assert_ne!(a, b);
    }

    #[test]
    fn bucket_key_ignores_title() {
        let a = dedup_bucket_key(Some("ACME"), Some("Paris"), Some("FR"));
        let b = dedup_bucket_key(Some("acme"), Some("PARIS"), Some("fr"));
        assert_eq!(a, b);
    }
}
