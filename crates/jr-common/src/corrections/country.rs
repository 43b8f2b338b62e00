/// Country names the European connectors actually emit, FR and EN spellings.
const COUNTRY_NAMES: &[(&str, &str)] = &[
    ("france", "FR"),
    ("germany", "DE"),
    ("allemagne", "DE"),
    ("deutschland", "DE"),
    ("spain", "ES"),
    ("espagne", "ES"),
    ("españa", "ES"),
    ("italy", "IT"),
    ("italie", "IT"),
    ("italia", "IT"),
    ("belgium", "BE"),
    ("belgique", "BE"),
    ("netherlands", "NL"),
    ("pays-bas", "NL"),
    ("switzerland", "CH"),
    ("suisse", "CH"),
    ("luxembourg", "LU"),
    ("portugal", "PT"),
    ("united kingdom", "GB"),
    ("royaume-uni", "GB"),
    ("uk", "GB"),
    ("ireland", "IE"),
    ("irlande", "IE"),
    ("austria", "AT"),
    ("autriche", "AT"),
    ("poland", "PL"),
    ("pologne", "PL"),
];

/// Coerce a source-native country value to an uppercase ISO-3166 alpha-2
/// code. `None` when the input cannot be recognized; an unrecognized
/// country must not silently become a wrong filter match.
pub fn correct_country(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(trimmed.to_ascii_uppercase());
    }

    let lower = trimmed.to_lowercase();
    COUNTRY_NAMES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, code)| (*code).to_string())
}
