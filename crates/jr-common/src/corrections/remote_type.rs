use crate::RemoteType;

/// Coerce a source-native remote/onsite string into the `RemoteType` enum.
/// Unrecognized or empty input stays `Unknown` rather than guessing.
pub fn correct_remote_type(input: &str) -> RemoteType {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return RemoteType::Unknown;
    }

    if let Ok(exact) = trimmed.parse::<RemoteType>() {
        return exact;
    }

    let lower = trimmed.to_lowercase();

    if lower.contains("full remote")
        || lower.contains("fully remote")
        || lower.contains("100% remote")
        || lower.contains("télétravail complet")
        || lower.contains("full-remote")
    {
        return RemoteType::Remote;
    }

    if lower.contains("hybrid")
        || lower.contains("hybride")
        || lower.contains("partial")
        || lower.contains("télétravail partiel")
        || lower.contains("flex")
    {
        return RemoteType::Hybrid;
    }

    if lower.contains("on-site")
        || lower.contains("on site")
        || lower.contains("sur site")
        || lower.contains("présentiel")
        || lower.contains("presentiel")
        || lower.contains("office")
    {
        return RemoteType::Onsite;
    }

    // Bare "remote"/"télétravail" after the more specific patterns above.
    if lower.contains("remote") || lower.contains("télétravail") {
        return RemoteType::Remote;
    }

    RemoteType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_enum_names_pass_through() {
        assert_eq!(correct_remote_type("remote"), RemoteType::Remote);
        assert_eq!(correct_remote_type("Hybrid"), RemoteType::Hybrid);
        assert_eq!(correct_remote_type("ONSITE"), RemoteType::Onsite);
    }

    #[test]
    fn coerces_source_variants() {
        assert_eq!(correct_remote_type("Full remote (Europe)"), RemoteType::Remote);
        assert_eq!(correct_remote_type("Télétravail partiel"), RemoteType::Hybrid);
        assert_eq!(correct_remote_type("2j/semaine flex"), RemoteType::Hybrid);
        assert_eq!(correct_remote_type("100% présentiel"), RemoteType::Onsite);
        assert_eq!(correct_remote_type("On-site, Paris"), RemoteType::Onsite);
    }

    #[test]
    fn unknown_inputs_stay_unknown() {
        assert_eq!(correct_remote_type(""), RemoteType::Unknown);
        assert_eq!(correct_remote_type("   "), RemoteType::Unknown);
        assert_eq!(correct_remote_type("négociable"), RemoteType::Unknown);
    }
}
