use crate::ContractType;

/// Coerce a source-native contract string into the `ContractType` enum.
///
/// Sources label permanent positions many ways ("Permanent", "Full-time",
/// "CDI temps plein"); the checks below run most-specific first so that
/// "CDD" is not swallowed by the permanent patterns.
pub fn correct_contract_type(input: &str) -> ContractType {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ContractType::Unknown;
    }

    let lower = trimmed.to_lowercase();

    if lower.contains("stage")
        || lower.contains("intern")
        || lower.contains("alternance")
        || lower.contains("apprentice")
    {
        return ContractType::Internship;
    }

    if lower.contains("freelance")
        || lower.contains("free-lance")
        || lower.contains("independent")
        || lower.contains("indépendant")
        || lower.contains("contractor")
        || lower.contains("portage")
    {
        return ContractType::Freelance;
    }

    if lower.contains("cdd")
        || lower.contains("fixed term")
        || lower.contains("fixed-term")
        || lower.contains("temporary")
        || lower.contains("durée déterminée")
    {
        return ContractType::Cdd;
    }

    if lower.contains("cdi")
        || lower.contains("permanent")
        || lower.contains("durée indéterminée")
        || lower.contains("full-time")
        || lower.contains("full time")
    {
        return ContractType::Cdi;
    }

    ContractType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_permanent_variants() {
        assert_eq!(correct_contract_type("CDI"), ContractType::Cdi);
        assert_eq!(correct_contract_type("Permanent"), ContractType::Cdi);
        assert_eq!(correct_contract_type("Full-time"), ContractType::Cdi);
        assert_eq!(
            correct_contract_type("Contrat à durée indéterminée"),
            ContractType::Cdi
        );
    }

    #[test]
    fn specific_forms_win_over_permanent() {
        assert_eq!(correct_contract_type("CDD 6 mois"), ContractType::Cdd);
        assert_eq!(
            correct_contract_type("Stage de fin d'études"),
            ContractType::Internship
        );
        assert_eq!(
            correct_contract_type("Freelance / Portage salarial"),
            ContractType::Freelance
        );
        assert_eq!(
            correct_contract_type("Internship (full time)"),
            ContractType::Internship
        );
    }

    #[test]
    fn unknown_inputs_stay_unknown() {
        assert_eq!(correct_contract_type(""), ContractType::Unknown);
        assert_eq!(correct_contract_type("autre"), ContractType::Unknown);
    }
}
