use crate::{ContractType, JobPosting, SearchQuery};

/// Hard pre-filter applied before any scoring.
///
/// A constraint the query does not set filters nothing; a constraint it
/// does set is strict membership — a posting with an unknown country or
/// contract type is excluded rather than scored down.
pub fn passes_hard_filter(posting: &JobPosting, query: &SearchQuery) -> bool {
    if !query.countries.is_empty() {
        let Some(country) = posting.country.as_deref() else {
            return false;
        };
        if !query.countries.iter().any(|c| c.eq_ignore_ascii_case(country)) {
            return false;
        }
    }

    if !query.contract_types.is_empty() {
        if posting.contract_type == ContractType::Unknown
            || !query.contract_types.contains(&posting.contract_type)
        {
            return false;
        }
    }

    true
}

/// Bound the scoring cost to the relevant subset.
pub fn filter_candidates(postings: Vec<JobPosting>, query: &SearchQuery) -> Vec<JobPosting> {
    postings
        .into_iter()
        .filter(|p| passes_hard_filter(p, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RemoteType, SalaryPeriod};
    use chrono::Utc;

    fn posting(country: Option<&str>, contract: ContractType) -> JobPosting {
        JobPosting {
            id: "a:1".into(),
            title: "Backend Engineer".into(),
            company: None,
            country: country.map(str::to_string),
            city: None,
            remote_type: RemoteType::Unknown,
            contract_type: contract,
            salary_min: None,
            salary_max: None,
            currency: None,
            salary_period: SalaryPeriod::Year,
            apply_url: None,
            skills: vec![],
            source_id: "a".into(),
            raw_hash: "0".into(),
            ingested_at: Utc::now(),
        }
    }

    #[test]
    fn unconstrained_query_passes_everything() {
        let query = SearchQuery::default();
        assert!(passes_hard_filter(&posting(None, ContractType::Unknown), &query));
    }

    #[test]
    fn country_filter_is_strict_membership() {
        let query = SearchQuery {
            countries: vec!["FR".into(), "BE".into()],
            ..SearchQuery::default()
        };

        assert!(passes_hard_filter(&posting(Some("fr"), ContractType::Cdi), &query));
        assert!(!passes_hard_filter(&posting(Some("DE"), ContractType::Cdi), &query));
        assert!(!passes_hard_filter(&posting(None, ContractType::Cdi), &query));
    }

    #[test]
    fn contract_filter_excludes_unknown() {
        let query = SearchQuery {
            contract_types: vec![ContractType::Cdi],
            ..SearchQuery::default()
        };

        assert!(passes_hard_filter(&posting(Some("FR"), ContractType::Cdi), &query));
        assert!(!passes_hard_filter(&posting(Some("FR"), ContractType::Cdd), &query));
        assert!(!passes_hard_filter(
            &posting(Some("FR"), ContractType::Unknown),
            &query
        ));
    }

    #[test]
    fn filter_keeps_only_matching_candidates() {
        let query = SearchQuery {
            countries: vec!["FR".into()],
            ..SearchQuery::default()
        };
        let candidates = vec![
            posting(Some("FR"), ContractType::Cdi),
            posting(Some("DE"), ContractType::Cdi),
            posting(Some("FR"), ContractType::Unknown),
        ];

        assert_eq!(filter_candidates(candidates, &query).len(), 2);
    }
}
