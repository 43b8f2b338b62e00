use serde::Serialize;

use super::skills::{category_hits, match_keywords, profile_skill_overlap, KeywordHit};
use super::weights::{SignalWeights, DEFAULT_WEIGHTS};
use crate::cv::title_seniority;
use crate::{CandidateProfile, ExperienceLevel, JobPosting, RemoteType, SearchQuery};

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: SignalWeights,
    /// Credit for a keyword found only in the title, relative to a hit in
    /// the normalized skill set (which is worth 1.0).
    pub title_hit_credit: f64,
    /// Skill-hit count at which the keyword signal saturates. A capped sum
    /// keeps the signal monotone: adding a matching keyword can only raise
    /// the score, never dilute it.
    pub keyword_saturation: f64,
    /// Fraction above the salary floor at which the salary bonus saturates,
    /// and below which the shortfall penalty saturates.
    pub salary_headroom: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            title_hit_credit: 0.6,
            keyword_saturation: 3.0,
            salary_headroom: 0.5,
        }
    }
}

/// Per-signal point contributions; `total()` is pre-clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub keyword: f64,
    pub skill_overlap: f64,
    pub category: f64,
    pub location: f64,
    pub remote: f64,
    pub contract: f64,
    pub salary: f64,
    pub experience: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.keyword
            + self.skill_overlap
            + self.category
            + self.location
            + self.remote
            + self.contract
            + self.salary
            + self.experience
    }
}

/// One scored posting: the clamped score plus the ordered reasons, each
/// naming one signal that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub posting: JobPosting,
    pub match_score: f64,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

struct Signal {
    points: f64,
    reasons: Vec<String>,
}

impl Signal {
    fn neutral() -> Self {
        Self {
            points: 0.0,
            reasons: vec![],
        }
    }

    fn fired(points: f64, reason: String) -> Self {
        Self {
            points,
            reasons: vec![reason],
        }
    }
}

/// Additive scorer over independent signals.
///
/// Pure: identical (posting, query, profile) always yields identical score
/// and reasons. With no profile the profile-dependent signals are simply
/// omitted — the score is the sum of the non-profile signals, clamped to
/// [0, 100].
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    config: ScoringConfig,
}

impl MatchScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        posting: &JobPosting,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
    ) -> MatchResult {
        let keyword = self.score_keywords(posting, query);
        let skill_overlap = self.score_profile_skills(posting, profile);
        let category = self.score_categories(posting, query, profile);
        let location = self.score_location(posting, query, profile);
        let remote = self.score_remote(posting, query, profile);
        let contract = self.score_contract(posting, query, profile);
        let salary = self.score_salary(posting, query, profile);
        let experience = self.score_experience(posting, profile);

        let breakdown = ScoreBreakdown {
            keyword: keyword.points,
            skill_overlap: skill_overlap.points,
            category: category.points,
            location: location.points,
            remote: remote.points,
            contract: contract.points,
            salary: salary.points,
            experience: experience.points,
        };

        let mut reasons = Vec::new();
        for signal in [
            keyword, skill_overlap, category, location, remote, contract, salary, experience,
        ] {
            reasons.extend(signal.reasons);
        }

        MatchResult {
            posting: posting.clone(),
            match_score: breakdown.total().clamp(0.0, 100.0),
            reasons,
            breakdown,
        }
    }

    fn score_keywords(&self, posting: &JobPosting, query: &SearchQuery) -> Signal {
        if query.keywords.is_empty() {
            return Signal::neutral();
        }

        let matches = match_keywords(&query.keywords, posting);
        if matches.is_empty() {
            return Signal::neutral();
        }

        let credit: f64 = matches
            .iter()
            .map(|m| match m.hit {
                KeywordHit::Skills => 1.0,
                KeywordHit::Title => self.config.title_hit_credit,
            })
            .sum();

        let weight = self.config.weights.keyword;
        Signal {
            points: (weight * credit / self.config.keyword_saturation).min(weight),
            reasons: matches
                .iter()
                .map(|m| format!("matches keyword {}", m.keyword))
                .collect(),
        }
    }

    fn score_profile_skills(
        &self,
        posting: &JobPosting,
        profile: Option<&CandidateProfile>,
    ) -> Signal {
        let Some(profile) = profile else {
            return Signal::neutral();
        };
        let Some(overlap) = profile_skill_overlap(&profile.skills, &posting.skills) else {
            return Signal::neutral();
        };
        if overlap.matched.is_empty() {
            return Signal::neutral();
        }

        let fraction = overlap.matched.len() as f64 / overlap.total as f64;
        Signal::fired(
            self.config.weights.skill_overlap * fraction,
            format!(
                "{}/{} of your skills required",
                overlap.matched.len(),
                overlap.total
            ),
        )
    }

    fn score_categories(
        &self,
        posting: &JobPosting,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
    ) -> Signal {
        let fallback = profile.map(|p| p.preferred_categories.as_slice());
        let categories = if query.categories.is_empty() {
            fallback.unwrap_or(&[])
        } else {
            query.categories.as_slice()
        };

        let hits = category_hits(categories, posting);
        if hits.is_empty() {
            return Signal::neutral();
        }

        Signal {
            points: self.config.weights.category,
            reasons: hits
                .into_iter()
                .map(|c| format!("matches category {c}"))
                .collect(),
        }
    }

    fn score_location(
        &self,
        posting: &JobPosting,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
    ) -> Signal {
        let fallback = profile.map(|p| p.preferred_countries.as_slice());
        let countries = if query.countries.is_empty() {
            fallback.unwrap_or(&[])
        } else {
            query.countries.as_slice()
        };

        let Some(country) = posting.country.as_deref() else {
            return Signal::neutral();
        };
        // Mismatch is neutral, never negative: country exclusion is the hard
        // filter's job, not a soft signal.
        if countries.iter().any(|c| c.eq_ignore_ascii_case(country)) {
            Signal::fired(
                self.config.weights.location,
                format!("located in {country}"),
            )
        } else {
            Signal::neutral()
        }
    }

    fn score_remote(
        &self,
        posting: &JobPosting,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
    ) -> Signal {
        let preference = query.remote_preference.or_else(|| {
            profile
                .map(|p| p.preferred_remote)
                .filter(|p| *p != RemoteType::Unknown)
        });

        match preference {
            Some(pref)
                if pref != RemoteType::Unknown
                    && posting.remote_type != RemoteType::Unknown
                    && posting.remote_type == pref =>
            {
                Signal::fired(
                    self.config.weights.remote,
                    format!("remote type matches your preference ({pref})"),
                )
            }
            _ => Signal::neutral(),
        }
    }

    fn score_contract(
        &self,
        posting: &JobPosting,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
    ) -> Signal {
        let fallback = profile.map(|p| p.preferred_contract_types.as_slice());
        let wanted = if query.contract_types.is_empty() {
            fallback.unwrap_or(&[])
        } else {
            query.contract_types.as_slice()
        };

        if posting.contract_type != crate::ContractType::Unknown
            && wanted.contains(&posting.contract_type)
        {
            Signal::fired(
                self.config.weights.contract,
                format!("contract type {} requested", posting.contract_type),
            )
        } else {
            Signal::neutral()
        }
    }

    fn score_salary(
        &self,
        posting: &JobPosting,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
    ) -> Signal {
        let floor = query.salary_min.or_else(|| profile.and_then(|p| p.salary_min));
        let (Some(floor), Some(offered)) = (floor, posting.salary_min) else {
            // Undisclosed salary or no floor requested: neutral.
            return Signal::neutral();
        };
        if posting.salary_bounds_corrupt() {
            // Corrupt stored data degrades this signal, never the search.
            return Signal::neutral();
        }

        let weight = self.config.weights.salary;
        if floor <= 0 {
            return Signal::fired(weight, "salary disclosed, no floor given".into());
        }

        let headroom = self.config.salary_headroom;
        let ratio = offered as f64 / floor as f64;
        if ratio >= 1.0 + headroom {
            Signal::fired(weight, "salary well above your minimum".into())
        } else if ratio >= 1.0 + headroom / 2.0 {
            Signal::fired(weight * 0.7, "salary comfortably above your minimum".into())
        } else if ratio >= 1.0 {
            Signal::fired(weight * 0.4, "salary meets your minimum".into())
        } else {
            let shortfall = (floor - offered) as f64 / floor as f64;
            let penalty = weight * (shortfall / headroom).min(1.0);
            Signal::fired(-penalty, "salary below your minimum".into())
        }
    }

    fn score_experience(&self, posting: &JobPosting, profile: Option<&CandidateProfile>) -> Signal {
        let Some(profile) = profile else {
            return Signal::neutral();
        };
        if profile.experience_level == ExperienceLevel::Unknown {
            return Signal::neutral();
        }

        let required = title_seniority(&posting.title);
        if required == ExperienceLevel::Unknown {
            return Signal::neutral();
        }

        if required == profile.experience_level {
            Signal::fired(
                self.config.weights.experience,
                format!("seniority matches your level ({required})"),
            )
        } else {
            Signal::fired(
                -self.config.weights.experience,
                format!(
                    "posting targets {required}, your profile is {}",
                    profile.experience_level
                ),
            )
        }
    }
}
