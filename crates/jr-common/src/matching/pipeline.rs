use std::cmp::Ordering;

use super::prefilter::filter_candidates;
use super::scoring::{MatchResult, MatchScorer};
use crate::{CandidateProfile, JobPosting, SearchQuery};

/// Result of one ranking run. `total` counts everything that passed the
/// hard pre-filter, independent of pagination.
#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub total: usize,
    pub results: Vec<MatchResult>,
}

/// Pre-filter → score → deterministic sort → paginate.
pub struct MatchingPipeline {
    scorer: MatchScorer,
    page_size: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 50;

impl Default for MatchingPipeline {
    fn default() -> Self {
        Self {
            scorer: MatchScorer::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl MatchingPipeline {
    pub fn new(scorer: MatchScorer, page_size: usize) -> Self {
        Self { scorer, page_size }
    }

    pub fn run(
        &self,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
        candidates: Vec<JobPosting>,
    ) -> RankingOutcome {
        let candidates = filter_candidates(candidates, query);
        let total = candidates.len();

        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|posting| self.scorer.score(posting, query, profile))
            .collect();

        // Score descending; ties go to the most recently ingested posting,
        // then the id, so repeated identical queries return identical pages.
        results.sort_by(|a, b| {
            match b
                .match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(Ordering::Equal)
            {
                Ordering::Equal => b
                    .posting
                    .ingested_at
                    .cmp(&a.posting.ingested_at)
                    .then_with(|| a.posting.id.cmp(&b.posting.id)),
                other => other,
            }
        });
        results.truncate(self.page_size);

        RankingOutcome { total, results }
    }
}
