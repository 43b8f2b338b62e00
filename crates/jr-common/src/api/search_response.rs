use serde::Serialize;

use crate::ingest::SkippedRecord;
use crate::matching::scoring::MatchResult;
use crate::JobPosting;

/// One ranked posting as the UI renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub match_score: f64,
    pub reasons: Vec<String>,
}

impl From<MatchResult> for RankedJob {
    fn from(result: MatchResult) -> Self {
        Self {
            posting: result.posting,
            match_score: result.match_score,
            reasons: result.reasons,
        }
    }
}

/// `total` counts every posting that passed the hard pre-filter; `items`
/// is the first page, ordered by descending score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub total: usize,
    pub items: Vec<RankedJob>,
}

/// Acknowledgement of an ingest run. Never carries ranked results; a
/// follow-up search observes whatever this run wrote.
#[derive(Debug, Clone, Serialize)]
pub struct IngestAck {
    pub run_id: String,
    /// Raw records the connectors delivered.
    pub fetched: usize,
    /// New canonical postings.
    pub inserted: usize,
    /// Cross-source duplicates folded into existing postings.
    pub merged: usize,
    /// Same-source records whose content changed.
    pub refreshed: usize,
    /// Unchanged records (no-ops).
    pub unchanged: usize,
    /// Malformed records, skipped with their reasons.
    pub skipped: Vec<SkippedRecord>,
}
