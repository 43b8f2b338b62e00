use thiserror::Error;
use tracing::info;

use crate::api::{IngestAck, ProfileUpsertRequest, RankedJob, SearchResponse};
use crate::cv::{parse_cv_text, CvExtraction};
use crate::ingest::{normalize_batch, SourceRecord};
use crate::matching::pipeline::{MatchingPipeline, DEFAULT_PAGE_SIZE};
use crate::matching::scoring::MatchScorer;
use crate::run_id;
use crate::store::{PostingStore, ProfileStore, ProfileStoreError, UpsertOutcome};
use crate::{CandidateProfile, SearchQuery};

/// Scope handed to source connectors on an ingest trigger.
#[derive(Debug, Clone, Default)]
pub struct IngestScope {
    pub keywords: Vec<String>,
    pub countries: Vec<String>,
}

/// Boundary to the scraping collaborators. Implementations fetch raw
/// records for a scope; the engine itself never talks to job sites.
pub trait SourceConnector: Send + Sync {
    fn source_id(&self) -> &str;
    fn fetch(&self, scope: &IngestScope) -> Vec<SourceRecord>;
}

#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("profile not found: {0}")]
    ProfileNotFound(String),
}

impl From<ProfileStoreError> for ServiceError {
    fn from(value: ProfileStoreError) -> Self {
        match value {
            ProfileStoreError::NotFound(user_id) => ServiceError::ProfileNotFound(user_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub page_size: usize,
    /// Token-set overlap threshold for fuzzy cross-source dedup.
    pub dedup_title_overlap: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            dedup_title_overlap: 0.8,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_size: std::env::var("JR_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.page_size),
            dedup_title_overlap: std::env::var("JR_DEDUP_TITLE_OVERLAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.dedup_title_overlap),
        }
    }
}

/// Orchestrates ingest and search over the shared canonical store.
///
/// `ingest` and `search` are deliberately separate operations: a caller
/// holding a cached profile can search without re-triggering ingestion,
/// and an ingest returns only an acknowledgement.
pub struct SearchService {
    postings: PostingStore,
    profiles: ProfileStore,
    connectors: Vec<Box<dyn SourceConnector>>,
    pipeline: MatchingPipeline,
    config: EngineConfig,
}

impl SearchService {
    pub fn new(config: EngineConfig) -> Self {
        let pipeline = MatchingPipeline::new(MatchScorer::default(), config.page_size);
        Self {
            postings: PostingStore::new(),
            profiles: ProfileStore::new(),
            connectors: Vec::new(),
            pipeline,
            config,
        }
    }

    pub fn register_connector(&mut self, connector: Box<dyn SourceConnector>) {
        self.connectors.push(connector);
    }

    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }

    fn validate_query(query: &SearchQuery) -> Result<(), ServiceError> {
        if let Some(floor) = query.salary_min {
            if floor < 0 {
                return Err(ServiceError::Validation(
                    "salary_min must not be negative".into(),
                ));
            }
        }
        Ok(())
    }

    /// Refresh the canonical posting set for the query's scope. Idempotent:
    /// re-ingesting identical raw records grows nothing. Returns only an
    /// acknowledgement; ranked results come from a subsequent `search`,
    /// which observes everything this run wrote.
    pub fn ingest(&self, query: &SearchQuery) -> Result<IngestAck, ServiceError> {
        Self::validate_query(query)?;

        let run_id = run_id::generate();
        let scope = IngestScope {
            keywords: query.keywords.clone(),
            countries: query.countries.clone(),
        };

        let mut records: Vec<SourceRecord> = Vec::new();
        for connector in &self.connectors {
            let fetched = connector.fetch(&scope);
            info!(
                run_id = %run_id,
                source_id = connector.source_id(),
                count = fetched.len(),
                "connector returned raw records"
            );
            records.extend(fetched);
        }

        let fetched = records.len();
        let batch = normalize_batch(&records, chrono::Utc::now());

        let mut ack = IngestAck {
            run_id: run_id.clone(),
            fetched,
            inserted: 0,
            merged: 0,
            refreshed: 0,
            unchanged: 0,
            skipped: batch.skipped,
        };

        for posting in batch.postings {
            match self
                .postings
                .upsert(posting, self.config.dedup_title_overlap)
            {
                UpsertOutcome::Inserted => ack.inserted += 1,
                UpsertOutcome::Merged { .. } => ack.merged += 1,
                UpsertOutcome::Refreshed => ack.refreshed += 1,
                UpsertOutcome::Unchanged => ack.unchanged += 1,
            }
        }

        info!(
            run_id = %run_id,
            fetched = ack.fetched,
            inserted = ack.inserted,
            merged = ack.merged,
            refreshed = ack.refreshed,
            unchanged = ack.unchanged,
            skipped = ack.skipped.len(),
            "ingest run finished"
        );
        Ok(ack)
    }

    /// Rank the canonical postings for this query. With no profile, the
    /// profile-dependent signals are omitted; an ad-hoc `cv_summary` on the
    /// query stands in as an ephemeral profile.
    pub fn search(
        &self,
        query: &SearchQuery,
        profile: Option<&CandidateProfile>,
    ) -> Result<SearchResponse, ServiceError> {
        Self::validate_query(query)?;

        let ephemeral = match (profile, query.cv_summary.as_deref()) {
            (None, Some(summary)) => Some(profile_from_cv_summary(summary)),
            _ => None,
        };
        let effective = profile.or(ephemeral.as_ref());

        let outcome = self
            .pipeline
            .run(query, effective, self.postings.all());

        Ok(SearchResponse {
            total: outcome.total,
            items: outcome.results.into_iter().map(RankedJob::from).collect(),
        })
    }

    /// Search on behalf of a stored profile.
    pub fn search_for(
        &self,
        query: &SearchQuery,
        user_id: &str,
    ) -> Result<SearchResponse, ServiceError> {
        let profile = self.profiles.get(user_id)?;
        self.search(query, Some(&profile))
    }

    /// Create or fully replace a profile. A present `cv_text` is parsed and
    /// the derived fields (skills, experience, languages) overwritten; an
    /// absent one leaves them empty, consistent with full-replace writes.
    pub fn save_profile(
        &self,
        request: ProfileUpsertRequest,
    ) -> Result<CandidateProfile, ServiceError> {
        let mut profile = request.into_profile();
        if profile.user_id.is_empty() {
            return Err(ServiceError::Validation("user_id must not be blank".into()));
        }

        if let Some(cv_text) = profile.cv_text.clone() {
            let extraction = parse_cv_text(&cv_text);
            profile.skills = extraction.skills;
            profile.experience_years = extraction.experience_years;
            profile.experience_level = extraction.experience_level;
            profile.languages = extraction.languages;
        }

        Ok(self.profiles.save(profile))
    }

    pub fn get_profile(&self, user_id: &str) -> Result<CandidateProfile, ServiceError> {
        Ok(self.profiles.get(user_id)?)
    }

    pub fn delete_profile(&self, user_id: &str) -> Result<(), ServiceError> {
        Ok(self.profiles.delete(user_id)?)
    }

    /// Preview extraction for raw CV text. Stores nothing; the profile-save
    /// path applies the same parser as a side effect.
    pub fn parse_cv(&self, cv_text: &str) -> CvExtraction {
        parse_cv_text(cv_text)
    }
}

fn profile_from_cv_summary(summary: &str) -> CandidateProfile {
    let extraction = parse_cv_text(summary);
    CandidateProfile {
        skills: extraction.skills,
        experience_years: extraction.experience_years,
        experience_level: extraction.experience_level,
        languages: extraction.languages,
        ..CandidateProfile::default()
    }
}
