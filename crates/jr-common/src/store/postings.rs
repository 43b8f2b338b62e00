use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::normalize::{dedup_bucket_key, posting_fingerprint, title_tokens, token_set_overlap};
use crate::{ContractType, JobPosting, RemoteType};

/// What one upsert did to the canonical set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New canonical posting.
    Inserted,
    /// Same source record, unchanged content: no-op.
    Unchanged,
    /// Same source record with changed content: canonical refreshed.
    Refreshed,
    /// Cross-source duplicate folded into an existing canonical posting.
    Merged { canonical_id: String },
}

#[derive(Debug)]
struct SourceEntry {
    canonical_id: String,
    raw_hash: String,
}

#[derive(Debug, Default)]
struct Inner {
    postings: HashMap<String, JobPosting>,
    /// "{source}:{native_id}" → canonical posting + last seen content hash.
    by_source_key: HashMap<String, SourceEntry>,
    /// Exact (title, company, city, country) fingerprint → canonical id.
    by_fingerprint: HashMap<String, String>,
    /// (company, city, country) bucket → canonical ids, fuzzy candidates.
    buckets: HashMap<String, Vec<String>>,
}

/// In-memory canonical posting store.
///
/// All dedup bookkeeping (fingerprint index, buckets, source keys) lives
/// behind one write lock, so concurrent ingestions cannot race two canonical
/// records into existence for the same underlying job. Reads take the read
/// lock, which also gives a search immediately after an ingest the new
/// postings.
#[derive(Debug, Default)]
pub struct PostingStore {
    inner: RwLock<Inner>,
}

impl PostingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or merge one normalized posting.
    ///
    /// `title_overlap` is the token-set overlap threshold for fuzzy dedup of
    /// postings from *different* sources sharing a (company, city, country)
    /// bucket. Same-source identity is the (source, native id) key with
    /// content-hash change detection.
    pub fn upsert(&self, posting: JobPosting, title_overlap: f64) -> UpsertOutcome {
        let mut inner = self.write();
        let source_key = posting.id.clone();

        if let Some(entry) = inner.by_source_key.get(&source_key) {
            if entry.raw_hash == posting.raw_hash {
                return UpsertOutcome::Unchanged;
            }
            let canonical_id = entry.canonical_id.clone();
            let raw_hash = posting.raw_hash.clone();
            if let Some(canonical) = inner.postings.get_mut(&canonical_id) {
                merge_fields(canonical, &posting);
                canonical.raw_hash = raw_hash.clone();
            }
            if let Some(entry) = inner.by_source_key.get_mut(&source_key) {
                entry.raw_hash = raw_hash;
            }
            return UpsertOutcome::Refreshed;
        }

        let fingerprint = posting_fingerprint(
            &posting.title,
            posting.company.as_deref(),
            posting.city.as_deref(),
            posting.country.as_deref(),
        );

        let duplicate_of = inner
            .by_fingerprint
            .get(&fingerprint)
            .filter(|id| {
                inner
                    .postings
                    .get(*id)
                    .is_some_and(|c| c.source_id != posting.source_id)
            })
            .cloned()
            .or_else(|| find_fuzzy_duplicate(&inner, &posting, title_overlap));

        if let Some(canonical_id) = duplicate_of {
            debug!(
                incoming = %posting.id,
                canonical = %canonical_id,
                "cross-source duplicate, merging"
            );
            inner.by_source_key.insert(
                source_key,
                SourceEntry {
                    canonical_id: canonical_id.clone(),
                    raw_hash: posting.raw_hash.clone(),
                },
            );
            inner
                .by_fingerprint
                .entry(fingerprint)
                .or_insert_with(|| canonical_id.clone());
            if let Some(canonical) = inner.postings.get_mut(&canonical_id) {
                merge_fields(canonical, &posting);
            }
            return UpsertOutcome::Merged { canonical_id };
        }

        let id = posting.id.clone();
        let bucket = dedup_bucket_key(
            posting.company.as_deref(),
            posting.city.as_deref(),
            posting.country.as_deref(),
        );
        inner.by_source_key.insert(
            source_key,
            SourceEntry {
                canonical_id: id.clone(),
                raw_hash: posting.raw_hash.clone(),
            },
        );
        inner.by_fingerprint.insert(fingerprint, id.clone());
        inner.buckets.entry(bucket).or_default().push(id.clone());
        inner.postings.insert(id, posting);
        UpsertOutcome::Inserted
    }

    pub fn all(&self) -> Vec<JobPosting> {
        self.read().postings.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<JobPosting> {
        self.read().postings.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn find_fuzzy_duplicate(inner: &Inner, posting: &JobPosting, title_overlap: f64) -> Option<String> {
    let bucket = dedup_bucket_key(
        posting.company.as_deref(),
        posting.city.as_deref(),
        posting.country.as_deref(),
    );
    let incoming_tokens = title_tokens(&posting.title);

    inner
        .buckets
        .get(&bucket)?
        .iter()
        .find(|id| {
            inner.postings.get(*id).is_some_and(|candidate| {
                candidate.source_id != posting.source_id
                    && token_set_overlap(&title_tokens(&candidate.title), &incoming_tokens)
                        >= title_overlap
            })
        })
        .cloned()
}

/// Field-level merge: the most recently ingested non-null value wins, a
/// null never overwrites a value. The identity tuple (title, company, city,
/// country) stays on the canonical record — it anchors the fingerprint
/// index the duplicate was found through.
fn merge_fields(canonical: &mut JobPosting, incoming: &JobPosting) {
    if incoming.salary_min.is_some() {
        canonical.salary_min = incoming.salary_min;
        canonical.salary_period = incoming.salary_period;
    }
    if incoming.salary_max.is_some() {
        canonical.salary_max = incoming.salary_max;
        canonical.salary_period = incoming.salary_period;
    }
    if let (Some(min), Some(max)) = (canonical.salary_min, canonical.salary_max) {
        if min > max {
            canonical.salary_min = Some(max);
            canonical.salary_max = Some(min);
        }
    }
    if incoming.currency.is_some() {
        canonical.currency = incoming.currency.clone();
    }
    if incoming.apply_url.is_some() {
        canonical.apply_url = incoming.apply_url.clone();
    }
    if incoming.remote_type != RemoteType::Unknown {
        canonical.remote_type = incoming.remote_type;
    }
    if incoming.contract_type != ContractType::Unknown {
        canonical.contract_type = incoming.contract_type;
    }
    if !incoming.skills.is_empty() {
        let mut skills = canonical.skills.clone();
        skills.extend(incoming.skills.iter().cloned());
        skills.sort();
        skills.dedup();
        canonical.skills = skills;
    }
    canonical.ingested_at = incoming.ingested_at;
}
