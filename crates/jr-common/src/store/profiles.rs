use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use thiserror::Error;

use crate::CandidateProfile;

#[derive(Debug, Error, PartialEq)]
pub enum ProfileStoreError {
    #[error("profile not found: {0}")]
    NotFound(String),
}

/// In-memory candidate profile store keyed by `user_id`.
///
/// Writes are full-replace: the caller hands in the complete profile it
/// wants stored. `created_at` survives replacement; `updated_at` is stamped
/// on every save. No soft-delete is modeled.
#[derive(Debug, Default)]
pub struct ProfileStore {
    inner: RwLock<HashMap<String, CandidateProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CandidateProfile>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CandidateProfile>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, user_id: &str) -> Result<CandidateProfile, ProfileStoreError> {
        self.read()
            .get(user_id)
            .cloned()
            .ok_or_else(|| ProfileStoreError::NotFound(user_id.to_string()))
    }

    /// Create or fully replace the profile for `profile.user_id`.
    pub fn save(&self, mut profile: CandidateProfile) -> CandidateProfile {
        let now = Utc::now();
        let mut map = self.write();

        profile.created_at = map
            .get(&profile.user_id)
            .and_then(|existing| existing.created_at)
            .or(Some(now));
        profile.updated_at = Some(now);

        map.insert(profile.user_id.clone(), profile.clone());
        profile
    }

    pub fn delete(&self, user_id: &str) -> Result<(), ProfileStoreError> {
        self.write()
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| ProfileStoreError::NotFound(user_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
