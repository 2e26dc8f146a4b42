//! Usage record service.
//!
//! Ties storage, owner resolution and the clock together. Ingestion lives in
//! [`crate::ingest`], reporting in [`crate::aggregate`]; this module holds
//! construction and the administrative record operations.

use std::sync::Arc;

use tracing::debug;
use yorc_common::{RecordId, UsageRecord};
use yorc_store::{OwnerResolver, Storage};

use crate::error::{Error, Result};
use crate::session::{Clock, SystemClock};

/// Service for managing usage records.
///
/// Holds no mutable state of its own; share it freely across threads when
/// its collaborators allow.
#[derive(Debug, Clone)]
pub struct UsageService<S, R, C = SystemClock> {
    pub(crate) storage: S,
    pub(crate) owners: R,
    pub(crate) clock: C,
}

impl<S, R, C> UsageService<S, R, C>
where
    S: Storage,
    R: OwnerResolver,
    C: Clock,
{
    pub fn new(storage: S, owners: R, clock: C) -> Self {
        Self {
            storage,
            owners,
            clock,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get all the usage records.
    pub fn find_all(&self) -> Result<Vec<UsageRecord>> {
        debug!("Request to get all usage records");
        Ok(self.storage.list_records()?)
    }

    /// Get one usage record by id.
    pub fn find_one(&self, id: RecordId) -> Result<Option<UsageRecord>> {
        debug!(%id, "Request to get usage record");
        Ok(self.storage.find_record(id)?)
    }

    /// Get one usage record by id, failing when it does not exist.
    pub fn get(&self, id: RecordId) -> Result<UsageRecord> {
        self.find_one(id)?.ok_or(Error::NotFound { id })
    }

    /// Delete a usage record by id. Returns whether it existed.
    pub fn delete(&self, id: RecordId) -> Result<bool> {
        debug!(%id, "Request to delete usage record");
        Ok(self.storage.delete_record(id)?)
    }

    pub fn count_all(&self) -> Result<u64> {
        Ok(self.storage.count_all()?)
    }
}

impl<T> UsageService<Arc<T>, Arc<T>, SystemClock>
where
    T: Storage + OwnerResolver,
{
    /// Service over one backend that also resolves owners, on the wall clock.
    pub fn with_store(store: Arc<T>) -> Self {
        Self::new(Arc::clone(&store), store, SystemClock)
    }
}
