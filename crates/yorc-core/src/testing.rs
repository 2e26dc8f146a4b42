//! Test doubles shared by unit tests.

use chrono::{DateTime, Utc};
use yorc_common::{NewUsageRecord, Owner, RecordId, UsageRecord};
use yorc_store::{
    Category, CategoryCount, GroupedCount, OwnerResolver, Result, Storage, StoreError, TemporalUnit,
};

/// A backend whose every call fails, as if its lock had been poisoned.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl Storage for FailingStore {
    fn insert_record(&self, _record: &NewUsageRecord) -> Result<RecordId> {
        Err(StoreError::Poisoned)
    }

    fn find_record(&self, _id: RecordId) -> Result<Option<UsageRecord>> {
        Err(StoreError::Poisoned)
    }

    fn list_records(&self) -> Result<Vec<UsageRecord>> {
        Err(StoreError::Poisoned)
    }

    fn delete_record(&self, _id: RecordId) -> Result<bool> {
        Err(StoreError::Poisoned)
    }

    fn count_all(&self) -> Result<u64> {
        Err(StoreError::Poisoned)
    }

    fn grouped_count(&self, _unit: TemporalUnit, _since: DateTime<Utc>) -> Result<Vec<GroupedCount>> {
        Err(StoreError::Poisoned)
    }

    fn grouped_count_by_category(
        &self,
        _category: Category,
        _since: DateTime<Utc>,
    ) -> Result<Vec<CategoryCount>> {
        Err(StoreError::Poisoned)
    }

    fn language_usage(&self, _id: RecordId) -> Result<Vec<String>> {
        Err(StoreError::Poisoned)
    }
}

impl OwnerResolver for FailingStore {
    fn find_or_create_owner(&self, _login: Option<&str>) -> Result<Option<Owner>> {
        Err(StoreError::Poisoned)
    }
}
