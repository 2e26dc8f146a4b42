//! In-memory storage backend.
//!
//! Mirrors the SQLite backend's observable behavior, including ascending key
//! order of grouped counts. Used for tests and short-lived processes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use yorc_common::{NewUsageRecord, Owner, OwnerId, RecordId, UsageRecord};

use crate::error::{Result, StoreError};
use crate::model::{Category, CategoryCount, GroupedCount, LanguageUsage, TemporalUnit};
use crate::storage::{normalize_login, OwnerResolver, Storage};

#[derive(Debug, Default)]
struct MemoryState {
    next_record_id: i64,
    next_owner_id: i64,
    records: Vec<UsageRecord>,
    languages: Vec<LanguageUsage>,
    owners: Vec<Owner>,
}

/// Storage backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }
}

impl MemoryState {
    fn with_languages(&self, record: &UsageRecord) -> UsageRecord {
        let mut record = record.clone();
        record.options.selected_languages = self
            .languages
            .iter()
            .filter(|l| l.record_id == record.id)
            .map(|l| l.iso_code.clone())
            .collect();
        record
    }

    fn recent(&self, since: DateTime<Utc>) -> impl Iterator<Item = &UsageRecord> {
        self.records.iter().filter(move |r| r.creation_date > since)
    }
}

impl Storage for MemoryStore {
    fn insert_record(&self, record: &NewUsageRecord) -> Result<RecordId> {
        let mut state = self.write()?;
        state.next_record_id += 1;
        let id = RecordId(state.next_record_id);

        let mut stored = UsageRecord::from_new(id, record.clone());
        let languages = std::mem::take(&mut stored.options.selected_languages);
        state.records.push(stored);
        state
            .languages
            .extend(languages.into_iter().map(|iso_code| LanguageUsage {
                record_id: id,
                iso_code,
            }));
        Ok(id)
    }

    fn find_record(&self, id: RecordId) -> Result<Option<UsageRecord>> {
        let state = self.read()?;
        Ok(state
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| state.with_languages(r)))
    }

    fn list_records(&self) -> Result<Vec<UsageRecord>> {
        let state = self.read()?;
        Ok(state.records.iter().map(|r| state.with_languages(r)).collect())
    }

    fn delete_record(&self, id: RecordId) -> Result<bool> {
        let mut state = self.write()?;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        let existed = state.records.len() != before;
        if existed {
            state.languages.retain(|l| l.record_id != id);
        }
        Ok(existed)
    }

    fn count_all(&self) -> Result<u64> {
        Ok(self.read()?.records.len() as u64)
    }

    fn grouped_count(&self, unit: TemporalUnit, since: DateTime<Utc>) -> Result<Vec<GroupedCount>> {
        let state = self.read()?;
        let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
        for record in state.recent(since) {
            *buckets.entry(unit.key_of(record.creation_date)).or_insert(0) += 1;
        }
        Ok(buckets
            .into_iter()
            .map(|(key, count)| GroupedCount { key, count })
            .collect())
    }

    fn grouped_count_by_category(
        &self,
        category: Category,
        since: DateTime<Utc>,
    ) -> Result<Vec<CategoryCount>> {
        let state = self.read()?;
        let mut buckets: BTreeMap<(String, String), u64> = BTreeMap::new();
        for record in state.recent(since) {
            let key = (
                TemporalUnit::Month.key_of(record.creation_date),
                category.value_of(&record.options).to_string(),
            );
            *buckets.entry(key).or_insert(0) += 1;
        }
        Ok(buckets
            .into_iter()
            .map(|((month_key, value), count)| CategoryCount {
                month_key,
                value,
                count,
            })
            .collect())
    }

    fn language_usage(&self, id: RecordId) -> Result<Vec<String>> {
        let state = self.read()?;
        let codes: BTreeSet<&str> = state
            .languages
            .iter()
            .filter(|l| l.record_id == id)
            .map(|l| l.iso_code.as_str())
            .collect();
        Ok(codes.into_iter().map(str::to_string).collect())
    }
}

impl OwnerResolver for MemoryStore {
    fn find_or_create_owner(&self, login: Option<&str>) -> Result<Option<Owner>> {
        let Some(login) = normalize_login(login) else {
            return Ok(None);
        };
        let mut state = self.write()?;
        if let Some(owner) = state
            .owners
            .iter()
            .find(|o| o.login.as_deref() == Some(login))
        {
            return Ok(Some(owner.clone()));
        }
        state.next_owner_id += 1;
        let owner = Owner {
            id: OwnerId(state.next_owner_id),
            login: Some(login.to_string()),
        };
        state.owners.push(owner.clone());
        Ok(Some(owner))
    }
}
