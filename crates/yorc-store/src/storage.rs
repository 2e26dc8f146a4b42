//! Storage collaborator traits.

use chrono::{DateTime, Utc};
use yorc_common::{NewUsageRecord, Owner, RecordId, UsageRecord};

use crate::error::Result;
use crate::model::{Category, CategoryCount, GroupedCount, TemporalUnit};

/// Durable home of usage records.
///
/// Implementations must be safe to share across threads. Every grouped query
/// treats `since` as an open lower bound: a record created exactly at `since`
/// is not counted.
pub trait Storage: Send + Sync {
    /// Persist a record together with one language row per selected
    /// language. Either everything is stored or nothing is.
    fn insert_record(&self, record: &NewUsageRecord) -> Result<RecordId>;

    fn find_record(&self, id: RecordId) -> Result<Option<UsageRecord>>;

    /// All records, ascending by id.
    fn list_records(&self) -> Result<Vec<UsageRecord>>;

    /// Delete a record and its language rows. Returns whether it existed.
    fn delete_record(&self, id: RecordId) -> Result<bool>;

    fn count_all(&self) -> Result<u64>;

    /// Record counts per calendar bucket, ascending by key.
    fn grouped_count(&self, unit: TemporalUnit, since: DateTime<Utc>) -> Result<Vec<GroupedCount>>;

    /// Record counts per (month, category value), ascending by month then value.
    fn grouped_count_by_category(
        &self,
        category: Category,
        since: DateTime<Utc>,
    ) -> Result<Vec<CategoryCount>>;

    /// Language codes recorded for a record, ascending.
    fn language_usage(&self, id: RecordId) -> Result<Vec<String>>;
}

/// Maps a session login to the owner records are attributed to.
pub trait OwnerResolver: Send + Sync {
    /// `None` or a blank login is the anonymous owner and yields `Ok(None)`.
    /// A login seen for the first time creates its owner.
    fn find_or_create_owner(&self, login: Option<&str>) -> Result<Option<Owner>>;
}

impl<T: Storage + ?Sized> Storage for std::sync::Arc<T> {
    fn insert_record(&self, record: &NewUsageRecord) -> Result<RecordId> {
        (**self).insert_record(record)
    }

    fn find_record(&self, id: RecordId) -> Result<Option<UsageRecord>> {
        (**self).find_record(id)
    }

    fn list_records(&self) -> Result<Vec<UsageRecord>> {
        (**self).list_records()
    }

    fn delete_record(&self, id: RecordId) -> Result<bool> {
        (**self).delete_record(id)
    }

    fn count_all(&self) -> Result<u64> {
        (**self).count_all()
    }

    fn grouped_count(&self, unit: TemporalUnit, since: DateTime<Utc>) -> Result<Vec<GroupedCount>> {
        (**self).grouped_count(unit, since)
    }

    fn grouped_count_by_category(
        &self,
        category: Category,
        since: DateTime<Utc>,
    ) -> Result<Vec<CategoryCount>> {
        (**self).grouped_count_by_category(category, since)
    }

    fn language_usage(&self, id: RecordId) -> Result<Vec<String>> {
        (**self).language_usage(id)
    }
}

impl<T: OwnerResolver + ?Sized> OwnerResolver for std::sync::Arc<T> {
    fn find_or_create_owner(&self, login: Option<&str>) -> Result<Option<Owner>> {
        (**self).find_or_create_owner(login)
    }
}

/// Trimmed login, or `None` for anonymous sessions.
pub(crate) fn normalize_login(login: Option<&str>) -> Option<&str> {
    login.map(str::trim).filter(|l| !l.is_empty())
}
