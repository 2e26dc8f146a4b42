//! Temporal aggregation over stored usage records.
//!
//! Grouping is done by storage; this module turns raw bucket keys into
//! dates and reshapes flat month × category rows into one entry per month.
//! Every operation counts records created strictly after `since`.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;
use yorc_store::{Category, CategoryCount, OwnerResolver, Storage, TemporalUnit};

use crate::bucket::{day_bucket_of, month_bucket_of, year_bucket_of, year_of_key, TemporalCount};
use crate::error::Result;
use crate::service::UsageService;
use crate::session::Clock;

/// Counts keyed by bucket start date, in the order storage returned them.
///
/// Serializes as a JSON object whose keys are ISO dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalSeries {
    points: Vec<(NaiveDate, u64)>,
    /// Position of each date in `points`.
    index: HashMap<NaiveDate, usize>,
}

impl TemporalSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Set the count for `date`. An existing date keeps its position.
    pub fn insert(&mut self, date: NaiveDate, count: u64) {
        match self.index.get(&date) {
            Some(&slot) => self.points[slot].1 = count,
            None => {
                self.index.insert(date, self.points.len());
                self.points.push((date, count));
            }
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<u64> {
        self.index.get(&date).map(|&slot| self.points[slot].1)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.points.iter().copied()
    }

    pub fn total(&self) -> u64 {
        self.points.iter().map(|(_, c)| c).sum()
    }
}

impl FromIterator<(NaiveDate, u64)> for TemporalSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u64)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut series = Self::with_capacity(iter.size_hint().0);
        for (date, count) in iter {
            series.insert(date, count);
        }
        series
    }
}

impl Serialize for TemporalSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.points.len()))?;
        for (date, count) in &self.points {
            map.serialize_entry(&date.to_string(), count)?;
        }
        map.end()
    }
}

/// Per-category counts for the month starting at `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalDistribution {
    pub date: NaiveDate,
    pub values: BTreeMap<String, u64>,
}

impl TemporalDistribution {
    pub fn total(&self) -> u64 {
        self.values.values().sum()
    }
}

/// Group flat (month, value, count) rows into one distribution per month.
///
/// Months keep the order in which they first appear. Rows for a month need
/// not be contiguous.
pub fn reshape_by_month(rows: Vec<CategoryCount>) -> Vec<TemporalDistribution> {
    let mut out: Vec<TemporalDistribution> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let slot = *index.entry(row.month_key).or_insert_with_key(|key| {
            out.push(TemporalDistribution {
                date: month_bucket_of(key),
                values: BTreeMap::new(),
            });
            out.len() - 1
        });
        *out[slot].values.entry(row.value).or_insert(0) += row.count;
    }
    out
}

impl<S, R, C> UsageService<S, R, C>
where
    S: Storage,
    R: OwnerResolver,
    C: Clock,
{
    /// Record counts per calendar year, ascending.
    pub fn count_by_year(&self, since: DateTime<Utc>) -> Result<Vec<TemporalCount>> {
        debug!(%since, "Request to count usage records by year");
        let rows = self.storage.grouped_count(TemporalUnit::Year, since)?;
        Ok(rows
            .into_iter()
            .map(|row| year_bucket_of(row.count, year_of_key(&row.key)))
            .collect())
    }

    /// Record counts per month, keyed by the first day of the month.
    pub fn count_by_month(&self, since: DateTime<Utc>) -> Result<TemporalSeries> {
        debug!(%since, "Request to count usage records by month");
        let rows = self.storage.grouped_count(TemporalUnit::Month, since)?;
        Ok(rows
            .into_iter()
            .map(|row| (month_bucket_of(&row.key), row.count))
            .collect())
    }

    /// Record counts per calendar day.
    pub fn count_by_day(&self, since: DateTime<Utc>) -> Result<TemporalSeries> {
        debug!(%since, "Request to count usage records by day");
        let rows = self.storage.grouped_count(TemporalUnit::Day, since)?;
        Ok(rows
            .into_iter()
            .map(|row| (day_bucket_of(&row.key), row.count))
            .collect())
    }

    /// Record counts per month, split by the values of `category`.
    pub fn count_by_category_per_month(
        &self,
        since: DateTime<Utc>,
        category: Category,
    ) -> Result<Vec<TemporalDistribution>> {
        debug!(%since, %category, "Request to count usage records by category per month");
        let rows = self.storage.grouped_count_by_category(category, since)?;
        Ok(reshape_by_month(rows))
    }

    pub fn count_by_client_framework_per_month(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<TemporalDistribution>> {
        self.count_by_category_per_month(since, Category::ClientFramework)
    }
}
