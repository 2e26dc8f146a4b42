//! Ingestion and aggregation against the SQLite backend.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tempfile::tempdir;
use yorc_core::synthetic::{SyntheticGenerator, SyntheticParams};
use yorc_core::{Anonymous, Error, FixedClock, StaticLogin, UsageService};
use yorc_store::{Category, SqliteStore};

type SqlService = UsageService<Arc<SqliteStore>, Arc<SqliteStore>, FixedClock>;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 8, 30, 0).unwrap()
}

fn service(store: &Arc<SqliteStore>, now: DateTime<Utc>) -> SqlService {
    UsageService::new(Arc::clone(store), Arc::clone(store), FixedClock(now))
}

fn doc(framework: &str) -> String {
    format!(r#"{{"generator-jhipster": {{"clientFramework": "{framework}", "languages": ["en", "fr"]}}}}"#)
}

#[test]
fn test_ingest_persists_record_with_languages() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let svc = service(&store, at(2024, 2, 10));
    let id = svc.ingest(&doc("react"), &StaticLogin("bob".into())).unwrap();

    let record = svc.get(id).unwrap();
    assert_eq!(record.creation_date, at(2024, 2, 10));
    assert_eq!(record.options.selected_languages.len(), 2);
    assert!(record.owner.is_some());

    let again = svc.ingest(&doc("vue"), &StaticLogin("bob".into())).unwrap();
    assert_eq!(svc.get(again).unwrap().owner, record.owner);
}

#[test]
fn test_failed_parse_leaves_no_record() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let svc = service(&store, at(2024, 2, 10));
    let err = svc.ingest("[1, 2, 3]", &Anonymous).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(svc.count_all().unwrap(), 0);
}

#[test]
fn test_month_distribution_matches_month_count() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    for (when, framework) in [
        (at(2024, 1, 5), "react"),
        (at(2024, 1, 20), "angularX"),
        (at(2024, 2, 1), "react"),
        (at(2024, 2, 2), "react"),
        (at(2024, 2, 29), "angularX"),
    ] {
        service(&store, when).ingest(&doc(framework), &Anonymous).unwrap();
    }

    let svc = service(&store, at(2024, 3, 1));
    let since = at(2023, 12, 31);
    let months = svc.count_by_month(since).unwrap();
    let dist = svc.count_by_client_framework_per_month(since).unwrap();

    assert_eq!(dist.len(), months.len());
    for entry in &dist {
        assert_eq!(Some(entry.total()), months.get(entry.date));
    }
    let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let feb_dist = dist.iter().find(|d| d.date == feb).unwrap();
    assert_eq!(feb_dist.values["react"], 2);
    assert_eq!(feb_dist.values["angularX"], 1);
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stats.db");
    {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        service(&store, at(2024, 4, 4)).ingest(&doc("react"), &Anonymous).unwrap();
    }
    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let svc = service(&store, at(2024, 5, 1));
    let years = svc.count_by_year(at(2020, 1, 1)).unwrap();
    assert_eq!(years.len(), 1);
    assert_eq!(years[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(years[0].count, 1);
}

#[test]
fn test_synthetic_records_aggregate_consistently() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let end = at(2024, 6, 30);
    let params = SyntheticParams {
        count: 300,
        window_days: 400,
        end,
    };
    let svc = service(&store, end);
    for record in SyntheticGenerator::new(StdRng::seed_from_u64(42), params).generate() {
        svc.save(&record).unwrap();
    }

    let since = end - Duration::days(401);
    let total_by_year: u64 = svc.count_by_year(since).unwrap().iter().map(|c| c.count).sum();
    assert_eq!(total_by_year, 300);
    assert_eq!(svc.count_by_month(since).unwrap().total(), 300);
    assert_eq!(svc.count_by_day(since).unwrap().total(), 300);
    for category in Category::ALL {
        let per_month: u64 = svc
            .count_by_category_per_month(since, category)
            .unwrap()
            .iter()
            .map(|d| d.total())
            .sum();
        assert_eq!(per_month, 300, "{category}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn month_and_day_totals_agree(offsets in proptest::collection::vec(0i64..(3 * 365 * 24), 1..40)) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let base = at(2021, 1, 1);
        for hours in &offsets {
            service(&store, base + Duration::hours(*hours))
                .ingest(&doc("react"), &Anonymous)
                .unwrap();
        }
        let svc = service(&store, at(2025, 1, 1));
        let since = base - Duration::seconds(1);
        let n = offsets.len() as u64;
        prop_assert_eq!(svc.count_by_month(since).unwrap().total(), n);
        prop_assert_eq!(svc.count_by_day(since).unwrap().total(), n);
        let years: u64 = svc.count_by_year(since).unwrap().iter().map(|c| c.count).sum();
        prop_assert_eq!(years, n);
    }
}
