//! Seedable fake usage records for populating a local database.
//!
//! Debug tooling only. Values are drawn from the generator's real option
//! vocabularies so dashboards built on top look plausible.

use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeSet;
use yorc_common::{GeneratorOptions, NewUsageRecord};

const USER_LANGUAGES: &[&str] = &["en-gb", "fr-fr", "pt-pt"];
const JHIPSTER_VERSIONS: &[&str] = &["beta-5.0.2", "beta-5.0.1", "4.14.4"];
const ARCHES: &[&str] = &["x64", "x86"];
const APPLICATION_TYPES: &[&str] = &["monolith", "microservice", "gateway", "uaa"];
const AUTHENTICATION_TYPES: &[&str] = &["jwt", "oauth2", "session", "uaa"];
const CACHE_PROVIDERS: &[&str] = &["ehcache", "hazelcast", "infinispan", "no"];
const DATABASE_TYPES: &[&str] = &["no", "sql", "mongodb", "cassandra", "couchbase"];
const DEV_DATABASE_TYPES: &[&str] = &["h2Disk", "h2Memory", "mysql", "mariadb", "postgresql", "oracle"];
const PROD_DATABASE_TYPES: &[&str] = &["mysql", "mariadb", "postgresql", "oracle"];
const BUILD_TOOLS: &[&str] = &["maven", "gradle"];
const CLIENT_FRAMEWORKS: &[&str] = &["react", "angularX"];
const CLIENT_PACKAGE_MANAGERS: &[&str] = &["yarn", "npm"];
const LANGUAGES: &[&str] = &["en", "fr", "de", "es", "it", "pt-br", "pt-pt", "ja", "zh-cn", "ar-ly"];

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticParams {
    pub count: usize,
    /// Width of the creation-date window ending at `end`. Zero places every
    /// record exactly at `end`.
    pub window_days: u32,
    pub end: DateTime<Utc>,
}

/// Draws fake records from an injected random source.
#[derive(Debug)]
pub struct SyntheticGenerator<R> {
    rng: R,
    params: SyntheticParams,
}

impl<R: Rng> SyntheticGenerator<R> {
    pub fn new(rng: R, params: SyntheticParams) -> Self {
        Self { rng, params }
    }

    /// Generate `params.count` records.
    pub fn generate(&mut self) -> Vec<NewUsageRecord> {
        (0..self.params.count).map(|_| self.next_record()).collect()
    }

    /// One record dated within `(end - window_days, end]`.
    pub fn next_record(&mut self) -> NewUsageRecord {
        let window_secs = i64::from(self.params.window_days) * 86_400;
        let back = if window_secs == 0 {
            0
        } else {
            self.rng.random_range(0..window_secs)
        };
        let created = self.params.end - Duration::seconds(back);
        NewUsageRecord::new(self.options(), created)
    }

    fn options(&mut self) -> GeneratorOptions {
        let enable_translation = self.rng.random_bool(0.5);
        let mut selected_languages = BTreeSet::new();
        let native_language = self.pick(LANGUAGES);
        if enable_translation {
            selected_languages.insert(native_language.clone());
            for _ in 0..self.rng.random_range(0..4) {
                selected_languages.insert(self.pick(LANGUAGES));
            }
        }

        GeneratorOptions {
            jhipster_version: self.pick(JHIPSTER_VERSIONS),
            arch: self.pick(ARCHES),
            memory: "16".to_string(),
            user_language: self.pick(USER_LANGUAGES),
            application_type: self.pick(APPLICATION_TYPES),
            authentication_type: self.pick(AUTHENTICATION_TYPES),
            server_port: "8080".to_string(),
            cache_provider: self.pick(CACHE_PROVIDERS),
            enable_hibernate_cache: self.rng.random_bool(0.5),
            websocket: self.rng.random_bool(0.5),
            database_type: self.pick(DATABASE_TYPES),
            dev_database_type: self.pick(DEV_DATABASE_TYPES),
            prod_database_type: self.pick(PROD_DATABASE_TYPES),
            search_engine: self.rng.random_bool(0.5),
            message_broker: self.rng.random_bool(0.5),
            service_discovery_type: self.rng.random_bool(0.5),
            build_tool: self.pick(BUILD_TOOLS),
            enable_swagger_codegen: self.rng.random_bool(0.5),
            client_framework: self.pick(CLIENT_FRAMEWORKS),
            use_sass: self.rng.random_bool(0.5),
            client_package_manager: self.pick(CLIENT_PACKAGE_MANAGERS),
            enable_translation,
            native_language,
            selected_languages,
            has_protractor: self.rng.random_bool(0.5),
            has_gatling: self.rng.random_bool(0.5),
            has_cucumber: self.rng.random_bool(0.5),
            ..GeneratorOptions::default()
        }
    }

    fn pick(&mut self, vocabulary: &[&str]) -> String {
        vocabulary
            .choose(&mut self.rng)
            .map(|s| (*s).to_string())
            .unwrap_or_default()
    }
}
