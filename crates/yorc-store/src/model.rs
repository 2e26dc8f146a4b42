//! Query vocabulary shared by the storage backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use yorc_common::{GeneratorOptions, RecordId};

/// Calendar granularity of a grouped count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalUnit {
    Year,
    Month,
    Day,
}

impl TemporalUnit {
    /// strftime pattern producing this unit's raw bucket key.
    ///
    /// The same pattern is understood by chrono and SQLite.
    pub fn key_format(self) -> &'static str {
        match self {
            TemporalUnit::Year => "%Y",
            TemporalUnit::Month => "%Y%m",
            TemporalUnit::Day => "%Y-%m-%d",
        }
    }

    /// Raw bucket key of a timestamp.
    pub fn key_of(self, at: DateTime<Utc>) -> String {
        at.format(self.key_format()).to_string()
    }
}

impl fmt::Display for TemporalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalUnit::Year => write!(f, "year"),
            TemporalUnit::Month => write!(f, "month"),
            TemporalUnit::Day => write!(f, "day"),
        }
    }
}

/// Categorical attribute that can partition a monthly count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    ClientFramework,
    ApplicationType,
    AuthenticationType,
    CacheProvider,
    DatabaseType,
    ProdDatabaseType,
    BuildTool,
    ClientPackageManager,
    JhipsterVersion,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::ClientFramework,
        Category::ApplicationType,
        Category::AuthenticationType,
        Category::CacheProvider,
        Category::DatabaseType,
        Category::ProdDatabaseType,
        Category::BuildTool,
        Category::ClientPackageManager,
        Category::JhipsterVersion,
    ];

    /// Column holding this attribute. Fixed strings only.
    pub fn column(self) -> &'static str {
        match self {
            Category::ClientFramework => "client_framework",
            Category::ApplicationType => "application_type",
            Category::AuthenticationType => "authentication_type",
            Category::CacheProvider => "cache_provider",
            Category::DatabaseType => "database_type",
            Category::ProdDatabaseType => "prod_database_type",
            Category::BuildTool => "build_tool",
            Category::ClientPackageManager => "client_package_manager",
            Category::JhipsterVersion => "jhipster_version",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ClientFramework => "client-framework",
            Category::ApplicationType => "application-type",
            Category::AuthenticationType => "authentication-type",
            Category::CacheProvider => "cache-provider",
            Category::DatabaseType => "database-type",
            Category::ProdDatabaseType => "prod-database-type",
            Category::BuildTool => "build-tool",
            Category::ClientPackageManager => "client-package-manager",
            Category::JhipsterVersion => "jhipster-version",
        }
    }

    /// Value of this attribute on a record.
    pub fn value_of(self, options: &GeneratorOptions) -> &str {
        match self {
            Category::ClientFramework => &options.client_framework,
            Category::ApplicationType => &options.application_type,
            Category::AuthenticationType => &options.authentication_type,
            Category::CacheProvider => &options.cache_provider,
            Category::DatabaseType => &options.database_type,
            Category::ProdDatabaseType => &options.prod_database_type,
            Category::BuildTool => &options.build_tool,
            Category::ClientPackageManager => &options.client_package_manager,
            Category::JhipsterVersion => &options.jhipster_version,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the kebab-case name or the generator's camelCase option name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().replace('-', "") == normalized)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// One row of a calendar-grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedCount {
    /// Raw bucket key, formatted per [`TemporalUnit::key_format`].
    pub key: String,
    pub count: u64,
}

/// One row of a month × category grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Raw `YYYYMM` month key.
    pub month_key: String,
    pub value: String,
    pub count: u64,
}

/// Language row owned by a usage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageUsage {
    pub record_id: RecordId,
    pub iso_code: String,
}
