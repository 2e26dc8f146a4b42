//! SQLite storage backend.
//!
//! # Layout
//!
//! ```text
//! owner           (id, login UNIQUE)
//! usage_record    (id, creation_date, owner_id → owner, <one column per option>)
//! language_usage  (id, record_id → usage_record ON DELETE CASCADE, iso_code)
//! ```
//!
//! `creation_date` is UTC epoch microseconds. Calendar grouping happens in
//! SQL via `strftime(..., 'unixepoch')` over whole seconds so large datasets never leave the
//! database row by row.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};
use yorc_common::{GeneratorOptions, NewUsageRecord, Owner, OwnerId, RecordId, UsageRecord};

use crate::error::{Result, StoreError};
use crate::model::{Category, CategoryCount, GroupedCount, TemporalUnit};
use crate::storage::{normalize_login, OwnerResolver, Storage};
use crate::SCHEMA_VERSION;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS owner (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    login TEXT UNIQUE
);
CREATE TABLE IF NOT EXISTS usage_record (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    creation_date INTEGER NOT NULL,
    owner_id INTEGER REFERENCES owner(id) ON DELETE SET NULL,
    jhipster_version TEXT NOT NULL DEFAULT '',
    git_provider TEXT NOT NULL DEFAULT '',
    node_version TEXT NOT NULL DEFAULT '',
    os TEXT NOT NULL DEFAULT '',
    arch TEXT NOT NULL DEFAULT '',
    cpu TEXT NOT NULL DEFAULT '',
    cores TEXT NOT NULL DEFAULT '',
    memory TEXT NOT NULL DEFAULT '',
    user_language TEXT NOT NULL DEFAULT '',
    application_type TEXT NOT NULL DEFAULT '',
    authentication_type TEXT NOT NULL DEFAULT '',
    server_port TEXT NOT NULL DEFAULT '',
    cache_provider TEXT NOT NULL DEFAULT '',
    enable_hibernate_cache INTEGER NOT NULL DEFAULT 0,
    websocket INTEGER NOT NULL DEFAULT 0,
    database_type TEXT NOT NULL DEFAULT '',
    dev_database_type TEXT NOT NULL DEFAULT '',
    prod_database_type TEXT NOT NULL DEFAULT '',
    search_engine INTEGER NOT NULL DEFAULT 0,
    message_broker INTEGER NOT NULL DEFAULT 0,
    service_discovery_type INTEGER NOT NULL DEFAULT 0,
    build_tool TEXT NOT NULL DEFAULT '',
    enable_swagger_codegen INTEGER NOT NULL DEFAULT 0,
    client_framework TEXT NOT NULL DEFAULT '',
    use_sass INTEGER NOT NULL DEFAULT 0,
    client_package_manager TEXT NOT NULL DEFAULT '',
    enable_translation INTEGER NOT NULL DEFAULT 0,
    native_language TEXT NOT NULL DEFAULT '',
    has_protractor INTEGER NOT NULL DEFAULT 0,
    has_gatling INTEGER NOT NULL DEFAULT 0,
    has_cucumber INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_usage_record_creation_date ON usage_record(creation_date);
CREATE TABLE IF NOT EXISTS language_usage (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id INTEGER NOT NULL REFERENCES usage_record(id) ON DELETE CASCADE,
    iso_code TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_language_usage_record ON language_usage(record_id);
"#;

/// Whole epoch seconds of `creation_date`, floored. A fractional epoch is
/// rounded to the millisecond by SQLite and can cross a day boundary.
const EPOCH_SECONDS_SQL: &str =
    "((creation_date - ((creation_date % 1000000) + 1000000) % 1000000) / 1000000)";

/// Columns read back into a [`UsageRecord`], in `record_from_row` order.
const RECORD_COLUMNS: &str = "id, creation_date, owner_id, \
    jhipster_version, git_provider, node_version, os, arch, cpu, cores, memory, user_language, \
    application_type, authentication_type, server_port, cache_provider, enable_hibernate_cache, \
    websocket, database_type, dev_database_type, prod_database_type, search_engine, \
    message_broker, service_discovery_type, build_tool, enable_swagger_codegen, \
    client_framework, use_sass, client_package_manager, enable_translation, native_language, \
    has_protractor, has_gatling, has_cucumber";

const INSERT_RECORD_SQL: &str = "INSERT INTO usage_record (creation_date, owner_id, \
    jhipster_version, git_provider, node_version, os, arch, cpu, cores, memory, user_language, \
    application_type, authentication_type, server_port, cache_provider, enable_hibernate_cache, \
    websocket, database_type, dev_database_type, prod_database_type, search_engine, \
    message_broker, service_discovery_type, build_tool, enable_swagger_codegen, \
    client_framework, use_sass, client_package_manager, enable_translation, native_language, \
    has_protractor, has_gatling, has_cucumber) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, \
    ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, \
    ?28, ?29, ?30, ?31, ?32, ?33)";

/// Storage backed by a single SQLite connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file, creating parent directories and
    /// the schema as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "opened usage database");
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA_SQL)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn from_micros(micros: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Integer,
            format!("creation_date {micros} out of range").into(),
        )
    })
}

/// Map a `RECORD_COLUMNS` row. Languages are attached separately.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<UsageRecord> {
    let options = GeneratorOptions {
        jhipster_version: row.get(3)?,
        git_provider: row.get(4)?,
        node_version: row.get(5)?,
        os: row.get(6)?,
        arch: row.get(7)?,
        cpu: row.get(8)?,
        cores: row.get(9)?,
        memory: row.get(10)?,
        user_language: row.get(11)?,
        application_type: row.get(12)?,
        authentication_type: row.get(13)?,
        server_port: row.get(14)?,
        cache_provider: row.get(15)?,
        enable_hibernate_cache: row.get(16)?,
        websocket: row.get(17)?,
        database_type: row.get(18)?,
        dev_database_type: row.get(19)?,
        prod_database_type: row.get(20)?,
        search_engine: row.get(21)?,
        message_broker: row.get(22)?,
        service_discovery_type: row.get(23)?,
        build_tool: row.get(24)?,
        enable_swagger_codegen: row.get(25)?,
        client_framework: row.get(26)?,
        use_sass: row.get(27)?,
        client_package_manager: row.get(28)?,
        enable_translation: row.get(29)?,
        native_language: row.get(30)?,
        selected_languages: BTreeSet::new(),
        has_protractor: row.get(31)?,
        has_gatling: row.get(32)?,
        has_cucumber: row.get(33)?,
    };
    Ok(UsageRecord {
        id: RecordId(row.get(0)?),
        creation_date: from_micros(row.get(1)?)?,
        owner: row.get::<_, Option<i64>>(2)?.map(OwnerId),
        options,
    })
}

fn count_from_sql(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

impl Storage for SqliteStore {
    fn insert_record(&self, record: &NewUsageRecord) -> Result<RecordId> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let o = &record.options;
        tx.execute(
            INSERT_RECORD_SQL,
            params![
                to_micros(record.creation_date),
                record.owner.map(|id| id.0),
                o.jhipster_version,
                o.git_provider,
                o.node_version,
                o.os,
                o.arch,
                o.cpu,
                o.cores,
                o.memory,
                o.user_language,
                o.application_type,
                o.authentication_type,
                o.server_port,
                o.cache_provider,
                o.enable_hibernate_cache,
                o.websocket,
                o.database_type,
                o.dev_database_type,
                o.prod_database_type,
                o.search_engine,
                o.message_broker,
                o.service_discovery_type,
                o.build_tool,
                o.enable_swagger_codegen,
                o.client_framework,
                o.use_sass,
                o.client_package_manager,
                o.enable_translation,
                o.native_language,
                o.has_protractor,
                o.has_gatling,
                o.has_cucumber,
            ],
        )?;
        let id = tx.last_insert_rowid();
        {
            let mut insert_language =
                tx.prepare("INSERT INTO language_usage (record_id, iso_code) VALUES (?1, ?2)")?;
            for iso_code in &o.selected_languages {
                insert_language.execute(params![id, iso_code])?;
            }
        }
        tx.commit()?;
        debug!(id, languages = o.selected_languages.len(), "usage record stored");
        Ok(RecordId(id))
    }

    fn find_record(&self, id: RecordId) -> Result<Option<UsageRecord>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {RECORD_COLUMNS} FROM usage_record WHERE id = ?1");
        let record = conn
            .query_row(&sql, params![id.0], record_from_row)
            .optional()?;
        let Some(mut record) = record else {
            return Ok(None);
        };
        let mut stmt =
            conn.prepare("SELECT iso_code FROM language_usage WHERE record_id = ?1 ORDER BY iso_code")?;
        record.options.selected_languages = stmt
            .query_map(params![id.0], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        Ok(Some(record))
    }

    fn list_records(&self) -> Result<Vec<UsageRecord>> {
        let conn = self.conn()?;

        let mut languages: HashMap<i64, BTreeSet<String>> = HashMap::new();
        let mut lang_stmt = conn.prepare("SELECT record_id, iso_code FROM language_usage")?;
        let rows = lang_stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (record_id, iso_code) = row?;
            languages.entry(record_id).or_default().insert(iso_code);
        }

        let sql = format!("SELECT {RECORD_COLUMNS} FROM usage_record ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let mut records = stmt
            .query_map([], record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for record in &mut records {
            if let Some(codes) = languages.remove(&record.id.0) {
                record.options.selected_languages = codes;
            }
        }
        Ok(records)
    }

    fn delete_record(&self, id: RecordId) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM usage_record WHERE id = ?1", params![id.0])?;
        debug!(id = id.0, deleted, "usage record delete");
        Ok(deleted > 0)
    }

    fn count_all(&self) -> Result<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM usage_record", [], |row| row.get(0))?;
        Ok(count_from_sql(count))
    }

    fn grouped_count(&self, unit: TemporalUnit, since: DateTime<Utc>) -> Result<Vec<GroupedCount>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT strftime('{fmt}', {EPOCH_SECONDS_SQL}, 'unixepoch') AS bucket, COUNT(*)
             FROM usage_record
             WHERE creation_date > ?1
             GROUP BY bucket
             ORDER BY bucket",
            fmt = unit.key_format()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![to_micros(since)], |row| {
            Ok(GroupedCount {
                key: row.get(0)?,
                count: count_from_sql(row.get(1)?),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn grouped_count_by_category(
        &self,
        category: Category,
        since: DateTime<Utc>,
    ) -> Result<Vec<CategoryCount>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT strftime('%Y%m', {EPOCH_SECONDS_SQL}, 'unixepoch') AS bucket, {col}, COUNT(*)
             FROM usage_record
             WHERE creation_date > ?1
             GROUP BY bucket, {col}
             ORDER BY bucket, {col}",
            col = category.column()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![to_micros(since)], |row| {
            Ok(CategoryCount {
                month_key: row.get(0)?,
                value: row.get(1)?,
                count: count_from_sql(row.get(2)?),
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn language_usage(&self, id: RecordId) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT iso_code FROM language_usage WHERE record_id = ?1 ORDER BY iso_code")?;
        let rows = stmt.query_map(params![id.0], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl OwnerResolver for SqliteStore {
    fn find_or_create_owner(&self, login: Option<&str>) -> Result<Option<Owner>> {
        let Some(login) = normalize_login(login) else {
            return Ok(None);
        };
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO owner (login) VALUES (?1) ON CONFLICT(login) DO NOTHING",
            params![login],
        )?;
        let id: i64 = tx.query_row("SELECT id FROM owner WHERE login = ?1", params![login], |row| {
            row.get(0)
        })?;
        tx.commit()?;
        Ok(Some(Owner {
            id: OwnerId(id),
            login: Some(login.to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_micros_round_trip() {
        let t = at(2024, 3, 5);
        assert_eq!(from_micros(to_micros(t)).unwrap(), t);
    }

    #[test]
    fn test_insert_and_find() {
        let store = SqliteStore::open_in_memory().unwrap();
        let options = GeneratorOptions {
            client_framework: "react".to_string(),
            use_sass: true,
            selected_languages: ["fr", "en"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let new = NewUsageRecord::new(options.clone(), at(2024, 3, 5));
        let id = store.insert_record(&new).unwrap();

        let found = store.find_record(id).unwrap().unwrap();
        assert_eq!(found.options, options);
        assert_eq!(found.creation_date, at(2024, 3, 5));
        assert_eq!(store.language_usage(id).unwrap(), vec!["en", "fr"]);
    }

    #[test]
    fn test_missing_record_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.find_record(RecordId(99)).unwrap().is_none());
    }

    #[test]
    fn test_year_keys_are_four_digits() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_record(&NewUsageRecord::new(GeneratorOptions::default(), at(2023, 12, 31)))
            .unwrap();
        let rows = store
            .grouped_count(TemporalUnit::Year, at(2000, 1, 1))
            .unwrap();
        assert_eq!(
            rows,
            vec![GroupedCount {
                key: "2023".to_string(),
                count: 1
            }]
        );
    }
}
