//! Usage record model.
//!
//! A usage record is one snapshot of a generator configuration, stamped with
//! the instant it was ingested. Records are immutable once persisted.

use crate::id::{OwnerId, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The generator attributes captured by one snapshot.
///
/// Every field has a neutral default so partially populated documents can
/// still be recorded. Text fields are stored verbatim without vocabulary
/// checks; new option values from newer generator versions pass through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    // Environment of the machine that ran the generator.
    pub jhipster_version: String,
    pub git_provider: String,
    pub node_version: String,
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cores: String,
    pub memory: String,
    pub user_language: String,

    // Server side.
    pub application_type: String,
    pub authentication_type: String,
    pub server_port: String,
    pub cache_provider: String,
    pub enable_hibernate_cache: bool,
    pub websocket: bool,
    pub database_type: String,
    pub dev_database_type: String,
    pub prod_database_type: String,
    pub search_engine: bool,
    pub message_broker: bool,
    pub service_discovery_type: bool,
    pub build_tool: String,
    pub enable_swagger_codegen: bool,

    // Client side.
    pub client_framework: String,
    pub use_sass: bool,
    pub client_package_manager: String,

    // Internationalization.
    pub enable_translation: bool,
    pub native_language: String,
    pub selected_languages: BTreeSet<String>,

    // Test frameworks.
    pub has_protractor: bool,
    pub has_gatling: bool,
    pub has_cucumber: bool,
}

/// A record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUsageRecord {
    pub creation_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerId>,
    pub options: GeneratorOptions,
}

impl NewUsageRecord {
    pub fn new(options: GeneratorOptions, creation_date: DateTime<Utc>) -> Self {
        Self {
            creation_date,
            owner: None,
            options,
        }
    }

    /// Attribute the record to an owner.
    pub fn owned_by(mut self, owner: Option<OwnerId>) -> Self {
        self.owner = owner;
        self
    }
}

/// A persisted usage record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: RecordId,
    pub creation_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerId>,
    pub options: GeneratorOptions,
}

impl UsageRecord {
    pub fn from_new(id: RecordId, record: NewUsageRecord) -> Self {
        Self {
            id,
            creation_date: record.creation_date,
            owner: record.owner,
            options: record.options,
        }
    }
}

/// Attributed identity behind one or more records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    /// Login of the linked user account, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}
