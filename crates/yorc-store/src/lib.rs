//! Generator usage statistics storage.
//!
//! This crate provides:
//! - The [`Storage`] and [`OwnerResolver`] collaborator traits
//! - A SQLite backend with calendar-grouped count queries
//! - An in-memory backend with the same semantics
//!
//! Grouped queries return raw bucket keys (`YYYY`, `YYYYMM`, `YYYY-MM-DD`,
//! all UTC) ascending. Turning keys into dates is the caller's job.

pub mod error;
pub mod memory;
pub mod model;
pub mod sqlite;
pub mod storage;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use model::{Category, CategoryCount, GroupedCount, LanguageUsage, TemporalUnit};
pub use sqlite::SqliteStore;
pub use storage::{OwnerResolver, Storage};

/// Schema version of the SQLite layout.
pub const SCHEMA_VERSION: u32 = 1;
