//! Generator usage statistics: common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Record and owner identifiers
//! - The usage record model
//! - The decoder error type
//! - Output format and schema versioning

pub mod error;
pub mod id;
pub mod output;
pub mod record;
pub mod schema;

pub use error::ParseError;
pub use id::{OwnerId, RecordId};
pub use output::OutputFormat;
pub use record::{GeneratorOptions, NewUsageRecord, Owner, UsageRecord};
pub use schema::SCHEMA_VERSION;
