//! Generator usage statistics core.
//!
//! Ingests generator configuration snapshots and reports how they are
//! distributed over time:
//! - [`schema`]: tolerant decoding of a submitted document into options
//! - [`bucket`]: calendar bucket keys to canonical dates
//! - [`ingest`]: decode, stamp, attribute, persist
//! - [`aggregate`]: per-year, per-month, per-day and per-category counts
//! - [`synthetic`]: seedable fake records for local dashboards

pub mod aggregate;
pub mod bucket;
pub mod error;
pub mod exit_codes;
pub mod ingest;
pub mod logging;
pub mod schema;
pub mod service;
pub mod session;
pub mod synthetic;

#[cfg(test)]
mod testing;

pub use aggregate::{TemporalDistribution, TemporalSeries};
pub use bucket::TemporalCount;
pub use error::{Error, Result};
pub use exit_codes::ExitCode;
pub use service::UsageService;
pub use session::{Anonymous, Clock, FixedClock, SessionContext, StaticLogin, SystemClock};
