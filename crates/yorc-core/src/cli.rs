//! Command-line surface of `yorc`.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use yorc_common::{OutputFormat, RecordId};
use yorc_store::Category;

#[derive(Parser, Debug)]
#[command(name = "yorc")]
#[command(version, about = "Generator usage statistics: ingest configuration snapshots and report trends")]
pub struct Cli {
    /// Path to config file (default: $XDG_CONFIG_HOME/yorc_stats/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overriding the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Login to attribute ingested records to (anonymous when unset)
    #[arg(long, global = true, env = "YORC_LOGIN")]
    pub login: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest one generator configuration document
    Ingest {
        /// JSON file to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
    /// Show one usage record
    Show { id: RecordId },
    /// List all usage records
    List,
    /// Delete one usage record
    Delete { id: RecordId },
    /// Count all usage records
    Count,
    /// Report record counts over time
    Stats(StatsArgs),
    /// Fill the database with synthetic records
    #[command(hide = true)]
    Seed {
        #[arg(long, default_value_t = 3000)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Spread creation dates over this many days before now
        #[arg(long, default_value_t = 700)]
        days: u32,
    },
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[arg(value_enum)]
    pub unit: StatsUnit,

    /// Count records created strictly after this instant (RFC 3339)
    #[arg(long)]
    pub since: Option<DateTime<Utc>>,

    /// Count records from the last N days (default: configured window)
    #[arg(long, conflicts_with = "since")]
    pub days: Option<u32>,

    /// Attribute to split monthly counts by (`category` only)
    #[arg(long, default_value = "client-framework")]
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsUnit {
    Year,
    Month,
    Day,
    Category,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Ingest { .. } => "ingest",
            Commands::Show { .. } => "show",
            Commands::List => "list",
            Commands::Delete { .. } => "delete",
            Commands::Count => "count",
            Commands::Stats(_) => "stats",
            Commands::Seed { .. } => "seed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stats_parses_since_and_category() {
        let cli = Cli::try_parse_from([
            "yorc",
            "--format",
            "json",
            "stats",
            "category",
            "--since",
            "2024-01-01T00:00:00Z",
            "--category",
            "buildTool",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Stats(args) => {
                assert_eq!(args.unit, StatsUnit::Category);
                assert_eq!(args.category, Category::BuildTool);
                assert!(args.since.is_some());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_since_and_days_conflict() {
        let err = Cli::try_parse_from([
            "yorc",
            "stats",
            "month",
            "--since",
            "2024-01-01T00:00:00Z",
            "--days",
            "3",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
