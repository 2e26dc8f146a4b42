//! `yorc` command-line entry point.

mod cli;
mod render;

use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use yorc_config::{resolve_config, ConfigPaths, Settings};
use yorc_core::synthetic::{SyntheticGenerator, SyntheticParams};
use yorc_core::{logging, Error, ExitCode, Result, StaticLogin, SystemClock, UsageService};
use yorc_store::SqliteStore;

use cli::{Cli, Commands, StatsArgs, StatsUnit};
use render::{render, render_error, Report};

type Service = UsageService<Arc<SqliteStore>, Arc<SqliteStore>, SystemClock>;

fn main() {
    let cli = Cli::parse();
    let format = cli.format;
    let command = cli.command.name();
    let code = match run(cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let mut stderr = io::stderr().lock();
            if render_error(&mut stderr, format, command, &err).is_err() {
                eprintln!("yorc: {err}");
            }
            err.exit_code()
        }
    };
    std::process::exit(code.as_i32());
}

fn run(cli: Cli) -> Result<()> {
    let resolved = resolve_config(&ConfigPaths::discover(cli.config.clone()))?;
    let mut settings = resolved.settings;
    if let Some(db) = &cli.db {
        settings.database_path = db.clone();
    }
    if let Err(err) = logging::init(&settings.log) {
        eprintln!("yorc: logging disabled: {err}");
    }

    let store = Arc::new(SqliteStore::open(&settings.database_path)?);
    let service = UsageService::with_store(store);

    let command = cli.command.name();
    let report = execute(&service, &settings, &cli)?;
    let mut stdout = io::stdout().lock();
    render(&mut stdout, cli.format, command, &report)?;
    Ok(())
}

fn execute(service: &Service, settings: &Settings, cli: &Cli) -> Result<Report> {
    match &cli.command {
        Commands::Ingest { file } => {
            let raw = read_document(file.as_deref())?;
            let id = match &cli.login {
                Some(login) => service.ingest(&raw, &StaticLogin(login.clone()))?,
                None => service.ingest(&raw, &yorc_core::Anonymous)?,
            };
            Ok(Report::Ingested { id })
        }
        Commands::Show { id } => Ok(Report::Record(Box::new(service.get(*id)?))),
        Commands::List => Ok(Report::Records(service.find_all()?)),
        Commands::Delete { id } => {
            if service.delete(*id)? {
                Ok(Report::Deleted { id: *id })
            } else {
                Err(Error::NotFound { id: *id })
            }
        }
        Commands::Count => Ok(Report::Count {
            count: service.count_all()?,
        }),
        Commands::Stats(args) => stats(service, settings, args),
        Commands::Seed { count, seed, days } => {
            let params = SyntheticParams {
                count: *count,
                window_days: *days,
                end: Utc::now(),
            };
            let mut generator = SyntheticGenerator::new(StdRng::seed_from_u64(*seed), params);
            for record in generator.generate() {
                service.save(&record)?;
            }
            info!(count, seed, days, "seeded synthetic records");
            Ok(Report::Seeded { count: *count })
        }
    }
}

fn stats(service: &Service, settings: &Settings, args: &StatsArgs) -> Result<Report> {
    let since = window_start(args, settings.default_window_days, Utc::now())?;
    Ok(match args.unit {
        StatsUnit::Year => Report::Years {
            since,
            counts: service.count_by_year(since)?,
        },
        StatsUnit::Month => Report::Series {
            unit: "month",
            since,
            counts: service.count_by_month(since)?,
        },
        StatsUnit::Day => Report::Series {
            unit: "day",
            since,
            counts: service.count_by_day(since)?,
        },
        StatsUnit::Category => Report::Distribution {
            category: args.category,
            since,
            months: service.count_by_category_per_month(since, args.category)?,
        },
    })
}

/// Lower bound of a stats window: `--since`, else `now - days`.
fn window_start(args: &StatsArgs, default_days: u32, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Some(since) = args.since {
        return Ok(since);
    }
    let days = args.days.unwrap_or(default_days);
    if days == 0 {
        return Err(Error::InvalidArgument("--days must be at least 1".to_string()));
    }
    Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "a {days}-day window reaches before the earliest representable date"
            ))
        })
}

fn read_document(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use yorc_store::Category;

    fn args(since: Option<DateTime<Utc>>, days: Option<u32>) -> StatsArgs {
        StatsArgs {
            unit: StatsUnit::Month,
            since,
            days,
            category: Category::ClientFramework,
        }
    }

    #[test]
    fn test_window_prefers_explicit_since() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let since = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(window_start(&args(Some(since), None), 365, now).unwrap(), since);
    }

    #[test]
    fn test_window_falls_back_to_configured_days() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            window_start(&args(None, None), 10, now).unwrap(),
            now - Duration::days(10)
        );
        assert_eq!(
            window_start(&args(None, Some(2)), 10, now).unwrap(),
            now - Duration::days(2)
        );
    }

    #[test]
    fn test_unrepresentable_window_is_invalid_argument() {
        let err = window_start(&args(None, Some(u32::MAX)), 10, Utc::now()).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::InvalidArgument);
        let err = window_start(&args(None, None), u32::MAX, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("4294967295-day window"));
    }

    #[test]
    fn test_zero_day_window_is_rejected() {
        let now = Utc::now();
        let err = window_start(&args(None, Some(0)), 10, now).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::InvalidArgument);
    }
}
