//! Rendering of command results to stdout.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};
use yorc_common::{OutputFormat, RecordId, UsageRecord, SCHEMA_VERSION};
use yorc_core::{Error, TemporalCount, TemporalDistribution, TemporalSeries};
use yorc_store::Category;

/// Result of one command, ready to render.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Ingested {
        id: RecordId,
    },
    Record(Box<UsageRecord>),
    Records(Vec<UsageRecord>),
    Deleted {
        id: RecordId,
    },
    Count {
        count: u64,
    },
    Years {
        since: DateTime<Utc>,
        counts: Vec<TemporalCount>,
    },
    Series {
        unit: &'static str,
        since: DateTime<Utc>,
        counts: TemporalSeries,
    },
    Distribution {
        category: Category,
        since: DateTime<Utc>,
        months: Vec<TemporalDistribution>,
    },
    Seeded {
        count: usize,
    },
}

#[derive(Serialize)]
struct Envelope<'a> {
    schema_version: &'static str,
    command: &'a str,
    data: &'a Report,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    schema_version: &'static str,
    command: &'a str,
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u32,
    kind: &'static str,
    message: String,
}

/// Write a failed command's error in the requested format.
pub fn render_error<W: Write>(
    out: &mut W,
    format: OutputFormat,
    command: &str,
    err: &Error,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let envelope = ErrorEnvelope {
                schema_version: SCHEMA_VERSION,
                command,
                error: ErrorBody {
                    code: err.code(),
                    kind: err.kind(),
                    message: err.to_string(),
                },
            };
            serde_json::to_writer_pretty(&mut *out, &envelope)?;
            writeln!(out)
        }
        OutputFormat::Text => writeln!(out, "yorc: {err}"),
    }
}

/// Write `report` for `command` in the requested format.
pub fn render<W: Write>(
    out: &mut W,
    format: OutputFormat,
    command: &str,
    report: &Report,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let envelope = Envelope {
                schema_version: SCHEMA_VERSION,
                command,
                data: report,
            };
            serde_json::to_writer_pretty(&mut *out, &envelope)?;
            writeln!(out)
        }
        OutputFormat::Text => write_text(out, report),
    }
}

fn write_text<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    match report {
        Report::Ingested { id } => writeln!(out, "ingested record {id}"),
        Report::Deleted { id } => writeln!(out, "deleted record {id}"),
        Report::Count { count } => writeln!(out, "{count}"),
        Report::Seeded { count } => writeln!(out, "seeded {count} synthetic records"),
        Report::Record(record) => write_record(out, record),
        Report::Records(records) => {
            writeln!(out, "{:>8}  {:<20}  {:<12}  {:<12}  {:<10}", "ID", "CREATED", "CLIENT", "TYPE", "BUILD")?;
            for r in records {
                writeln!(
                    out,
                    "{:>8}  {:<20}  {:<12}  {:<12}  {:<10}",
                    r.id,
                    r.creation_date.format("%Y-%m-%d %H:%M:%S"),
                    r.options.client_framework,
                    r.options.application_type,
                    r.options.build_tool,
                )?;
            }
            Ok(())
        }
        Report::Years { counts, .. } => {
            for c in counts {
                writeln!(out, "{}  {:>8}", c.date.format("%Y"), c.count)?;
            }
            Ok(())
        }
        Report::Series { counts, .. } => {
            for (date, count) in counts.iter() {
                writeln!(out, "{date}  {count:>8}")?;
            }
            Ok(())
        }
        Report::Distribution { category, months, .. } => {
            writeln!(out, "by {category}")?;
            for month in months {
                writeln!(out, "{}  {:>8}", month.date.format("%Y-%m"), month.total())?;
                for (value, count) in &month.values {
                    let label = if value.is_empty() { "(none)" } else { value.as_str() };
                    writeln!(out, "  {label:<24}  {count:>8}")?;
                }
            }
            Ok(())
        }
    }
}

fn write_record<W: Write>(out: &mut W, record: &UsageRecord) -> io::Result<()> {
    let o = &record.options;
    writeln!(out, "record {}", record.id)?;
    writeln!(out, "  created:          {}", record.creation_date.to_rfc3339())?;
    match record.owner {
        Some(owner) => writeln!(out, "  owner:            {owner}")?,
        None => writeln!(out, "  owner:            (anonymous)")?,
    }
    writeln!(out, "  jhipster version: {}", o.jhipster_version)?;
    writeln!(out, "  application type: {}", o.application_type)?;
    writeln!(out, "  authentication:   {}", o.authentication_type)?;
    writeln!(out, "  database:         {} / {} / {}", o.database_type, o.dev_database_type, o.prod_database_type)?;
    writeln!(out, "  build tool:       {}", o.build_tool)?;
    writeln!(out, "  client:           {} ({})", o.client_framework, o.client_package_manager)?;
    if !o.selected_languages.is_empty() {
        let languages: Vec<&str> = o.selected_languages.iter().map(String::as_str).collect();
        writeln!(out, "  languages:        {}", languages.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(format: OutputFormat, command: &str, report: &Report) -> String {
        let mut buf = Vec::new();
        render(&mut buf, format, command, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_json_envelope_carries_schema_version() {
        let text = rendered(OutputFormat::Json, "count", &Report::Count { count: 3 });
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["command"], "count");
        assert_eq!(value["data"]["count"], 3);
    }

    #[test]
    fn test_json_error_carries_code_and_kind() {
        let err = Error::NotFound { id: RecordId(9) };
        let mut buf = Vec::new();
        render_error(&mut buf, OutputFormat::Json, "show", &err).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["error"]["code"], 21);
        assert_eq!(value["error"]["kind"], "not_found");
        assert_eq!(value["error"]["message"], "usage record 9 not found");
    }

    #[test]
    fn test_text_count_is_bare_number() {
        assert_eq!(rendered(OutputFormat::Text, "count", &Report::Count { count: 7 }), "7\n");
    }
}
