// Reporting and output for crawdad
// Text report for the console, plus CSV, Markdown and JSON export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::error::{AuditError, Result};
use crate::models::{AuditSummary, Outcome};

/// One line of the success list
pub fn render_result(outcome: &Outcome) -> String {
    let mut line = format!(
        "Line {} with query string {}",
        outcome.line_number(),
        outcome.request.display_query()
    );
    if let Some(creds) = &outcome.request.credentials {
        line.push_str(&format!(" (credentials {})", creds));
    }
    line
}

/// Render the successful outcomes as a human-readable report.
/// Failed outcomes passed in are ignored.
pub fn render<'a, I>(outcomes: I) -> String
where
    I: IntoIterator<Item = &'a Outcome>,
{
    let lines: Vec<String> = outcomes
        .into_iter()
        .filter(|o| o.succeeded)
        .map(render_result)
        .collect();

    match lines.len() {
        0 => "No success.".to_string(),
        1 => format!("Found 1 success:\n  - {}", lines[0]),
        n => format!("Found {} successes:\n  - {}", n, lines.join("\n  - ")),
    }
}

/// Report with run totals ahead of the success list
pub fn render_summary(summary: &AuditSummary) -> String {
    let mut out = format!(
        "Audited {} parameter sets ({} rejected).\n",
        summary.attempted(),
        summary.rejected.len()
    );
    if summary.cancelled {
        out.push_str("Audit was interrupted; results are partial.\n");
    }
    out.push_str(&render(&summary.outcomes));
    out
}

/// Prefix cells that a spreadsheet would evaluate as a formula
fn escape_formula(field: &str) -> String {
    match field.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t') => format!("'{}", field),
        _ => field.to_string(),
    }
}

fn report_path(dir: &Path, ext: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("crawdad_report_{}.{}", timestamp, ext))
}

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    line: usize,
    query_string: &'a str,
    username: Option<&'a str>,
    password: Option<&'a str>,
    status: Option<u16>,
    succeeded: bool,
    error: Option<&'a str>,
}

impl<'a> From<&'a Outcome> for ExportRecord<'a> {
    fn from(outcome: &'a Outcome) -> Self {
        let creds = outcome.request.credentials.as_ref();
        Self {
            line: outcome.line_number(),
            query_string: &outcome.request.query_string,
            username: creds.map(|c| c.username.as_str()),
            password: creds.map(|c| c.password.as_str()),
            status: outcome.status,
            succeeded: outcome.succeeded,
            error: outcome.error.as_deref(),
        }
    }
}

pub fn export_csv(outcomes: &[Outcome], dir: &Path) -> Result<PathBuf> {
    let path = report_path(dir, "csv");
    let mut w = csv::Writer::from_path(&path)?;

    w.write_record(["line", "query_string", "username", "password", "status", "succeeded", "error"])?;
    for outcome in outcomes {
        let rec = ExportRecord::from(outcome);
        w.write_record(&[
            rec.line.to_string(),
            escape_formula(rec.query_string),
            escape_formula(rec.username.unwrap_or_default()),
            escape_formula(rec.password.unwrap_or_default()),
            rec.status.map(|s| s.to_string()).unwrap_or_default(),
            rec.succeeded.to_string(),
            escape_formula(rec.error.unwrap_or_default()),
        ])?;
    }
    w.flush()?;

    Ok(path)
}

pub fn export_markdown(outcomes: &[Outcome], dir: &Path) -> Result<PathBuf> {
    let path = report_path(dir, "md");
    let mut file = BufWriter::new(File::create(&path)?);

    let successes = outcomes.iter().filter(|o| o.succeeded).count();
    writeln!(file, "# crawdad Report\n")?;
    writeln!(file, "{} of {} parameter sets succeeded.\n", successes, outcomes.len())?;
    writeln!(file, "| Line | Query string | Credentials | Status | Result |")?;
    writeln!(file, "|------|--------------|-------------|--------|--------|")?;
    for outcome in outcomes {
        let creds = outcome
            .request
            .credentials
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();
        let status = outcome.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        let result = if outcome.succeeded { "**SUCCESS**" } else { "failure" };
        writeln!(
            file,
            "| {} | `{}` | {} | {} | {} |",
            outcome.line_number(),
            outcome.request.display_query(),
            creds.replace('|', "\\|"),
            status,
            result
        )?;
    }
    file.flush()?;

    Ok(path)
}

pub fn export_json(outcomes: &[Outcome], dir: &Path) -> Result<PathBuf> {
    let path = report_path(dir, "json");
    let records: Vec<ExportRecord> = outcomes.iter().map(ExportRecord::from).collect();

    let file = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(file, &records)
        .map_err(|e| AuditError::Report(format!("failed to write {}: {}", path.display(), e)))?;

    Ok(path)
}
