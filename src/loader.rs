// Parameter table loader for crawdad
// Reads the comma-separated parameter file into ordered rows, header first

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::error::{AuditError, Result};
use crate::models::ParameterRow;

/// Rows loaded from a parameter file, plus the lines that were skipped
#[derive(Debug, Default)]
pub struct ParameterTable {
    pub headers: Vec<String>,
    pub rows: Vec<ParameterRow>,
    pub skipped: Vec<AuditError>,
}

impl ParameterTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a parameter file. Failing to open or read it is fatal; malformed rows are not.
pub fn load(path: impl AsRef<Path>) -> Result<ParameterTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!("Loading parameter sets from {}", path.display());
    from_reader(file)
}

/// Parse a parameter table from any reader.
///
/// Quotes carry no meaning: every line is split on commas by itself, so a
/// stray `"` in a password cannot run into the following lines.
pub fn from_reader<R: Read>(reader: R) -> Result<ParameterTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = ParameterTable {
        headers,
        ..ParameterTable::default()
    };

    if table.headers.iter().all(String::is_empty) {
        warn!("Parameter file is empty, nothing to audit.");
        table.headers.clear();
        return Ok(table);
    }

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let err = AuditError::from(e);
                if !err.is_recoverable() {
                    return Err(err);
                }
                warn!("Skipping unreadable line in parameter file: {}", err);
                table.skipped.push(err);
                continue;
            }
        };

        let line_number = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.len() != table.headers.len() {
            let err = AuditError::Format {
                line_number,
                expected: table.headers.len(),
                found: record.len(),
            };
            warn!("Skipping {}.", err);
            table.skipped.push(err);
            continue;
        }

        table.rows.push(ParameterRow::from_pairs(
            line_number,
            table.headers.iter().cloned().zip(record.iter().map(str::to_string)),
        ));
    }

    Ok(table)
}
