// Request building for crawdad
// Turns one parameter row into a query string and optional basic auth credentials

use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::models::{Credentials, ParameterRow, RequestDescriptor};

/// Field value that leaves the parameter out of the request
pub const EXCLUDE_MARKER: &str = "#";

/// Field value that sends the parameter as a bare key
pub const FLAG_MARKER: &str = "%";

/// Build the request for a row.
///
/// Pairs valued `#` are dropped. When credential columns are configured their
/// values become the basic auth credentials and the columns are removed from
/// the query string. Pairs valued `%` are sent as a bare key. Keys and values
/// are used verbatim.
pub fn build(row: &ParameterRow, config: &AuditConfig) -> Result<RequestDescriptor> {
    let columns = config.credential_columns();

    let credentials = match columns {
        Some(cols) => Some(Credentials {
            username: required_field(row, &cols.user_field)?.to_string(),
            password: required_field(row, &cols.pass_field)?.to_string(),
        }),
        None => None,
    };

    let query_string = row
        .fields()
        .iter()
        .filter(|(_, value)| value != EXCLUDE_MARKER)
        .filter(|(key, _)| columns.map_or(true, |cols| !cols.contains(key)))
        .map(|(key, value)| encode_pair(key, value))
        .collect::<Vec<_>>()
        .join("&");

    Ok(RequestDescriptor {
        query_string,
        credentials,
    })
}

fn required_field<'a>(row: &'a ParameterRow, field: &str) -> Result<&'a str> {
    row.get(field).ok_or_else(|| AuditError::MissingField {
        line_number: row.line_number,
        field: field.to_string(),
    })
}

fn encode_pair(key: &str, value: &str) -> String {
    if value == FLAG_MARKER {
        key.to_string()
    } else {
        format!("{}={}", key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_pair_flag_and_value() {
        assert_eq!(encode_pair("debug", "%"), "debug");
        assert_eq!(encode_pair("page", "2"), "page=2");
        assert_eq!(encode_pair("empty", ""), "empty=");
    }
}
