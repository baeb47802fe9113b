// Core data models for crawdad
// Rows read from the parameter file, the requests built from them and their outcomes

use std::collections::HashMap;
use std::fmt;

/// One data line of the parameter file.
///
/// Fields keep the header's order for query string construction and are
/// indexed by name for credential lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRow {
    pub line_number: usize,
    fields: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ParameterRow {
    /// Create an empty row for the given 1-based source line
    pub fn new(line_number: usize) -> Self {
        Self {
            line_number,
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a row from (name, value) pairs in declared order
    pub fn from_pairs<I, K, V>(line_number: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new(line_number);
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    /// Insert a field. A repeated name keeps its first position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&i) => self.fields[i].1 = value,
            None => {
                self.index.insert(name.clone(), self.fields.len());
                self.fields.push((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.fields[i].1.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The pair of field names holding basic auth username and password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialColumns {
    pub user_field: String,
    pub pass_field: String,
}

impl CredentialColumns {
    pub fn new(user_field: impl Into<String>, pass_field: impl Into<String>) -> Self {
        Self {
            user_field: user_field.into(),
            pass_field: pass_field.into(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.user_field == name || self.pass_field == name
    }
}

impl std::str::FromStr for CredentialColumns {
    type Err = String;

    /// Parse `user_field,pass_field`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [user, pass] if !user.is_empty() && !pass.is_empty() => Ok(Self::new(*user, *pass)),
            _ => Err(format!(
                "expected two comma-separated field names (e.g. user,pass), got '{}'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.username, self.password)
    }
}

/// Everything needed to issue the GET request for one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub query_string: String,
    pub credentials: Option<Credentials>,
}

impl RequestDescriptor {
    pub const BLANK_QUERY: &'static str = "<blank>";

    /// Query string for display, with a placeholder when no parameters are sent
    pub fn display_query(&self) -> &str {
        if self.query_string.is_empty() {
            Self::BLANK_QUERY
        } else {
            &self.query_string
        }
    }
}

/// Recorded result of auditing one row
#[derive(Debug, Clone)]
pub struct Outcome {
    pub row: ParameterRow,
    pub request: RequestDescriptor,
    pub succeeded: bool,
    /// Status received, absent when the request never got a response
    pub status: Option<u16>,
    /// Transport failure text, if any
    pub error: Option<String>,
}

impl Outcome {
    pub fn line_number(&self) -> usize {
        self.row.line_number
    }
}

/// A row that could not be turned into a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line_number: usize,
    pub reason: String,
}

/// All results of a single audit run
#[derive(Debug, Clone, Default)]
pub struct AuditSummary {
    /// Dispatched rows, sorted by line number
    pub outcomes: Vec<Outcome>,
    pub rejected: Vec<RejectedRow>,
    /// Set when the run was interrupted before every row finished
    pub cancelled: bool,
}

impl AuditSummary {
    pub fn successes(&self) -> Vec<&Outcome> {
        self.outcomes.iter().filter(|o| o.succeeded).collect()
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len() + self.rejected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_keeps_declared_order() {
        let row = ParameterRow::from_pairs(2, vec![("b", "1"), ("a", "2"), ("c", "3")]);
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(row.get("a"), Some("2"));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn repeated_name_keeps_first_position_last_value() {
        let row = ParameterRow::from_pairs(3, vec![("x", "1"), ("y", "2"), ("x", "3")]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.fields()[0], ("x".to_string(), "3".to_string()));
    }

    #[test]
    fn credential_columns_parse() {
        let cols: CredentialColumns = "user, pass".parse().unwrap();
        assert_eq!(cols, CredentialColumns::new("user", "pass"));
        assert!(cols.contains("pass"));
        assert!("user".parse::<CredentialColumns>().is_err());
        assert!("a,b,c".parse::<CredentialColumns>().is_err());
        assert!("a,".parse::<CredentialColumns>().is_err());
    }

    #[test]
    fn blank_query_placeholder() {
        let request = RequestDescriptor::default();
        assert_eq!(request.display_query(), "<blank>");
    }
}
