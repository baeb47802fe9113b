// Command line surface for crawdad
// Uses clap's builder API; turns raw arguments into validated values and an AuditConfig

use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::config::{AuditConfig, DEFAULT_CONCURRENCY, DEFAULT_SUCCESS_STATUS, DEFAULT_TIMEOUT_SECS};
use crate::error::{AuditError, Result};
use crate::models::CredentialColumns;

pub fn build_cli() -> Command {
    Command::new("crawdad")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Audit password security of services that authenticate over HTTP(S) GET or basic auth")
        .after_help("EXAMPLES:\n  crawdad -u http://localhost:8080/login -p creds.csv -c user,pass\n  crawdad -u https://api.local/feature -p flags.csv -s '\\{\"ok\":true' -j 8 --csv-report\n\nPARAMETER FILE:\n  First line holds the field names. A value of # leaves the field out of the\n  request, a value of % sends the field as a bare flag.")
        .arg(Arg::new("url")
            .short('u')
            .long("url")
            .required(true)
            .num_args(1)
            .help("Base URL of the target; '?' is appended if missing"))
        .arg(Arg::new("params")
            .short('p')
            .long("params")
            .required(true)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("Path to the comma-separated parameter set file"))
        .arg(Arg::new("credentials")
            .short('c')
            .long("credentials")
            .num_args(1)
            .value_name("USER_FIELD,PASS_FIELD")
            .help("Send these two fields as HTTP basic auth instead of query parameters"))
        .arg(Arg::new("success_body")
            .short('s')
            .long("success-body")
            .num_args(1)
            .help("Regex the response body must match from its start (default: .*)"))
        .arg(Arg::new("success_status")
            .long("success-status")
            .num_args(1)
            .value_parser(value_parser!(u16))
            .default_value("200")
            .help("Status code counted as success"))
        .arg(Arg::new("timeout")
            .short('t')
            .long("timeout")
            .num_args(1)
            .value_parser(value_parser!(u64))
            .default_value("10")
            .help("Per-request timeout in seconds"))
        .arg(Arg::new("concurrency")
            .short('j')
            .long("concurrency")
            .num_args(1)
            .value_parser(value_parser!(usize))
            .default_value("1")
            .help("Number of requests in flight at once"))
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .help("Suppress the banner and informational output"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .conflicts_with("quiet")
            .help("Debug logging"))
        .arg(Arg::new("csv_report")
            .long("csv-report")
            .action(ArgAction::SetTrue)
            .help("Write a CSV report of every outcome"))
        .arg(Arg::new("markdown_report")
            .long("markdown-report")
            .action(ArgAction::SetTrue)
            .help("Write a Markdown report of every outcome"))
        .arg(Arg::new("json_report")
            .long("json-report")
            .action(ArgAction::SetTrue)
            .help("Write a JSON report of every outcome"))
        .arg(Arg::new("output_dir")
            .short('o')
            .long("output-dir")
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .default_value(".")
            .help("Directory for report files"))
}

/// Validated command line values
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub url: String,
    pub params: PathBuf,
    pub credentials: Option<CredentialColumns>,
    pub success_body: Option<String>,
    pub success_status: u16,
    pub timeout: Duration,
    pub concurrency: usize,
    pub quiet: bool,
    pub verbose: bool,
    pub csv_report: bool,
    pub markdown_report: bool,
    pub json_report: bool,
    pub output_dir: PathBuf,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let required = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .ok_or_else(|| AuditError::Config(format!("missing --{}", id)))
        };

        let credentials = matches
            .get_one::<String>("credentials")
            .map(|s| s.parse::<CredentialColumns>())
            .transpose()
            .map_err(AuditError::Config)?;

        Ok(Self {
            url: required("url")?,
            params: matches
                .get_one::<PathBuf>("params")
                .cloned()
                .ok_or_else(|| AuditError::Config("missing --params".to_string()))?,
            credentials,
            success_body: matches.get_one::<String>("success_body").cloned(),
            success_status: *matches.get_one::<u16>("success_status").unwrap_or(&DEFAULT_SUCCESS_STATUS),
            timeout: Duration::from_secs(*matches.get_one::<u64>("timeout").unwrap_or(&DEFAULT_TIMEOUT_SECS)),
            concurrency: *matches.get_one::<usize>("concurrency").unwrap_or(&DEFAULT_CONCURRENCY),
            quiet: matches.get_flag("quiet"),
            verbose: matches.get_flag("verbose"),
            csv_report: matches.get_flag("csv_report"),
            markdown_report: matches.get_flag("markdown_report"),
            json_report: matches.get_flag("json_report"),
            output_dir: matches
                .get_one::<PathBuf>("output_dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Parse from an explicit argument list (first item is the binary name)
    pub fn try_parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = build_cli()
            .try_get_matches_from(args)
            .map_err(|e| AuditError::Config(e.to_string()))?;
        Self::from_matches(&matches)
    }

    pub fn to_config(&self) -> Result<AuditConfig> {
        AuditConfig::builder(self.url.clone())
            .credential_columns(self.credentials.clone())
            .success_status(self.success_status)
            .success_body(self.success_body.clone())
            .timeout(self.timeout)
            .concurrency(self.concurrency)
            .build()
    }

    pub fn wants_reports(&self) -> bool {
        self.csv_report || self.markdown_report || self.json_report
    }
}
