/// Command line parsing tests for crawdad
use std::path::PathBuf;
use std::time::Duration;

use crawdad::cli::CliArgs;
use crawdad::models::CredentialColumns;

#[test]
fn test_minimal_arguments() {
    let args = CliArgs::try_parse_from(["crawdad", "-u", "http://localhost/login", "-p", "creds.csv"]).unwrap();

    assert_eq!(args.url, "http://localhost/login");
    assert_eq!(args.params, PathBuf::from("creds.csv"));
    assert!(args.credentials.is_none());
    assert!(args.success_body.is_none());
    assert_eq!(args.success_status, 200);
    assert_eq!(args.timeout, Duration::from_secs(10));
    assert_eq!(args.concurrency, 1);
    assert!(!args.quiet);
    assert!(!args.wants_reports());
    assert_eq!(args.output_dir, PathBuf::from("."));
}

#[test]
fn test_all_arguments() {
    let args = CliArgs::try_parse_from([
        "crawdad",
        "--url", "https://target/auth",
        "--params", "sets.csv",
        "-c", "login,secret",
        "-s", "Welcome",
        "--success-status", "302",
        "-t", "3",
        "-j", "4",
        "-q",
        "--csv-report",
        "--json-report",
        "-o", "out",
    ])
    .unwrap();

    assert_eq!(args.credentials, Some(CredentialColumns::new("login", "secret")));
    assert_eq!(args.success_body.as_deref(), Some("Welcome"));
    assert!(args.quiet);
    assert!(args.csv_report && args.json_report && !args.markdown_report);

    let config = args.to_config().unwrap();
    assert_eq!(config.base_url(), "https://target/auth?");
    assert_eq!(config.success_status(), 302);
    assert_eq!(config.timeout(), Duration::from_secs(3));
    assert_eq!(config.concurrency(), 4);
}

#[test]
fn test_missing_url_is_error() {
    assert!(CliArgs::try_parse_from(["crawdad", "-p", "creds.csv"]).is_err());
}

#[test]
fn test_missing_params_is_error() {
    assert!(CliArgs::try_parse_from(["crawdad", "-u", "http://x/"]).is_err());
}

#[test]
fn test_bad_credential_spec_is_error() {
    assert!(CliArgs::try_parse_from(["crawdad", "-u", "http://x/", "-p", "f.csv", "-c", "onlyuser"]).is_err());
}

#[test]
fn test_bad_pattern_fails_config() {
    let args = CliArgs::try_parse_from(["crawdad", "-u", "http://x/", "-p", "f.csv", "-s", "("]).unwrap();
    assert!(args.to_config().is_err());
}
