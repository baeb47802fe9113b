pub mod error;
pub mod models;
pub mod config;
pub mod loader;
pub mod request;
pub mod auth;
pub mod verdict;
pub mod engine;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use error::{AuditError, Result};
pub use models::*;
pub use config::{AuditConfig, AuditConfigBuilder};
pub use loader::{load, ParameterTable};
pub use request::build;
pub use auth::{AuthStrategy, NoAuth};
pub use verdict::{classify, decide_verdict, Verdict};
pub use engine::{AuditEngine, RowResult};
pub use reporting::{export_csv, export_json, export_markdown, render, render_summary};
pub use cli::{build_cli, CliArgs};
