// Async HTTP audit engine for crawdad
// Uses reqwest and tokio; one GET per parameter row, bounded by the configured concurrency

use futures::stream::{self, StreamExt};
use reqwest::{redirect, Client};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth;
use crate::config::AuditConfig;
use crate::error::Result;
use crate::models::{AuditSummary, Outcome, ParameterRow, RejectedRow, RequestDescriptor};
use crate::request;
use crate::verdict::{decide_verdict, Verdict};

/// What happened to a single row
#[derive(Debug, Clone)]
pub enum RowResult {
    Recorded(Outcome),
    Rejected(RejectedRow),
}

pub struct AuditEngine {
    pub client: Client,
    config: AuditConfig,
}

impl AuditEngine {
    /// Build the engine and its HTTP client. No cookie store: requests share no state.
    /// Redirects are not followed, the first response is the one classified.
    pub fn new(config: AuditConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .redirect(redirect::Policy::none())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Send the GET for a request and read back status and body
    pub async fn send_request(
        &self,
        request: &RequestDescriptor,
    ) -> std::result::Result<(u16, String), reqwest::Error> {
        let url = self.config.request_url(&request.query_string);
        let req = auth::strategy_for(request.credentials.as_ref()).apply_auth(self.client.get(&url));

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok((status, body))
    }

    /// Build, dispatch and classify one row
    pub async fn audit_row(&self, row: ParameterRow) -> RowResult {
        let line = row.line_number;
        let request = match request::build(&row, &self.config) {
            Ok(request) => request,
            Err(e) => {
                warn!("Skipping parameter set: {}", e);
                return RowResult::Rejected(RejectedRow {
                    line_number: line,
                    reason: e.to_string(),
                });
            }
        };

        match &request.credentials {
            Some(creds) => info!(
                "Line {}: trying with query string: {} (credentials {})",
                line,
                request.display_query(),
                creds
            ),
            None => info!("Line {}: trying with query string: {}", line, request.display_query()),
        }

        let response = self.send_request(&request).await;
        let (status, error) = match &response {
            Ok((status, _)) => (Some(*status), None),
            Err(e) => {
                warn!("Line {}: request failed: {}", line, e);
                (None, Some(e.to_string()))
            }
        };

        let verdict = decide_verdict(
            response.as_ref().map(|(status, body)| (*status, body.as_str())),
            &self.config,
        );
        match verdict {
            Verdict::Success => info!("Line {}: success! Saved result for display.", line),
            Verdict::Failure => debug!("Line {}: failure (status {:?}).", line, status),
        }

        RowResult::Recorded(Outcome {
            row,
            request,
            succeeded: verdict.is_success(),
            status,
            error,
        })
    }

    /// Audit every row, stopping early if `cancel` fires.
    ///
    /// Rows are started in file order. Outcomes are returned sorted by line
    /// number whatever the concurrency, so reports are deterministic.
    pub async fn run(&self, rows: Vec<ParameterRow>, cancel: &CancellationToken) -> AuditSummary {
        let total = rows.len();
        info!(
            "Auditing {} with {} total parameter sets...",
            self.config.base_url(),
            total
        );

        let results = stream::iter(rows)
            .map(|row| self.audit_row(row))
            .buffer_unordered(self.config.concurrency())
            .take_until(cancel.cancelled());
        futures::pin_mut!(results);

        let mut summary = AuditSummary::default();
        while let Some(result) = results.next().await {
            match result {
                RowResult::Recorded(outcome) => summary.outcomes.push(outcome),
                RowResult::Rejected(rejected) => summary.rejected.push(rejected),
            }
        }

        summary.outcomes.sort_by_key(Outcome::line_number);
        summary.rejected.sort_by_key(|r| r.line_number);
        summary.cancelled = cancel.is_cancelled() && summary.attempted() < total;
        if summary.cancelled {
            warn!(
                "Audit interrupted after {} of {} parameter sets.",
                summary.attempted(),
                total
            );
        }
        summary
    }
}
