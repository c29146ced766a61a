// src/services/transport.rs

//! Retrying search transport.
//!
//! Wraps the issue search endpoint with two stacked retry layers:
//!
//! 1. Bounded transport retry: up to `retry.max_attempts` attempts with
//!    exponential backoff, covering connection failures and the
//!    retryable statuses 429/500/502/503/504.
//! 2. Unbounded application retry: responses that are still rate-limited
//!    or server errors after layer 1 are waited out and re-issued with
//!    no attempt ceiling. A `Retry-After` header is always honored.
//!
//! Any other non-200 status or a non-JSON body is a terminal fetch
//! error, consumed by the caller without further retry.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{RetryConfig, SearchPage};

/// Field list requested for every issue.
pub const ISSUE_FIELDS: &str =
    "summary,status,priority,reporter,assignee,labels,created,updated,description,comment";

/// Statuses retried at the transport layer.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Query parameters for one page request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    /// Filter expression selecting the project in ascending creation order
    pub jql: String,

    /// Pagination offset
    #[serde(rename = "startAt")]
    pub start_at: u64,

    /// Requested page size
    #[serde(rename = "maxResults")]
    pub max_results: u32,

    /// Comma-separated field list
    pub fields: String,
}

impl SearchQuery {
    /// Build the query for one page of a project.
    ///
    /// Ascending creation order keeps the offset cursor stable: issues
    /// created mid-crawl land past the already-consumed prefix.
    pub fn for_project(project: &str, start_at: u64, max_results: u32) -> Self {
        Self {
            jql: format!("project={project} ORDER BY created ASC"),
            start_at,
            max_results,
            fields: ISSUE_FIELDS.to_string(),
        }
    }
}

/// HTTP transport for the issue search endpoint.
pub struct SearchTransport {
    client: Client,
    search_url: String,
    retry: RetryConfig,
}

impl SearchTransport {
    /// Create a transport for the given endpoint.
    pub fn new(client: Client, search_url: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            client,
            search_url: search_url.into(),
            retry,
        }
    }

    /// The endpoint this transport talks to.
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Fetch one page of search results.
    ///
    /// Blocks (asynchronously) through rate limits and server errors;
    /// returns `Err` only for terminal failures.
    pub async fn fetch(&self, query: &SearchQuery) -> Result<SearchPage> {
        loop {
            let resp = self.send_with_retry(query).await?;
            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(&resp)
                    .unwrap_or(Duration::from_millis(self.retry.rate_limit_wait_ms));
                log::warn!(
                    "Rate limited. Waiting {:.1}s before retrying.",
                    wait.as_secs_f64()
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if status.is_server_error() {
                let wait = Duration::from_millis(self.retry.server_error_wait_ms);
                log::warn!(
                    "Server error {}. Retrying in {:.1}s.",
                    status,
                    wait.as_secs_f64()
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if status != StatusCode::OK {
                return Err(AppError::fetch(
                    &self.search_url,
                    format!("unexpected status {status}"),
                ));
            }

            let text = resp.text().await?;
            return serde_json::from_str(&text).map_err(|e| {
                AppError::fetch(&self.search_url, format!("invalid JSON response: {e}"))
            });
        }
    }

    /// Bounded transport-level retry (layer 1).
    ///
    /// Connection failures that outlive the attempt budget become errors;
    /// a still-retryable status after the last attempt is handed back to
    /// the caller for application-level handling.
    async fn send_with_retry(&self, query: &SearchQuery) -> Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            let result = self
                .client
                .get(&self.search_url)
                .header(header::ACCEPT, "application/json")
                .query(query)
                .send()
                .await;

            let attempts_left = attempt + 1 < self.retry.max_attempts;
            match result {
                Ok(resp) if attempts_left && is_retryable_status(resp.status()) => {
                    let mut wait = self.backoff(attempt);
                    if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                        if let Some(after) = retry_after(&resp) {
                            wait = wait.max(after);
                        }
                    }
                    log::debug!(
                        "Transport retry {}/{} after status {} (waiting {:.1}s)",
                        attempt + 1,
                        self.retry.max_attempts,
                        resp.status(),
                        wait.as_secs_f64()
                    );
                    tokio::time::sleep(wait).await;
                }
                Ok(resp) => return Ok(resp),
                Err(e) if attempts_left && (e.is_connect() || e.is_timeout()) => {
                    let wait = self.backoff(attempt);
                    log::debug!(
                        "Transport retry {}/{} after connection error: {} (waiting {:.1}s)",
                        attempt + 1,
                        self.retry.max_attempts,
                        e,
                        wait.as_secs_f64()
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(AppError::Http(e)),
            }
            attempt += 1;
        }
    }

    /// Exponential backoff: base doubling per attempt.
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        Duration::from_millis(self.retry.backoff_base_ms.saturating_mul(factor))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

/// Parse a `Retry-After` header given in seconds.
fn retry_after(resp: &Response) -> Option<Duration> {
    resp.headers()
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
