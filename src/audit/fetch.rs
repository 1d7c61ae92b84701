//! Paginated retrieval of audit-log records.
//!
//! Pages are requested strictly one after another with `skip`/`top`
//! pagination. A page shorter than `top` (including an empty one) ends the
//! scan. Each page gets a bounded number of attempts with exponential
//! backoff; if any page runs out of attempts the whole fetch fails, and no
//! partial result is returned.

use super::types::{AuditQuery, PageRequest, RawRecord};
use crate::utils::progress::ProgressBar;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// HTTP statuses treated as transient
pub const RETRYABLE_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// Failure of a single page attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Rate limiting or a server-side error
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// Any other non-success status; retrying will not help
    #[error("server returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Connection, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Body was not an object with a `data` array of records
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("page size must be at least 1")]
    InvalidPageSize,
}

impl FetchError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        if RETRYABLE_STATUSES.contains(&status) {
            FetchError::Status(status)
        } else {
            FetchError::Rejected { status, body }
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FetchError::Rejected { .. } | FetchError::InvalidPageSize
        )
    }
}

/// Terminal failure: a page could not be fetched within the retry budget.
#[derive(Debug, Error)]
#[error("failed to fetch page skip={skip} top={top} after {attempts} attempt(s): {last_error}")]
pub struct FetchFailure {
    pub skip: usize,
    pub top: usize,
    pub attempts: u32,
    #[source]
    pub last_error: FetchError,
}

/// Sends one page request and returns that page's records.
///
/// Implementations do no retrying of their own.
#[async_trait]
pub trait PageTransport {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<RawRecord>, FetchError>;
}

/// Retry budget and pagination settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Records requested per page
    pub page_size: usize,
    /// Total attempts per page, first one included
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles after each further one
    pub initial_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// What to do after one attempt.
#[derive(Debug)]
enum Step {
    Done(Vec<RawRecord>),
    Wait(Duration),
    GiveUp(FetchError),
}

/// Attempt counter and current backoff for one page.
#[derive(Debug)]
struct RetryState {
    attempt: u32,
    max_attempts: u32,
    backoff: Duration,
}

impl RetryState {
    fn new(policy: &FetchPolicy) -> Self {
        Self {
            attempt: 0,
            max_attempts: policy.max_attempts.max(1),
            backoff: policy.initial_backoff,
        }
    }

    fn record(&mut self, outcome: Result<Vec<RawRecord>, FetchError>) -> Step {
        self.attempt += 1;
        match outcome {
            Ok(records) => Step::Done(records),
            Err(e) if !e.is_retryable() || self.attempt >= self.max_attempts => Step::GiveUp(e),
            Err(e) => {
                warn!(
                    error = %e,
                    attempt = self.attempt,
                    backoff_ms = self.backoff.as_millis() as u64,
                    "page request failed, backing off"
                );
                let wait = self.backoff;
                self.backoff = self.backoff.saturating_mul(2);
                Step::Wait(wait)
            }
        }
    }
}

/// Fetch a single page, retrying transient failures.
pub async fn request_page<T>(
    transport: &T,
    query: &AuditQuery,
    skip: usize,
    policy: &FetchPolicy,
) -> Result<Vec<RawRecord>, FetchFailure>
where
    T: PageTransport + Sync + ?Sized,
{
    let request = query.page(skip, policy.page_size);
    let mut state = RetryState::new(policy);

    loop {
        let outcome = transport.fetch_page(&request).await;
        match state.record(outcome) {
            Step::Done(records) => return Ok(records),
            Step::Wait(delay) => tokio::time::sleep(delay).await,
            Step::GiveUp(last_error) => {
                return Err(FetchFailure {
                    skip,
                    top: policy.page_size,
                    attempts: state.attempt,
                    last_error,
                })
            }
        }
    }
}

/// Fetch every page in the query's range.
///
/// # Errors
///
/// Returns the first page failure that outlived its retry budget. A page
/// size of zero is rejected up front since it could never terminate.
pub async fn fetch_all_pages<T>(
    transport: &T,
    query: &AuditQuery,
    policy: &FetchPolicy,
    progress: Option<&ProgressBar>,
) -> Result<Vec<RawRecord>, FetchFailure>
where
    T: PageTransport + Sync + ?Sized,
{
    if policy.page_size == 0 {
        return Err(FetchFailure {
            skip: 0,
            top: 0,
            attempts: 0,
            last_error: FetchError::InvalidPageSize,
        });
    }

    let mut all_records = Vec::new();
    let mut skip = 0;
    let mut pages = 0usize;

    loop {
        let page = request_page(transport, query, skip, policy).await?;
        let page_len = page.len();
        pages += 1;
        all_records.extend(page);

        debug!(skip, page_len, total = all_records.len(), "fetched page");
        if let Some(bar) = progress {
            bar.update(all_records.len());
            bar.set_message(&format!("Fetching audit log (page {})", pages));
        }

        if page_len < policy.page_size {
            break;
        }
        skip += policy.page_size;
    }

    Ok(all_records)
}
