//! Login activity report.
//!
//! Pulls every "User login" audit record in a time range from the SPACE API,
//! then reports how many distinct users logged in on each day and on which
//! days each user logged in.
//!
//! # Usage
//!
//! ```bash
//! # Console tables for the default range
//! space-audit
//!
//! # Also write daily_unique_users.csv and user_login_dates.csv
//! space-audit --csv --output-dir reports/
//!
//! # Count service accounts such as "system" too
//! space-audit --include-system
//!
//! # Custom range and timezone
//! space-audit --start 2025-09-01T00:00:00Z --end 2025-09-30T23:59:59Z --tz Europe/Berlin
//! ```
//!
//! # Requirements
//!
//! Requires a SPACE API token, from `--token`, `SPACE_TOKEN` or
//! `SPACE_TOKEN_FILE`. Setting `EXPORT_CSV=1` has the same effect as `--csv`.
//!
//! # Output
//!
//! - Daily table: date and number of unique users
//! - Per-user table: normalized user name and the sorted dates logged in
//! - Optional CSV files with the same two views

use crate::audit::aggregate::{aggregate, LoginIndex};
use crate::audit::fetch::{fetch_all_pages, FetchPolicy, PageTransport};
use crate::audit::normalize::UserFilter;
use crate::audit::types::{AdvancedSearch, AuditQuery};
use crate::report::{console, csv_export};
use crate::space_api::{ConfigError, SpaceClient};
use crate::utils::format::format_number;
use crate::utils::progress::ProgressBar;
use crate::utils::time::{duration_human, validate_range, validate_timezone};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Default range start
pub const DEFAULT_START: &str = "2025-07-17T07:00:00.000Z";

/// Default range end
pub const DEFAULT_END: &str = "2025-08-17T06:59:59.999Z";

/// Default timezone the server localizes timestamps into
pub const DEFAULT_TZ: &str = "America/Los_Angeles";

/// Accepts exactly `1`, `true` or `yes` (surrounding whitespace ignored)
pub fn parse_toggle(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes")
}

/// Check if CSV export should be enabled based on environment or flag
pub fn should_export_csv(csv_flag: bool) -> bool {
    if csv_flag {
        return true;
    }

    env::var("EXPORT_CSV")
        .map(|v| parse_toggle(&v))
        .unwrap_or(false)
}

/// Process exit code for a failed run: 2 for configuration problems such as
/// a missing token, 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        2
    } else {
        1
    }
}

/// Everything one report run needs.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub start: String,
    pub end: String,
    pub tz: String,
    pub policy: FetchPolicy,
    pub timeout: Duration,
    pub filter: UserFilter,
    pub export_csv: bool,
    pub output_dir: PathBuf,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            api_url: None,
            token: None,
            start: DEFAULT_START.to_string(),
            end: DEFAULT_END.to_string(),
            tz: DEFAULT_TZ.to_string(),
            policy: FetchPolicy::default(),
            timeout: crate::space_api::DEFAULT_TIMEOUT,
            filter: UserFilter::default(),
            export_csv: false,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ReportOptions {
    /// Validate the range and timezone and build the fixed query, along
    /// with the parsed range bounds
    pub fn query(&self) -> Result<(AuditQuery, DateTime<Utc>, DateTime<Utc>)> {
        let (start_dt, end_dt) = validate_range(&self.start, &self.end)?;
        validate_timezone(&self.tz)?;
        let query = AuditQuery {
            start: self.start.clone(),
            end: self.end.clone(),
            tz: self.tz.clone(),
            search: AdvancedSearch::logins_only(),
        };
        Ok((query, start_dt, end_dt))
    }
}

/// Run the report against the SPACE API.
pub async fn run(options: &ReportOptions) -> Result<LoginIndex> {
    let client = SpaceClient::from_options(
        options.api_url.as_deref(),
        options.token.as_deref(),
        options.timeout,
    )?;

    eprintln!("=== SPACE Login Activity ===");
    eprintln!("API: {}", client.url());
    run_with_transport(&client, options).await
}

/// Run the report against any page transport.
pub async fn run_with_transport<T>(transport: &T, options: &ReportOptions) -> Result<LoginIndex>
where
    T: PageTransport + Sync + ?Sized,
{
    let (query, start_dt, end_dt) = options.query()?;

    eprintln!(
        "Range: {} to {} ({})",
        query.start,
        query.end,
        duration_human(&start_dt, &end_dt)
    );
    eprintln!("Timezone: {}", query.tz);
    let excluded: Vec<&str> = options.filter.excluded().collect();
    if excluded.is_empty() {
        eprintln!("Excluded users: none");
    } else {
        eprintln!("Excluded users: {}", excluded.join(", "));
    }
    eprintln!();

    let progress = ProgressBar::new_spinner("Fetching audit log");
    let records = fetch_all_pages(transport, &query, &options.policy, Some(&progress)).await;
    let records = match records {
        Ok(records) => records,
        Err(e) => {
            progress.finish_and_clear();
            return Err(e.into());
        }
    };
    progress.finish_with_message(&format!(
        "Fetched {} login records",
        format_number(records.len())
    ));
    info!(records = records.len(), "fetch complete");

    let index = aggregate(&records, &options.filter).context("Failed to aggregate login records")?;
    if index.is_empty() {
        eprintln!("No login records found in range.");
    }

    console::print_report(&index.by_day, &index.by_user).context("Failed to write report")?;

    eprintln!("=== Summary ===");
    eprintln!("Records fetched: {}", format_number(index.records_seen));
    eprintln!("Records counted: {}", format_number(index.records_counted));
    eprintln!("Records skipped: {}", format_number(index.records_skipped()));
    eprintln!("Unique users: {}", format_number(index.unique_users()));
    eprintln!("Active days: {}", format_number(index.by_day.len()));

    if options.export_csv {
        let (daily_path, per_user_path) =
            csv_export::export(&options.output_dir, &index.by_day, &index.by_user)?;
        println!("CSV written: {}", daily_path.display());
        println!("CSV written: {}", per_user_path.display());
    }

    Ok(index)
}
