//! # SPACE Audit Tools
//!
//! Command-line tools for summarizing TM1 login activity recorded in the
//! SPACE audit-log API.
//!
//! ## Overview
//!
//! The `space-audit` binary pulls every "User login" audit record in a time
//! range, normalizes user names, and builds two views:
//!
//! - **Daily unique users** - how many distinct users logged in on each day
//! - **User login dates** - on which days each user logged in
//!
//! Both views are printed as tables and can be exported as CSV.
//!
//! ## Architecture
//!
//! - [`audit`] - Record types, paginated fetching, normalization, aggregation
//! - [`commands`] - The login report command
//! - [`report`] - Console and CSV renderers
//! - [`space_api`] - HTTP client and token handling
//! - [`utils`] - Formatting, progress, logging and time validation
//!
//! ## Example Usage
//!
//! ```bash
//! # Default range, console output only
//! export SPACE_TOKEN=...
//! space-audit
//!
//! # CSV export, counting the system account too
//! space-audit --csv --include-system
//!
//! # Different range and timezone
//! space-audit --start 2025-09-01T00:00:00Z --end 2025-09-30T23:59:59Z --tz Europe/London
//! ```
//!
//! ## Exit Codes
//!
//! - `0` - report produced
//! - `1` - fetch failed after retries, malformed timestamp, or I/O error
//! - `2` - no usable API token configured

pub mod audit;
pub mod commands;
pub mod report;
pub mod space_api;
pub mod utils;
