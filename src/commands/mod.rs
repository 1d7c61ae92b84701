//! Command implementations.
//!
//! - [`login_report`] - Daily unique users and per-user login dates from the
//!   SPACE audit-log API, printed as tables and optionally exported as CSV

pub mod login_report;
