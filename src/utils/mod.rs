//! Utility functions and helpers.
//!
//! - [`format`] - Number formatting for status output
//! - [`logging`] - Tracing subscriber setup
//! - [`progress`] - Spinner shown while pages are fetched
//! - [`time`] - Range bound and timezone validation
//!
//! # Examples
//!
//! ```no_run
//! use space_audit_tools::utils::time::validate_range;
//!
//! let (start, end) =
//!     validate_range("2025-07-17T07:00:00.000Z", "2025-08-17T06:59:59.999Z").unwrap();
//! println!("{} -> {}", start, end);
//! ```

pub mod format;
pub mod logging;
pub mod progress;
pub mod time;
