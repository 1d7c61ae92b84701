//! Audit-log retrieval and aggregation.
//!
//! - [`types`] - Request bodies and opaque response records
//! - [`fetch`] - Paginated fetch loop with bounded retry
//! - [`normalize`] - User name and date key canonicalization
//! - [`aggregate`] - Per-day and per-user login indices

pub mod aggregate;
pub mod fetch;
pub mod normalize;
pub mod types;
