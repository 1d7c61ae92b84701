//! Data structures for the SPACE audit-log API.
//!
//! The request side mirrors the JSON body the `auditlog` endpoint expects.
//! The response side keeps each record as an opaque JSON object, since only
//! a couple of its fields are ever read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Audit action recorded for every successful TM1 login.
pub const LOGIN_ACTION: &str = "User login";

/// One audit-log record as returned by the API.
///
/// Only `UserName` and `TimeStamp` are consumed. Everything else is kept
/// verbatim so callers can still inspect it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    /// Build a record from its two consumed fields.
    pub fn new(user_name: Option<&str>, time_stamp: Option<&str>) -> Self {
        let mut map = Map::new();
        map.insert(
            "UserName".to_string(),
            user_name.map_or(Value::Null, |u| Value::String(u.to_string())),
        );
        map.insert(
            "TimeStamp".to_string(),
            time_stamp.map_or(Value::Null, |t| Value::String(t.to_string())),
        );
        Self(map)
    }

    /// Get the raw user name, if present and a string
    pub fn user_name(&self) -> Option<&str> {
        self.0.get("UserName")?.as_str()
    }

    /// Get the raw timestamp, if present and a string
    pub fn time_stamp(&self) -> Option<&str> {
        self.0.get("TimeStamp")?.as_str()
    }
}

/// A single advanced-search clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub name: String,
    pub operator: String,
    pub value: Vec<String>,
    pub id: u32,
}

/// Server-side filter applied to every page request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedSearch {
    pub operator: String,
    pub queries: Vec<SearchQuery>,
}

impl AdvancedSearch {
    /// Filter restricting results to login events.
    pub fn logins_only() -> Self {
        Self {
            operator: "and".to_string(),
            queries: vec![SearchQuery {
                name: "action".to_string(),
                operator: "in".to_string(),
                value: vec![LOGIN_ACTION.to_string()],
                id: 3,
            }],
        }
    }
}

/// The part of a page request that stays fixed across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditQuery {
    /// Range start, ISO 8601 (e.g. `2025-07-17T07:00:00.000Z`)
    pub start: String,
    /// Range end, ISO 8601
    pub end: String,
    /// IANA timezone the server converts returned timestamps into
    pub tz: String,
    pub search: AdvancedSearch,
}

impl AuditQuery {
    /// Body for the page at `skip` with size `top`.
    pub fn page(&self, skip: usize, top: usize) -> PageRequest {
        PageRequest {
            start: self.start.clone(),
            end: self.end.clone(),
            skip,
            top,
            advanced_search: self.search.clone(),
            tz: self.tz.clone(),
        }
    }
}

/// JSON body of one `auditlog` POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRequest {
    pub start: String,
    pub end: String,
    pub skip: usize,
    pub top: usize,
    #[serde(rename = "advancedSearch")]
    pub advanced_search: AdvancedSearch,
    pub tz: String,
}
