//! Canonical forms for user names and login dates.
//!
//! Two spellings of the same account (`"Bob"`, `" bob "`) must count as one
//! user, and every login is bucketed by the calendar date the server already
//! localized into the requested timezone.

use std::collections::BTreeSet;
use thiserror::Error;

/// Account names excluded from counting unless system accounts are included.
pub const DEFAULT_EXCLUDED_USERS: &[&str] = &["system"];

/// A timestamp that cannot be turned into a date key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing TimeStamp")]
    MissingTimestamp,

    #[error("unexpected TimeStamp format: {0:?}")]
    UnexpectedFormat(String),
}

/// Unicode whitespace plus the ASCII file/group/record/unit separators,
/// which also delimit words in user names coming from the API.
pub fn is_name_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Normalizes a raw user name into its aggregation key.
///
/// Trims the ends, collapses inner separator runs into one space and applies
/// full Unicode case folding, so `"Straße"` and `"STRASSE"` are one user.
/// `None` becomes the empty string.
///
/// # Examples
///
/// ```
/// use space_audit_tools::audit::normalize::normalize_username;
///
/// assert_eq!(normalize_username(Some("  Alice  Smith ")), "alice smith");
/// assert_eq!(normalize_username(None), "");
/// ```
pub fn normalize_username(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let collapsed = raw
        .split(is_name_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    caseless::default_case_fold_str(&collapsed)
}

/// Set of normalized user names that never enter an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    excluded: BTreeSet<String>,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self::empty().with_excluded(DEFAULT_EXCLUDED_USERS.iter().copied())
    }
}

impl UserFilter {
    /// A filter that only drops empty names (include-system mode).
    pub fn empty() -> Self {
        Self {
            excluded: BTreeSet::new(),
        }
    }

    /// Add names to exclude. Each name is normalized first.
    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let normalized = normalize_username(Some(name.as_ref()));
            if !normalized.is_empty() {
                self.excluded.insert(normalized);
            }
        }
        self
    }

    /// Names currently excluded, in sorted order
    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }

    /// Whether an already-normalized name should be left out of the indices.
    pub fn should_skip(&self, normalized: &str) -> bool {
        normalized.is_empty() || self.excluded.contains(normalized)
    }
}

/// Extracts the `YYYY-MM-DD` prefix of a server-localized timestamp.
///
/// No timezone conversion happens here: the API already returned the
/// timestamp in the requested zone.
///
/// # Examples
///
/// ```
/// use space_audit_tools::audit::normalize::extract_date;
///
/// assert_eq!(extract_date("2025-08-16 05:43:12 UTC").unwrap(), "2025-08-16");
/// assert!(extract_date("bad-ts").is_err());
/// ```
pub fn extract_date(timestamp: &str) -> Result<&str, FormatError> {
    let trimmed = timestamp.trim_matches(is_name_separator);
    if trimmed.is_empty() {
        return Err(FormatError::MissingTimestamp);
    }

    let bytes = trimmed.as_bytes();
    let is_date_prefix = bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !is_date_prefix {
        return Err(FormatError::UnexpectedFormat(timestamp.to_string()));
    }

    // The first ten bytes are ASCII, so this is a char boundary.
    Ok(&trimmed[..10])
}
