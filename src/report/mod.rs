//! Renderers for the two login views.
//!
//! - [`console`] - plain-text tables for the terminal
//! - [`csv_export`] - one CSV file per view
//!
//! Both take the indices by reference and never reorder them: the
//! collections are already sorted (dates ascending, users alphabetically).

pub mod console;
pub mod csv_export;

use crate::audit::aggregate::{DailyIndex, UserIndex};

/// `(date, unique user count)` rows, ascending by date
pub fn daily_rows(by_day: &DailyIndex) -> Vec<(&str, usize)> {
    by_day
        .iter()
        .map(|(date, users)| (date.as_str(), users.len()))
        .collect()
}

/// `(user, sorted dates joined by separator)` rows, alphabetical by user
pub fn user_rows<'a>(by_user: &'a UserIndex, separator: &str) -> Vec<(&'a str, String)> {
    by_user
        .iter()
        .map(|(user, dates)| {
            let joined = dates
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(separator);
            (user.as_str(), joined)
        })
        .collect()
}
