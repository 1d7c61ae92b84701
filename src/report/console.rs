//! Plain-text tables for the terminal.

use super::{daily_rows, user_rows};
use crate::audit::aggregate::{DailyIndex, UserIndex};
use std::io::{self, Write};

/// Width of the date column in the daily table
const DATE_WIDTH: usize = 12;

/// Separator between dates in the per-user table
pub const DATE_SEPARATOR: &str = ", ";

/// Print unique users per day, one row per date.
pub fn write_daily<W: Write>(out: &mut W, by_day: &DailyIndex) -> io::Result<()> {
    writeln!(out, "Daily unique user logins")?;
    writeln!(out)?;
    writeln!(out, "{:<width$}Unique Users", "Date", width = DATE_WIDTH)?;
    for (date, count) in daily_rows(by_day) {
        writeln!(out, "{:<width$}{}", date, count, width = DATE_WIDTH)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print every user with the dates they logged in.
///
/// The user column is as wide as the longest name (or the header) plus two.
pub fn write_per_user<W: Write>(out: &mut W, by_user: &UserIndex) -> io::Result<()> {
    let header = "User";
    let width = by_user
        .keys()
        .map(|u| u.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
        + 2;

    writeln!(out, "User login dates")?;
    writeln!(out)?;
    writeln!(out, "{:<width$}Dates Logged In", header, width = width)?;
    for (user, dates) in user_rows(by_user, DATE_SEPARATOR) {
        writeln!(out, "{:<width$}{}", user, dates, width = width)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print both tables to stdout.
pub fn print_report(by_day: &DailyIndex, by_user: &UserIndex) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_daily(&mut out, by_day)?;
    write_per_user(&mut out, by_user)?;
    out.flush()
}
