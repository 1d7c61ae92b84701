//! CSV export of both login views.
//!
//! Writes `daily_unique_users.csv` (`Date,Unique Users`) and
//! `user_login_dates.csv` (`User,Dates Logged In`, dates joined with `"; "`).

use super::{daily_rows, user_rows};
use crate::audit::aggregate::{DailyIndex, UserIndex};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default file name for the per-day view
pub const DAILY_CSV: &str = "daily_unique_users.csv";

/// Default file name for the per-user view
pub const PER_USER_CSV: &str = "user_login_dates.csv";

/// Separator between dates in the per-user file
pub const DATE_SEPARATOR: &str = "; ";

/// Write the per-day view as CSV.
pub fn write_daily<W: Write>(writer: W, by_day: &DailyIndex) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["Date", "Unique Users"])?;
    for (date, count) in daily_rows(by_day) {
        let count = count.to_string();
        writer.write_record([date, count.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the per-user view as CSV.
pub fn write_per_user<W: Write>(writer: W, by_user: &UserIndex) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["User", "Dates Logged In"])?;
    for (user, dates) in user_rows(by_user, DATE_SEPARATOR) {
        writer.write_record([user, dates.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write both CSV files into `dir` and return their paths.
pub fn export(dir: &Path, by_day: &DailyIndex, by_user: &UserIndex) -> Result<(PathBuf, PathBuf)> {
    let daily_path = dir.join(DAILY_CSV);
    let per_user_path = dir.join(PER_USER_CSV);

    let file = File::create(&daily_path)
        .with_context(|| format!("Failed to create output file: {}", daily_path.display()))?;
    write_daily(file, by_day)
        .with_context(|| format!("Failed to write {}", daily_path.display()))?;

    let file = File::create(&per_user_path)
        .with_context(|| format!("Failed to create output file: {}", per_user_path.display()))?;
    write_per_user(file, by_user)
        .with_context(|| format!("Failed to write {}", per_user_path.display()))?;

    Ok((daily_path, per_user_path))
}
