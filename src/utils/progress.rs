//! Progress spinner utilities using indicatif
//!
//! The audit-log API never reports a total, so fetching is shown as a
//! spinner counting records received so far.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

/// Progress spinner wrapper for displaying fetch status
pub struct ProgressBar {
    bar: IndicatifBar,
}

impl ProgressBar {
    /// Create a spinner with a label (drawn on stderr)
    pub fn new_spinner(label: &str) -> Self {
        let bar = IndicatifBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{msg} {spinner} {pos} records ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    /// Update the record count
    pub fn update(&self, current: usize) {
        self.bar.set_position(current as u64);
    }

    /// Replace the label
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with custom message
    pub fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Remove the spinner from the terminal
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle() {
        let bar = ProgressBar::new_spinner("Fetching audit log");
        bar.update(42);
        bar.set_message("Fetching audit log (page 2)");
        bar.finish_with_message("Fetched 42 records");
    }
}
