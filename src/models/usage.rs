use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Accumulated focus time for one application.
///
/// The key and display name are fixed when the record is created; only the
/// total moves, and it only moves forward.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    key: String,
    display_name: String,
    total: Duration,
}

impl UsageRecord {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        let key = key.into();
        let display_name = display_name.into();
        let display_name = if display_name.trim().is_empty() {
            key.clone()
        } else {
            display_name
        };

        Self {
            key,
            display_name,
            total: Duration::zero(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    /// Adds `delta` to the total. Zero and negative deltas are ignored.
    pub fn add(&mut self, delta: Duration) -> bool {
        if delta <= Duration::zero() {
            return false;
        }
        self.total += delta;
        true
    }

    pub fn formatted_total(&self) -> String {
        format_duration(self.total)
    }

    pub fn summary(&self) -> UsageSummary {
        UsageSummary {
            key: self.key.clone(),
            display_name: self.display_name.clone(),
            total_seconds: self.total.num_seconds(),
            formatted: self.formatted_total(),
        }
    }
}

/// Serializable snapshot of a record, used for the exit summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub key: String,
    pub display_name: String,
    pub total_seconds: i64,
    pub formatted: String,
}

/// `HH:MM:SS`, hours keep counting past 24.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
