//! Scheduling constraint configuration.
//!
//! Every option has a default, so a partial TOML table is valid:
//!
//! ```toml
//! max_attempts = 200
//! lunch_break_start = "12:30"
//! lunch_break_end = "13:30"
//! ```
//!
//! Only `max_attempts`, `prefer_morning_sessions` and the lunch window
//! affect placement. The remaining options are validated and carried as
//! advisory settings.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TimetableError};
use crate::models::hhmm;

/// Constraint options for the assignment engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConstraints {
    /// Placement trials per subject before giving up.
    pub max_attempts: u32,
    pub prefer_morning_sessions: bool,
    pub avoid_single_hour_gaps: bool,
    pub max_consecutive_hours: u32,
    #[serde(with = "hhmm")]
    pub lunch_break_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub lunch_break_end: NaiveTime,
    /// Minutes.
    pub min_break_between_sessions: u32,
    pub max_daily_hours_per_subject: u32,
    pub prefer_same_classroom_for_subject: bool,
}

impl Default for SchedulingConstraints {
    fn default() -> Self {
        Self {
            max_attempts: 1000,
            prefer_morning_sessions: true,
            avoid_single_hour_gaps: true,
            max_consecutive_hours: 3,
            lunch_break_start: NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN),
            lunch_break_end: NaiveTime::from_hms_opt(13, 0, 0).unwrap_or(NaiveTime::MIN),
            min_break_between_sessions: 0,
            max_daily_hours_per_subject: 4,
            prefer_same_classroom_for_subject: true,
        }
    }
}

impl SchedulingConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_morning_preference(mut self, prefer: bool) -> Self {
        self.prefer_morning_sessions = prefer;
        self
    }

    pub fn with_lunch_break(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.lunch_break_start = start;
        self.lunch_break_end = end;
        self
    }

    pub fn with_max_consecutive_hours(mut self, hours: u32) -> Self {
        self.max_consecutive_hours = hours;
        self
    }

    pub fn with_min_break(mut self, minutes: u32) -> Self {
        self.min_break_between_sessions = minutes;
        self
    }

    /// Parses constraints from a TOML document and validates them.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let constraints: Self = toml::from_str(source)?;
        constraints.validate()?;
        Ok(constraints)
    }

    /// Reads and parses a TOML constraints file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks option ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(TimetableError::invalid(
                "max_attempts",
                "must be greater than 0",
            ));
        }
        if self.lunch_break_end <= self.lunch_break_start {
            return Err(TimetableError::invalid(
                "lunch_break_end",
                format!(
                    "{} must be after lunch_break_start {}",
                    self.lunch_break_end.format("%H:%M"),
                    self.lunch_break_start.format("%H:%M")
                ),
            ));
        }
        if !(1..=12).contains(&self.max_consecutive_hours) {
            return Err(TimetableError::invalid(
                "max_consecutive_hours",
                format!("{} is outside 1..=12", self.max_consecutive_hours),
            ));
        }
        if self.min_break_between_sessions > 120 {
            return Err(TimetableError::invalid(
                "min_break_between_sessions",
                format!("{} minutes is more than 120", self.min_break_between_sessions),
            ));
        }
        if !(1..=12).contains(&self.max_daily_hours_per_subject) {
            return Err(TimetableError::invalid(
                "max_daily_hours_per_subject",
                format!("{} is outside 1..=12", self.max_daily_hours_per_subject),
            ));
        }
        Ok(())
    }
}
