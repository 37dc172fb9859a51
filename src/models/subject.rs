//! Subject model.
//!
//! A subject is a course that needs a number of weekly sessions of a fixed
//! length, possibly in a room with particular equipment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Result, TimetableError};

/// Allowed session length, in minutes.
pub const SESSION_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 15..=480;
/// Allowed number of sessions per week.
pub const SESSIONS_PER_WEEK_RANGE: std::ops::RangeInclusive<u32> = 1..=10;
/// Class size assumed for room matching when `max_students` is unset.
pub const DEFAULT_CLASS_SIZE: u32 = 30;

/// Kind of teaching session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    #[default]
    Lecture,
    Lab,
    Tutorial,
    Seminar,
    Workshop,
}

/// Placement precedence. Higher priorities claim scarce slots first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl SubjectPriority {
    /// Sort rank: `Critical = 0` through `Low = 3`.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

/// A subject to be timetabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Unique, upper-cased subject code.
    pub code: String,
    pub name: String,
    pub subject_type: SubjectType,
    pub priority: SubjectPriority,
    /// Length of one session (minutes).
    pub duration_minutes: u32,
    pub sessions_per_week: u32,
    /// Enrolment cap. `None` = assume [`DEFAULT_CLASS_SIZE`] for room matching.
    pub max_students: Option<u32>,
    pub requires_lab: bool,
    pub requires_projector: bool,
    pub requires_computer: bool,
    /// Upper-cased codes of prerequisite subjects.
    pub prerequisites: BTreeSet<String>,
    pub description: Option<String>,
}

impl Subject {
    /// Creates a lecture with one session per week.
    pub fn new(code: impl AsRef<str>, name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            code: normalize_key(code.as_ref()),
            name: name.into(),
            subject_type: SubjectType::Lecture,
            priority: SubjectPriority::Medium,
            duration_minutes,
            sessions_per_week: 1,
            max_students: None,
            requires_lab: false,
            requires_projector: false,
            requires_computer: false,
            prerequisites: BTreeSet::new(),
            description: None,
        }
    }

    pub fn with_type(mut self, subject_type: SubjectType) -> Self {
        self.subject_type = subject_type;
        self
    }

    pub fn with_priority(mut self, priority: SubjectPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_sessions_per_week(mut self, sessions: u32) -> Self {
        self.sessions_per_week = sessions;
        self
    }

    pub fn with_max_students(mut self, max: u32) -> Self {
        self.max_students = Some(max);
        self
    }

    /// Requires a room of type laboratory.
    pub fn with_lab(mut self) -> Self {
        self.requires_lab = true;
        self
    }

    pub fn with_projector(mut self) -> Self {
        self.requires_projector = true;
        self
    }

    pub fn with_computers(mut self) -> Self {
        self.requires_computer = true;
        self
    }

    pub fn with_prerequisite(mut self, code: impl AsRef<str>) -> Self {
        self.prerequisites.insert(normalize_key(code.as_ref()));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Required teaching hours per week.
    pub fn total_hours_per_week(&self) -> f64 {
        f64::from(self.duration_minutes * self.sessions_per_week) / 60.0
    }

    /// Whether `code` is a prerequisite (case-insensitive).
    pub fn has_prerequisite(&self, code: &str) -> bool {
        self.prerequisites.contains(&normalize_key(code))
    }

    /// Expected class size for room matching.
    pub fn expected_class_size(&self) -> u32 {
        self.max_students.unwrap_or(DEFAULT_CLASS_SIZE)
    }

    /// Upper-cases the code and prerequisite codes in place.
    pub(crate) fn normalize_keys(&mut self) {
        self.code = normalize_key(&self.code);
        self.prerequisites = self.prerequisites.iter().map(|c| normalize_key(c)).collect();
    }

    /// Checks field ranges. Called by the registry before insertion.
    pub fn validate(&self) -> Result<()> {
        validate_key("subject.code", &self.code)?;
        if self.name.trim().is_empty() {
            return Err(TimetableError::invalid("subject.name", "must not be empty"));
        }
        if !SESSION_MINUTES_RANGE.contains(&self.duration_minutes) {
            return Err(TimetableError::invalid(
                "subject.duration_minutes",
                format!(
                    "{} is outside {}..={}",
                    self.duration_minutes,
                    SESSION_MINUTES_RANGE.start(),
                    SESSION_MINUTES_RANGE.end()
                ),
            ));
        }
        if !SESSIONS_PER_WEEK_RANGE.contains(&self.sessions_per_week) {
            return Err(TimetableError::invalid(
                "subject.sessions_per_week",
                format!(
                    "{} is outside {}..={}",
                    self.sessions_per_week,
                    SESSIONS_PER_WEEK_RANGE.start(),
                    SESSIONS_PER_WEEK_RANGE.end()
                ),
            ));
        }
        if self.max_students == Some(0) {
            return Err(TimetableError::invalid(
                "subject.max_students",
                "must be greater than 0",
            ));
        }
        if self.prerequisites.contains(&self.code) {
            return Err(TimetableError::invalid(
                "subject.prerequisites",
                format!("{} cannot be its own prerequisite", self.code),
            ));
        }
        Ok(())
    }
}

/// Trims and upper-cases an entity key.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

/// Keys are non-empty and made of alphanumerics, `-`, `_`, `.` or spaces.
pub(crate) fn validate_key(field: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(TimetableError::invalid(field, "must not be empty"));
    }
    let ok = key
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '));
    if !ok {
        return Err(TimetableError::invalid(
            field,
            format!("'{key}' may only contain alphanumerics, spaces, '-', '_' or '.'"),
        ));
    }
    Ok(())
}
