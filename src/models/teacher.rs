//! Teacher model.
//!
//! Weekly teaching load is not stored on the teacher. It is derived from the
//! schedule on demand (see [`Schedule::teacher_weekly_hours`]).
//!
//! [`Schedule::teacher_weekly_hours`]: super::Schedule::teacher_weekly_hours

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::subject::{normalize_key, validate_key};
use super::{Availability, TimeSlot};
use crate::error::{Result, TimetableError};

/// Employment status. Only active teachers can be booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeacherStatus {
    #[default]
    Active,
    OnLeave,
    Inactive,
}

/// A teacher who can be assigned to sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique, upper-cased employee identifier.
    pub employee_id: String,
    pub name: String,
    pub email: Option<String>,
    pub department: Option<String>,
    pub status: TeacherStatus,
    /// Upper-cased codes of subjects this teacher may teach.
    pub subjects_qualified: BTreeSet<String>,
    pub max_hours_per_week: u32,
    pub max_hours_per_day: u32,
    pub max_consecutive_hours: u32,
    pub availability: Availability,
}

impl Teacher {
    /// Creates an active teacher available Monday to Friday.
    ///
    /// Defaults: 40h/week, 8h/day, 3 consecutive hours.
    pub fn new(employee_id: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            employee_id: normalize_key(employee_id.as_ref()),
            name: name.into(),
            email: None,
            department: None,
            status: TeacherStatus::Active,
            subjects_qualified: BTreeSet::new(),
            max_hours_per_week: 40,
            max_hours_per_day: 8,
            max_consecutive_hours: 3,
            availability: Availability::weekdays(),
        }
    }

    /// Adds a subject qualification.
    pub fn with_subject(mut self, code: impl AsRef<str>) -> Self {
        self.subjects_qualified.insert(normalize_key(code.as_ref()));
        self
    }

    pub fn with_status(mut self, status: TeacherStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Sets weekly, daily and consecutive hour limits.
    pub fn with_hour_limits(mut self, per_week: u32, per_day: u32, consecutive: u32) -> Self {
        self.max_hours_per_week = per_week;
        self.max_hours_per_day = per_day;
        self.max_consecutive_hours = consecutive;
        self
    }

    pub fn with_max_hours_per_week(mut self, hours: u32) -> Self {
        self.max_hours_per_week = hours;
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Blocks a slot in this teacher's availability.
    pub fn with_unavailable(mut self, slot: TimeSlot) -> Self {
        self.availability.blocked.push(slot);
        self
    }

    /// Whether the teacher is qualified for a subject (case-insensitive).
    pub fn can_teach(&self, subject_code: &str) -> bool {
        self.subjects_qualified
            .contains(&normalize_key(subject_code))
    }

    /// Active, on an available day, and not blocked during the slot.
    pub fn is_available_at(&self, slot: &TimeSlot) -> bool {
        self.status == TeacherStatus::Active && self.availability.is_available_at(slot)
    }

    pub(crate) fn normalize_keys(&mut self) {
        self.employee_id = normalize_key(&self.employee_id);
        self.subjects_qualified = self
            .subjects_qualified
            .iter()
            .map(|c| normalize_key(c))
            .collect();
    }

    /// Checks limits and identifiers. Called by the registry before insertion.
    pub fn validate(&self) -> Result<()> {
        validate_key("teacher.employee_id", &self.employee_id)?;
        if self.name.trim().is_empty() {
            return Err(TimetableError::invalid("teacher.name", "must not be empty"));
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(TimetableError::invalid(
                    "teacher.email",
                    format!("'{email}' is not an email address"),
                ));
            }
        }
        if self.max_hours_per_week == 0
            || self.max_hours_per_day == 0
            || self.max_consecutive_hours == 0
        {
            return Err(TimetableError::invalid(
                "teacher.hours",
                "hour limits must be greater than 0",
            ));
        }
        if self.max_consecutive_hours > self.max_hours_per_day {
            return Err(TimetableError::invalid(
                "teacher.max_consecutive_hours",
                format!(
                    "{} exceeds max_hours_per_day {}",
                    self.max_consecutive_hours, self.max_hours_per_day
                ),
            ));
        }
        Ok(())
    }
}
