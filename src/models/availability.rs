//! Weekly availability model.
//!
//! Describes when a teacher or classroom may be booked: a set of working
//! days and a list of blocked slots (leave, meetings, maintenance).
//!
//! # Precedence
//! Blocked slots override working days. A slot is available iff:
//! - its day is one of `days`, AND
//! - it does NOT overlap any entry of `blocked`.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::TimeSlot;

/// The five weekdays, Monday first.
pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Days of availability plus blocked slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    /// Days on which the resource can be booked.
    pub days: HashSet<Weekday>,
    /// Slots when the resource cannot be booked.
    #[serde(default)]
    pub blocked: Vec<TimeSlot>,
}

impl Availability {
    /// Monday to Friday, nothing blocked.
    pub fn weekdays() -> Self {
        Self {
            days: WEEKDAYS.into_iter().collect(),
            blocked: Vec::new(),
        }
    }

    /// Only the given days, nothing blocked.
    pub fn on_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            days: days.into_iter().collect(),
            blocked: Vec::new(),
        }
    }

    /// Adds a blocked slot.
    pub fn with_blocked(mut self, slot: TimeSlot) -> Self {
        self.blocked.push(slot);
        self
    }

    /// Whether the whole slot falls within availability.
    pub fn is_available_at(&self, slot: &TimeSlot) -> bool {
        if !self.days.contains(&slot.day()) {
            return false;
        }
        !self.blocked.iter().any(|b| b.overlaps(slot))
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::weekdays()
    }
}
