//! Weekly time slot model.
//!
//! A slot is a half-open interval `[start, end)` on one day of the week.
//! Slots on different days never overlap and are never adjacent; the
//! week wraps nowhere.
//!
//! # Invariants
//! - `end > start`
//! - `duration_minutes == end - start`
//!
//! Both hold for every constructed or deserialized slot.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TimetableError};

/// A time interval on a day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeSlotRecord", into = "TimeSlotRecord")]
pub struct TimeSlot {
    day: Weekday,
    start: NaiveTime,
    end: NaiveTime,
    duration_minutes: u32,
}

/// Wire shape of a slot. `duration_minutes` may be omitted and is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimeSlotRecord {
    day: Weekday,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
    #[serde(default)]
    duration_minutes: Option<u32>,
}

impl TimeSlot {
    /// Creates a slot, failing with `InvalidRange` if `end <= start`.
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if end <= start {
            return Err(TimetableError::InvalidRange(format!(
                "{} {} must end after it starts (ends {})",
                day_name(day),
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self {
            day,
            start,
            end,
            duration_minutes: minutes_between(start, end),
        })
    }

    /// Creates a slot from `(hour, minute)` pairs.
    pub fn from_hm(day: Weekday, start: (u32, u32), end: (u32, u32)) -> Result<Self> {
        let start = hm(start.0, start.1)?;
        let end = hm(end.0, end.1)?;
        Self::new(day, start, end)
    }

    #[inline]
    pub fn day(&self) -> Weekday {
        self.day
    }

    #[inline]
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Whether two slots share any instant.
    ///
    /// Touching slots (one ends when the other starts) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.day != other.day {
            return false;
        }
        !(self.end <= other.start || self.start >= other.end)
    }

    /// Whether one slot ends exactly when the other starts, on the same day.
    pub fn is_adjacent_to(&self, other: &Self) -> bool {
        self.day == other.day && (self.end == other.start || self.start == other.end)
    }

    /// Whether this slot overlaps the interval `[start, end)` on its own day.
    pub fn overlaps_window(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start < end && start < self.end
    }

    /// Whether the slot starts before noon.
    pub fn starts_before_noon(&self) -> bool {
        self.start.hour() < 12
    }
}

impl TryFrom<TimeSlotRecord> for TimeSlot {
    type Error = TimetableError;

    fn try_from(record: TimeSlotRecord) -> Result<Self> {
        let slot = Self::new(record.day, record.start, record.end)?;
        match record.duration_minutes {
            Some(d) if d != slot.duration_minutes => Err(TimetableError::InvalidRange(format!(
                "{slot}: duration {d} does not match {} minutes between start and end",
                slot.duration_minutes
            ))),
            _ => Ok(slot),
        }
    }
}

impl From<TimeSlot> for TimeSlotRecord {
    fn from(slot: TimeSlot) -> Self {
        Self {
            day: slot.day,
            start: slot.start,
            end: slot.end,
            duration_minutes: Some(slot.duration_minutes),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            day_name(self.day),
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Full English day name.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Builds a time of day, failing with `InvalidRange` on out-of-range input.
pub fn hm(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| TimetableError::InvalidRange(format!("{hour:02}:{minute:02}")))
}

pub(crate) fn minutes_between(start: NaiveTime, end: NaiveTime) -> u32 {
    let secs = end.num_seconds_from_midnight() as i64 - start.num_seconds_from_midnight() as i64;
    (secs.max(0) / 60) as u32
}

/// `HH:MM` serde format for times of day. Also accepts `HH:MM:SS`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|e| serde::de::Error::custom(format!("invalid time '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Weekday, start: (u32, u32), end: (u32, u32)) -> TimeSlot {
        TimeSlot::from_hm(day, start, end).unwrap()
    }

    #[test]
    fn test_new_derives_duration() {
        let s = slot(Weekday::Mon, (9, 0), (10, 30));
        assert_eq!(s.duration_minutes(), 90);
        assert_eq!(s.day(), Weekday::Mon);
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            TimeSlot::from_hm(Weekday::Mon, (10, 0), (9, 0)),
            Err(TimetableError::InvalidRange(_))
        ));
        assert!(TimeSlot::from_hm(Weekday::Mon, (10, 0), (10, 0)).is_err());
        assert!(TimeSlot::from_hm(Weekday::Mon, (25, 0), (26, 0)).is_err());
    }

    #[test]
    fn test_overlaps() {
        let a = slot(Weekday::Mon, (9, 0), (10, 0));
        assert!(a.overlaps(&slot(Weekday::Mon, (9, 30), (10, 30))));
        assert!(!a.overlaps(&slot(Weekday::Tue, (9, 0), (10, 0))));
        // touching, not overlapping
        assert!(!a.overlaps(&slot(Weekday::Mon, (10, 0), (11, 0))));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_adjacent() {
        let a = slot(Weekday::Mon, (9, 0), (10, 0));
        assert!(a.is_adjacent_to(&slot(Weekday::Mon, (10, 0), (11, 0))));
        assert!(a.is_adjacent_to(&slot(Weekday::Mon, (8, 0), (9, 0))));
        assert!(!a.is_adjacent_to(&slot(Weekday::Tue, (10, 0), (11, 0))));
        assert!(!a.is_adjacent_to(&slot(Weekday::Mon, (10, 30), (11, 0))));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            slot(Weekday::Thu, (13, 0), (14, 15)).to_string(),
            "Thursday 13:00-14:15"
        );
    }

    #[test]
    fn test_deserialize_derives_duration() {
        let s: TimeSlot =
            serde_json::from_str(r#"{"day":"Mon","start":"09:00","end":"10:00"}"#).unwrap();
        assert_eq!(s.duration_minutes(), 60);
    }

    #[test]
    fn test_deserialize_rejects_bad_slots() {
        let mismatched =
            r#"{"day":"Mon","start":"09:00","end":"10:00","duration_minutes":45}"#;
        assert!(serde_json::from_str::<TimeSlot>(mismatched).is_err());

        let reversed = r#"{"day":"Mon","start":"11:00","end":"10:00"}"#;
        assert!(serde_json::from_str::<TimeSlot>(reversed).is_err());
    }

    #[test]
    fn test_serialize_roundtrip_format() {
        let s = slot(Weekday::Fri, (14, 0), (15, 0));
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""start":"14:00""#));
        let back: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
