//! Timetable: a registry, its schedule, and the teaching week.
//!
//! Mutations that touch both the registry and the schedule live here so
//! that removing an entity always removes the entries that reference it.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::models::{
    hhmm, normalize_key, session_hours, Classroom, EntryId, Schedule, ScheduleEntry, Subject,
    Teacher, TimeSlot, WEEKDAYS,
};
use crate::registry::Registry;

/// Working days and daily teaching window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekSettings {
    /// Days on which sessions can be placed, in placement order.
    pub working_days: Vec<Weekday>,
    #[serde(with = "hhmm")]
    pub daily_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub daily_end: NaiveTime,
}

impl Default for WeekSettings {
    /// Monday to Friday, 09:00 to 17:00.
    fn default() -> Self {
        Self {
            working_days: WEEKDAYS.to_vec(),
            daily_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            daily_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl WeekSettings {
    pub fn with_working_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.working_days = days.into_iter().collect();
        self
    }

    pub fn with_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.daily_start = start;
        self.daily_end = end;
        self
    }

    /// Working days in Monday-first order, without duplicates.
    pub fn ordered_days(&self) -> Vec<Weekday> {
        let mut days = self.working_days.clone();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        days
    }

    pub fn validate(&self) -> Result<()> {
        if self.working_days.is_empty() {
            return Err(TimetableError::invalid(
                "working_days",
                "at least one working day is required",
            ));
        }
        if self.daily_end <= self.daily_start {
            return Err(TimetableError::invalid(
                "daily_end",
                format!(
                    "{} must be after daily_start {}",
                    self.daily_end.format("%H:%M"),
                    self.daily_start.format("%H:%M")
                ),
            ));
        }
        Ok(())
    }
}

/// A named timetable: entities, placed sessions, and the teaching week.
///
/// `Clone` gives an isolated copy for what-if runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    pub name: String,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub week: WeekSettings,
    registry: Registry,
    schedule: Schedule,
}

impl Timetable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_term(
        mut self,
        academic_year: impl Into<String>,
        semester: impl Into<String>,
    ) -> Self {
        self.academic_year = Some(academic_year.into());
        self.semester = Some(semester.into());
        self
    }

    pub fn with_week(mut self, week: WeekSettings) -> Self {
        self.week = week;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn add_subject(&mut self, subject: Subject) -> Result<()> {
        self.registry.add_subject(subject)
    }

    pub fn add_teacher(&mut self, teacher: Teacher) -> Result<()> {
        self.registry.add_teacher(teacher)
    }

    pub fn add_classroom(&mut self, classroom: Classroom) -> Result<()> {
        self.registry.add_classroom(classroom)
    }

    /// Removes a subject and every entry that teaches it.
    pub fn remove_subject(&mut self, code: &str) -> Result<Subject> {
        let subject = self.registry.remove_subject(code)?;
        let removed = self
            .schedule
            .remove_where(|e| normalize_key(&e.subject_code) == subject.code);
        tracing::debug!(subject = %subject.code, removed, "removed subject");
        Ok(subject)
    }

    /// Removes a teacher and every entry they teach.
    pub fn remove_teacher(&mut self, employee_id: &str) -> Result<Teacher> {
        let teacher = self.registry.remove_teacher(employee_id)?;
        let removed = self
            .schedule
            .remove_where(|e| normalize_key(&e.teacher_id) == teacher.employee_id);
        tracing::debug!(teacher = %teacher.employee_id, removed, "removed teacher");
        Ok(teacher)
    }

    /// Removes a classroom and every entry booked in it.
    pub fn remove_classroom(&mut self, room_number: &str) -> Result<Classroom> {
        let classroom = self.registry.remove_classroom(room_number)?;
        let removed = self
            .schedule
            .remove_where(|e| normalize_key(&e.room_number) == classroom.room_number);
        tracing::debug!(room = %classroom.room_number, removed, "removed classroom");
        Ok(classroom)
    }

    /// Adds an entry after the full feasibility check.
    pub fn add_entry(&mut self, entry: ScheduleEntry) -> Result<EntryId> {
        self.schedule.add_entry(&self.registry, entry)
    }

    pub fn remove_entry(&mut self, id: EntryId) -> Result<ScheduleEntry> {
        self.schedule.remove_entry(id)
    }

    /// Atomically moves an entry to a new slot. See [`Schedule::relocate`].
    pub fn relocate_entry(&mut self, id: EntryId, slot: TimeSlot) -> Result<()> {
        self.schedule.relocate(&self.registry, id, slot)
    }

    pub fn clear_schedule(&mut self) {
        self.schedule.clear();
    }

    /// Validation issue messages for the current schedule.
    pub fn validate(&self) -> Vec<String> {
        self.schedule.validate(&self.registry)
    }

    /// Derived weekly hours for one teacher.
    pub fn teacher_weekly_hours(&self, employee_id: &str) -> f64 {
        self.schedule
            .teacher_weekly_hours(&self.registry, &normalize_key(employee_id))
    }

    /// Weekly hours a teacher can still take before `max_hours_per_week`.
    ///
    /// `None` if the teacher is not registered.
    pub fn teacher_available_hours(&self, employee_id: &str) -> Option<f64> {
        let teacher = self.registry.teacher(employee_id)?;
        let booked = self.teacher_weekly_hours(&teacher.employee_id);
        Some((f64::from(teacher.max_hours_per_week) - booked).max(0.0))
    }

    /// Booked weekly hours as a percentage of `max_hours_per_week`. Not
    /// capped, so an overloaded teacher reads above 100.
    pub fn teacher_workload_percentage(&self, employee_id: &str) -> Option<f64> {
        let teacher = self.registry.teacher(employee_id)?;
        let booked = self.teacher_weekly_hours(&teacher.employee_id);
        Some(booked / f64::from(teacher.max_hours_per_week) * 100.0)
    }

    /// Share of the teaching day a classroom is booked on `day`, in `[0, 100]`.
    ///
    /// The day length is `daily_start..daily_end` of the week settings.
    pub fn classroom_utilization_rate(&self, room_number: &str, day: Weekday) -> Option<f64> {
        let classroom = self.registry.classroom(room_number)?;
        let day_minutes = (self.week.daily_end - self.week.daily_start).num_minutes();
        if day_minutes <= 0 {
            return Some(0.0);
        }
        let booked = self
            .schedule
            .entries_for_classroom(&classroom.room_number)
            .into_iter()
            .filter(|e| e.time_slot.day() == day)
            .map(|e| session_hours(&self.registry, e))
            .fold(0.0, |acc, h| acc + h);
        Some((booked * 60.0 / day_minutes as f64 * 100.0).min(100.0))
    }
}
