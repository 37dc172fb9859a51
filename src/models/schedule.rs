//! Schedule (solution) model.
//!
//! A schedule is an insertion-ordered list of accepted session
//! placements. Entries refer to subjects, teachers and classrooms by key;
//! the keys resolve against a [`Registry`].
//!
//! # Invariant
//! No two entries conflict: for all `e1 != e2`, `!e1.conflicts_with(e2)`.
//! [`Schedule::add_entry`] and [`Schedule::relocate`] preserve it.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use uuid::Uuid;

use super::{normalize_key, TimeSlot};
use crate::error::{Result, TimetableError};
use crate::registry::Registry;

/// Identity of a schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One placed session: subject × teacher × classroom × slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub time_slot: TimeSlot,
    pub subject_code: String,
    pub teacher_id: String,
    pub room_number: String,
    pub student_count: Option<u32>,
    pub notes: Option<String>,
}

impl ScheduleEntry {
    /// Creates an entry with a fresh id. Keys are upper-cased.
    pub fn new(
        time_slot: TimeSlot,
        subject_code: impl AsRef<str>,
        teacher_id: impl AsRef<str>,
        room_number: impl AsRef<str>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            time_slot,
            subject_code: normalize_key(subject_code.as_ref()),
            teacher_id: normalize_key(teacher_id.as_ref()),
            room_number: normalize_key(room_number.as_ref()),
            student_count: None,
            notes: None,
        }
    }

    pub fn with_student_count(mut self, count: u32) -> Self {
        self.student_count = Some(count);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Overlapping slots that share a teacher or a classroom. Keys compare
    /// case-insensitively.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.time_slot.overlaps(&other.time_slot)
            && (same_key(&self.teacher_id, &other.teacher_id)
                || same_key(&self.room_number, &other.room_number))
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({} in {})",
            self.time_slot, self.subject_code, self.teacher_id, self.room_number
        )
    }
}

/// A problem found by [`Schedule::issues`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// Subject code, teacher id, or the first entry id of a conflicting pair.
    pub entity_id: String,
    pub message: String,
}

/// Classification of schedule issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// Two entries share a teacher or room at overlapping times.
    Conflict,
    /// A subject has fewer scheduled hours than it needs.
    Shortfall,
    /// A teacher is booked beyond `max_hours_per_week`.
    TeacherOverload,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// An ordered collection of conflict-free entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates an entry against the registry and the schedule, then appends it.
    ///
    /// Checks, in order: referenced entities exist, no conflict with
    /// existing entries, teacher available, classroom available, teacher
    /// qualified, classroom capacity. Stored keys take the registry's spelling.
    pub fn add_entry(&mut self, registry: &Registry, mut entry: ScheduleEntry) -> Result<EntryId> {
        if self.get(entry.id).is_some() {
            return Err(TimetableError::DuplicateKey {
                kind: "ScheduleEntry",
                key: entry.id.to_string(),
            });
        }
        canonicalize(registry, &mut entry);
        self.check_entry(registry, &entry, None)?;
        let id = entry.id;
        self.entries.push(entry);
        Ok(id)
    }

    /// Runs the [`add_entry`](Self::add_entry) checks without mutating.
    ///
    /// `ignore` excludes one existing entry from the conflict scan, which is
    /// how a relocation is checked before it is applied.
    pub fn check_entry(
        &self,
        registry: &Registry,
        entry: &ScheduleEntry,
        ignore: Option<EntryId>,
    ) -> Result<()> {
        let subject = registry
            .subject(&entry.subject_code)
            .ok_or_else(|| TimetableError::unavailable("Subject", &entry.subject_code))?;
        let teacher = registry
            .teacher(&entry.teacher_id)
            .ok_or_else(|| TimetableError::unavailable("Teacher", &entry.teacher_id))?;
        let classroom = registry
            .classroom(&entry.room_number)
            .ok_or_else(|| TimetableError::unavailable("Classroom", &entry.room_number))?;

        let conflicting: Vec<String> = self
            .entries
            .iter()
            .filter(|e| Some(e.id) != ignore && e.id != entry.id)
            .filter(|e| {
                e.time_slot.overlaps(&entry.time_slot)
                    && (same_key(&e.teacher_id, &teacher.employee_id)
                        || same_key(&e.room_number, &classroom.room_number))
            })
            .map(|e| e.to_string())
            .collect();
        if !conflicting.is_empty() {
            return Err(TimetableError::Conflict { conflicting });
        }

        if !teacher.is_available_at(&entry.time_slot) {
            return Err(TimetableError::ResourceUnavailable {
                kind: "Teacher",
                key: teacher.employee_id.clone(),
                at: Some(entry.time_slot.to_string()),
            });
        }
        if !classroom.is_available_at(&entry.time_slot) {
            return Err(TimetableError::ResourceUnavailable {
                kind: "Classroom",
                key: classroom.room_number.clone(),
                at: Some(entry.time_slot.to_string()),
            });
        }
        if !teacher.can_teach(&subject.code) {
            return Err(TimetableError::UnqualifiedTeacher {
                teacher: teacher.employee_id.clone(),
                subject: subject.code.clone(),
            });
        }
        if let Some(students) = entry.student_count {
            if !classroom.can_accommodate(students) {
                return Err(TimetableError::CapacityExceeded {
                    room: classroom.room_number.clone(),
                    capacity: classroom.capacity,
                    students,
                });
            }
        }
        Ok(())
    }

    /// Moves an entry to a new slot, atomically.
    ///
    /// The relocated entry is checked against every other entry first; on
    /// failure the schedule is left untouched.
    pub fn relocate(&mut self, registry: &Registry, id: EntryId, slot: TimeSlot) -> Result<()> {
        let index = self.index_of(id)?;
        let mut moved = self.entries[index].clone();
        moved.time_slot = slot;
        canonicalize(registry, &mut moved);
        self.check_entry(registry, &moved, Some(id))?;
        self.entries[index] = moved;
        Ok(())
    }

    /// Removes an entry by id.
    pub fn remove_entry(&mut self, id: EntryId) -> Result<ScheduleEntry> {
        let index = self.index_of(id)?;
        Ok(self.entries.remove(index))
    }

    /// Removes every entry matching `predicate`. Returns how many were removed.
    pub fn remove_where(&mut self, predicate: impl Fn(&ScheduleEntry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !predicate(e));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: EntryId) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Existing entries that would conflict with `entry`.
    pub fn conflicts_for(&self, entry: &ScheduleEntry) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.id != entry.id && entry.conflicts_with(e))
            .collect()
    }

    /// Whether any entry overlaps the slot, regardless of resources.
    pub fn is_slot_taken(&self, slot: &TimeSlot) -> bool {
        self.entries.iter().any(|e| e.time_slot.overlaps(slot))
    }

    /// Whether any entry on the slot's day is adjacent to it.
    pub fn has_adjacent_entry(&self, slot: &TimeSlot) -> bool {
        self.entries.iter().any(|e| e.time_slot.is_adjacent_to(slot))
    }

    /// Whether the teacher already has an entry overlapping the slot.
    pub fn is_teacher_booked(&self, teacher_id: &str, slot: &TimeSlot) -> bool {
        self.entries
            .iter()
            .any(|e| e.teacher_id == teacher_id && e.time_slot.overlaps(slot))
    }

    /// Whether the classroom already has an entry overlapping the slot.
    pub fn is_classroom_booked(&self, room_number: &str, slot: &TimeSlot) -> bool {
        self.entries
            .iter()
            .any(|e| e.room_number == room_number && e.time_slot.overlaps(slot))
    }

    pub fn entries_for_day(&self, day: Weekday) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.time_slot.day() == day)
            .collect()
    }

    pub fn entries_for_teacher(&self, teacher_id: &str) -> Vec<&ScheduleEntry> {
        let key = normalize_key(teacher_id);
        self.entries.iter().filter(|e| e.teacher_id == key).collect()
    }

    pub fn entries_for_classroom(&self, room_number: &str) -> Vec<&ScheduleEntry> {
        let key = normalize_key(room_number);
        self.entries.iter().filter(|e| e.room_number == key).collect()
    }

    pub fn entries_for_subject(&self, subject_code: &str) -> Vec<&ScheduleEntry> {
        let key = normalize_key(subject_code);
        self.entries
            .iter()
            .filter(|e| e.subject_code == key)
            .collect()
    }

    /// Hours taught by one teacher this week, derived from the entries.
    pub fn teacher_weekly_hours(&self, registry: &Registry, teacher_id: &str) -> f64 {
        self.entries_for_teacher(teacher_id)
            .iter()
            .map(|e| session_hours(registry, e))
            .fold(0.0, |acc, h| acc + h)
    }

    /// Weekly hours for every teacher with at least one entry.
    pub fn weekly_hours_by_teacher(&self, registry: &Registry) -> BTreeMap<String, f64> {
        let mut hours: BTreeMap<String, f64> = BTreeMap::new();
        for e in &self.entries {
            *hours.entry(normalize_key(&e.teacher_id)).or_insert(0.0) += session_hours(registry, e);
        }
        hours
    }

    /// Booked hours per classroom per day.
    pub fn classroom_utilization(
        &self,
        registry: &Registry,
    ) -> BTreeMap<String, HashMap<Weekday, f64>> {
        let mut usage: BTreeMap<String, HashMap<Weekday, f64>> = BTreeMap::new();
        for e in &self.entries {
            *usage
                .entry(normalize_key(&e.room_number))
                .or_default()
                .entry(e.time_slot.day())
                .or_insert(0.0) += session_hours(registry, e);
        }
        usage
    }

    /// Validates the whole schedule. Pure; recomputed on every call.
    ///
    /// Reports:
    /// 1. every conflicting pair, once;
    /// 2. subjects whose scheduled hours fall short of their weekly hours;
    /// 3. teachers booked beyond their weekly maximum.
    ///
    /// Weekly hour caps are only reported here; placement does not enforce them.
    pub fn issues(&self, registry: &Registry) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                if a.conflicts_with(b) {
                    issues.push(Issue {
                        kind: IssueKind::Conflict,
                        entity_id: a.id.to_string(),
                        message: format!("Conflict between {a} and {b}"),
                    });
                }
            }
        }

        for subject in registry.subjects() {
            let scheduled: f64 = self
                .entries
                .iter()
                .filter(|e| same_key(&e.subject_code, &subject.code))
                .map(|e| session_hours(registry, e))
                .fold(0.0, |acc, h| acc + h);
            let required = subject.total_hours_per_week();
            if scheduled + 1e-9 < required {
                issues.push(Issue {
                    kind: IssueKind::Shortfall,
                    entity_id: subject.code.clone(),
                    message: format!(
                        "Subject {} ({}) has {scheduled:.1}h scheduled but requires {required:.1}h per week",
                        subject.name, subject.code
                    ),
                });
            }
        }

        for (teacher_id, hours) in self.weekly_hours_by_teacher(registry) {
            let Some(teacher) = registry.teacher(&teacher_id) else {
                continue;
            };
            if hours > f64::from(teacher.max_hours_per_week) + 1e-9 {
                issues.push(Issue {
                    kind: IssueKind::TeacherOverload,
                    entity_id: teacher_id.clone(),
                    message: format!(
                        "Teacher {} ({}) is scheduled for {hours:.1}h but max is {}h",
                        teacher.name, teacher_id, teacher.max_hours_per_week
                    ),
                });
            }
        }

        issues
    }

    /// Issue messages, as returned to callers of the engine.
    pub fn validate(&self, registry: &Registry) -> Vec<String> {
        self.issues(registry)
            .into_iter()
            .map(|issue| issue.message)
            .collect()
    }

    /// Entries grouped per day, in Monday-first order, sorted by start time.
    pub fn by_day(&self) -> Vec<(Weekday, Vec<&ScheduleEntry>)> {
        let mut days: Vec<(Weekday, Vec<&ScheduleEntry>)> = Vec::new();
        let mut day = Weekday::Mon;
        for _ in 0..7 {
            let mut entries = self.entries_for_day(day);
            if !entries.is_empty() {
                entries.sort_by_key(|e| e.time_slot.start());
                days.push((day, entries));
            }
            day = day.succ();
        }
        days
    }

    fn index_of(&self, id: EntryId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| TimetableError::not_found("ScheduleEntry", id.to_string()))
    }
}

/// Rewrites an entry's keys to the registry's spelling. Unknown keys are
/// left for [`Schedule::check_entry`] to reject.
fn canonicalize(registry: &Registry, entry: &mut ScheduleEntry) {
    if let Some(subject) = registry.subject(&entry.subject_code) {
        entry.subject_code = subject.code.clone();
    }
    if let Some(teacher) = registry.teacher(&entry.teacher_id) {
        entry.teacher_id = teacher.employee_id.clone();
    }
    if let Some(classroom) = registry.classroom(&entry.room_number) {
        entry.room_number = classroom.room_number.clone();
    }
}

fn same_key(a: &str, b: &str) -> bool {
    a == b || normalize_key(a) == normalize_key(b)
}

/// Length of a placed session in hours.
///
/// Uses the subject's session length; the slot length is a fallback for
/// entries whose subject is no longer registered.
pub fn session_hours(registry: &Registry, entry: &ScheduleEntry) -> f64 {
    let minutes = registry
        .subject(&entry.subject_code)
        .map(|s| s.duration_minutes)
        .unwrap_or_else(|| entry.time_slot.duration_minutes());
    f64::from(minutes) / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classroom, Subject, Teacher};

    fn slot(day: Weekday, start: (u32, u32), end: (u32, u32)) -> TimeSlot {
        TimeSlot::from_hm(day, start, end).unwrap()
    }

    fn registry() -> Registry {
        let mut r = Registry::new();
        r.add_subject(Subject::new("CS101", "Programming", 60).with_sessions_per_week(2))
            .unwrap();
        r.add_subject(Subject::new("MATH1", "Calculus", 90)).unwrap();
        r.add_teacher(Teacher::new("T1", "Ada").with_subject("CS101").with_subject("MATH1"))
            .unwrap();
        r.add_teacher(Teacher::new("T2", "Bob").with_subject("CS101"))
            .unwrap();
        r.add_classroom(Classroom::new("R1", "Room 1", 30)).unwrap();
        r.add_classroom(Classroom::new("R2", "Room 2", 60)).unwrap();
        r
    }

    #[test]
    fn test_add_entry() {
        let reg = registry();
        let mut s = Schedule::new();
        let id = s
            .add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "cs101", "t1", "r1"),
            )
            .unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(id).unwrap().subject_code, "CS101");
    }

    #[test]
    fn test_conflict_on_teacher_or_room() {
        let reg = registry();
        let mut s = Schedule::new();
        s.add_entry(
            &reg,
            ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "CS101", "T1", "R1"),
        )
        .unwrap();

        // same teacher, different room, different subject
        let err = s
            .add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Mon, (9, 30), (10, 30)), "MATH1", "T1", "R2"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            TimetableError::Conflict { ref conflicting } if conflicting.len() == 1
        ));

        // same room, different teacher
        let err = s
            .add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "CS101", "T2", "R1"),
            )
            .unwrap_err();
        assert!(matches!(err, TimetableError::Conflict { .. }));

        // different teacher and room at the same time is fine
        assert!(s
            .add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "CS101", "T2", "R2"),
            )
            .is_ok());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_hand_edited_keys_still_conflict() {
        let reg = registry();
        let mut s = Schedule::new();
        let mon = slot(Weekday::Mon, (9, 0), (10, 0));
        s.add_entry(&reg, ScheduleEntry::new(mon, "CS101", "T1", "R1"))
            .unwrap();

        let mut clash = ScheduleEntry::new(mon, "CS101", "T1", "R2");
        clash.teacher_id = " t1".into();
        assert!(matches!(
            s.add_entry(&reg, clash),
            Err(TimetableError::Conflict { .. })
        ));

        let mut other = ScheduleEntry::new(mon, "CS101", "T2", "R2");
        other.teacher_id = "t2".into();
        other.room_number = "r2".into();
        other.subject_code = "cs101".into();
        let id = s.add_entry(&reg, other).unwrap();
        let stored = s.get(id).unwrap();
        assert_eq!(stored.teacher_id, "T2");
        assert_eq!(stored.room_number, "R2");
        assert_eq!(stored.subject_code, "CS101");
        assert!(s.validate(&reg).iter().all(|m| !m.starts_with("Conflict")));
    }

    #[test]
    fn test_conflicts_with_ignores_key_case() {
        let mon = slot(Weekday::Mon, (9, 0), (10, 0));
        let a = ScheduleEntry::new(mon, "CS101", "T1", "R1");
        let mut b = ScheduleEntry::new(mon, "CS101", "T9", "R9");
        b.room_number = "r1".into();
        assert!(a.conflicts_with(&b));
    }

    #[test]
    fn test_classroom_unavailable() {
        let mut reg = registry();
        let mon = slot(Weekday::Mon, (9, 0), (10, 0));
        reg.add_classroom(Classroom::new("R3", "Room 3", 30).with_maintenance(mon))
            .unwrap();
        reg.add_classroom(
            Classroom::new("R4", "Room 4", 30).with_status(crate::models::RoomStatus::Closed),
        )
        .unwrap();
        let mut s = Schedule::new();

        for room in ["R3", "R4"] {
            let err = s
                .add_entry(&reg, ScheduleEntry::new(mon, "CS101", "T1", room))
                .unwrap_err();
            assert!(matches!(
                err,
                TimetableError::ResourceUnavailable { kind: "Classroom", ref key, .. }
                    if key == room
            ));
        }
        // outside the maintenance window R3 is bookable
        assert!(s
            .add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Mon, (10, 0), (11, 0)), "CS101", "T1", "R3")
            )
            .is_ok());
    }

    #[test]
    fn test_empty_subject_shortfall_reports_zero_hours() {
        let reg = registry();
        let messages = Schedule::new().validate(&reg);
        let expected = "Subject Programming (CS101) has 0.0h scheduled but requires 2.0h per week";
        assert!(messages.iter().any(|m| m == expected));
        assert!(messages.iter().all(|m| !m.contains("-0.0")));
    }

    #[test]
    fn test_add_entry_errors() {
        let reg = registry();
        let mut s = Schedule::new();
        let mon = slot(Weekday::Mon, (9, 0), (10, 0));

        assert!(matches!(
            s.add_entry(&reg, ScheduleEntry::new(mon, "NOPE", "T1", "R1")),
            Err(TimetableError::ResourceUnavailable { kind: "Subject", .. })
        ));
        assert!(matches!(
            s.add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Sat, (9, 0), (10, 0)), "CS101", "T1", "R1")
            ),
            Err(TimetableError::ResourceUnavailable { kind: "Teacher", .. })
        ));
        assert!(matches!(
            s.add_entry(&reg, ScheduleEntry::new(mon, "MATH1", "T2", "R1")),
            Err(TimetableError::UnqualifiedTeacher { .. })
        ));
        assert!(matches!(
            s.add_entry(
                &reg,
                ScheduleEntry::new(mon, "CS101", "T1", "R1").with_student_count(31)
            ),
            Err(TimetableError::CapacityExceeded { capacity: 30, students: 31, .. })
        ));
        assert!(s.is_empty());
    }

    #[test]
    fn test_remove_entry() {
        let reg = registry();
        let mut s = Schedule::new();
        let id = s
            .add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "CS101", "T1", "R1"),
            )
            .unwrap();
        assert!(s.remove_entry(id).is_ok());
        assert!(s.is_empty());
        assert!(matches!(
            s.remove_entry(id),
            Err(TimetableError::NotFound { .. })
        ));
    }

    #[test]
    fn test_relocate_is_atomic() {
        let reg = registry();
        let mut s = Schedule::new();
        let a = s
            .add_entry(
                &reg,
                ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "CS101", "T1", "R1"),
            )
            .unwrap();
        s.add_entry(
            &reg,
            ScheduleEntry::new(slot(Weekday::Mon, (11, 0), (12, 0)), "CS101", "T1", "R2"),
        )
        .unwrap();

        // collides with the 11:00 entry on T1
        let err = s
            .relocate(&reg, a, slot(Weekday::Mon, (11, 0), (12, 0)))
            .unwrap_err();
        assert!(matches!(err, TimetableError::Conflict { .. }));
        assert_eq!(s.get(a).unwrap().time_slot, slot(Weekday::Mon, (9, 0), (10, 0)));
        assert_eq!(s.len(), 2);

        // overlapping its own old slot is fine
        s.relocate(&reg, a, slot(Weekday::Mon, (9, 30), (10, 30)))
            .unwrap();
        assert_eq!(
            s.get(a).unwrap().time_slot,
            slot(Weekday::Mon, (9, 30), (10, 30))
        );
    }

    #[test]
    fn test_queries() {
        let reg = registry();
        let mut s = Schedule::new();
        s.add_entry(
            &reg,
            ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "CS101", "T1", "R1"),
        )
        .unwrap();
        s.add_entry(
            &reg,
            ScheduleEntry::new(slot(Weekday::Tue, (9, 0), (10, 30)), "MATH1", "T1", "R2"),
        )
        .unwrap();
        s.add_entry(
            &reg,
            ScheduleEntry::new(slot(Weekday::Mon, (10, 0), (11, 0)), "CS101", "T2", "R1"),
        )
        .unwrap();

        assert_eq!(s.entries_for_day(Weekday::Mon).len(), 2);
        assert_eq!(s.entries_for_teacher("t1").len(), 2);
        assert_eq!(s.entries_for_classroom("R1").len(), 2);
        assert_eq!(s.entries_for_subject("MATH1").len(), 1);

        assert!((s.teacher_weekly_hours(&reg, "T1") - 2.5).abs() < 1e-10);
        let hours = s.weekly_hours_by_teacher(&reg);
        assert!((hours["T2"] - 1.0).abs() < 1e-10);

        let usage = s.classroom_utilization(&reg);
        assert!((usage["R1"][&Weekday::Mon] - 2.0).abs() < 1e-10);

        let grouped = s.by_day();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, Weekday::Mon);
        assert_eq!(grouped[0].1[0].time_slot.start(), slot(Weekday::Mon, (9, 0), (10, 0)).start());
        assert_eq!(grouped[1].0, Weekday::Tue);

        assert!(s.is_slot_taken(&slot(Weekday::Mon, (9, 30), (10, 30))));
        assert!(!s.is_slot_taken(&slot(Weekday::Wed, (9, 0), (10, 0))));
        assert!(s.has_adjacent_entry(&slot(Weekday::Mon, (11, 0), (12, 0))));
        assert!(s.is_teacher_booked("T2", &slot(Weekday::Mon, (10, 0), (11, 0))));
        assert!(!s.is_classroom_booked("R2", &slot(Weekday::Mon, (10, 0), (11, 0))));
    }

    #[test]
    fn test_validate_reports_shortfall_and_overload() {
        let mut reg = Registry::new();
        reg.add_subject(Subject::new("LAB1", "Lab", 90).with_sessions_per_week(2))
            .unwrap();
        reg.add_teacher(
            Teacher::new("T1", "Ada")
                .with_subject("LAB1")
                .with_hour_limits(2, 2, 2),
        )
        .unwrap();
        reg.add_classroom(Classroom::new("R1", "Room", 30)).unwrap();

        let mut s = Schedule::new();
        s.add_entry(
            &reg,
            ScheduleEntry::new(slot(Weekday::Mon, (9, 0), (10, 0)), "LAB1", "T1", "R1"),
        )
        .unwrap();

        let issues = s.issues(&reg);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Shortfall);
        assert!(issues[0].message.contains("1.5h scheduled but requires 3.0h"));

        s.add_entry(
            &reg,
            ScheduleEntry::new(slot(Weekday::Tue, (9, 0), (10, 0)), "LAB1", "T1", "R1"),
        )
        .unwrap();
        let issues = s.issues(&reg);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::TeacherOverload);
        assert_eq!(issues[0].entity_id, "T1");
    }

    #[test]
    fn test_validate_reports_conflict_pairs_once() {
        let reg = registry();
        let mut s = Schedule::new();
        let mon = slot(Weekday::Mon, (9, 0), (10, 0));
        // bypass add_entry to build an invalid schedule
        s.entries.push(ScheduleEntry::new(mon, "CS101", "T1", "R1"));
        s.entries.push(ScheduleEntry::new(mon, "CS101", "T1", "R2"));
        s.entries.push(ScheduleEntry::new(mon, "MATH1", "T2", "R2"));

        let conflicts: Vec<_> = s
            .issues(&reg)
            .into_iter()
            .filter(|i| i.kind == IssueKind::Conflict)
            .collect();
        assert_eq!(conflicts.len(), 2);
        assert!(s.validate(&reg)[0].starts_with("Conflict between"));
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert!(s.is_empty());
        assert!(s.validate(&Registry::new()).is_empty());
    }
}
