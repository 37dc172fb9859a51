//! Resource registry: subjects, teachers and classrooms keyed by their
//! upper-cased identifiers.
//!
//! The registry only knows about entities. Removing an entity that is
//! referenced by schedule entries must go through
//! [`Timetable`](crate::Timetable), which cascades the removal.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, TimetableError};
use crate::models::{normalize_key, Classroom, Subject, Teacher};

/// Keyed entity collections.
///
/// Iteration order is by key, so engine tie-breaks are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    subjects: BTreeMap<String, Subject>,
    teachers: BTreeMap<String, Teacher>,
    classrooms: BTreeMap<String, Classroom>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes keys, validates, and registers a subject.
    pub fn add_subject(&mut self, mut subject: Subject) -> Result<()> {
        subject.normalize_keys();
        subject.validate()?;
        insert_unique(&mut self.subjects, "Subject", subject.code.clone(), subject)
    }

    /// Normalizes keys, validates, and registers a teacher.
    pub fn add_teacher(&mut self, mut teacher: Teacher) -> Result<()> {
        teacher.normalize_keys();
        teacher.validate()?;
        insert_unique(
            &mut self.teachers,
            "Teacher",
            teacher.employee_id.clone(),
            teacher,
        )
    }

    /// Normalizes keys, validates, and registers a classroom.
    pub fn add_classroom(&mut self, mut classroom: Classroom) -> Result<()> {
        classroom.normalize_keys();
        classroom.validate()?;
        insert_unique(
            &mut self.classrooms,
            "Classroom",
            classroom.room_number.clone(),
            classroom,
        )
    }

    pub fn remove_subject(&mut self, code: &str) -> Result<Subject> {
        self.subjects
            .remove(&normalize_key(code))
            .ok_or_else(|| TimetableError::not_found("Subject", code))
    }

    pub fn remove_teacher(&mut self, employee_id: &str) -> Result<Teacher> {
        self.teachers
            .remove(&normalize_key(employee_id))
            .ok_or_else(|| TimetableError::not_found("Teacher", employee_id))
    }

    pub fn remove_classroom(&mut self, room_number: &str) -> Result<Classroom> {
        self.classrooms
            .remove(&normalize_key(room_number))
            .ok_or_else(|| TimetableError::not_found("Classroom", room_number))
    }

    pub fn subject(&self, code: &str) -> Option<&Subject> {
        self.subjects.get(&normalize_key(code))
    }

    pub fn teacher(&self, employee_id: &str) -> Option<&Teacher> {
        self.teachers.get(&normalize_key(employee_id))
    }

    pub fn classroom(&self, room_number: &str) -> Option<&Classroom> {
        self.classrooms.get(&normalize_key(room_number))
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.values()
    }

    pub fn classrooms(&self) -> impl Iterator<Item = &Classroom> {
        self.classrooms.values()
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    pub fn teacher_count(&self) -> usize {
        self.teachers.len()
    }

    pub fn classroom_count(&self) -> usize {
        self.classrooms.len()
    }

    /// Sum of `sessions_per_week` over all subjects.
    pub fn total_required_sessions(&self) -> u32 {
        self.subjects.values().map(|s| s.sessions_per_week).sum()
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: &'static str,
    key: String,
    value: T,
) -> Result<()> {
    if map.contains_key(&key) {
        return Err(TimetableError::DuplicateKey { kind, key });
    }
    map.insert(key, value);
    Ok(())
}
