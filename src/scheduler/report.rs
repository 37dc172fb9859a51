//! Schedule report and statistics.
//!
//! Computes summary indicators from a timetable's current schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Success Rate | placed entries / required sessions * 100, clamped to [0, 100] |
//! | Total Teaching Hours | Sum of session hours over all entries |
//! | Avg Teacher Hours | Mean weekly hours over teachers with entries |
//! | Schedule Conflicts | Conflicting entry pairs |
//! | Classroom Utilization | Booked hours per room per day |

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::IssueKind;
use crate::timetable::Timetable;

/// Aggregate figures for a timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableStatistics {
    pub total_entries: usize,
    pub total_subjects: usize,
    pub total_teachers: usize,
    pub total_classrooms: usize,
    /// Mean weekly hours over teachers with at least one entry.
    pub average_teacher_hours: f64,
    pub total_teaching_hours: f64,
    pub schedule_conflicts: usize,
    /// Weekly hours per teacher with at least one entry.
    pub teacher_hours: BTreeMap<String, f64>,
    /// Booked hours per classroom per day.
    pub classroom_utilization: BTreeMap<String, HashMap<Weekday, f64>>,
}

impl TimetableStatistics {
    pub fn calculate(timetable: &Timetable) -> Self {
        let registry = timetable.registry();
        let schedule = timetable.schedule();

        let teacher_hours = schedule.weekly_hours_by_teacher(registry);
        let total_teaching_hours = teacher_hours.values().fold(0.0, |acc, h| acc + h);
        let average_teacher_hours = if teacher_hours.is_empty() {
            0.0
        } else {
            total_teaching_hours / teacher_hours.len() as f64
        };
        let schedule_conflicts = schedule
            .issues(registry)
            .iter()
            .filter(|i| i.kind == IssueKind::Conflict)
            .count();

        Self {
            total_entries: schedule.len(),
            total_subjects: registry.subject_count(),
            total_teachers: registry.teacher_count(),
            total_classrooms: registry.classroom_count(),
            average_teacher_hours,
            total_teaching_hours,
            schedule_conflicts,
            teacher_hours,
            classroom_utilization: schedule.classroom_utilization(registry),
        }
    }
}

/// Outcome summary of a scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    /// Whether any entry is placed.
    pub schedule_generated: bool,
    pub total_entries: usize,
    /// Percentage of required sessions placed (0.0..=100.0).
    pub success_rate: f64,
    /// Validation messages: conflicts, shortfalls, teacher overloads.
    pub issues: Vec<String>,
    pub statistics: TimetableStatistics,
}

impl ScheduleReport {
    /// Builds the report from the timetable's current state.
    pub fn calculate(timetable: &Timetable) -> Self {
        let schedule = timetable.schedule();
        let required = timetable.registry().total_required_sessions();

        Self {
            schedule_generated: !schedule.is_empty(),
            total_entries: schedule.len(),
            success_rate: success_rate(schedule.len(), required),
            issues: timetable.validate(),
            statistics: TimetableStatistics::calculate(timetable),
        }
    }

    /// Whether the success rate reaches `min_rate` and no conflict exists.
    pub fn meets_threshold(&self, min_rate: f64) -> bool {
        self.success_rate >= min_rate && self.statistics.schedule_conflicts == 0
    }
}

/// `placed / required * 100`, 100 when nothing is required, clamped to [0, 100].
pub fn success_rate(placed: usize, required: u32) -> f64 {
    if required == 0 {
        return 100.0;
    }
    (placed as f64 / f64::from(required) * 100.0).clamp(0.0, 100.0)
}
