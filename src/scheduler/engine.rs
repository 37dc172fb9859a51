//! Greedy assignment engine.
//!
//! # Algorithm
//!
//! 1. Build the slot universe: one-hour steps from the daily start on each
//!    working day, skipping over the lunch break.
//! 2. Order subjects with [`SubjectOrdering`].
//! 3. For each subject, run up to `max_attempts` placement trials until its
//!    weekly sessions are met. A trial:
//!    - keeps slots not overlapped by any placed entry,
//!    - picks the first highest-scoring slot,
//!    - picks the least-loaded qualified, available, unbooked teacher,
//!    - picks the unbooked suitable classroom whose capacity is closest to
//!      the expected class size,
//!    - commits through [`Timetable::add_entry`]. Any error wastes the trial.
//! 4. Optionally compact teacher gaps by relocating entries.
//!
//! The heuristic has no lookahead and never undoes a placement. Subjects
//! left short are reported, not treated as errors.
//!
//! # Slot Score
//!
//! | Condition | Score |
//! |-----------|-------|
//! | morning preferred and slot starts before 12:00 | +10 |
//! | adjacent to a placed entry | +5 |
//! | overlaps the lunch break | -15 |
//! | lab subject on Tuesday or Thursday | +8 |
//! | random jitter | `[0, 2)` |
//!
//! # Complexity
//! O(s * a * n * e) where s=subjects, a=max_attempts, n=slots, e=entries.
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated timetabling"

use chrono::{Duration, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::constraints::SchedulingConstraints;
use super::ordering::SubjectOrdering;
use super::report::ScheduleReport;
use crate::error::{Result, TimetableError};
use crate::models::{
    Classroom, EntryId, Schedule, ScheduleEntry, Subject, SubjectType, Teacher, TimeSlot,
};
use crate::timetable::{Timetable, WeekSettings};

/// Length of a generated slot (minutes).
pub const SLOT_MINUTES: i64 = 60;
/// Bonus for a morning slot when mornings are preferred.
pub const MORNING_BONUS: f64 = 10.0;
/// Bonus for a slot next to a placed entry.
pub const ADJACENCY_BONUS: f64 = 5.0;
/// Penalty for a slot overlapping the lunch break.
pub const LUNCH_PENALTY: f64 = 15.0;
/// Bonus for a lab subject on a lab day.
pub const LAB_DAY_BONUS: f64 = 8.0;
/// Days preferred for lab sessions.
pub const LAB_DAYS: [Weekday; 2] = [Weekday::Tue, Weekday::Thu];
/// Upper bound (exclusive) of the random jitter added to each score.
pub const SCORE_JITTER: f64 = 2.0;

/// A subject placed fewer times than it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub subject_code: String,
    pub scheduled: u32,
    pub required: u32,
}

/// Result of one [`Scheduler::generate`] run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Entries placed by the greedy pass.
    pub placed: usize,
    /// Sum of `sessions_per_week` over all subjects.
    pub required: u32,
    pub shortfalls: Vec<Shortfall>,
    /// Entries moved by the optimization pass.
    pub relocated: usize,
}

impl GenerationOutcome {
    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

/// Greedy timetable scheduler.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Classroom, Subject, Teacher};
/// use u_timetable::scheduler::{Scheduler, SchedulingConstraints};
/// use u_timetable::Timetable;
///
/// let mut timetable = Timetable::new("Spring");
/// timetable.add_subject(Subject::new("CS101", "Programming", 60).with_sessions_per_week(2)).unwrap();
/// timetable.add_teacher(Teacher::new("T1", "Ada").with_subject("CS101")).unwrap();
/// timetable.add_classroom(Classroom::new("R1", "Room 1", 30)).unwrap();
///
/// let mut scheduler = Scheduler::new(SchedulingConstraints::default()).unwrap().with_seed(7);
/// let outcome = scheduler.generate(&mut timetable, false).unwrap();
/// assert_eq!(outcome.placed, 2);
/// assert!(scheduler.report(&timetable).success_rate > 99.9);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    constraints: SchedulingConstraints,
    ordering: SubjectOrdering,
    rng: StdRng,
}

impl Scheduler {
    /// Creates a scheduler with an OS-seeded random source.
    pub fn new(constraints: SchedulingConstraints) -> Result<Self> {
        constraints.validate()?;
        Ok(Self {
            constraints,
            ordering: SubjectOrdering::default(),
            rng: StdRng::from_os_rng(),
        })
    }

    /// Reseeds the random source for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replaces the subject ordering.
    pub fn with_ordering(mut self, ordering: SubjectOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn constraints(&self) -> &SchedulingConstraints {
        &self.constraints
    }

    /// Candidate slots for a week, Monday-first, in time order per day.
    ///
    /// A step whose hour overlaps the lunch break jumps to the end of the
    /// break. Steps ending after `daily_end` are dropped.
    pub fn time_slots(&self, week: &WeekSettings) -> Vec<TimeSlot> {
        let lunch_start = self.constraints.lunch_break_start;
        let lunch_end = self.constraints.lunch_break_end;
        let step = Duration::minutes(SLOT_MINUTES);
        let mut slots = Vec::new();

        for day in week.ordered_days() {
            let mut current = week.daily_start;
            while current < week.daily_end {
                let (end, wrapped) = current.overflowing_add_signed(step);
                if wrapped != 0 {
                    break;
                }
                if current < lunch_end && lunch_start < end {
                    current = lunch_end;
                    continue;
                }
                if end > week.daily_end {
                    break;
                }
                match TimeSlot::new(day, current, end) {
                    Ok(slot) => slots.push(slot),
                    Err(_) => break,
                }
                current = end;
            }
        }
        slots
    }

    /// Clears the schedule and places every subject's sessions.
    ///
    /// Fails only on invalid week settings, before anything is placed.
    /// Placement failures are absorbed and reported as shortfalls.
    pub fn generate(
        &mut self,
        timetable: &mut Timetable,
        optimize: bool,
    ) -> Result<GenerationOutcome> {
        timetable.week.validate()?;
        timetable.clear_schedule();

        let slots = self.time_slots(&timetable.week);
        let subjects: Vec<Subject> = self
            .ordering
            .sort(timetable.registry().subjects())
            .into_iter()
            .cloned()
            .collect();

        tracing::info!(
            timetable = %timetable.name,
            subjects = subjects.len(),
            slots = slots.len(),
            "generating schedule"
        );

        let mut outcome = GenerationOutcome {
            required: timetable.registry().total_required_sessions(),
            ..GenerationOutcome::default()
        };

        for subject in &subjects {
            let scheduled = self.schedule_subject(timetable, subject, &slots);
            outcome.placed += scheduled as usize;
            if scheduled < subject.sessions_per_week {
                tracing::warn!(
                    subject = %subject.code,
                    scheduled,
                    required = subject.sessions_per_week,
                    "could only schedule {scheduled}/{} sessions for {}",
                    subject.sessions_per_week,
                    subject.name
                );
                outcome.shortfalls.push(Shortfall {
                    subject_code: subject.code.clone(),
                    scheduled,
                    required: subject.sessions_per_week,
                });
            }
        }

        if optimize {
            outcome.relocated = self.compact_teacher_gaps(timetable, &slots);
        }

        tracing::info!(
            placed = outcome.placed,
            required = outcome.required,
            relocated = outcome.relocated,
            "schedule generated"
        );
        Ok(outcome)
    }

    /// Runs placement trials for one subject. Returns sessions placed.
    fn schedule_subject(
        &mut self,
        timetable: &mut Timetable,
        subject: &Subject,
        slots: &[TimeSlot],
    ) -> u32 {
        let mut placed = 0;
        let mut attempts = 0;

        while placed < subject.sessions_per_week && attempts < self.constraints.max_attempts {
            attempts += 1;

            let Some(slot) = self.best_slot(timetable.schedule(), subject, slots) else {
                tracing::debug!(subject = %subject.code, "no free slot left");
                break;
            };
            let Some(teacher) = self.find_teacher(timetable, subject, &slot) else {
                tracing::debug!(subject = %subject.code, %slot, "no teacher available");
                continue;
            };
            let Some(classroom) = self.find_classroom(timetable, subject, &slot) else {
                tracing::debug!(subject = %subject.code, %slot, "no classroom available");
                continue;
            };

            let entry = ScheduleEntry::new(slot, &subject.code, &teacher, &classroom);
            match timetable.add_entry(entry) {
                Ok(_) => placed += 1,
                Err(e) => {
                    tracing::debug!(
                        subject = %subject.code,
                        %slot,
                        error = %e,
                        "placement rejected"
                    );
                }
            }
        }

        tracing::debug!(subject = %subject.code, placed, attempts, "subject done");
        placed
    }

    /// First highest-scoring slot not overlapped by any placed entry.
    fn best_slot(
        &mut self,
        schedule: &Schedule,
        subject: &Subject,
        slots: &[TimeSlot],
    ) -> Option<TimeSlot> {
        let mut best: Option<(TimeSlot, f64)> = None;
        for slot in slots.iter().filter(|s| !schedule.is_slot_taken(s)) {
            let score = self.score_slot(schedule, subject, slot);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((*slot, score));
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// Heuristic score plus random jitter in `[0, SCORE_JITTER)`.
    pub fn score_slot(&mut self, schedule: &Schedule, subject: &Subject, slot: &TimeSlot) -> f64 {
        self.base_score(schedule, subject, slot) + self.rng.random_range(0.0..SCORE_JITTER)
    }

    /// Heuristic score without jitter.
    pub fn base_score(&self, schedule: &Schedule, subject: &Subject, slot: &TimeSlot) -> f64 {
        let mut score = 0.0;
        if self.constraints.prefer_morning_sessions && slot.starts_before_noon() {
            score += MORNING_BONUS;
        }
        if schedule.has_adjacent_entry(slot) {
            score += ADJACENCY_BONUS;
        }
        if slot.overlaps_window(
            self.constraints.lunch_break_start,
            self.constraints.lunch_break_end,
        ) {
            score -= LUNCH_PENALTY;
        }
        if subject.subject_type == SubjectType::Lab && LAB_DAYS.contains(&slot.day()) {
            score += LAB_DAY_BONUS;
        }
        score
    }

    /// Least-loaded teacher who can take the session. Returns the employee id.
    fn find_teacher(
        &self,
        timetable: &Timetable,
        subject: &Subject,
        slot: &TimeSlot,
    ) -> Option<String> {
        let schedule = timetable.schedule();
        let registry = timetable.registry();
        registry
            .teachers()
            .filter(|t| is_teacher_free(schedule, t, subject, slot))
            .map(|t| (t, schedule.teacher_weekly_hours(registry, &t.employee_id)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(t, _)| t.employee_id.clone())
    }

    /// Suitable free classroom with capacity closest to the expected class size.
    fn find_classroom(
        &self,
        timetable: &Timetable,
        subject: &Subject,
        slot: &TimeSlot,
    ) -> Option<String> {
        let schedule = timetable.schedule();
        let class_size = subject.expected_class_size();
        timetable
            .registry()
            .classrooms()
            .filter(|c| is_classroom_free(schedule, c, subject, slot))
            .min_by_key(|c| c.capacity.abs_diff(class_size))
            .map(|c| c.room_number.clone())
    }

    /// Moves entries earlier to close gaps in each teacher's day.
    ///
    /// An entry that starts after a gap is relocated to the candidate slot
    /// starting when the teacher's previous entry ends, if that move is
    /// valid. Entries are never removed. Returns the number moved.
    pub fn compact_teacher_gaps(&self, timetable: &mut Timetable, slots: &[TimeSlot]) -> usize {
        let teacher_ids: Vec<String> = timetable
            .registry()
            .teachers()
            .map(|t| t.employee_id.clone())
            .collect();
        let days = timetable.week.ordered_days();
        let mut moved = 0;

        for teacher_id in &teacher_ids {
            for &day in &days {
                let mut day_entries: Vec<(EntryId, TimeSlot)> = timetable
                    .schedule()
                    .entries_for_teacher(teacher_id)
                    .into_iter()
                    .filter(|e| e.time_slot.day() == day)
                    .map(|e| (e.id, e.time_slot))
                    .collect();
                day_entries.sort_by_key(|(_, slot)| slot.start());

                let mut previous_end: Option<NaiveTime> = None;
                for (id, slot) in day_entries {
                    let target = previous_end
                        .filter(|end| slot.start() > *end)
                        .and_then(|end| slots.iter().find(|s| s.day() == day && s.start() == end));
                    if let Some(target) = target {
                        match timetable.relocate_entry(id, *target) {
                            Ok(()) => {
                                tracing::debug!(
                                    teacher = %teacher_id,
                                    from = %slot,
                                    to = %target,
                                    "closed gap"
                                );
                                moved += 1;
                                previous_end = Some(target.end());
                                continue;
                            }
                            Err(e) => {
                                tracing::debug!(
                                    teacher = %teacher_id,
                                    %slot,
                                    error = %e,
                                    "gap kept"
                                );
                            }
                        }
                    }
                    previous_end = Some(slot.end());
                }
            }
        }
        moved
    }

    /// Moves an entry to a new slot, atomically.
    ///
    /// On failure the schedule is unchanged and the error is returned.
    pub fn reschedule(&self, timetable: &mut Timetable, id: EntryId, slot: TimeSlot) -> Result<()> {
        match timetable.relocate_entry(id, slot) {
            Ok(()) => {
                tracing::info!(entry = %id, %slot, "entry rescheduled");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(entry = %id, %slot, error = %e, "reschedule rejected");
                Err(e)
            }
        }
    }

    /// Ranked slots where the subject could be placed now.
    ///
    /// Only slots free of placed entries with both a teacher and a
    /// classroom available are returned, best first. Scores carry no
    /// jitter, so equal-scoring slots keep their slot order.
    pub fn suggestions(
        &self,
        timetable: &Timetable,
        subject_code: &str,
    ) -> Result<Vec<(TimeSlot, f64)>> {
        let subject = timetable
            .registry()
            .subject(subject_code)
            .ok_or_else(|| TimetableError::not_found("Subject", subject_code))?;
        let schedule = timetable.schedule();

        let mut ranked: Vec<(TimeSlot, f64)> = self
            .time_slots(&timetable.week)
            .into_iter()
            .filter(|slot| !schedule.is_slot_taken(slot))
            .filter(|slot| {
                self.find_teacher(timetable, subject, slot).is_some()
                    && self.find_classroom(timetable, subject, slot).is_some()
            })
            .map(|slot| {
                let score = self.base_score(schedule, subject, &slot);
                (slot, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }

    /// Summarizes the timetable's current schedule.
    pub fn report(&self, timetable: &Timetable) -> ScheduleReport {
        ScheduleReport::calculate(timetable)
    }
}

fn is_teacher_free(
    schedule: &Schedule,
    teacher: &Teacher,
    subject: &Subject,
    slot: &TimeSlot,
) -> bool {
    teacher.can_teach(&subject.code)
        && teacher.is_available_at(slot)
        && !schedule.is_teacher_booked(&teacher.employee_id, slot)
}

fn is_classroom_free(
    schedule: &Schedule,
    classroom: &Classroom,
    subject: &Subject,
    slot: &TimeSlot,
) -> bool {
    classroom.meets_requirements(subject)
        && classroom.is_available_at(slot)
        && !schedule.is_classroom_booked(&classroom.room_number, slot)
}
