//! Greedy timetable scheduler and reporting.
//!
//! # Algorithm
//!
//! `Scheduler` uses a greedy, priority-ordered, best-scored-slot heuristic
//! with load-balanced teacher selection. It is not optimal and never
//! backtracks, but it is bounded by `max_attempts` per subject.
//!
//! # Report
//!
//! `ScheduleReport` computes the success rate, validation issues, and
//! teacher and classroom statistics of a schedule.
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

mod constraints;
mod engine;
pub mod ordering;
mod report;

pub use constraints::SchedulingConstraints;
pub use engine::{
    GenerationOutcome, Scheduler, Shortfall, ADJACENCY_BONUS, LAB_DAYS, LAB_DAY_BONUS,
    LUNCH_PENALTY, MORNING_BONUS, SCORE_JITTER, SLOT_MINUTES,
};
pub use ordering::{OrderingRule, SubjectOrdering, TieBreaker};
pub use report::{success_rate, ScheduleReport, TimetableStatistics};
