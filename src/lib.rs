//! Weekly timetable assignment engine.
//!
//! Places the weekly sessions of subjects into time slots, with a teacher
//! and a classroom for each, while respecting availability, qualification,
//! equipment, and conflict constraints.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeSlot`, `Subject`, `Teacher`,
//!   `Classroom`, `ScheduleEntry`, `Schedule`
//! - **`registry`**: Keyed entity collections
//! - **`timetable`**: Registry + schedule + teaching week, with cascading removal
//! - **`scheduler`**: Greedy placement engine, constraints, ordering, reporting
//! - **`validation`**: Input integrity checks (dangling codes, prerequisite cycles, unmatched subjects)
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{Classroom, Subject, Teacher};
//! use u_timetable::scheduler::{Scheduler, SchedulingConstraints};
//! use u_timetable::Timetable;
//!
//! let mut timetable = Timetable::new("Fall 2026");
//! timetable.add_subject(Subject::new("MATH101", "Calculus", 60).with_sessions_per_week(3)).unwrap();
//! timetable.add_teacher(Teacher::new("T-01", "Ada").with_subject("MATH101")).unwrap();
//! timetable.add_classroom(Classroom::new("A-101", "Room A101", 40)).unwrap();
//!
//! let mut scheduler = Scheduler::new(SchedulingConstraints::default()).unwrap().with_seed(1);
//! scheduler.generate(&mut timetable, true).unwrap();
//!
//! let report = scheduler.report(&timetable);
//! assert_eq!(report.total_entries, 3);
//! assert!(report.issues.is_empty());
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod error;
pub mod models;
pub mod registry;
pub mod scheduler;
pub mod timetable;
pub mod validation;

pub use error::{Result, TimetableError};
pub use registry::Registry;
pub use timetable::{Timetable, WeekSettings};
