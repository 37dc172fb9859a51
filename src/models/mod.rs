//! Timetabling domain models.
//!
//! Provides the core data types for a weekly timetable: the entities to
//! be scheduled and the schedule that places them.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | School | Training Center |
//! |-------------|------------|--------|-----------------|
//! | Subject | Course | Class | Module |
//! | Teacher | Lecturer | Teacher | Trainer |
//! | Classroom | Lecture Hall / Lab | Room | Training Room |
//! | Schedule | Term Timetable | Weekly Plan | Session Plan |

mod availability;
mod classroom;
mod schedule;
mod subject;
mod teacher;
mod time_slot;

pub use availability::{Availability, WEEKDAYS};
pub use classroom::{Classroom, RoomFeatures, RoomStatus, RoomType, CAPACITY_RANGE};
pub use schedule::{session_hours, EntryId, Issue, IssueKind, Schedule, ScheduleEntry};
pub use subject::{
    normalize_key, Subject, SubjectPriority, SubjectType, DEFAULT_CLASS_SIZE,
    SESSIONS_PER_WEEK_RANGE, SESSION_MINUTES_RANGE,
};
pub use teacher::{Teacher, TeacherStatus};
pub use time_slot::{day_name, hm, TimeSlot};

pub(crate) use time_slot::hhmm;
