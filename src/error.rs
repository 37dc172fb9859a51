//! Error types.
//!
//! Registry and schedule mutations return structured errors. The
//! assignment engine treats every placement error as recoverable; only
//! entity construction and configuration errors are fatal to a caller.

/// Timetable error type.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// A time slot whose end is not after its start.
    #[error("invalid time range: {0}")]
    InvalidRange(String),

    /// An entity with the same key is already registered.
    #[error("{kind} '{key}' already exists")]
    DuplicateKey { kind: &'static str, key: String },

    /// No entity (or schedule entry) with the given key.
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    /// The entry collides with existing entries on teacher or classroom.
    #[error("schedule entry conflicts with {} existing entries", .conflicting.len())]
    Conflict { conflicting: Vec<String> },

    /// A referenced entity is missing or outside its availability.
    #[error("{kind} '{key}' is not available{}", .at.as_ref().map(|s| format!(" at {s}")).unwrap_or_default())]
    ResourceUnavailable {
        kind: &'static str,
        key: String,
        at: Option<String>,
    },

    /// The teacher is not qualified for the subject.
    #[error("teacher '{teacher}' is not qualified to teach '{subject}'")]
    UnqualifiedTeacher { teacher: String, subject: String },

    /// The classroom cannot hold the requested number of students.
    #[error("classroom '{room}' (capacity {capacity}) cannot accommodate {students} students")]
    CapacityExceeded {
        room: String,
        capacity: u32,
        students: u32,
    },

    /// A malformed entity field or constraint option.
    #[error("invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// The constraints file is not valid TOML for the expected shape.
    #[error("failed to parse constraints: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimetableError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub(crate) fn unavailable(kind: &'static str, key: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            kind,
            key: key.into(),
            at: None,
        }
    }

    /// Whether the engine may discard this error and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. }
                | Self::ResourceUnavailable { .. }
                | Self::UnqualifiedTeacher { .. }
                | Self::CapacityExceeded { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
