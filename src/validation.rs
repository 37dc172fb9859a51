//! Input validation for timetabling problems.
//!
//! Checks the integrity of a registry before scheduling. Detects:
//! - Qualifications naming unknown subjects
//! - Prerequisites naming unknown subjects
//! - Circular prerequisite chains (DAG validation)
//! - Subjects no active teacher can teach
//! - Subjects no classroom can host
//!
//! None of these stop the engine; they explain shortfalls up front.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::models::TeacherStatus;
use crate::registry::Registry;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A teacher is qualified for a subject that doesn't exist.
    UnknownQualification,
    /// A subject lists a prerequisite that doesn't exist.
    UnknownPrerequisite,
    /// Prerequisite graph contains a cycle.
    CyclicPrerequisite,
    /// No active teacher is qualified for a subject.
    NoQualifiedTeacher,
    /// No classroom meets a subject's room requirements.
    NoSuitableClassroom,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a registry before scheduling.
///
/// Checks:
/// 1. All teacher qualifications point to registered subjects
/// 2. All prerequisites point to registered subjects
/// 3. No circular prerequisite chains
/// 4. Every subject has at least one active qualified teacher
/// 5. Every subject has at least one classroom meeting its requirements
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(registry: &Registry) -> ValidationResult {
    let mut errors = Vec::new();

    for teacher in registry.teachers() {
        for code in &teacher.subjects_qualified {
            if registry.subject(code).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownQualification,
                    format!(
                        "Teacher '{}' is qualified for unknown subject '{}'",
                        teacher.employee_id, code
                    ),
                ));
            }
        }
    }

    for subject in registry.subjects() {
        for code in &subject.prerequisites {
            if registry.subject(code).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPrerequisite,
                    format!(
                        "Subject '{}' references unknown prerequisite '{}'",
                        subject.code, code
                    ),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(registry) {
        errors.push(cycle_err);
    }

    for subject in registry.subjects() {
        let has_teacher = registry
            .teachers()
            .any(|t| t.status == TeacherStatus::Active && t.can_teach(&subject.code));
        if !has_teacher {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoQualifiedTeacher,
                format!("No active teacher can teach subject '{}'", subject.code),
            ));
        }

        if !registry.classrooms().any(|c| c.meets_requirements(subject)) {
            let need = if subject.requires_lab {
                "a laboratory"
            } else {
                "a suitable classroom"
            };
            errors.push(ValidationError::new(
                ValidationErrorKind::NoSuitableClassroom,
                format!("Subject '{}' needs {need} but none exists", subject.code),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the prerequisite graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
fn detect_cycles(registry: &Registry) -> Option<ValidationError> {
    // prerequisite → subjects that require it
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for subject in registry.subjects() {
        for pre in &subject.prerequisites {
            adj.entry(pre.as_str()).or_default().push(subject.code.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for subject in registry.subjects() {
        let node = subject.code.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicPrerequisite,
                format!("Circular prerequisite chain involving subject '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
