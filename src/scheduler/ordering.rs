//! Subject ordering rules.
//!
//! Decides which subject claims slots first. Rules are applied in
//! sequence; a later rule only matters when every earlier rule ties.
//!
//! # Score Convention
//! All rules return lower scores for subjects that should be placed first.
//!
//! # Default Chain
//!
//! | Rule | Score |
//! |------|-------|
//! | `ByPriority` | `Critical = 0` .. `Low = 3` |
//! | `MostSessions` | `-sessions_per_week` |
//! | `LabFirst` | `0` for lab subjects, `1` otherwise |
//!
//! Remaining ties are broken by subject name. The sort is stable.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

use crate::models::Subject;

/// Score returned by an ordering rule. Lower = placed earlier.
pub type RuleScore = f64;

/// A rule that ranks subjects for placement.
pub trait OrderingRule: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn evaluate(&self, subject: &Subject) -> RuleScore;
}

/// Higher priority first.
#[derive(Debug, Clone, Copy)]
pub struct ByPriority;

impl OrderingRule for ByPriority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, subject: &Subject) -> RuleScore {
        f64::from(subject.priority.rank())
    }
}

/// More weekly sessions first.
#[derive(Debug, Clone, Copy)]
pub struct MostSessions;

impl OrderingRule for MostSessions {
    fn name(&self) -> &'static str {
        "MOST_SESSIONS"
    }

    fn evaluate(&self, subject: &Subject) -> RuleScore {
        -f64::from(subject.sessions_per_week)
    }
}

/// Subjects needing a laboratory first.
#[derive(Debug, Clone, Copy)]
pub struct LabFirst;

impl OrderingRule for LabFirst {
    fn name(&self) -> &'static str {
        "LAB_FIRST"
    }

    fn evaluate(&self, subject: &Subject) -> RuleScore {
        if subject.requires_lab {
            0.0
        } else {
            1.0
        }
    }
}

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Alphabetical by subject name (default).
    #[default]
    ByName,
    /// Keep the input order.
    InputOrder,
}

/// A sequential chain of ordering rules.
#[derive(Clone)]
pub struct SubjectOrdering {
    rules: Vec<Arc<dyn OrderingRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl SubjectOrdering {
    /// Creates an empty chain. With no rules, only the tie-breaker applies.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::ByName,
            epsilon: 1e-9,
        }
    }

    pub fn with_rule<R: OrderingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn with_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Sorts subjects, first-to-place first.
    pub fn sort<'a>(&self, subjects: impl IntoIterator<Item = &'a Subject>) -> Vec<&'a Subject> {
        let mut sorted: Vec<&Subject> = subjects.into_iter().collect();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    fn compare(&self, a: &Subject, b: &Subject) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a);
            let score_b = rule.evaluate(b);
            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }
        match self.tie_breaker {
            TieBreaker::ByName => a.name.cmp(&b.name),
            TieBreaker::InputOrder => Ordering::Equal,
        }
    }
}

impl Default for SubjectOrdering {
    /// Priority, then most sessions, then lab subjects, then name.
    fn default() -> Self {
        Self::new()
            .with_rule(ByPriority)
            .with_rule(MostSessions)
            .with_rule(LabFirst)
    }
}

impl Debug for SubjectOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectOrdering")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
