//! Normalization of raw task fields into `[0, 1]` contributions.
//!
//! Each factor is independent of the others:
//!
//! - **Importance**: `clamp(importance, 0, 10) / 10`
//! - **Urgency**: 1.0 when due today or overdue, decaying linearly to 0 at 30+ days
//! - **Effort benefit**: `1 - min(hours, 40) / 40`, so quick tasks score higher
//! - **Dependency impact**: `min(1, fan_in / max(1, batch_size))`
//!
//! Dependency impact divides by the batch size, not by the largest fan-in
//! observed. The same task with the same dependents scores lower in a larger
//! batch.
//!
//! Numeric fields go through [`coerce_number`], which yields a number for
//! every input. Nothing here returns an error.

use chrono::NaiveDate;
use taskrank_core::{NumericField, Task};

use crate::graph::DependencyCounts;

/// Top of the importance scale.
pub const MAX_IMPORTANCE: f64 = 10.0;

/// Days until due at which urgency reaches zero.
pub const MAX_URGENCY_DAYS: f64 = 30.0;

/// Hours at which effort benefit reaches zero.
pub const MAX_EFFORT_HOURS: f64 = 40.0;

/// Read a numeric field, treating anything unreadable as 0.
///
/// Text is trimmed and parsed as a decimal number. Missing values, text
/// that is not a number, and non-finite values all become 0.
pub fn coerce_number(field: &NumericField) -> f64 {
    let value = match field {
        NumericField::Number(n) => *n,
        NumericField::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        NumericField::Missing => 0.0,
    };

    if value.is_finite() { value } else { 0.0 }
}

/// A raw input and its normalized contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor {
    /// The coerced input value
    pub raw: f64,
    /// Normalized contribution in `[0, 1]`
    pub value: f64,
}

/// Urgency contribution with the overdue marker used in explanations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Urgency {
    /// Normalized contribution in `[0, 1]`
    pub value: f64,
    /// Calendar days until due, negative when overdue
    pub days_left: Option<i64>,
    /// Due date is strictly in the past
    pub overdue: bool,
}

impl Urgency {
    /// No due date, no urgency.
    pub const NONE: Self = Self {
        value: 0.0,
        days_left: None,
        overdue: false,
    };
}

/// Importance factor. The raw value keeps the caller's number, unclamped.
pub fn importance(field: &NumericField) -> Factor {
    let raw = coerce_number(field);
    Factor {
        raw,
        value: raw.clamp(0.0, MAX_IMPORTANCE) / MAX_IMPORTANCE,
    }
}

/// Urgency factor relative to `today`.
pub fn urgency(due_date: Option<NaiveDate>, today: NaiveDate) -> Urgency {
    let Some(due) = due_date else {
        return Urgency::NONE;
    };

    let days_left = due.signed_duration_since(today).num_days();
    if days_left < 0 {
        return Urgency {
            value: 1.0,
            days_left: Some(days_left),
            overdue: true,
        };
    }

    let days = (days_left as f64).min(MAX_URGENCY_DAYS);
    Urgency {
        value: (MAX_URGENCY_DAYS - days) / MAX_URGENCY_DAYS,
        days_left: Some(days_left),
        overdue: false,
    }
}

/// Effort benefit factor. Negative hours count as 0.
pub fn effort(field: &NumericField) -> Factor {
    let hours = coerce_number(field).max(0.0);
    Factor {
        raw: hours,
        value: 1.0 - hours.min(MAX_EFFORT_HOURS) / MAX_EFFORT_HOURS,
    }
}

/// Dependency impact factor for a fan-in within a batch of `batch_size` tasks.
pub fn dependency(dependents: usize, batch_size: usize) -> Factor {
    let raw = dependents as f64;
    let denominator = (batch_size as f64).max(1.0);
    Factor {
        raw,
        value: (raw / denominator).min(1.0),
    }
}

/// All four normalized factors for one task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFactors {
    pub importance: Factor,
    pub urgency: Urgency,
    pub effort: Factor,
    pub dependency: Factor,
}

impl NormalizedFactors {
    /// Normalize a task against the fan-in map of its batch.
    pub fn for_task(task: &Task, counts: &DependencyCounts, today: NaiveDate) -> Self {
        Self {
            importance: importance(&task.importance),
            urgency: urgency(task.due_date, today),
            effort: effort(&task.estimated_hours),
            dependency: dependency(counts.get(&task.id), counts.len()),
        }
    }
}
