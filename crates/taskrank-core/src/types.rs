//! Shared type definitions used across TaskRank crates.
//!
//! A [`Task`] is the unit the engine ranks. Its numeric fields are kept as
//! [`NumericField`] so that whatever the caller sent survives intact until
//! the scoring step decides how to read it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats accepted for due dates.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Opaque task identifier.
///
/// Integer and string ids are distinct keys: `1` and `"1"` never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    /// Numeric id, usually a positional index
    Int(i64),
    /// Free-form text id
    Text(String),
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for TaskId {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A numeric task field exactly as the caller supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum NumericField {
    /// A JSON number
    Number(f64),
    /// Text that may or may not hold a number
    Text(String),
    /// Absent or null
    #[default]
    Missing,
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for NumericField {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A task record in a batch submitted for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier, unique within a batch by convention
    pub id: TaskId,

    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Importance on a 0-10 scale
    #[serde(default)]
    pub importance: NumericField,

    /// Calendar due date
    #[serde(default, alias = "dueDate")]
    pub due_date: Option<NaiveDate>,

    /// Estimated effort in hours
    #[serde(default, alias = "estimatedHours")]
    pub estimated_hours: NumericField,

    /// Ids of the tasks this one waits on
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl Task {
    /// Create a task with no fields besides its id.
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            importance: NumericField::Missing,
            due_date: None,
            estimated_hours: NumericField::Missing,
            dependencies: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_importance(mut self, importance: impl Into<NumericField>) -> Self {
        self.importance = importance.into();
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_estimated_hours(mut self, hours: impl Into<NumericField>) -> Self {
        self.estimated_hours = hours.into();
        self
    }

    pub fn with_dependencies<I, T>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Title for display, empty when absent.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// Parse a due date in one of the [`DATE_FORMATS`].
///
/// Returns `None` for anything else; an unreadable date means "no due date".
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
