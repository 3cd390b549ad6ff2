//! Decoding and normalization of submitted task batches.
//!
//! Clients send loosely-typed JSON: ids may be missing, numbers may arrive
//! as text, and dependency lists may be encoded as strings. This module turns
//! that into well-formed [`Task`] records:
//!
//! - a missing or null `id` becomes the task's position in the list
//! - `due_date` is read as `YYYY-MM-DD` or `YYYY/MM/DD`, anything else is no date
//! - `importance` and `estimated_hours` become integers, 0 when unreadable
//! - `dependencies` may be a list or JSON text encoding a list, else empty
//!
//! Both snake_case and camelCase field names are accepted.

use serde_json::{Map, Value};
use taskrank_core::{NumericField, Task, TaskId, parse_date};
use tracing::debug;

use crate::error::ApiError;

/// Parse a request body into the list of raw task entries.
pub fn parse_payload(body: &[u8]) -> Result<Vec<Value>, ApiError> {
    let payload: Value = serde_json::from_slice(body).map_err(|source| ApiError::InvalidJson { source })?;
    decode_payload(payload)
}

/// Accept either `{"tasks": [...]}` or a bare list.
pub fn decode_payload(payload: Value) -> Result<Vec<Value>, ApiError> {
    let tasks = match payload {
        Value::Object(mut map) if map.contains_key("tasks") => map.remove("tasks").unwrap_or(Value::Null),
        other => other,
    };

    match tasks {
        Value::Array(items) => Ok(items),
        _ => Err(ApiError::NotAList),
    }
}

/// Normalize every raw entry into a [`Task`].
pub fn normalize_tasks(items: Vec<Value>) -> Result<Vec<Task>, ApiError> {
    let tasks = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(normalize_task(index, &map)),
            _ => Err(ApiError::InvalidTask { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(tasks = tasks.len(), "task batch normalized");
    Ok(tasks)
}

/// Parse and normalize a request body in one step.
pub fn read_tasks(body: &[u8]) -> Result<Vec<Task>, ApiError> {
    normalize_tasks(parse_payload(body)?)
}

/// Normalize one task object found at `index`.
pub fn normalize_task(index: usize, raw: &Map<String, Value>) -> Task {
    let id = raw
        .get("id")
        .and_then(task_id)
        .unwrap_or_else(|| TaskId::from(index));

    let title = match raw.get("title") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Task {
        id,
        title,
        importance: NumericField::from(coerce_integer(raw.get("importance"))),
        due_date: field(raw, "due_date", "dueDate")
            .and_then(Value::as_str)
            .and_then(parse_date),
        estimated_hours: NumericField::from(coerce_integer(field(raw, "estimated_hours", "estimatedHours"))),
        dependencies: dependencies(raw.get("dependencies")),
    }
}

fn field<'a>(raw: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    raw.get(snake).or_else(|| raw.get(camel))
}

/// Read an id value; `None` for null.
fn task_id(value: &Value) -> Option<TaskId> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(match n.as_i64().or_else(|| n.as_f64().and_then(integral)) {
            Some(i) => TaskId::Int(i),
            None => TaskId::Text(n.to_string()),
        }),
        Value::String(s) => Some(TaskId::Text(s.clone())),
        other => Some(TaskId::Text(other.to_string())),
    }
}

/// Whole floats such as `1.0` name the same task as `1`.
fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

/// Integer reading of a numeric field, 0 when it cannot be read.
///
/// Floats are truncated toward zero; text must hold an integer.
pub fn coerce_integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

fn dependencies(value: Option<&Value>) -> Vec<TaskId> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(task_id).collect(),
        Some(Value::String(text)) if !text.trim().is_empty() => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items.iter().filter_map(task_id).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
