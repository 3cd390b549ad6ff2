//! # taskrank-core
//!
//! Core types, errors, and utilities shared by the TaskRank crates.
//!
//! This crate provides:
//! - [`TaskRankError`] - Error types for configuration, I/O, and input handling
//! - [`logging`] - Tracing setup and log management utilities
//! - [`types`] - The [`Task`] record and its field types

pub mod error;
pub mod logging;
pub mod types;

pub use error::{Result, TaskRankError};
pub use logging::{LogGuard, init_logging};
pub use types::{NumericField, Task, TaskId, parse_date};
