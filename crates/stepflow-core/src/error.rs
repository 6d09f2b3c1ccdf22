//! # Error Types
//!
//! Library-level errors for stepflow. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Processing problems are never errors. They are [`Issue`](crate::Issue)
//!   values carried inside a `Halted` state and travel through the algebra
//!   as data.
//! - `StepflowError` covers everything outside the algebra: configuration
//!   that cannot be loaded or fails validation.

use thiserror::Error;

/// Top-level error type for stepflow.
#[derive(Error, Debug)]
pub enum StepflowError {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
