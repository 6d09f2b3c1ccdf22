//! # Issues
//!
//! An [`Issue`] is the single error kind known to the algebra. Processors
//! create issues when they detect a problem and return them inside a
//! `Halted` state; they are carried unchanged until a client or a
//! recovery handler consumes them.
//!
//! The algebra draws no line between warnings and fatal problems. Severity,
//! if any, is a convention of the issue's `detail` payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque description of a processing problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Human-readable summary.
    pub message: String,
    /// Optional structured payload supplied by the reporting processor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl Issue {
    /// Create an issue carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a structured detail payload, replacing any previous one.
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Build an issue from an error value.
    ///
    /// The message is the error's `Display` output. When the error has a
    /// source chain, every cause is recorded in order under
    /// `detail.causes`.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(Value::String(cause.to_string()));
            source = cause.source();
        }
        let issue = Self::new(err.to_string());
        if causes.is_empty() {
            issue
        } else {
            issue.with_detail(serde_json::json!({ "causes": causes }))
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
