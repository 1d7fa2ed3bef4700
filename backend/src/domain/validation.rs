//! Field-level validation issues shared by request-shaped domain inputs.
//!
//! Constructors that validate several fields at once collect every problem
//! into a [`FieldIssues`] list so clients can highlight all offending inputs
//! in one round trip.

use serde::Serialize;
use serde_json::json;

use super::Error;

/// One problem with one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    field: &'static str,
    message: String,
    code: &'static str,
}

impl FieldIssue {
    /// Build an issue for `field` with a stable `code`.
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            code,
        }
    }

    /// Name of the offending field as it appears on the wire.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Stable machine-readable issue code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Ordered collection of field issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldIssues(Vec<FieldIssue>);

impl FieldIssues {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue.
    pub fn push(&mut self, issue: FieldIssue) {
        self.0.push(issue);
    }

    /// Record the error of a fallible field conversion and hand back the
    /// value when it succeeded.
    pub fn collect<T, E>(&mut self, result: Result<T, E>) -> Option<T>
    where
        E: Into<FieldIssue>,
    {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err.into());
                None
            }
        }
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the recorded issues.
    #[must_use]
    pub fn as_slice(&self) -> &[FieldIssue] {
        &self.0
    }

    /// Succeed with `value` when no issue was recorded.
    ///
    /// # Errors
    /// Returns `self` when at least one issue was recorded.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if self.is_empty() {
            value().ok_or(self)
        } else {
            Err(self)
        }
    }
}

impl From<FieldIssue> for FieldIssues {
    fn from(issue: FieldIssue) -> Self {
        Self(vec![issue])
    }
}

impl From<FieldIssues> for Error {
    /// The first issue's message becomes the headline so simple clients can
    /// show a single toast; the full list travels in `details.errors`.
    fn from(issues: FieldIssues) -> Self {
        let headline = issues
            .0
            .first()
            .map_or_else(|| "Invalid request".to_owned(), |issue| issue.message.clone());
        Self::invalid_request(headline).with_details(json!({
            "code": "validation_failed",
            "errors": issues.0,
        }))
    }
}
