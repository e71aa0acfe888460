// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::{Code, CodeRange};
use serde::Serialize;

/// Where lifecycle status codes live, and which of them end a lifecycle.
///
/// Classes are ranges, not symbol lists, so a status added later inside a
/// terminal range is terminal without a catalog change. Error statuses are
/// declared separately; a catalog that wants every error to be terminal lists
/// the error ranges under both.
///
/// # Examples
///
/// ```
/// use the_codebook::registry::{CodeRange, StatusClasses};
///
/// let classes = StatusClasses::new("universal_foundation")
///     .with_terminal(CodeRange::new(21, 26).unwrap())
///     .with_terminal(CodeRange::new(30, 38).unwrap())
///     .with_error(CodeRange::new(30, 38).unwrap());
///
/// assert!(classes.is_terminal(22));
/// assert!(!classes.is_error(22));
/// assert!(classes.is_error(32));
/// assert!(!classes.is_terminal(11));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusClasses {
    system: Option<String>,
    terminal: Vec<CodeRange>,
    error: Vec<CodeRange>,
}

impl StatusClasses {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            ..Self::default()
        }
    }

    pub fn with_terminal(mut self, range: CodeRange) -> Self {
        self.terminal.push(range);
        self
    }

    pub fn with_error(mut self, range: CodeRange) -> Self {
        self.error.push(range);
        self
    }

    /// Range table label that holds the status codes.
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn is_terminal(&self, code: Code) -> bool {
        self.terminal.iter().any(|range| range.contains(code))
    }

    pub fn is_error(&self, code: Code) -> bool {
        self.error.iter().any(|range| range.contains(code))
    }
}
