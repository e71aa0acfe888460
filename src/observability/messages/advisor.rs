// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for allocation advice.

use crate::observability::messages::StructuredLog;
use crate::registry::Code;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A free block was suggested for a new concept.
///
/// # Log Level
/// `debug!` - Advisory, nothing is reserved
///
/// # Example
/// ```
/// use the_codebook::observability::messages::advisor::AllocationSuggested;
///
/// let msg = AllocationSuggested {
///     system: "payment",
///     start_code: 12005,
///     requested_size: 10,
///     available_space: 95,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct AllocationSuggested<'a> {
    pub system: &'a str,
    pub start_code: Code,
    pub requested_size: u32,
    pub available_space: u64,
}

impl Display for AllocationSuggested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Suggested {} codes in '{}' starting at {} ({} free)",
            self.requested_size, self.system, self.start_code, self.available_space
        )
    }
}

impl StructuredLog for AllocationSuggested<'_> {
    fn log(&self) {
        tracing::debug!(
            system = self.system,
            start_code = self.start_code,
            requested_size = self.requested_size,
            available_space = self.available_space,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "allocation",
            name = name,
            system = self.system,
            start_code = self.start_code,
            requested_size = self.requested_size,
        )
    }
}
