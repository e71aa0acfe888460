// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recoverable, per-call errors returned by translator and advisor queries.

use crate::registry::{Code, CodeRange};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No group defines this code.
    #[error("Unknown code: {code}")]
    UnknownCode { code: Code },

    /// No range table row covers this code.
    #[error("Code {code} is not covered by any declared range")]
    UnclassifiedCode { code: Code },

    /// The requested subsystem label is not in the range table.
    #[error("Unknown system: '{label}'")]
    UnknownSystem { label: String },

    /// No contiguous gap of the requested size exists in the range.
    #[error(
        "No space for {requested} contiguous codes in '{system}' ({range}); largest free block is {largest_gap}"
    )]
    NoSpaceAvailable {
        system: String,
        range: CodeRange,
        requested: u32,
        largest_gap: u64,
    },

    /// The allocation request itself was rejected by the input guard rails.
    #[error("Invalid allocation request: {reason}")]
    InvalidAllocationRequest { reason: String },
}
