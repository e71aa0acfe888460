// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural errors raised while building a registry index.
//!
//! Every variant is fatal to the build: the builder never hands back a
//! partially populated index.

use crate::registry::{Code, CodeRange};
use thiserror::Error;

/// Errors that can occur while assembling a [`RegistryIndex`](crate::registry::RegistryIndex).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Two groups (or one group twice) define the same integer code.
    #[error("Code {code} is defined by both '{group_a}' and '{group_b}'")]
    DuplicateCode {
        code: Code,
        group_a: String,
        group_b: String,
    },

    /// Two declared ranges intersect.
    #[error("Range '{label_a}' ({range_a}) overlaps range '{label_b}' ({range_b})")]
    RangeOverlap {
        label_a: String,
        range_a: CodeRange,
        label_b: String,
        range_b: CodeRange,
    },

    /// A range whose start lies past its end.
    #[error("Range '{label}' is inverted: start {start} is greater than end {end}")]
    InvalidRange { label: String, start: Code, end: Code },

    /// Two range table rows share a label.
    #[error("Range label '{label}' is declared more than once")]
    DuplicateRangeLabel { label: String },

    /// Two definition groups share a name.
    #[error("Code group '{group_name}' is declared more than once")]
    DuplicateGroup { group_name: String },

    /// A group defines a code outside the range it declares for itself.
    #[error("Code {code} in group '{group_name}' lies outside its declared range {range}")]
    CodeOutsideDeclaredRange {
        code: Code,
        group_name: String,
        range: CodeRange,
    },

    /// A symbol that is not a lowercase dotted or snake identifier.
    #[error("Symbol '{symbol}' for code {code} in group '{group_name}' is not a valid identifier")]
    InvalidSymbol {
        code: Code,
        group_name: String,
        symbol: String,
    },

    /// The advisor fallback names a range that was never registered.
    #[error("Fallback system '{label}' does not name a registered range")]
    UnknownFallbackSystem { label: String },

    /// The status classes name a range that was never registered.
    #[error("Status system '{label}' does not name a registered range")]
    UnknownStatusSystem { label: String },
}
