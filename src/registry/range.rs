// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A single integer code identifying one event or status meaning.
pub type Code = u32;

/// An inclusive `[start, end]` span of codes, written `"3700-3799"` in docs and logs.
///
/// Construction enforces `start <= end`, so every `CodeRange` is non-empty.
///
/// # Examples
///
/// ```
/// use the_codebook::registry::CodeRange;
///
/// let range: CodeRange = "3700-3799".parse().unwrap();
/// assert!(range.contains(3700));
/// assert!(range.contains(3799));
/// assert!(!range.contains(3800));
/// assert_eq!(range.len(), 100);
/// assert_eq!(range.to_string(), "3700-3799");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CodeRange {
    start: Code,
    end: Code,
}

impl CodeRange {
    /// Returns `None` when `start > end`.
    pub fn new(start: Code, end: Code) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> Code {
        self.start
    }

    pub fn end(&self) -> Code {
        self.end
    }

    /// Number of codes in the range. `u64` because `0-u32::MAX` holds 2^32 codes.
    pub fn len(&self) -> u64 {
        u64::from(self.end) - u64::from(self.start) + 1
    }

    pub fn contains(&self, code: Code) -> bool {
        self.start <= code && code <= self.end
    }

    pub fn overlaps(&self, other: &CodeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Extract a range from free text such as `"Universal status codes - Range: 0-49"`.
    ///
    /// The marker is matched case-insensitively and must be followed by
    /// `<start>-<end>`; parsing stops after the second number, so trailing text
    /// such as `" - deprecated"` is ignored. Anything else yields `None`.
    pub fn parse_declared(doc: &str) -> Option<Self> {
        let lower = doc.to_ascii_lowercase();
        let at = lower.find("range:")?;
        let rest = doc[at + "range:".len()..].trim_start();

        let (start, rest) = leading_number(rest)?;
        let rest = rest.trim_start().strip_prefix('-')?;
        let (end, _) = leading_number(rest.trim_start())?;
        CodeRange::new(start, end)
    }
}

/// Split a leading run of ASCII digits off `text` and parse it.
fn leading_number(text: &str) -> Option<(Code, &str)> {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let value = text[..digits].parse().ok()?;
    Some((value, &text[digits..]))
}

impl fmt::Display for CodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parse failure for the `"start-end"` notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid code range '{0}': expected '<start>-<end>' with start <= end")]
pub struct ParseRangeError(String);

impl FromStr for CodeRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRangeError(s.to_string());
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start: Code = start.trim().parse().map_err(|_| invalid())?;
        let end: Code = end.trim().parse().map_err(|_| invalid())?;
        CodeRange::new(start, end).ok_or_else(invalid)
    }
}
