// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Input records for the registry builder.
//!
//! A [`CodeDefinitionGroup`] is the set of codes one definer declares together
//! (one "enum"); a [`SystemRange`] is one row of the hierarchical namespace.
//! Both are immutable once constructed. A reloaded source replaces them wholesale.

use crate::config::consts::MAX_SYMBOL_LEN;
use crate::errors::BuildError;
use crate::registry::{Code, CodeRange};
use serde::Serialize;

/// One row of the range table: a named, inclusive span of the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemRange {
    label: String,
    range: CodeRange,
    description: String,
    keywords: Vec<String>,
}

impl SystemRange {
    /// Create a range row, rejecting `start > end`.
    ///
    /// # Examples
    /// ```
    /// use the_codebook::registry::SystemRange;
    ///
    /// let auth = SystemRange::new("auth_system", 1000, 1999, "Authentication & Authorization").unwrap();
    /// assert_eq!(auth.range().to_string(), "1000-1999");
    ///
    /// assert!(SystemRange::new("broken", 20, 10, "").is_err());
    /// ```
    pub fn new(
        label: impl Into<String>,
        start: Code,
        end: Code,
        description: impl Into<String>,
    ) -> Result<Self, BuildError> {
        let label = label.into();
        let range = CodeRange::new(start, end).ok_or_else(|| BuildError::InvalidRange {
            label: label.clone(),
            start,
            end,
        })?;
        Ok(Self {
            label,
            range,
            description: description.into(),
            keywords: Vec::new(),
        })
    }

    /// Attach advisor keywords; they are stored lowercase.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn range(&self) -> CodeRange {
        self.range
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// A single `(code, symbol)` pair declared by a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    pub code: Code,
    pub symbol: String,
}

/// The codes declared together by one definer.
///
/// Symbols are lowercased on entry so `ACTIVE` and `active` name the same thing.
/// The declared range comes from an explicit [`with_range`](Self::with_range)
/// call or, failing that, from a `Range: <start>-<end>` marker in the doc text.
///
/// # Examples
/// ```
/// use the_codebook::registry::CodeDefinitionGroup;
///
/// let group = CodeDefinitionGroup::new("UniversalStatus", "Universal status codes - Range: 0-49")
///     .with_entry(0, "UNKNOWN")
///     .with_entry(11, "active");
///
/// assert_eq!(group.declared_range().unwrap().to_string(), "0-49");
/// assert_eq!(group.entries()[0].symbol, "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeDefinitionGroup {
    name: String,
    declared_range: Option<CodeRange>,
    entries: Vec<CodeEntry>,
    doc: String,
}

impl CodeDefinitionGroup {
    pub fn new(name: impl Into<String>, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        Self {
            name: name.into(),
            declared_range: CodeRange::parse_declared(&doc),
            entries: Vec::new(),
            doc,
        }
    }

    /// Override whatever range the doc text declared.
    pub fn with_range(mut self, range: CodeRange) -> Self {
        self.declared_range = Some(range);
        self
    }

    pub fn with_entry(mut self, code: Code, symbol: impl AsRef<str>) -> Self {
        self.entries.push(CodeEntry {
            code,
            symbol: symbol.as_ref().trim().to_lowercase(),
        });
        self
    }

    pub fn with_entries<I, S>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (Code, S)>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .fold(self, |group, (code, symbol)| group.with_entry(code, symbol))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_range(&self) -> Option<CodeRange> {
        self.declared_range
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }
}

/// True for lowercase dotted or snake identifiers such as `payment.authorized`.
pub fn is_valid_symbol(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    symbol.len() <= MAX_SYMBOL_LEN
        && first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_range_overrides_doc() {
        let group = CodeDefinitionGroup::new("Payments", "Payment events - Range: 12000-12099")
            .with_range(CodeRange::new(12000, 12049).unwrap());
        assert_eq!(group.declared_range(), CodeRange::new(12000, 12049));
    }

    #[test]
    fn test_group_without_range_marker() {
        let group = CodeDefinitionGroup::new("Loose", "No marker here").with_entry(5, "x");
        assert_eq!(group.declared_range(), None);
        assert_eq!(group.entries().len(), 1);
    }

    #[test]
    fn test_keywords_are_normalised() {
        let range = SystemRange::new("auth_system", 1000, 1999, "Auth")
            .unwrap()
            .with_keywords(["Auth", " LOGIN ", ""]);
        assert_eq!(range.keywords(), &["auth".to_string(), "login".to_string()]);
    }

    #[test]
    fn test_symbol_rules() {
        assert!(is_valid_symbol("active"));
        assert!(is_valid_symbol("payment.authorized"));
        assert!(is_valid_symbol("error_4xx"));
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("4xx_error"));
        assert!(!is_valid_symbol("has space"));
        assert!(!is_valid_symbol("Upper"));
        assert!(!is_valid_symbol(&"a".repeat(MAX_SYMBOL_LEN + 1)));
    }
}
