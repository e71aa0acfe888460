// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Read-only query façade over a built [`RegistryIndex`].
//!
//! A `Translator` owns an `Arc` to one immutable index, so it is cheap to clone,
//! `Send + Sync`, and unaffected by later swaps on a
//! [`RegistryHandle`](crate::registry::RegistryHandle). No query blocks,
//! allocates shared state or performs I/O.

mod summary;

pub use summary::{SubsystemUsage, SystemSummary};

use crate::config::consts::UNKNOWN_RANGE_LABEL;
use crate::errors::QueryError;
use crate::registry::{Code, RegistryIndex};
use serde::Serialize;
use std::sync::Arc;

/// Full metadata for one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeInfo {
    pub code: Code,
    pub symbol: String,
    pub group_name: String,
    pub subsystem: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Translator {
    index: Arc<RegistryIndex>,
}

impl Translator {
    pub fn new(index: Arc<RegistryIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &RegistryIndex {
        &self.index
    }

    /// Code to symbol.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use the_codebook::registry::{build_registry, CodeDefinitionGroup, SystemRange};
    /// use the_codebook::translator::Translator;
    ///
    /// let index = build_registry(
    ///     vec![SystemRange::new("status", 0, 49, "Status").unwrap()],
    ///     vec![CodeDefinitionGroup::new("UniversalStatus", "").with_entry(11, "active")],
    /// ).unwrap();
    /// let translator = Translator::new(Arc::new(index));
    ///
    /// assert_eq!(translator.translate(11).unwrap(), "active");
    /// assert_eq!(translator.get_system_for_code(11).unwrap(), "status");
    /// assert!(translator.translate(12).is_err());
    /// ```
    pub fn translate(&self, code: Code) -> Result<&str, QueryError> {
        self.index
            .get(code)
            .map(|entry| entry.symbol.as_str())
            .ok_or(QueryError::UnknownCode { code })
    }

    /// The subsystem label covering `code`, whether or not the code is defined.
    pub fn get_system_for_code(&self, code: Code) -> Result<&str, QueryError> {
        self.index.ranges().classify(code).map(|row| row.label())
    }

    /// Case-insensitive substring search over every symbol, sorted by code.
    ///
    /// The empty string matches everything; no match is an empty vector, not an error.
    pub fn find_codes_by_name(&self, substring: &str) -> Vec<(Code, &str)> {
        let needle = substring.to_lowercase();
        let mut hits: Vec<(Code, &str)> = self
            .index
            .symbols()
            .filter(|(symbol, _)| symbol.contains(&needle))
            .flat_map(|(symbol, codes)| codes.iter().map(move |code| (*code, symbol)))
            .collect();
        hits.sort_unstable_by_key(|(code, _)| *code);
        hits
    }

    /// Exact, case-insensitive symbol lookup. Symbols may be shared across groups.
    pub fn codes_for_symbol(&self, symbol: &str) -> Vec<Code> {
        self.index
            .codes_named(&symbol.to_lowercase())
            .map(|codes| codes.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn get_code_info(&self, code: Code) -> Result<CodeInfo, QueryError> {
        let entry = self.index.get(code).ok_or(QueryError::UnknownCode { code })?;
        Ok(CodeInfo {
            code,
            symbol: entry.symbol.clone(),
            group_name: entry.group_name.clone(),
            subsystem: entry.subsystem.clone(),
        })
    }

    /// Aggregate counts, recomputed on every call in one pass over the index.
    pub fn get_system_summary(&self) -> SystemSummary {
        SystemSummary::compute(&self.index)
    }

    /// Symbol, or a stable placeholder such as `unknown_auth_system_1999` for undefined codes.
    pub fn translate_or_fallback(&self, code: Code) -> String {
        match self.translate(code) {
            Ok(symbol) => symbol.to_string(),
            Err(_) => format!("unknown_{}_{}", self.system_or_unknown(code), code),
        }
    }

    /// One-line rendering for logs and payload annotation: `11(active) [universal_foundation]`.
    pub fn format_code_with_context(&self, code: Code) -> String {
        format!(
            "{}({}) [{}]",
            code,
            self.translate_or_fallback(code),
            self.system_or_unknown(code)
        )
    }

    /// Whether `code` lies inside the range labelled `system`.
    pub fn range_check(&self, code: Code, system: &str) -> Result<bool, QueryError> {
        self.index
            .ranges()
            .get(system)
            .map(|row| row.range().contains(code))
            .ok_or_else(|| QueryError::UnknownSystem {
                label: system.to_string(),
            })
    }

    /// Lowest code carrying `symbol` inside the range labelled `system`.
    pub fn code_in_system(&self, symbol: &str, system: &str) -> Option<Code> {
        self.index
            .codes_named(&symbol.to_lowercase())?
            .iter()
            .copied()
            .find(|code| {
                self.index
                    .get(*code)
                    .and_then(|entry| entry.subsystem.as_deref())
                    == Some(system)
            })
    }

    /// Status name to code (`"INITIALIZED"` to `2`), searched only in the status system.
    ///
    /// `None` when the name is not a status or no status classes were declared.
    pub fn status_code(&self, name: &str) -> Option<Code> {
        let system = self.index.status_classes().system()?;
        self.code_in_system(name, system)
    }

    /// Upper-case display name (`2` to `"INITIALIZED"`). Priority and severity
    /// levels render the same way: `60` is `"HIGH"`, `82` is `"ERROR"`.
    pub fn status_name(&self, code: Code) -> Result<String, QueryError> {
        self.translate(code).map(str::to_uppercase)
    }

    /// Whether `code` ends a lifecycle, per the index's status classes.
    pub fn is_terminal_status(&self, code: Code) -> bool {
        self.index.status_classes().is_terminal(code)
    }

    pub fn is_error_status(&self, code: Code) -> bool {
        self.index.status_classes().is_error(code)
    }

    fn system_or_unknown(&self, code: Code) -> &str {
        self.get_system_for_code(code).unwrap_or(UNKNOWN_RANGE_LABEL)
    }
}
