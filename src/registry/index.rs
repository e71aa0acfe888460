// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::{Code, CodeDefinitionGroup, RangeTable, StatusClasses};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// What the index knows about one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedCode {
    pub symbol: String,
    pub group_name: String,
    /// Derived from the range table, never from the group. `None` when no range covers the code.
    pub subsystem: Option<String>,
}

/// The immutable, built registry: codes, symbols and ranges mapped to each other.
///
/// Produced only by [`RegistryBuilder`](crate::registry::RegistryBuilder); there
/// is no way to mutate an index after construction, so any number of threads may
/// read one concurrently. Reloading definitions builds a new index and swaps it
/// in through a [`RegistryHandle`](crate::registry::RegistryHandle).
#[derive(Debug, Clone)]
pub struct RegistryIndex {
    pub(crate) code_to_entry: BTreeMap<Code, IndexedCode>,
    pub(crate) name_to_codes: BTreeMap<String, BTreeSet<Code>>,
    pub(crate) system_ranges: RangeTable,
    /// Groups sorted by name.
    pub(crate) groups: Vec<CodeDefinitionGroup>,
    pub(crate) fallback_system: Option<String>,
    pub(crate) status_classes: StatusClasses,
}

impl RegistryIndex {
    pub fn get(&self, code: Code) -> Option<&IndexedCode> {
        self.code_to_entry.get(&code)
    }

    pub fn contains(&self, code: Code) -> bool {
        self.code_to_entry.contains_key(&code)
    }

    /// Every indexed code in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Code, &IndexedCode)> {
        self.code_to_entry.iter().map(|(code, entry)| (*code, entry))
    }

    /// Indexed codes inside `[start, end]`, ascending.
    pub fn codes_between(&self, start: Code, end: Code) -> impl Iterator<Item = Code> + '_ {
        self.code_to_entry.range(start..=end).map(|(code, _)| *code)
    }

    /// Codes whose symbol is exactly `symbol`.
    pub fn codes_named(&self, symbol: &str) -> Option<&BTreeSet<Code>> {
        self.name_to_codes.get(symbol)
    }

    /// Every distinct symbol with the codes that carry it, symbols ascending.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &BTreeSet<Code>)> {
        self.name_to_codes
            .iter()
            .map(|(symbol, codes)| (symbol.as_str(), codes))
    }

    pub fn ranges(&self) -> &RangeTable {
        &self.system_ranges
    }

    pub fn groups(&self) -> &[CodeDefinitionGroup] {
        &self.groups
    }

    /// Range the allocation advisor falls back to when no keyword matches.
    pub fn fallback_system(&self) -> Option<&str> {
        self.fallback_system.as_deref()
    }

    /// Terminal and error status classes; empty when no source declared any.
    pub fn status_classes(&self) -> &StatusClasses {
        &self.status_classes
    }

    pub fn len(&self) -> usize {
        self.code_to_entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_to_entry.is_empty()
    }
}
