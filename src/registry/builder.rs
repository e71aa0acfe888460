// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registry construction: validation plus index assembly.
//!
//! # Validation Pipeline
//!
//! The builder checks its inputs in a fixed order and stops at the first failure,
//! so the same inputs always produce the same error:
//!
//! 1. **Range table**: rows are registered in declaration order; a reused label
//!    or an intersection with an earlier row fails the build
//! 2. **Fallback and status systems**: the advisor fallback and the status
//!    classes' system, when given, must each name a registered row
//! 3. **Groups**: sorted by name, then checked for duplicate names, invalid
//!    symbols, codes outside their own declared range, and declared ranges that
//!    intersect another group's
//! 4. **Codes**: every code may be defined once across all groups
//!
//! Building is all-or-nothing. The builder touches no global state; callers
//! that want a process-wide index publish the result through a
//! [`RegistryHandle`](crate::registry::RegistryHandle).

use crate::errors::BuildError;
use crate::observability::messages::registry::{BuildCompleted, BuildStarted};
use crate::observability::messages::StructuredLog;
use crate::registry::definition::is_valid_symbol;
use crate::registry::{
    Code, CodeDefinitionGroup, IndexedCode, RangeTable, RegistryIndex, StatusClasses, SystemRange,
};
use crate::traits::{DefinitionSource, Definitions};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Collects ranges and groups from any number of sources, then builds a [`RegistryIndex`].
///
/// # Examples
///
/// ```
/// use the_codebook::registry::{CodeDefinitionGroup, RegistryBuilder, SystemRange};
///
/// let index = RegistryBuilder::new()
///     .add_range(SystemRange::new("status", 0, 49, "Status codes").unwrap())
///     .add_group(CodeDefinitionGroup::new("UniversalStatus", "Range: 0-49").with_entry(11, "active"))
///     .build()
///     .unwrap();
///
/// let entry = index.get(11).unwrap();
/// assert_eq!(entry.symbol, "active");
/// assert_eq!(entry.subsystem.as_deref(), Some("status"));
/// ```
///
/// ## Rejecting a duplicate code
/// ```
/// use the_codebook::errors::BuildError;
/// use the_codebook::registry::{CodeDefinitionGroup, RegistryBuilder};
///
/// let result = RegistryBuilder::new()
///     .add_group(CodeDefinitionGroup::new("Beta", "").with_entry(7, "ready"))
///     .add_group(CodeDefinitionGroup::new("Alpha", "").with_entry(7, "prepared"))
///     .build();
///
/// assert_eq!(
///     result.unwrap_err(),
///     BuildError::DuplicateCode { code: 7, group_a: "Alpha".into(), group_b: "Beta".into() }
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    ranges: Vec<SystemRange>,
    groups: Vec<CodeDefinitionGroup>,
    fallback_system: Option<String>,
    status_classes: Option<StatusClasses>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(mut self, range: SystemRange) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn add_group(mut self, group: CodeDefinitionGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_fallback_system(mut self, label: impl Into<String>) -> Self {
        self.fallback_system = Some(label.into());
        self
    }

    pub fn with_status_classes(mut self, classes: StatusClasses) -> Self {
        self.status_classes = Some(classes);
        self
    }

    /// Append already-collected definitions. A later fallback or set of status
    /// classes replaces an earlier one.
    pub fn with_definitions(mut self, definitions: Definitions) -> Self {
        self.ranges.extend(definitions.ranges);
        self.groups.extend(definitions.groups);
        if definitions.fallback_system.is_some() {
            self.fallback_system = definitions.fallback_system;
        }
        if definitions.status_classes.is_some() {
            self.status_classes = definitions.status_classes;
        }
        self
    }

    /// Pull definitions from a discovery adapter.
    pub fn with_source(self, source: &dyn DefinitionSource) -> Result<Self, BuildError> {
        let definitions = source.definitions()?;
        Ok(self.with_definitions(definitions))
    }

    pub fn build(self) -> Result<RegistryIndex, BuildError> {
        BuildStarted {
            range_count: self.ranges.len(),
            group_count: self.groups.len(),
        }
        .log();

        let mut system_ranges = RangeTable::new();
        for range in self.ranges {
            system_ranges.register_range(range)?;
        }

        if let Some(label) = &self.fallback_system {
            if system_ranges.get(label).is_none() {
                return Err(BuildError::UnknownFallbackSystem {
                    label: label.clone(),
                });
            }
        }

        let status_classes = self.status_classes.unwrap_or_default();
        if let Some(label) = status_classes.system() {
            if system_ranges.get(label).is_none() {
                return Err(BuildError::UnknownStatusSystem {
                    label: label.to_string(),
                });
            }
        }

        let mut groups = self.groups;
        groups.sort_by(|a, b| a.name().cmp(b.name()));

        validate_unique_group_names(&groups)?;
        for group in &groups {
            validate_group_entries(group)?;
        }
        validate_disjoint_declared_ranges(&groups)?;

        let (code_to_entry, name_to_codes) = index_codes(&groups, &system_ranges)?;

        let index = RegistryIndex {
            code_to_entry,
            name_to_codes,
            system_ranges,
            groups,
            fallback_system: self.fallback_system,
            status_classes,
        };

        BuildCompleted {
            code_count: index.len(),
            range_count: index.ranges().len(),
            group_count: index.groups().len(),
            unclassified_count: index.iter().filter(|(_, e)| e.subsystem.is_none()).count(),
        }
        .log();

        Ok(index)
    }
}

/// Build an index from explicit ranges and groups.
///
/// A pure function of its inputs: groups are processed in name order regardless
/// of the order given, so error messages and maps are reproducible across runs.
pub fn build_registry<R, G>(ranges: R, groups: G) -> Result<RegistryIndex, BuildError>
where
    R: IntoIterator<Item = SystemRange>,
    G: IntoIterator<Item = CodeDefinitionGroup>,
{
    let builder = ranges.into_iter().fold(RegistryBuilder::new(), RegistryBuilder::add_range);
    groups.into_iter().fold(builder, RegistryBuilder::add_group).build()
}

/// Expects `groups` sorted by name, so duplicates are adjacent.
fn validate_unique_group_names(groups: &[CodeDefinitionGroup]) -> Result<(), BuildError> {
    match groups.windows(2).find(|pair| pair[0].name() == pair[1].name()) {
        Some(pair) => Err(BuildError::DuplicateGroup {
            group_name: pair[1].name().to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_group_entries(group: &CodeDefinitionGroup) -> Result<(), BuildError> {
    for entry in group.entries() {
        if !is_valid_symbol(&entry.symbol) {
            return Err(BuildError::InvalidSymbol {
                code: entry.code,
                group_name: group.name().to_string(),
                symbol: entry.symbol.clone(),
            });
        }
        if let Some(range) = group.declared_range() {
            if !range.contains(entry.code) {
                return Err(BuildError::CodeOutsideDeclaredRange {
                    code: entry.code,
                    group_name: group.name().to_string(),
                    range,
                });
            }
        }
    }
    Ok(())
}

/// Pairwise check in name order; the earlier group is always reported first.
fn validate_disjoint_declared_ranges(groups: &[CodeDefinitionGroup]) -> Result<(), BuildError> {
    let declared: Vec<_> = groups
        .iter()
        .filter_map(|g| g.declared_range().map(|range| (g.name(), range)))
        .collect();

    for (i, (name_b, range_b)) in declared.iter().enumerate() {
        if let Some((name_a, range_a)) = declared[..i].iter().find(|(_, a)| a.overlaps(range_b)) {
            return Err(BuildError::RangeOverlap {
                label_a: name_a.to_string(),
                range_a: *range_a,
                label_b: name_b.to_string(),
                range_b: *range_b,
            });
        }
    }
    Ok(())
}

type CodeMaps = (
    BTreeMap<Code, IndexedCode>,
    BTreeMap<String, BTreeSet<Code>>,
);

fn index_codes(groups: &[CodeDefinitionGroup], ranges: &RangeTable) -> Result<CodeMaps, BuildError> {
    let mut code_to_entry = BTreeMap::new();
    let mut name_to_codes: BTreeMap<String, BTreeSet<Code>> = BTreeMap::new();

    for group in groups {
        for entry in group.entries() {
            match code_to_entry.entry(entry.code) {
                Entry::Occupied(existing) => {
                    let existing: &IndexedCode = existing.get();
                    return Err(BuildError::DuplicateCode {
                        code: entry.code,
                        group_a: existing.group_name.clone(),
                        group_b: group.name().to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(IndexedCode {
                        symbol: entry.symbol.clone(),
                        group_name: group.name().to_string(),
                        subsystem: ranges
                            .classify(entry.code)
                            .ok()
                            .map(|row| row.label().to_string()),
                    });
                }
            }
            name_to_codes
                .entry(entry.symbol.clone())
                .or_default()
                .insert(entry.code);
        }
    }

    Ok((code_to_entry, name_to_codes))
}
