// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Guard rails for proposing a new code before it is added to a definition source.

use crate::config::consts::MAX_SYMBOL_LEN;
use crate::registry::{is_valid_symbol, Code, CodeRange, RegistryIndex};
use serde::Serialize;
use std::fmt;

/// One reason a proposed code cannot be added as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum AdditionProblem {
    CodeTaken { code: Code, existing_symbol: String },
    UnknownSystem { system: String },
    OutsideSystemRange { code: Code, system: String, range: CodeRange },
    EmptySymbol,
    SymbolTooLong { length: usize, max: usize },
    InvalidSymbol { symbol: String },
    SymbolTakenInSystem { symbol: String, system: String, code: Code },
}

impl fmt::Display for AdditionProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdditionProblem::CodeTaken { code, existing_symbol } => write!(
                f,
                "Code {} already exists with symbol '{}'; codes are immutable",
                code, existing_symbol
            ),
            AdditionProblem::UnknownSystem { system } => {
                write!(f, "System '{}' is not a registered range", system)
            }
            AdditionProblem::OutsideSystemRange { code, system, range } => write!(
                f,
                "Code {} is outside the range of system '{}' ({})",
                code, system, range
            ),
            AdditionProblem::EmptySymbol => write!(f, "Symbol cannot be empty"),
            AdditionProblem::SymbolTooLong { length, max } => {
                write!(f, "Symbol is {} characters long (max {})", length, max)
            }
            AdditionProblem::InvalidSymbol { symbol } => write!(
                f,
                "Symbol '{}' must start with a lowercase letter and contain only lowercase letters, digits, '_' or '.'",
                symbol
            ),
            AdditionProblem::SymbolTakenInSystem { symbol, system, code } => write!(
                f,
                "Symbol '{}' is already used in system '{}' by code {}",
                symbol, system, code
            ),
        }
    }
}

/// Outcome of [`validate_code_addition`]: every problem found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdditionReport {
    pub code: Code,
    pub symbol: String,
    pub system: String,
    pub valid: bool,
    pub problems: Vec<AdditionProblem>,
}

/// Check whether `code` could be added under `symbol` in range `system`.
///
/// Accumulates every problem so a proposal can be fixed in one pass. Read-only:
/// a passing report reserves nothing.
pub fn validate_code_addition(
    index: &RegistryIndex,
    code: Code,
    symbol: &str,
    system: &str,
) -> AdditionReport {
    let mut problems = Vec::new();
    let normalized = symbol.trim().to_lowercase();

    if let Some(existing) = index.get(code) {
        problems.push(AdditionProblem::CodeTaken {
            code,
            existing_symbol: existing.symbol.clone(),
        });
    }

    match index.ranges().get(system) {
        None => problems.push(AdditionProblem::UnknownSystem {
            system: system.to_string(),
        }),
        Some(row) if !row.range().contains(code) => {
            problems.push(AdditionProblem::OutsideSystemRange {
                code,
                system: system.to_string(),
                range: row.range(),
            })
        }
        Some(_) => {}
    }

    if normalized.is_empty() {
        problems.push(AdditionProblem::EmptySymbol);
    } else if normalized.len() > MAX_SYMBOL_LEN {
        problems.push(AdditionProblem::SymbolTooLong {
            length: normalized.len(),
            max: MAX_SYMBOL_LEN,
        });
    } else if !is_valid_symbol(&normalized) {
        problems.push(AdditionProblem::InvalidSymbol {
            symbol: symbol.to_string(),
        });
    }

    let clash = index
        .codes_named(&normalized)
        .into_iter()
        .flatten()
        .copied()
        .find(|existing| {
            index
                .get(*existing)
                .is_some_and(|entry| entry.subsystem.as_deref() == Some(system))
        });
    if let Some(existing) = clash {
        problems.push(AdditionProblem::SymbolTakenInSystem {
            symbol: normalized.clone(),
            system: system.to_string(),
            code: existing,
        });
    }

    AdditionReport {
        code,
        symbol: normalized,
        system: system.to_string(),
        valid: problems.is_empty(),
        problems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{build_registry, CodeDefinitionGroup, SystemRange};

    fn index() -> RegistryIndex {
        build_registry(
            vec![
                SystemRange::new("universal_foundation", 0, 99, "Universal").unwrap(),
                SystemRange::new("auth_system", 1000, 1999, "Auth").unwrap(),
            ],
            vec![CodeDefinitionGroup::new("UniversalStatus", "Range: 0-49")
                .with_entries([(11, "active"), (32, "failed")])],
        )
        .unwrap()
    }

    #[test]
    fn test_existing_code_is_rejected() {
        let report = validate_code_addition(&index(), 11, "test_code", "universal_foundation");
        assert!(!report.valid);
        assert_eq!(report.problems, vec![AdditionProblem::CodeTaken {
            code: 11,
            existing_symbol: "active".to_string(),
        }]);
        assert!(report.problems[0].to_string().contains("already exists"));
    }

    #[test]
    fn test_free_code_passes() {
        let report = validate_code_addition(&index(), 98, "new_test_code", "universal_foundation");
        assert!(report.valid);
        assert!(report.problems.is_empty());
    }

    #[test]
    fn test_problems_accumulate() {
        let report = validate_code_addition(&index(), 500, "Bad Name!", "auth_system");
        assert!(!report.valid);
        assert_eq!(report.problems.len(), 2);
        assert!(matches!(report.problems[0], AdditionProblem::OutsideSystemRange { .. }));
        assert!(matches!(report.problems[1], AdditionProblem::InvalidSymbol { .. }));
    }

    #[test]
    fn test_symbol_reuse_within_system() {
        let report = validate_code_addition(&index(), 60, "FAILED", "universal_foundation");
        assert_eq!(report.problems, vec![AdditionProblem::SymbolTakenInSystem {
            symbol: "failed".to_string(),
            system: "universal_foundation".to_string(),
            code: 32,
        }]);

        // The same symbol in another system is fine.
        let report = validate_code_addition(&index(), 1500, "failed", "auth_system");
        assert!(report.valid);
    }

    #[test]
    fn test_unknown_system_and_empty_symbol() {
        let report = validate_code_addition(&index(), 5, "  ", "nowhere");
        assert_eq!(report.problems, vec![
            AdditionProblem::UnknownSystem { system: "nowhere".to_string() },
            AdditionProblem::EmptySymbol,
        ]);
    }
}
