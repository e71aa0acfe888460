// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Allocation advice: where should a block of new codes for a concept go?
//!
//! # Algorithm
//!
//! 1. Score every declared range against the concept description
//!    (see [`scoring`]) and keep the highest, earliest-declared on ties. When
//!    nothing scores, use the index's fallback system, or the first declared
//!    range if no fallback is configured.
//! 2. Walk the defined codes of that range in ascending order, measuring the
//!    free gap before each one and after the last. The first gap of at least
//!    the requested size wins; its start and length are reported.
//!
//! Suggestions are advisory. The index is never touched, so two callers may be
//! handed the same block; anyone who needs a hard reservation must serialise
//! suggestion and registration themselves.

mod guard;
pub mod scoring;

pub use guard::{validate_code_addition, AdditionProblem, AdditionReport};

use crate::config::consts::MAX_CONCEPT_DESCRIPTION_LEN;
use crate::errors::QueryError;
use crate::observability::messages::advisor::AllocationSuggested;
use crate::observability::messages::StructuredLog;
use crate::registry::{Code, CodeRange, RegistryIndex, SystemRange};
use scoring::{score_range, tokenize, RangeScore};
use serde::Serialize;
use std::sync::Arc;

/// A recommended block of unused codes. Computed per query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSuggestion {
    pub suggested_system: String,
    pub suggested_start_code: Code,
    /// Length of the free gap starting at `suggested_start_code`.
    pub available_space: u64,
    pub requested_size: u32,
    pub range: CodeRange,
    pub system_description: String,
    pub matched_keywords: Vec<String>,
    pub rationale: String,
}

impl AllocationSuggestion {
    /// The first `requested_size` codes of the suggested gap.
    pub fn block(&self) -> CodeRange {
        let end = self.suggested_start_code as u64 + self.requested_size as u64 - 1;
        CodeRange::new(self.suggested_start_code, end as Code).unwrap_or(self.range)
    }
}

#[derive(Debug, Clone)]
pub struct AllocationAdvisor {
    index: Arc<RegistryIndex>,
}

impl AllocationAdvisor {
    pub fn new(index: Arc<RegistryIndex>) -> Self {
        Self { index }
    }

    /// Pick a range for `description` and the first gap of `estimated_size` codes in it.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use the_codebook::advisor::AllocationAdvisor;
    /// use the_codebook::registry::{build_registry, CodeDefinitionGroup, SystemRange};
    ///
    /// let index = build_registry(
    ///     vec![
    ///         SystemRange::new("status", 0, 99, "Status codes").unwrap(),
    ///         SystemRange::new("payment", 12000, 12099, "Payments").unwrap(),
    ///     ],
    ///     vec![CodeDefinitionGroup::new("PaymentEvent", "")
    ///         .with_entries((12000..12005).map(|c| (c, format!("event_{c}"))))],
    /// ).unwrap();
    ///
    /// let suggestion = AllocationAdvisor::new(Arc::new(index))
    ///     .suggest_allocation("payment", 10)
    ///     .unwrap();
    /// assert_eq!(suggestion.suggested_system, "payment");
    /// assert_eq!(suggestion.suggested_start_code, 12005);
    /// ```
    pub fn suggest_allocation(
        &self,
        description: &str,
        estimated_size: u32,
    ) -> Result<AllocationSuggestion, QueryError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(invalid("concept description cannot be empty"));
        }
        if description.chars().count() > MAX_CONCEPT_DESCRIPTION_LEN {
            return Err(invalid(format!(
                "concept description is longer than {} characters",
                MAX_CONCEPT_DESCRIPTION_LEN
            )));
        }
        check_size(estimated_size)?;

        let tokens = tokenize(description);
        let (row, score) = self.pick_range(&tokens)?;
        let rationale = if score.matched.is_empty() {
            format!(
                "No range matched '{}'; defaulting to '{}'",
                description,
                row.label()
            )
        } else {
            format!(
                "Matched {} against '{}' ({})",
                score.matched.join(", "),
                row.label(),
                row.description()
            )
        };

        self.suggest_within(row, estimated_size, score.matched, rationale)
    }

    /// The same gap search in an explicitly named range.
    pub fn suggest_allocation_in(
        &self,
        system: &str,
        estimated_size: u32,
    ) -> Result<AllocationSuggestion, QueryError> {
        check_size(estimated_size)?;
        let row = self
            .index
            .ranges()
            .get(system)
            .ok_or_else(|| QueryError::UnknownSystem {
                label: system.to_string(),
            })?;
        let rationale = format!("Requested range '{}' ({})", row.label(), row.description());
        self.suggest_within(row, estimated_size, Vec::new(), rationale)
    }

    /// See [`validate_code_addition`].
    pub fn validate_code_addition(&self, code: Code, symbol: &str, system: &str) -> AdditionReport {
        validate_code_addition(&self.index, code, symbol, system)
    }

    fn pick_range(&self, tokens: &[String]) -> Result<(&SystemRange, RangeScore), QueryError> {
        let ranges = self.index.ranges();
        let mut best: Option<(&SystemRange, RangeScore)> = None;
        for row in ranges.iter_declared() {
            let score = score_range(tokens, row);
            // Strictly greater keeps the earliest declaration on ties.
            if score.score > 0 && best.as_ref().map_or(true, |(_, b)| score.score > b.score) {
                best = Some((row, score));
            }
        }
        if let Some(found) = best {
            return Ok(found);
        }

        let fallback = self
            .index
            .fallback_system()
            .and_then(|label| ranges.get(label))
            .or_else(|| ranges.iter_declared().next())
            .ok_or_else(|| invalid("the registry has no ranges to allocate from"))?;
        Ok((fallback, RangeScore { score: 0, matched: Vec::new() }))
    }

    fn suggest_within(
        &self,
        row: &SystemRange,
        size: u32,
        matched_keywords: Vec<String>,
        rationale: String,
    ) -> Result<AllocationSuggestion, QueryError> {
        let range = row.range();
        let wanted = size as u64;
        let mut cursor = range.start() as u64;
        let mut largest_gap = 0u64;
        let mut found = None;

        for code in self
            .index
            .codes_between(range.start(), range.end())
            .map(u64::from)
            .chain(std::iter::once(range.end() as u64 + 1))
        {
            let gap = code - cursor;
            if gap >= wanted {
                found = Some((cursor, gap));
                break;
            }
            largest_gap = largest_gap.max(gap);
            cursor = code + 1;
        }

        let Some((start, available_space)) = found else {
            return Err(QueryError::NoSpaceAvailable {
                system: row.label().to_string(),
                range,
                requested: size,
                largest_gap,
            });
        };

        let suggestion = AllocationSuggestion {
            suggested_system: row.label().to_string(),
            // `start` lies inside `range`, so it fits a code.
            suggested_start_code: start as Code,
            available_space,
            requested_size: size,
            range,
            system_description: row.description().to_string(),
            matched_keywords,
            rationale,
        };

        AllocationSuggested {
            system: &suggestion.suggested_system,
            start_code: suggestion.suggested_start_code,
            requested_size: size,
            available_space,
        }
        .log();

        Ok(suggestion)
    }
}

fn check_size(size: u32) -> Result<(), QueryError> {
    if size == 0 {
        return Err(invalid("estimated size must be at least 1"));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> QueryError {
    QueryError::InvalidAllocationRequest {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CodeDefinitionGroup, RegistryBuilder};

    fn advisor() -> AllocationAdvisor {
        let index = RegistryBuilder::new()
            .add_range(SystemRange::new("universal_foundation", 0, 99, "Universal status codes").unwrap())
            .add_range(
                SystemRange::new("auth_system", 1000, 1999, "Authentication & Authorization")
                    .unwrap()
                    .with_keywords(["auth", "login", "permission", "role", "security"]),
            )
            .add_range(SystemRange::new("payment", 12000, 12099, "Payment processing").unwrap())
            .add_range(SystemRange::new("company_specific", 20000, 29999, "Company specific").unwrap())
            .with_fallback_system("company_specific")
            .add_group(
                CodeDefinitionGroup::new("PaymentEvent", "Range: 12000-12099")
                    .with_entries((12000..12005).map(|c| (c, format!("payment_{c}")))),
            )
            .add_group(
                CodeDefinitionGroup::new("AuthEvent", "")
                    .with_entries([(1000, "login"), (1001, "logout"), (1010, "denied")]),
            )
            .build()
            .unwrap();
        AllocationAdvisor::new(Arc::new(index))
    }

    #[test]
    fn test_payment_block_after_existing_codes() {
        let suggestion = advisor().suggest_allocation("payment", 10).unwrap();
        assert_eq!(suggestion.suggested_system, "payment");
        assert_eq!(suggestion.suggested_start_code, 12005);
        assert!(suggestion.available_space >= 10);
        assert_eq!(suggestion.available_space, 95);
        assert_eq!(suggestion.block(), CodeRange::new(12005, 12014).unwrap());
        assert!(suggestion.rationale.contains("payment"));
    }

    #[test]
    fn test_oversized_request_has_no_space() {
        let err = advisor().suggest_allocation("payment", 1000).unwrap_err();
        assert_eq!(err, QueryError::NoSpaceAvailable {
            system: "payment".to_string(),
            range: CodeRange::new(12000, 12099).unwrap(),
            requested: 1000,
            largest_gap: 95,
        });
    }

    #[test]
    fn test_first_gap_that_fits_wins() {
        let advisor = advisor();
        // 1002..=1009 is a gap of 8.
        let small = advisor.suggest_allocation("login flow", 5).unwrap();
        assert_eq!(small.suggested_system, "auth_system");
        assert_eq!(small.suggested_start_code, 1002);
        assert_eq!(small.available_space, 8);

        let large = advisor.suggest_allocation("login flow", 20).unwrap();
        assert_eq!(large.suggested_start_code, 1011);
        assert_eq!(large.available_space, 989);
    }

    #[test]
    fn test_keywords_beat_description_words() {
        let suggestion = advisor()
            .suggest_allocation("authentication service", 10)
            .unwrap();
        assert_eq!(suggestion.suggested_system, "auth_system");
        assert_eq!(suggestion.matched_keywords, vec!["authentication"]);
    }

    #[test]
    fn test_ties_go_to_earliest_declaration() {
        // payment and company_specific both score 1.
        let suggestion = advisor().suggest_allocation("processing specific", 1).unwrap();
        assert_eq!(suggestion.suggested_system, "payment");
    }

    #[test]
    fn test_unmatched_description_uses_fallback() {
        let suggestion = advisor().suggest_allocation("zebra husbandry", 10).unwrap();
        assert_eq!(suggestion.suggested_system, "company_specific");
        assert_eq!(suggestion.suggested_start_code, 20000);
        assert!(suggestion.matched_keywords.is_empty());
    }

    #[test]
    fn test_guard_rails() {
        let advisor = advisor();
        assert!(matches!(
            advisor.suggest_allocation("   ", 10),
            Err(QueryError::InvalidAllocationRequest { .. })
        ));
        assert!(matches!(
            advisor.suggest_allocation(&"x".repeat(201), 10),
            Err(QueryError::InvalidAllocationRequest { .. })
        ));
        assert!(matches!(
            advisor.suggest_allocation("payment", 0),
            Err(QueryError::InvalidAllocationRequest { .. })
        ));
    }

    #[test]
    fn test_explicit_range() {
        let advisor = advisor();
        let suggestion = advisor.suggest_allocation_in("universal_foundation", 100).unwrap();
        assert_eq!(suggestion.suggested_start_code, 0);
        assert_eq!(suggestion.available_space, 100);

        assert_eq!(
            advisor.suggest_allocation_in("nope", 1),
            Err(QueryError::UnknownSystem { label: "nope".to_string() })
        );
    }

    #[test]
    fn test_suggestion_does_not_change_index() {
        let advisor = advisor();
        let before = advisor.index.len();
        let first = advisor.suggest_allocation("payment", 10).unwrap();
        let second = advisor.suggest_allocation("payment", 10).unwrap();
        assert_eq!(first, second);
        assert_eq!(advisor.index.len(), before);
    }
}
