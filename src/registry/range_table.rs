// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sorted, non-overlapping range table used to classify codes into subsystems.
//!
//! # Algorithm
//!
//! Rows are kept sorted by `start`. Because rows never overlap, the only row
//! that can cover a code is the last row whose `start <= code`, found with a
//! binary search (`partition_point`) in O(log R) for R rows.
//!
//! Declaration order is remembered separately: the allocation advisor breaks
//! scoring ties by it.

use crate::errors::{BuildError, QueryError};
use crate::registry::{Code, SystemRange};

#[derive(Debug, Clone, Default)]
pub struct RangeTable {
    /// Sorted by range start.
    rows: Vec<SystemRange>,
    /// `declared[i]` is the index into `rows` of the i-th registered row.
    declared: Vec<usize>,
}

impl RangeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a row, rejecting a reused label or any intersection with an earlier row.
    ///
    /// # Examples
    /// ```
    /// use the_codebook::registry::{RangeTable, SystemRange};
    ///
    /// let mut table = RangeTable::new();
    /// table.register_range(SystemRange::new("status", 0, 49, "Status codes").unwrap()).unwrap();
    ///
    /// let clash = SystemRange::new("priority", 40, 69, "Priorities").unwrap();
    /// assert!(table.register_range(clash).is_err());
    /// assert_eq!(table.classify(11).unwrap().label(), "status");
    /// ```
    pub fn register_range(&mut self, row: SystemRange) -> Result<(), BuildError> {
        if self.get(row.label()).is_some() {
            return Err(BuildError::DuplicateRangeLabel {
                label: row.label().to_string(),
            });
        }

        let position = self
            .rows
            .partition_point(|existing| existing.range().start() < row.range().start());

        // Only the neighbours can intersect a row in a sorted, disjoint table.
        let neighbours = [position.checked_sub(1), Some(position)];
        for existing in neighbours.into_iter().flatten().filter_map(|i| self.rows.get(i)) {
            if existing.range().overlaps(&row.range()) {
                return Err(BuildError::RangeOverlap {
                    label_a: existing.label().to_string(),
                    range_a: existing.range(),
                    label_b: row.label().to_string(),
                    range_b: row.range(),
                });
            }
        }

        for index in self.declared.iter_mut() {
            if *index >= position {
                *index += 1;
            }
        }
        self.declared.push(position);
        self.rows.insert(position, row);
        Ok(())
    }

    /// The row covering `code`.
    pub fn classify(&self, code: Code) -> Result<&SystemRange, QueryError> {
        let candidate = self
            .rows
            .partition_point(|row| row.range().start() <= code)
            .checked_sub(1)
            .and_then(|i| self.rows.get(i));

        match candidate {
            Some(row) if row.range().contains(code) => Ok(row),
            _ => Err(QueryError::UnclassifiedCode { code }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&SystemRange> {
        self.rows.iter().find(|row| row.label() == label)
    }

    /// Rows in ascending `start` order.
    pub fn iter(&self) -> impl Iterator<Item = &SystemRange> {
        self.rows.iter()
    }

    /// Rows in the order they were registered.
    pub fn iter_declared(&self) -> impl Iterator<Item = &SystemRange> {
        self.declared.iter().map(move |&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
