// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::SUMMARY_SAMPLE_CODES;
use crate::registry::{Code, CodeRange, RegistryIndex};
use serde::Serialize;
use std::collections::BTreeMap;

/// Usage of one range table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsystemUsage {
    pub label: String,
    pub range: CodeRange,
    pub description: String,
    pub total_capacity: u64,
    pub codes_used: usize,
    pub codes_available: u64,
    pub utilization_percent: f64,
    /// The lowest few defined codes, as a preview.
    pub defined_codes: Vec<Code>,
}

/// Aggregate snapshot of an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSummary {
    pub total_codes: usize,
    pub unclassified_codes: usize,
    /// Ordered by range start.
    pub per_subsystem: Vec<SubsystemUsage>,
    pub per_group: BTreeMap<String, usize>,
}

impl SystemSummary {
    pub(crate) fn compute(index: &RegistryIndex) -> Self {
        let mut used: BTreeMap<&str, Vec<Code>> = BTreeMap::new();
        let mut per_group: BTreeMap<String, usize> = index
            .groups()
            .iter()
            .map(|g| (g.name().to_string(), 0))
            .collect();
        let mut unclassified_codes = 0;

        for (code, entry) in index.iter() {
            match entry.subsystem.as_deref() {
                Some(label) => used.entry(label).or_default().push(code),
                None => unclassified_codes += 1,
            }
            *per_group.entry(entry.group_name.clone()).or_default() += 1;
        }

        let per_subsystem = index
            .ranges()
            .iter()
            .map(|row| {
                let codes = used.get(row.label()).map(Vec::as_slice).unwrap_or(&[]);
                let total_capacity = row.range().len();
                let codes_used = codes.len();
                SubsystemUsage {
                    label: row.label().to_string(),
                    range: row.range(),
                    description: row.description().to_string(),
                    total_capacity,
                    codes_used,
                    codes_available: total_capacity - codes_used as u64,
                    utilization_percent: codes_used as f64 * 100.0 / total_capacity as f64,
                    defined_codes: codes.iter().take(SUMMARY_SAMPLE_CODES).copied().collect(),
                }
            })
            .collect();

        Self {
            total_codes: index.len(),
            unclassified_codes,
            per_subsystem,
            per_group,
        }
    }

    pub fn subsystem(&self, label: &str) -> Option<&SubsystemUsage> {
        self.per_subsystem.iter().find(|usage| usage.label == label)
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::{build_registry, CodeDefinitionGroup, SystemRange};
    use crate::translator::Translator;
    use std::sync::Arc;

    #[test]
    fn test_summary_counts() {
        let index = build_registry(
            vec![
                SystemRange::new("status", 0, 49, "Status").unwrap(),
                SystemRange::new("priority", 50, 69, "Priority").unwrap(),
            ],
            vec![
                CodeDefinitionGroup::new("Status", "")
                    .with_entries((0..12).map(|c| (c, format!("s{c}")))),
                CodeDefinitionGroup::new("Priority", "").with_entries([(50, "low"), (52, "high")]),
                CodeDefinitionGroup::new("Empty", ""),
                CodeDefinitionGroup::new("Stray", "").with_entry(1000, "stray"),
            ],
        )
        .unwrap();

        let summary = Translator::new(Arc::new(index)).get_system_summary();

        assert_eq!(summary.total_codes, 15);
        assert_eq!(summary.unclassified_codes, 1);
        assert_eq!(summary.per_group["Status"], 12);
        assert_eq!(summary.per_group["Priority"], 2);
        assert_eq!(summary.per_group["Empty"], 0);

        let status = summary.subsystem("status").unwrap();
        assert_eq!(status.total_capacity, 50);
        assert_eq!(status.codes_used, 12);
        assert_eq!(status.codes_available, 38);
        assert_eq!(status.utilization_percent, 24.0);
        assert_eq!(status.defined_codes, (0..10).collect::<Vec<_>>());

        let priority = summary.subsystem("priority").unwrap();
        assert_eq!(priority.defined_codes, vec![50, 52]);

        let labels: Vec<&str> = summary.per_subsystem.iter().map(|u| u.label.as_str()).collect();
        assert_eq!(labels, vec!["status", "priority"]);
    }
}
