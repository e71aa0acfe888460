// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::BuildError;
use crate::registry::{Code, CodeDefinitionGroup, CodeRange, StatusClasses, SystemRange};
use crate::traits::{DefinitionSource, Definitions};
use serde::{Deserialize, Serialize};

/// A definition manifest: range table rows and code groups in one file.
///
/// Every section is optional, so a file may carry only ranges, only groups, or
/// both. Several manifests can feed one build.
///
/// # Example
/// ```yaml
/// advisor:
///   fallback_system: company_specific
/// statuses:
///   system: universal_foundation
///   terminal: [[21, 26], [30, 38]]
///   error: [[30, 38]]
/// ranges:
///   - label: auth_system
///     start: 1000
///     end: 1999
///     description: "Authentication & Authorization"
///     keywords: [auth, login]
/// groups:
///   - name: UserRole
///     description: "User roles - Range: 1000-1049"
///     codes:
///       - [1001, admin]
///       - [1002, user]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub advisor: AdvisorSection,
    #[serde(default)]
    pub statuses: Option<StatusSection>,
    #[serde(default)]
    pub ranges: Vec<RangeDefinition>,
    #[serde(default)]
    pub groups: Vec<GroupDefinition>,
    /// Where the manifest came from; set by the loader, never read from the file.
    #[serde(skip)]
    pub origin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AdvisorSection {
    #[serde(default)]
    pub fallback_system: Option<String>,
}

/// Lifecycle status classes as `[start, end]` pairs inside `system`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusSection {
    pub system: String,
    #[serde(default)]
    pub terminal: Vec<[Code; 2]>,
    #[serde(default)]
    pub error: Vec<[Code; 2]>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RangeDefinition {
    pub label: String,
    pub start: Code,
    pub end: Code,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GroupDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Explicit `[start, end]`; otherwise parsed from a `Range: a-b` suffix in `description`.
    #[serde(default)]
    pub range: Option<[Code; 2]>,
    #[serde(default)]
    pub codes: Vec<(Code, String)>,
}

impl Manifest {
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn to_definitions(&self) -> Result<Definitions, BuildError> {
        let ranges = self
            .ranges
            .iter()
            .map(|def| {
                SystemRange::new(def.label.as_str(), def.start, def.end, def.description.as_str())
                    .map(|row| row.with_keywords(def.keywords.iter()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let groups = self
            .groups
            .iter()
            .map(GroupDefinition::to_group)
            .collect::<Result<Vec<_>, _>>()?;

        let status_classes = self.statuses.as_ref().map(StatusSection::to_classes).transpose()?;

        Ok(Definitions {
            ranges,
            groups,
            fallback_system: self.advisor.fallback_system.clone(),
            status_classes,
        })
    }
}

impl StatusSection {
    pub fn to_classes(&self) -> Result<StatusClasses, BuildError> {
        let range = |label: &str, [start, end]: [Code; 2]| {
            CodeRange::new(start, end).ok_or_else(|| BuildError::InvalidRange {
                label: format!("statuses.{}", label),
                start,
                end,
            })
        };

        let mut classes = StatusClasses::new(self.system.as_str());
        for pair in &self.terminal {
            classes = classes.with_terminal(range("terminal", *pair)?);
        }
        for pair in &self.error {
            classes = classes.with_error(range("error", *pair)?);
        }
        Ok(classes)
    }
}

impl GroupDefinition {
    pub fn to_group(&self) -> Result<CodeDefinitionGroup, BuildError> {
        let mut group = CodeDefinitionGroup::new(self.name.as_str(), self.description.as_str());
        if let Some([start, end]) = self.range {
            let range = CodeRange::new(start, end).ok_or_else(|| BuildError::InvalidRange {
                label: self.name.clone(),
                start,
                end,
            })?;
            group = group.with_range(range);
        }
        Ok(group.with_entries(self.codes.iter().map(|(code, symbol)| (*code, symbol.as_str()))))
    }
}

impl DefinitionSource for Manifest {
    fn source_name(&self) -> &str {
        if self.origin.is_empty() {
            "manifest"
        } else {
            &self.origin
        }
    }

    fn definitions(&self) -> Result<Definitions, BuildError> {
        self.to_definitions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_yaml() {
        let yaml = r#"
advisor:
  fallback_system: auth_system
ranges:
  - label: auth_system
    start: 1000
    end: 1999
    description: "Authentication & Authorization"
    keywords: [Auth, login]
groups:
  - name: UserRole
    description: "User roles - Range: 1000-1049"
    codes:
      - [1001, Admin]
      - [1002, user]
  - name: Explicit
    range: [1500, 1509]
"#;

        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        let defs = manifest.to_definitions().unwrap();

        assert_eq!(defs.fallback_system.as_deref(), Some("auth_system"));
        assert_eq!(defs.ranges.len(), 1);
        assert_eq!(defs.ranges[0].keywords(), ["auth", "login"]);
        assert_eq!(defs.groups[0].declared_range(), CodeRange::new(1000, 1049));
        assert_eq!(defs.groups[0].entries()[0].symbol, "admin");
        assert_eq!(defs.groups[1].declared_range(), CodeRange::new(1500, 1509));
        assert!(defs.groups[1].entries().is_empty());
    }

    #[test]
    fn test_parse_status_section() {
        let yaml = r#"
statuses:
  system: lifecycle
  terminal: [[21, 26], [30, 38]]
  error: [[30, 38]]
"#;
        let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
        let classes = manifest.to_definitions().unwrap().status_classes.unwrap();
        assert_eq!(classes.system(), Some("lifecycle"));
        assert!(classes.is_terminal(24));
        assert!(!classes.is_error(24));
        assert!(classes.is_error(38));

        let manifest: Manifest =
            serde_yaml::from_str("statuses:\n  system: s\n  error: [[38, 30]]\n").unwrap();
        assert_eq!(
            manifest.to_definitions().unwrap_err(),
            BuildError::InvalidRange { label: "statuses.error".to_string(), start: 38, end: 30 }
        );
    }

    #[test]
    fn test_sections_are_optional() {
        let manifest: Manifest = serde_yaml::from_str("groups: []").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.source_name(), "manifest");
    }

    #[test]
    fn test_inverted_ranges_fail() {
        let manifest: Manifest = serde_yaml::from_str(
            "ranges:\n  - {label: bad, start: 10, end: 5}\n",
        )
        .unwrap();
        assert_eq!(
            manifest.to_definitions().unwrap_err(),
            BuildError::InvalidRange { label: "bad".to_string(), start: 10, end: 5 }
        );

        let manifest: Manifest =
            serde_yaml::from_str("groups:\n  - {name: G, range: [9, 1]}\n").unwrap();
        assert!(matches!(
            manifest.to_definitions(),
            Err(BuildError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_parse_manifest_toml_and_json() {
        let toml_text = r#"
[[ranges]]
label = "status"
start = 0
end = 49

[[groups]]
name = "Status"
codes = [[11, "active"], [21, "completed"]]
"#;
        let from_toml: Manifest = toml::from_str(toml_text).unwrap();

        let json_text = r#"{
            "ranges": [{"label": "status", "start": 0, "end": 49}],
            "groups": [{"name": "Status", "codes": [[11, "active"], [21, "completed"]]}]
        }"#;
        let from_json: Manifest = serde_json::from_str(json_text).unwrap();

        assert_eq!(from_toml, from_json);
        assert_eq!(from_toml.groups[0].codes[1], (21, "completed".to_string()));
    }
}
