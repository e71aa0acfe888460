// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Definitions compiled into the binary: the embedded universal catalog and
//! static tables for explicit in-code registration.

use crate::config::consts::BUILTIN_SOURCE_NAME;
use crate::config::loader::{parse_manifest, ManifestFormat};
use crate::config::Manifest;
use crate::errors::{BuildError, ManifestError};
use crate::registry::{Code, CodeDefinitionGroup, SystemRange};
use crate::traits::{DefinitionSource, Definitions};
use std::path::Path;

const UNIVERSAL_CATALOG: &str = include_str!("../../catalog/universal.yaml");

/// The embedded universal catalog: the standard namespace layout and core code groups.
///
/// # Examples
/// ```
/// use the_codebook::config::builtin_manifest;
/// use the_codebook::registry::RegistryBuilder;
///
/// let manifest = builtin_manifest().unwrap();
/// let index = RegistryBuilder::new().with_source(&manifest).unwrap().build().unwrap();
/// assert_eq!(index.get(11).unwrap().symbol, "active");
/// ```
pub fn builtin_manifest() -> Result<Manifest, ManifestError> {
    parse_manifest(
        UNIVERSAL_CATALOG,
        ManifestFormat::Yaml,
        Path::new(BUILTIN_SOURCE_NAME),
    )
}

/// One code table declared as a Rust constant.
///
/// # Examples
/// ```
/// use the_codebook::config::StaticGroup;
/// use the_codebook::registry::RegistryBuilder;
///
/// static PAYMENT_EVENTS: StaticGroup = StaticGroup {
///     name: "PaymentEvent",
///     doc: "Payment lifecycle - Range: 12000-12099",
///     codes: &[(12000, "payment_created"), (12001, "payment_authorized")],
/// };
///
/// let index = RegistryBuilder::new().with_source(&PAYMENT_EVENTS).unwrap().build().unwrap();
/// assert_eq!(index.get(12001).unwrap().symbol, "payment_authorized");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StaticGroup {
    pub name: &'static str,
    pub doc: &'static str,
    pub codes: &'static [(Code, &'static str)],
}

impl StaticGroup {
    pub fn to_group(&self) -> CodeDefinitionGroup {
        CodeDefinitionGroup::new(self.name, self.doc).with_entries(self.codes.iter().copied())
    }
}

impl DefinitionSource for StaticGroup {
    fn source_name(&self) -> &str {
        self.name
    }

    fn definitions(&self) -> Result<Definitions, BuildError> {
        Ok(Definitions {
            groups: vec![self.to_group()],
            ..Definitions::default()
        })
    }
}

/// One range table row declared as a Rust constant.
#[derive(Debug, Clone, Copy)]
pub struct StaticRange {
    pub label: &'static str,
    pub start: Code,
    pub end: Code,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ranges and groups bundled as one in-code source.
#[derive(Debug, Clone, Copy)]
pub struct StaticCatalog {
    pub name: &'static str,
    pub ranges: &'static [StaticRange],
    pub groups: &'static [StaticGroup],
    pub fallback_system: Option<&'static str>,
}

impl DefinitionSource for StaticCatalog {
    fn source_name(&self) -> &str {
        self.name
    }

    fn definitions(&self) -> Result<Definitions, BuildError> {
        let ranges = self
            .ranges
            .iter()
            .map(|r| {
                SystemRange::new(r.label, r.start, r.end, r.description)
                    .map(|row| row.with_keywords(r.keywords.iter()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Definitions {
            ranges,
            groups: self.groups.iter().map(StaticGroup::to_group).collect(),
            fallback_system: self.fallback_system.map(str::to_string),
            ..Definitions::default()
        })
    }
}
