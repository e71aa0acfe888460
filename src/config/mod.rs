// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod catalog;
mod loader;
mod manifest;
pub mod consts;

pub use catalog::{builtin_manifest, StaticCatalog, StaticGroup, StaticRange};
pub use loader::{
    load_manifest, load_manifest_dir, load_manifests, parse_manifest, ManifestFormat,
};
pub use manifest::{AdvisorSection, GroupDefinition, Manifest, RangeDefinition};
