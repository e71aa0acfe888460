// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::BuildError;
use crate::registry::{CodeDefinitionGroup, StatusClasses, SystemRange};

/// Everything one discovery adapter contributes to a build.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub ranges: Vec<SystemRange>,
    pub groups: Vec<CodeDefinitionGroup>,
    pub fallback_system: Option<String>,
    pub status_classes: Option<StatusClasses>,
}

/// A discovery adapter: turns whatever code tables exist (static arrays,
/// manifest files, generated code) into records the registry builder ingests.
///
/// The builder never scans for definitions itself; every source is handed to it
/// explicitly, which keeps the build a pure function of its inputs.
pub trait DefinitionSource {
    /// Short name used in logs.
    fn source_name(&self) -> &str;

    fn definitions(&self) -> Result<Definitions, BuildError>;
}
