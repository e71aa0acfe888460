// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for registry construction and publication.
//!
//! This module contains message types for logging events related to:
//! * Index builds (start, completion)
//! * Swapping the current index on a handle
//! * Loading definition manifests from disk
//! * Failed reloads

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// Index build started.
///
/// # Log Level
/// `debug!` - Routine lifecycle event
///
/// # Example
/// ```
/// use the_codebook::observability::messages::registry::BuildStarted;
///
/// let msg = BuildStarted {
///     range_count: 22,
///     group_count: 18,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct BuildStarted {
    pub range_count: usize,
    pub group_count: usize,
}

impl Display for BuildStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Building registry from {} ranges and {} groups",
            self.range_count, self.group_count
        )
    }
}

impl StructuredLog for BuildStarted {
    fn log(&self) {
        tracing::debug!(
            range_count = self.range_count,
            group_count = self.group_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "registry_build",
            name = name,
            range_count = self.range_count,
            group_count = self.group_count,
        )
    }
}

/// Index build completed.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_codebook::observability::messages::registry::BuildCompleted;
///
/// let msg = BuildCompleted {
///     code_count: 410,
///     range_count: 22,
///     group_count: 18,
///     unclassified_count: 0,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BuildCompleted {
    pub code_count: usize,
    pub range_count: usize,
    pub group_count: usize,
    pub unclassified_count: usize,
}

impl Display for BuildCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registry built: {} codes across {} groups, {} ranges ({} unclassified)",
            self.code_count, self.group_count, self.range_count, self.unclassified_count
        )
    }
}

impl StructuredLog for BuildCompleted {
    fn log(&self) {
        tracing::info!(
            code_count = self.code_count,
            range_count = self.range_count,
            group_count = self.group_count,
            unclassified_count = self.unclassified_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "registry_built",
            name = name,
            code_count = self.code_count,
            range_count = self.range_count,
            group_count = self.group_count,
            unclassified_count = self.unclassified_count,
        )
    }
}

/// A new index was published on a handle.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RegistrySwapped {
    pub version: u64,
    pub code_count: usize,
}

impl Display for RegistrySwapped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Published registry version {} ({} codes)",
            self.version, self.code_count
        )
    }
}

impl StructuredLog for RegistrySwapped {
    fn log(&self) {
        tracing::info!(
            version = self.version,
            code_count = self.code_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "registry_swap",
            name = name,
            version = self.version,
            code_count = self.code_count,
        )
    }
}

/// A definition manifest was read and parsed.
///
/// # Log Level
/// `debug!` - Routine lifecycle event
///
/// # Example
/// ```
/// use std::path::Path;
/// use the_codebook::observability::messages::registry::ManifestLoaded;
///
/// let msg = ManifestLoaded {
///     path: Path::new("catalog/universal.yaml"),
///     range_count: 22,
///     group_count: 18,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ManifestLoaded<'a> {
    pub path: &'a Path,
    pub range_count: usize,
    pub group_count: usize,
}

impl Display for ManifestLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded manifest '{}': {} ranges, {} groups",
            self.path.display(),
            self.range_count,
            self.group_count
        )
    }
}

impl StructuredLog for ManifestLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            path = %self.path.display(),
            range_count = self.range_count,
            group_count = self.group_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "manifest_load",
            name = name,
            path = %self.path.display(),
        )
    }
}

/// Reloading definitions failed; the current index stays published.
///
/// # Log Level
/// `warn!` - Degraded but still serving
pub struct RegistryReloadFailed<'a> {
    pub version: u64,
    pub error: &'a dyn std::error::Error,
}

impl Display for RegistryReloadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Registry reload failed, keeping version {}: {}",
            self.version, self.error
        )
    }
}

impl StructuredLog for RegistryReloadFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            version = self.version,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "registry_reload",
            name = name,
            version = self.version,
            error = %self.error,
        )
    }
}
