// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Manifest;
use crate::errors::ManifestError;
use crate::observability::messages::registry::ManifestLoaded;
use crate::observability::messages::StructuredLog;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk manifest formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Toml,
    Json,
}

impl ManifestFormat {
    /// `.yaml`/`.yml`, `.toml` or `.json`, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse manifest text in a known format. `path` is only used for error context.
pub fn parse_manifest(
    text: &str,
    format: ManifestFormat,
    path: &Path,
) -> Result<Manifest, ManifestError> {
    let manifest: Manifest = match format {
        ManifestFormat::Yaml => serde_yaml::from_str(text).map_err(|source| ManifestError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
        ManifestFormat::Toml => toml::from_str(text).map_err(|source| ManifestError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
        ManifestFormat::Json => serde_json::from_str(text).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })?,
    };
    Ok(manifest.with_origin(path.display().to_string()))
}

/// Load one manifest file.
///
/// # Errors
/// * [`ManifestError::UnsupportedFormat`] for an unknown extension (checked before any I/O)
/// * [`ManifestError::Io`] when the file cannot be read
/// * a format-specific parse error otherwise
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();
    let format = ManifestFormat::from_path(path).ok_or_else(|| ManifestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = parse_manifest(&text, format, path)?;

    ManifestLoaded {
        path,
        range_count: manifest.ranges.len(),
        group_count: manifest.groups.len(),
    }
    .log();

    Ok(manifest)
}

/// Load several manifests in the given order, stopping at the first failure.
pub fn load_manifests<I, P>(paths: I) -> Result<Vec<Manifest>, ManifestError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(load_manifest).collect()
}

/// Load every supported manifest directly inside `dir`, sorted by file name.
///
/// Files with other extensions and subdirectories are skipped.
pub fn load_manifest_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<Manifest>, ManifestError> {
    let dir = dir.as_ref();
    let io_error = |source| ManifestError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && ManifestFormat::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    load_manifests(paths)
}
