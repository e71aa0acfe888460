// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod build;
mod manifest;
mod query;

pub use build::BuildError;
pub use manifest::{ManifestError, SnapshotError};
pub use query::QueryError;
