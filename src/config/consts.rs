// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Longest symbol accepted at build time or by addition checks
pub const MAX_SYMBOL_LEN: usize = 100;
/// Longest concept description the allocation advisor accepts
pub const MAX_CONCEPT_DESCRIPTION_LEN: usize = 200;
/// Block size used by the `suggest <concept>` command
pub const DEFAULT_ALLOCATION_SIZE: u32 = 10;
/// How many defined codes each summary row previews
pub const SUMMARY_SAMPLE_CODES: usize = 10;
/// Placeholder system name for codes no range covers
pub const UNKNOWN_RANGE_LABEL: &str = "unknown_range";
/// Source name reported for the embedded catalog
pub const BUILTIN_SOURCE_NAME: &str = "builtin:universal.yaml";
