// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for consistent, human-readable output
//! and [`StructuredLog`] to emit the same event with structured fields at the
//! level the message documents.
//!
//! # Organization
//!
//! * `registry` - build lifecycle, index swaps, manifest loading
//! * `advisor` - allocation suggestions
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_codebook::observability::messages::registry::BuildStarted;
//! use the_codebook::observability::messages::StructuredLog;
//!
//! let msg = BuildStarted {
//!     range_count: 22,
//!     group_count: 18,
//! };
//!
//! tracing::info!("{}", msg);
//! let _span = msg.span("build").entered();
//! ```

pub mod advisor;
pub mod registry;

use tracing::Span;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// A span carrying the same fields, for wrapping the work the message describes.
    fn span(&self, name: &str) -> Span;
}
