// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic line the library emits comes from a message struct in
//! [`messages`]. Each struct implements `Display` for the human-readable text
//! and [`messages::StructuredLog`] to attach typed fields, so no log string is
//! written inline at a call site.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::registry` - index builds, swaps and manifest loading
//! * `messages::advisor` - allocation suggestions
//!
//! # Usage
//!
//! ```rust
//! use the_codebook::observability::messages::registry::RegistrySwapped;
//! use the_codebook::observability::messages::StructuredLog;
//!
//! let msg = RegistrySwapped {
//!     version: 2,
//!     code_count: 410,
//! };
//!
//! tracing::info!("{}", msg);
//! msg.log();
//! ```
//!
//! The library never installs a subscriber; binaries choose where output goes.

pub mod messages;
