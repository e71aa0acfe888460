// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod advisor;       // allocation suggestions and addition checks
pub mod config;        // manifests, built-in catalog, constants
pub mod errors;        // error handling
pub mod observability;
pub mod registry;      // builder, range table, immutable index, handle
pub mod request;       // JSON request interface
pub mod traits;        // definition source abstraction
pub mod translator;    // read-only queries
