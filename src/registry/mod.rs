// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod builder;
mod definition;
mod handle;
mod index;
mod range;
mod range_table;
pub mod snapshot;
mod status;


pub use builder::{build_registry, RegistryBuilder};
pub use definition::{is_valid_symbol, CodeDefinitionGroup, CodeEntry, SystemRange};
pub use handle::{RegistryHandle, RegistrySnapshot};
pub use index::{IndexedCode, RegistryIndex};
pub use range::{Code, CodeRange, ParseRangeError};
pub use range_table::RangeTable;
pub use status::StatusClasses;
