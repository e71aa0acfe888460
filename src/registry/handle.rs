// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The one piece of mutable shared state: which index is current.
//!
//! Readers call [`RegistryHandle::load`] and get an `Arc` to an immutable
//! snapshot without taking a lock. Writers build a complete new index first and
//! then swap the pointer; a failed build never disturbs the current snapshot.
//! Writers are serialised by a mutex so versions increase by exactly one per swap.

use crate::advisor::AllocationAdvisor;
use crate::errors::BuildError;
use crate::observability::messages::registry::RegistrySwapped;
use crate::observability::messages::StructuredLog;
use crate::registry::{RegistryBuilder, RegistryIndex};
use crate::traits::DefinitionSource;
use crate::translator::Translator;
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex};

/// An index together with the version it was published under.
#[derive(Debug)]
pub struct RegistrySnapshot {
    pub version: u64,
    pub index: Arc<RegistryIndex>,
}

/// Process-level holder of the current [`RegistryIndex`].
///
/// # Examples
/// ```
/// use the_codebook::registry::{build_registry, CodeDefinitionGroup, RegistryHandle, SystemRange};
///
/// let first = build_registry(
///     vec![SystemRange::new("status", 0, 49, "Status").unwrap()],
///     vec![CodeDefinitionGroup::new("Status", "").with_entry(11, "active")],
/// ).unwrap();
/// let handle = RegistryHandle::new(first);
/// assert_eq!(handle.version(), 1);
///
/// let reader = handle.translator();
///
/// let second = build_registry(
///     vec![SystemRange::new("status", 0, 49, "Status").unwrap()],
///     vec![CodeDefinitionGroup::new("Status", "").with_entry(11, "running")],
/// ).unwrap();
/// assert_eq!(handle.replace(second), 2);
///
/// // Existing readers keep the index they started with.
/// assert_eq!(reader.translate(11).unwrap(), "active");
/// assert_eq!(handle.translator().translate(11).unwrap(), "running");
/// ```
pub struct RegistryHandle {
    current: ArcSwap<RegistrySnapshot>,
    writer: Mutex<()>,
}

impl RegistryHandle {
    pub fn new(index: RegistryIndex) -> Self {
        Self {
            current: ArcSwap::from_pointee(RegistrySnapshot {
                version: 1,
                index: Arc::new(index),
            }),
            writer: Mutex::new(()),
        }
    }

    /// Lock-free read of the current snapshot.
    pub fn load(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    pub fn index(&self) -> Arc<RegistryIndex> {
        Arc::clone(&self.current.load().index)
    }

    pub fn version(&self) -> u64 {
        self.current.load().version
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.index())
    }

    pub fn advisor(&self) -> AllocationAdvisor {
        AllocationAdvisor::new(self.index())
    }

    /// Publish a new index and return its version.
    pub fn replace(&self, index: RegistryIndex) -> u64 {
        // The guard protects no data, so a poisoned lock is still usable.
        let _guard = self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let version = self.current.load().version + 1;
        let code_count = index.len();
        self.current.store(Arc::new(RegistrySnapshot {
            version,
            index: Arc::new(index),
        }));

        RegistrySwapped { version, code_count }.log();
        version
    }

    /// Build from `sources` and publish on success; on failure the current index stays.
    pub fn rebuild(&self, sources: &[&dyn DefinitionSource]) -> Result<u64, BuildError> {
        let builder = sources
            .iter()
            .try_fold(RegistryBuilder::new(), |builder, source| builder.with_source(*source))?;
        let index = builder.build()?;
        Ok(self.replace(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{build_registry, CodeDefinitionGroup, SystemRange};
    use crate::traits::Definitions;
    use std::thread;

    struct Fixed(Definitions);

    impl DefinitionSource for Fixed {
        fn source_name(&self) -> &str {
            "fixed"
        }

        fn definitions(&self) -> Result<Definitions, BuildError> {
            Ok(self.0.clone())
        }
    }

    fn status_index(symbol: &str) -> RegistryIndex {
        build_registry(
            vec![SystemRange::new("status", 0, 49, "").unwrap()],
            vec![CodeDefinitionGroup::new("Status", "").with_entry(11, symbol)],
        )
        .unwrap()
    }

    #[test]
    fn test_failed_rebuild_keeps_current_index() {
        let handle = RegistryHandle::new(status_index("active"));

        let clashing = Fixed(Definitions {
            groups: vec![
                CodeDefinitionGroup::new("A", "").with_entry(1, "one"),
                CodeDefinitionGroup::new("B", "").with_entry(1, "uno"),
            ],
            ..Definitions::default()
        });

        let result = handle.rebuild(&[&clashing]);
        assert!(matches!(result, Err(BuildError::DuplicateCode { code: 1, .. })));
        assert_eq!(handle.version(), 1);
        assert_eq!(handle.translator().translate(11).unwrap(), "active");
    }

    #[test]
    fn test_rebuild_merges_sources() {
        let handle = RegistryHandle::new(status_index("active"));

        let ranges = Fixed(Definitions {
            ranges: vec![SystemRange::new("auth", 1000, 1999, "").unwrap()],
            ..Definitions::default()
        });
        let groups = Fixed(Definitions {
            groups: vec![CodeDefinitionGroup::new("Roles", "").with_entry(1001, "admin")],
            ..Definitions::default()
        });

        assert_eq!(handle.rebuild(&[&ranges, &groups]).unwrap(), 2);
        let translator = handle.translator();
        assert_eq!(translator.translate(1001).unwrap(), "admin");
        assert_eq!(translator.get_system_for_code(1001).unwrap(), "auth");
        assert!(translator.translate(11).is_err());
    }

    #[test]
    fn test_concurrent_readers_during_swaps() {
        let handle = Arc::new(RegistryHandle::new(status_index("active")));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = handle.load();
                        let symbol = &snapshot.index.get(11).unwrap().symbol;
                        assert!(symbol == "active" || symbol == "running");
                    }
                })
            })
            .collect();

        for _ in 0..10 {
            handle.replace(status_index("running"));
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(handle.version(), 11);
    }
}
