//! Per-type descriptors and the process-wide descriptor registry.
//!
//! A `TypeDescriptor` is built once per record type from its declared
//! bindings, then shared read-only for the life of the process. The
//! registry's get-or-create is atomic, so concurrent first-use from many
//! threads converges on one canonical descriptor instance.

use std::any::{type_name, Any, TypeId};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::errors::{DaoError, DaoResult};
use crate::mapper::StructMapper;
use crate::record::{Column, Record};

/// Immutable column-to-field binding metadata for one record type.
///
/// Holds the declared binding list plus a tag index: for every tag
/// namespace, the ordered subset of bindings that belong to it.
pub struct TypeDescriptor<T: Record> {
    columns: &'static [Column<T>],
    all: Vec<usize>,
    by_tag: FxHashMap<&'static str, Vec<usize>>,
}

impl<T: Record> TypeDescriptor<T> {
    fn build() -> DaoResult<Self> {
        let columns = T::columns();
        if columns.is_empty() {
            return Err(DaoError::InvalidRecordType {
                type_name: type_name::<T>(),
            });
        }

        let mut by_tag: FxHashMap<&'static str, Vec<usize>> = FxHashMap::default();
        for (idx, column) in columns.iter().enumerate() {
            for tag in column.tags {
                by_tag.entry(tag).or_default().push(idx);
            }
        }

        Ok(Self {
            columns,
            all: (0..columns.len()).collect(),
            by_tag,
        })
    }

    /// The declared binding list, in scan order.
    pub fn columns(&self) -> &'static [Column<T>] {
        self.columns
    }

    /// Resolve a tag namespace to the ordered binding indices it selects.
    /// The empty namespace selects every declared binding; any other
    /// namespace must match at least one.
    pub fn resolve(&self, tag: &str) -> DaoResult<&[usize]> {
        if tag.is_empty() {
            return Ok(&self.all);
        }
        self.by_tag
            .get(tag)
            .map(Vec::as_slice)
            .ok_or_else(|| DaoError::TagResolution {
                tag: tag.to_string(),
                type_name: type_name::<T>(),
            })
    }

    /// Column names selected by a tag namespace, in scan order. This is the
    /// projection a query must use for positional scanning to line up.
    pub fn column_list(&self, tag: &str) -> DaoResult<Vec<&'static str>> {
        Ok(self
            .resolve(tag)?
            .iter()
            .map(|&idx| self.columns[idx].name)
            .collect())
    }

    pub(crate) fn record_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Concurrency-safe store of type descriptors, keyed by record type.
///
/// Descriptors are created lazily on first use and never evicted; the
/// population is bounded by the number of record types in the program, not
/// by data volume. Construct one per test for isolation, or use
/// [`MapperRegistry::global`] for the shared process-wide instance.
#[derive(Default)]
pub struct MapperRegistry {
    descriptors: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

static GLOBAL: OnceLock<MapperRegistry> = OnceLock::new();

impl MapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static MapperRegistry {
        GLOBAL.get_or_init(MapperRegistry::new)
    }

    /// Get or create the mapper for `T`. The check-then-store is atomic:
    /// every caller, including concurrent first-time callers, observes the
    /// same canonical descriptor.
    pub fn mapper<T: Record>(&self) -> DaoResult<StructMapper<T>> {
        let entry = self
            .descriptors
            .entry(TypeId::of::<T>())
            .or_try_insert_with(|| {
                let descriptor = TypeDescriptor::<T>::build()?;
                debug!(
                    record = type_name::<T>(),
                    columns = descriptor.columns.len(),
                    "built type descriptor"
                );
                Ok::<_, DaoError>(Arc::new(descriptor) as Arc<dyn Any + Send + Sync>)
            })?;

        let erased = Arc::clone(entry.value());
        drop(entry);
        // The entry was stored under TypeId::of::<T>, so this downcast
        // cannot fail.
        let descriptor = erased
            .downcast::<TypeDescriptor<T>>()
            .expect("descriptor registry entry stored under wrong type id");
        Ok(StructMapper::new(descriptor))
    }

    /// Number of distinct record types registered so far.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Get or create the mapper for `T` from the process-wide registry.
pub fn mapper<T: Record>() -> DaoResult<StructMapper<T>> {
    MapperRegistry::global().mapper::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Pair {
        left: i64,
        right: i64,
    }

    crate::record! {
        Pair {
            left => "lhs" @ ["l"],
            right => "rhs" @ ["r"],
        }
    }

    #[derive(Debug, Default)]
    struct Bare;

    impl Record for Bare {
        fn columns() -> &'static [Column<Self>] {
            &[]
        }
    }

    #[test]
    fn empty_namespace_selects_all_in_order() {
        let registry = MapperRegistry::new();
        let mapper = registry.mapper::<Pair>().unwrap();
        assert_eq!(mapper.descriptor().column_list("").unwrap(), ["lhs", "rhs"]);
    }

    #[test]
    fn named_namespace_selects_subset() {
        let registry = MapperRegistry::new();
        let mapper = registry.mapper::<Pair>().unwrap();
        assert_eq!(mapper.descriptor().column_list("l").unwrap(), ["lhs"]);
        assert_eq!(mapper.descriptor().column_list("r").unwrap(), ["rhs"]);
    }

    #[test]
    fn unknown_namespace_fails_cleanly() {
        let registry = MapperRegistry::new();
        let mapper = registry.mapper::<Pair>().unwrap();
        let err = mapper.descriptor().column_list("nope").unwrap_err();
        assert!(matches!(err, DaoError::TagResolution { .. }));
    }

    #[test]
    fn zero_column_record_is_invalid() {
        let registry = MapperRegistry::new();
        let err = registry.mapper::<Bare>().unwrap_err();
        assert!(matches!(err, DaoError::InvalidRecordType { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn repeated_acquisition_is_idempotent() {
        let registry = MapperRegistry::new();
        let first = registry.mapper::<Pair>().unwrap();
        let second = registry.mapper::<Pair>().unwrap();
        assert!(Arc::ptr_eq(first.descriptor_arc(), second.descriptor_arc()));
        assert_eq!(registry.len(), 1);
    }
}
