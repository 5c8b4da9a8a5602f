//! Snapshot-published in-memory table registry.
//!
//! Readers load the current catalog snapshot without locking. Writers take a
//! mutex, clone the catalog, swap one entry and publish the new snapshot in a
//! single store, so a reader observes either the old or the new table.

use super::{normalize_table_name, RegistryError, RegistryResult, TableRepository};
use crate::model::table::Table;
use arc_swap::ArcSwap;
use indexmap::IndexMap;
use log::info;
use std::sync::{Arc, Mutex, PoisonError};

type Catalog = IndexMap<String, Arc<Table>>;

/// Process-lifetime table store.
pub struct TableRegistry {
    catalog: ArcSwap<Catalog>,
    // Serializes writers; readers never take it.
    write_lock: Mutex<()>,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            catalog: ArcSwap::from_pointee(Catalog::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a registry pre-populated in iteration order.
    ///
    /// A later duplicate name replaces the earlier value in place.
    pub fn with_tables<I, S>(tables: I) -> RegistryResult<Self>
    where
        I: IntoIterator<Item = (S, Table)>,
        S: AsRef<str>,
    {
        let mut catalog = Catalog::new();
        for (name, table) in tables {
            let name = normalize_table_name(name.as_ref())?;
            catalog.insert(name, Arc::new(table));
        }
        Ok(Self {
            catalog: ArcSwap::from_pointee(catalog),
            write_lock: Mutex::new(()),
        })
    }

    pub fn len(&self) -> usize {
        self.catalog.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.load().is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.catalog.load().contains_key(name.trim())
    }

    /// Pins the current catalog as an immutable point-in-time view.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            catalog: self.catalog.load_full(),
        }
    }
}

impl TableRepository for TableRegistry {
    fn get_table(&self, name: &str) -> RegistryResult<Arc<Table>> {
        let key = name.trim();
        self.catalog
            .load()
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    fn list_tables(&self) -> Vec<String> {
        self.catalog.load().keys().cloned().collect()
    }

    fn put_table(&self, name: &str, table: Table) -> RegistryResult<Option<Arc<Table>>> {
        let name = normalize_table_name(name)?;
        let rows = table.row_count();
        let columns = table.column_count();
        let table = Arc::new(table);

        // The guarded section only publishes fully-built catalogs, so a
        // poisoned lock still protects a consistent value.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut next = Catalog::clone(&self.catalog.load());
        let previous = next.insert(name.clone(), table);
        self.catalog.store(Arc::new(next));

        info!(
            "event=table_put module=registry status=ok table={} rows={} columns={} replaced={}",
            name,
            rows,
            columns,
            previous.is_some()
        );
        Ok(previous)
    }
}

/// Immutable view of every table registered at one instant.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    catalog: Arc<Catalog>,
}

impl RegistrySnapshot {
    pub fn get(&self, name: &str) -> Option<&Arc<Table>> {
        self.catalog.get(name.trim())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.catalog.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
