//! Name → routing-unit registry.
//!
//! # Responsibilities
//! - Map logical database names to registered routing units
//! - Enforce register-once-per-name
//! - Serve lookups concurrently with registrations of other names
//!
//! # Design Decisions
//! - DashMap shards its locks, so a lookup never waits on an unrelated
//!   name's registration
//! - Registration only; no deregistration, no replacement
//! - Unknown name is a typed error, not a panic

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::Error;

/// Concurrent registry of named routing units.
///
/// `T` is a [`RoutingGroup`](crate::routing::group::RoutingGroup) for
/// master/replica databases and a
/// [`ShardedDatabase`](crate::routing::shard::ShardedDatabase) for sharded
/// ones.
#[derive(Debug)]
pub struct Registry<T> {
    entries: DashMap<String, Arc<T>>,
}

impl<T> Registry<T> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Install `value` under `name`, at most once per name.
    pub fn register(&self, name: &str, value: T) -> Result<Arc<T>, Error> {
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(_) => Err(Error::DuplicateName(name.to_string())),
            Entry::Vacant(slot) => {
                let value = Arc::new(value);
                slot.insert(Arc::clone(&value));
                Ok(value)
            }
        }
    }

    /// The unit registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<T>, Error> {
        self.entries
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::UnknownDatabase(name.to_string()))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
