//! Sharded database routing.
//!
//! Composes shard resolution with per-shard master/replica groups: the
//! resolver turns an application key into a shard id, and the shard's group
//! does the usual master/replica selection.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::schema::DatabaseConfig;
use crate::error::Error;
use crate::routing::group::RoutingGroup;
use crate::sharding::resolver::ShardResolver;

/// One sharded logical database: a resolver plus its shard groups.
///
/// Invariant: every shard id the resolver can produce for this database
/// should have a group; a miss is a [`Error::ShardNotFound`] resolution
/// error, not a panic.
pub struct ShardedDatabase<C> {
    name: String,
    shards: HashMap<u32, Arc<RoutingGroup<C>>>,
    resolver: Box<dyn ShardResolver>,
    /// Snapshot handed to the resolver on every call.
    config: DatabaseConfig,
}

impl<C> ShardedDatabase<C> {
    pub(crate) fn new(
        name: impl Into<String>,
        config: DatabaseConfig,
        shards: HashMap<u32, Arc<RoutingGroup<C>>>,
        resolver: Box<dyn ShardResolver>,
    ) -> Self {
        Self {
            name: name.into(),
            shards,
            resolver,
            config,
        }
    }

    /// The logical database name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve `key` to a shard id using this database's resolver.
    pub fn resolve_shard(&self, key: &str) -> Result<u32, Error> {
        self.resolver.resolve(&self.config, key)
    }

    /// The routing group owning `key`.
    pub fn group_for_key(&self, key: &str) -> Result<Arc<RoutingGroup<C>>, Error> {
        let shard_id = self.resolve_shard(key)?;
        match self.shards.get(&shard_id) {
            Some(group) => Ok(Arc::clone(group)),
            None => {
                debug!(db = %self.name, shard_id, "resolver produced a shard with no group");
                Err(Error::ShardNotFound {
                    name: self.name.clone(),
                    shard_id,
                })
            }
        }
    }

    /// Every shard group, keyed by shard id.
    pub fn shard_groups(&self) -> &HashMap<u32, Arc<RoutingGroup<C>>> {
        &self.shards
    }
}
