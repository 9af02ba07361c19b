//! Shard resolvers.
//!
//! A resolver maps an application key to a shard id for a fixed
//! configuration snapshot. Resolution must be idempotent and deterministic:
//! the same key maps to the same id for as long as the instance names are
//! unchanged.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::schema::DatabaseConfig;
use crate::error::Error;
use crate::sharding::ring::HashRing;

/// Maps an application key to a shard id.
pub trait ShardResolver: Send + Sync {
    /// Resolve `key` against the database's configuration snapshot.
    fn resolve(&self, config: &DatabaseConfig, key: &str) -> Result<u32, Error>;
}

/// Default resolver: consistent hashing over instance names.
///
/// The ring is built from the snapshot on the first call and memoized for
/// the life of the resolver, so construction cost is paid once. Concurrent
/// first callers block briefly on the cell; later calls read the memoized
/// ring without locking.
pub struct ConsistentHashResolver {
    vnodes: usize,
    state: OnceLock<RingState>,
}

struct RingState {
    ring: HashRing,
    /// Ring member (instance name) → shard id.
    members: HashMap<String, u32>,
}

impl ConsistentHashResolver {
    /// A resolver whose ring places each instance at `vnodes` virtual
    /// positions. The count is fixed for the resolver's lifetime.
    pub fn new(vnodes: usize) -> Self {
        Self {
            vnodes,
            state: OnceLock::new(),
        }
    }

    fn state(&self, config: &DatabaseConfig) -> &RingState {
        self.state.get_or_init(|| {
            let mut ring = HashRing::new(self.vnodes);
            let mut members = HashMap::new();
            for instance in &config.instances {
                ring.add(&instance.name);
                members.insert(instance.name.clone(), instance.shard_id);
            }
            RingState { ring, members }
        })
    }
}

impl ShardResolver for ConsistentHashResolver {
    fn resolve(&self, config: &DatabaseConfig, key: &str) -> Result<u32, Error> {
        let state = self.state(config);
        let member = state.ring.get(key)?;
        match state.members.get(member) {
            Some(shard_id) => Ok(*shard_id),
            // Ring and member map are built from the same snapshot; a miss
            // means the resolver was fed a different config than the one it
            // memoized.
            None => Err(Error::UnknownMember(member.to_string())),
        }
    }
}
