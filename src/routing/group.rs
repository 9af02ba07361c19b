//! Master/replica routing group.
//!
//! # Responsibilities
//! - Hold the master handle and the weighted replica set for one routing
//!   unit (a database, or one shard of one)
//! - Pick the master for writes
//! - Pick a replica for reads by independent weighted random draw
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Every pick is an independent draw; no rotation memory
//! - Zero replicas degrade reads to the master unless strict reads are
//!   configured

use std::sync::Arc;

use rand::Rng;

use crate::error::Error;

/// What a replica pick does when the group has no replicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplicaFallback {
    /// Reads degrade to the master.
    #[default]
    Master,
    /// Reads fail with [`Error::NoReplica`].
    Fail,
}

/// Master plus weighted replicas for one database or shard.
#[derive(Debug)]
pub struct RoutingGroup<C> {
    /// Label for errors and tracing, e.g. `orders` or `users#2`.
    name: String,
    master: Option<Arc<C>>,
    replicas: Vec<(Arc<C>, u32)>,
    total_weight: u64,
    fallback: ReplicaFallback,
}

impl<C> RoutingGroup<C> {
    /// Build a group. `master` is `None` only for malformed snapshots that
    /// bypassed validation; picks surface that as [`Error::NoMaster`].
    pub fn new(
        name: impl Into<String>,
        master: Option<Arc<C>>,
        replicas: Vec<(Arc<C>, u32)>,
        fallback: ReplicaFallback,
    ) -> Self {
        let total_weight = replicas.iter().map(|(_, w)| u64::from(*w)).sum();
        Self {
            name: name.into(),
            master,
            replicas,
            total_weight,
            fallback,
        }
    }

    /// The group's label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of replicas in the group.
    pub fn replica_count(&self) -> usize {
        self.replicas.len()
    }

    /// The master handle.
    pub fn pick_master(&self) -> Result<Arc<C>, Error> {
        self.master
            .clone()
            .ok_or_else(|| Error::NoMaster(self.name.clone()))
    }

    /// A replica handle, drawn from the thread RNG.
    pub fn pick_replica(&self) -> Result<Arc<C>, Error> {
        self.pick_replica_with(&mut rand::thread_rng())
    }

    /// A replica handle, drawn with the caller's RNG.
    ///
    /// The draw is uniform in `[0, total weight)`; the first replica whose
    /// cumulative weight exceeds the draw wins. All-zero weights degrade to
    /// a uniform pick over the replica set.
    pub fn pick_replica_with<R: Rng>(&self, rng: &mut R) -> Result<Arc<C>, Error> {
        if self.replicas.is_empty() {
            return match self.fallback {
                ReplicaFallback::Master => self.pick_master(),
                ReplicaFallback::Fail => Err(Error::NoReplica(self.name.clone())),
            };
        }

        if self.total_weight == 0 {
            let index = rng.gen_range(0..self.replicas.len());
            return Ok(self.replicas[index].0.clone());
        }

        let draw = rng.gen_range(0..self.total_weight);
        let mut cumulative = 0u64;
        for (conn, weight) in &self.replicas {
            cumulative += u64::from(*weight);
            if draw < cumulative {
                return Ok(conn.clone());
            }
        }

        // draw < total_weight, so the loop always returns; keep the last
        // replica as the answer if it ever does not.
        Ok(self.replicas[self.replicas.len() - 1].0.clone())
    }
}
