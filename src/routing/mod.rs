//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! register_database → registry.rs (install group under logical name)
//! get_replica(name)
//!     → registry.rs (lookup)
//!     → group.rs (weighted random draw over replicas, master fallback)
//!     → connection handle returned to caller
//! get_replica_for_key(name, key)
//!     → shard.rs (resolver: key → shard id → group)
//!     → group.rs (same selection within the shard's group)
//! ```
//!
//! # Design Decisions
//! - Groups are immutable after construction; only the registries mutate,
//!   and only during registration
//! - Selection is stateless per call; no sticky sessions
//! - Unknown names and unknown shards are typed errors, never panics

pub mod group;
pub mod registry;
pub mod shard;

pub use group::RoutingGroup;
pub use registry::Registry;
pub use shard::ShardedDatabase;
