//! Process-local registry and router for database connection pools.
//!
//! A host application registers logical databases — one master plus a
//! weighted set of replica instances, optionally split into shards keyed by
//! an application value — and routes reads and writes to connection handles
//! owned by its driver. The router never executes queries, never opens
//! sockets and never closes a handle.

pub mod config;
pub mod driver;
pub mod error;
pub mod router;
pub mod routing;
pub mod sharding;

pub use config::schema::{DatabaseConfig, InstanceConfig};
pub use driver::{Driver, PoolSettings};
pub use error::{BoxError, Error};
pub use router::DbRouter;
pub use routing::group::RoutingGroup;
pub use sharding::resolver::{ConsistentHashResolver, ShardResolver};
pub use sharding::ring::HashRing;
