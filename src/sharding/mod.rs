//! Shard resolution subsystem.
//!
//! # Data Flow
//! ```text
//! resolve(config, key)
//!     → resolver.rs (first call: build ring from instance names, memoize)
//!     → ring.rs (hash key, walk to the owning member, wrap around)
//!     → member name → shard id
//! ```
//!
//! # Design Decisions
//! - The resolver trait is the pluggable seam; the consistent-hash default
//!   is one implementation of it
//! - The ring is consumed through a two-method surface (add, get) and built
//!   at most once per resolver

pub mod resolver;
pub mod ring;

pub use resolver::{ConsistentHashResolver, ShardResolver};
pub use ring::HashRing;
