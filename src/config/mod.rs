//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! host-produced snapshot (DatabaseConfig)
//!     → validation.rs (semantic checks, all errors collected)
//!     → registration pipeline (router.rs)
//!     → immutable once installed
//! ```
//!
//! # Design Decisions
//! - How the snapshot is produced (YAML file, env, service discovery) is
//!   the host's concern; this crate only defines the shape
//! - Snapshots are immutable after registration; replacing a topology is
//!   not supported at runtime
//! - Validation separates syntactic (serde) from semantic checks

pub mod schema;
pub mod validation;

pub use schema::DatabaseConfig;
pub use schema::InstanceConfig;
