//! Error taxonomy for registration, lookup and routing.

use thiserror::Error;

use crate::config::validation::ValidationErrors;

/// Boxed error from the driver collaborator, passed through unmodified.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the router.
///
/// Every failure is a synchronous return value at the call site that
/// triggered it; the router performs no retries and no silent recovery.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration snapshot was rejected before any handle was opened.
    #[error("invalid configuration for database `{name}`: {reasons}")]
    Configuration {
        /// Logical database name from the snapshot.
        name: String,
        /// Every semantic problem found, not just the first.
        reasons: ValidationErrors,
    },

    /// The logical name is already registered.
    #[error("database `{0}` is already registered")]
    DuplicateName(String),

    /// No database is registered under the logical name.
    #[error("database `{0}` is not registered")]
    UnknownDatabase(String),

    /// The routing group was constructed without a master handle.
    #[error("database `{0}` has no master instance")]
    NoMaster(String),

    /// Strict replica reads were requested and the group has no replicas.
    #[error("database `{0}` has no replica instance")]
    NoReplica(String),

    /// The resolver produced a shard id with no corresponding group.
    #[error("database `{name}` has no shard {shard_id}")]
    ShardNotFound {
        /// Logical database name.
        name: String,
        /// The shard id the resolver produced.
        shard_id: u32,
    },

    /// The hash ring has no members.
    #[error("hash ring has no members")]
    EmptyRing,

    /// The ring returned a member the resolver has no shard id for.
    #[error("shard resolver returned unknown member `{0}`")]
    UnknownMember(String),

    /// No default database has been selected on this router.
    #[error("no default database has been set")]
    NoDefaultDatabase,

    /// Opaque failure from the driver collaborator.
    #[error("driver error: {0}")]
    Driver(#[source] BoxError),
}
