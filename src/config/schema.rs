//! Configuration schema definitions.
//!
//! The snapshot types a host hands to registration. Field names follow the
//! camelCase keys of the upstream configuration documents so existing
//! configs deserialize unchanged.

use serde::{Deserialize, Serialize};

/// Character set used when the snapshot omits one.
pub const DEFAULT_CHARSET: &str = "utf8";

/// One logical database: a master/replica set, optionally sharded.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    /// Logical name used for registration and lookup.
    pub name: String,

    /// Character set placed into each connection string (default "utf8").
    pub charset: String,

    /// Pool hint: maximum open connections (0 = use default).
    pub max_active: u32,

    /// Pool hint: maximum idle connections (0 = use default).
    pub min_idle: u32,

    /// Pool hint: connection lifetime in seconds (0 = use default).
    pub max_wait_time: u64,

    /// Whether instances are partitioned into shards by `dbid`.
    pub is_sharding: bool,

    /// Fail replica picks instead of degrading reads to the master.
    pub strict_replica_reads: bool,

    /// Physical instances backing this database.
    pub instances: Vec<InstanceConfig>,
}

impl DatabaseConfig {
    /// Distinct shard ids present in the instance list, ascending.
    pub fn shard_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.instances.iter().map(|i| i.shard_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// One physical database endpoint. Immutable once loaded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfig {
    /// Stable instance name; doubles as the shard ring member identity.
    pub name: String,

    /// Host name or address.
    pub server: String,

    /// TCP port.
    pub port: u16,

    /// User name.
    pub user: String,

    /// Password.
    pub password: String,

    /// Whether this instance is the master of its routing unit.
    #[serde(default)]
    pub is_master: bool,

    /// Replica selection weight; ignored on masters (default: 1).
    #[serde(default = "default_weight")]
    pub weight: u32,

    /// Physical schema name on this instance.
    pub dbname: String,

    /// Shard id; only meaningful when the database is sharding.
    #[serde(default, rename = "dbid")]
    pub shard_id: u32,
}

fn default_weight() -> u32 {
    1
}
