//! Driver capability seam.
//!
//! # Responsibilities
//! - Define the interface the host's connection-pool driver provides
//! - Build the connection string handed to the driver per instance
//! - Resolve pool-sizing hints against the documented defaults
//!
//! # Design Decisions
//! - Handles are opaque: the router stores them, hands them out, never
//!   closes them
//! - Pool limits are forwarded verbatim; only absent hints take defaults
//! - Driver failures pass through unmodified as boxed errors

use std::time::Duration;

use crate::config::schema::{DatabaseConfig, InstanceConfig, DEFAULT_CHARSET};
use crate::error::BoxError;

/// Maximum open connections when the snapshot gives no hint.
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 200;

/// Maximum idle connections when the snapshot gives no hint.
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 60;

/// Connection lifetime when the snapshot gives no hint.
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(300);

/// Capability the host's connection-pool driver provides.
///
/// One handle corresponds to one physical endpoint. The driver owns the
/// handle lifecycle; the router only stores shared references.
pub trait Driver: Send + Sync {
    /// Opaque handle to one endpoint's pool.
    type Conn: Send + Sync + 'static;

    /// Open a handle for the given connection string.
    fn open(&self, dsn: &str) -> Result<Self::Conn, BoxError>;

    /// Forward the max-open-connections limit to a handle.
    fn set_max_open(&self, conn: &Self::Conn, limit: u32);

    /// Forward the max-idle-connections limit to a handle.
    fn set_max_idle(&self, conn: &Self::Conn, limit: u32);

    /// Forward the connection lifetime limit to a handle.
    fn set_max_lifetime(&self, conn: &Self::Conn, lifetime: Duration);
}

/// Pool-sizing hints resolved against the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum open connections per handle.
    pub max_open: u32,
    /// Maximum idle connections per handle.
    pub max_idle: u32,
    /// Maximum connection lifetime.
    pub max_lifetime: Duration,
}

impl PoolSettings {
    /// Resolve a snapshot's hints; a hint of 0 means absent and takes the
    /// default, anything else is forwarded verbatim.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            max_open: if config.max_active == 0 {
                DEFAULT_MAX_OPEN_CONNS
            } else {
                config.max_active
            },
            max_idle: if config.min_idle == 0 {
                DEFAULT_MAX_IDLE_CONNS
            } else {
                config.min_idle
            },
            max_lifetime: if config.max_wait_time == 0 {
                DEFAULT_MAX_LIFETIME
            } else {
                Duration::from_secs(config.max_wait_time)
            },
        }
    }

    /// Apply the settings to a freshly opened handle.
    pub fn apply<D: Driver>(&self, driver: &D, conn: &D::Conn) {
        driver.set_max_open(conn, self.max_open);
        driver.set_max_idle(conn, self.max_idle);
        driver.set_max_lifetime(conn, self.max_lifetime);
    }
}

/// Connection string for one instance:
/// `user:password@tcp(host:port)/dbname?charset=...&parseTime=True`
pub fn connection_string(config: &DatabaseConfig, instance: &InstanceConfig) -> String {
    let charset = if config.charset.is_empty() {
        DEFAULT_CHARSET
    } else {
        config.charset.as_str()
    };
    format!(
        "{}:{}@tcp({}:{})/{}?charset={}&parseTime=True",
        instance.user, instance.password, instance.server, instance.port, instance.dbname, charset,
    )
}
