//! Shared mock driver and config builders for integration tests.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use db_router::{BoxError, DatabaseConfig, Driver, InstanceConfig};

/// Handle recording the DSN it was opened with and the limits applied.
#[derive(Debug)]
pub struct MockConn {
    pub dsn: String,
    pub max_open: AtomicU32,
    pub max_idle: AtomicU32,
    pub lifetime_secs: AtomicU64,
}

/// Driver that "opens" in-memory handles and records every DSN.
#[derive(Debug, Default)]
pub struct MockDriver {
    pub opened: Mutex<Vec<String>>,
    /// DSN substring that makes `open` fail, for driver-error scenarios.
    pub fail_on: Option<&'static str>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn failing_on(fragment: &'static str) -> Self {
        Self {
            opened: Mutex::new(Vec::new()),
            fail_on: Some(fragment),
        }
    }

    #[allow(dead_code)]
    pub fn opened_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }
}

impl Driver for MockDriver {
    type Conn = MockConn;

    fn open(&self, dsn: &str) -> Result<MockConn, BoxError> {
        if let Some(fragment) = self.fail_on {
            if dsn.contains(fragment) {
                return Err(format!("connection refused: {dsn}").into());
            }
        }
        self.opened.lock().unwrap().push(dsn.to_string());
        Ok(MockConn {
            dsn: dsn.to_string(),
            max_open: AtomicU32::new(0),
            max_idle: AtomicU32::new(0),
            lifetime_secs: AtomicU64::new(0),
        })
    }

    fn set_max_open(&self, conn: &MockConn, limit: u32) {
        conn.max_open.store(limit, Ordering::Relaxed);
    }

    fn set_max_idle(&self, conn: &MockConn, limit: u32) {
        conn.max_idle.store(limit, Ordering::Relaxed);
    }

    fn set_max_lifetime(&self, conn: &MockConn, lifetime: Duration) {
        conn.lifetime_secs.store(lifetime.as_secs(), Ordering::Relaxed);
    }
}

/// Instance descriptor with the fields these tests care about.
pub fn instance(
    name: &str,
    dbname: &str,
    is_master: bool,
    weight: u32,
    shard_id: u32,
) -> InstanceConfig {
    InstanceConfig {
        name: name.to_string(),
        server: "127.0.0.1".to_string(),
        port: 3306,
        user: "app".to_string(),
        password: "pw".to_string(),
        is_master,
        weight,
        dbname: dbname.to_string(),
        shard_id,
    }
}

pub fn database(name: &str, is_sharding: bool, instances: Vec<InstanceConfig>) -> DatabaseConfig {
    DatabaseConfig {
        name: name.to_string(),
        is_sharding,
        instances,
        ..DatabaseConfig::default()
    }
}
