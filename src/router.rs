//! Router facade and registration pipeline.
//!
//! # Responsibilities
//! - Own the plain and sharded registries and the driver collaborator
//! - Build routing groups from validated configuration snapshots
//! - Expose the routing operations the host application calls
//!
//! # Design Decisions
//! - An explicit object, not process-global state: hosts (and tests) hold
//!   several independent routers
//! - Registration opens every handle up front; a driver failure aborts the
//!   whole registration and nothing is installed
//! - Plain and sharded databases live in separate namespaces, mirroring the
//!   separate registration entry points

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::config::schema::DatabaseConfig;
use crate::config::validation::{validate_config, ValidationError, ValidationErrors};
use crate::driver::{connection_string, Driver, PoolSettings};
use crate::error::Error;
use crate::routing::group::{ReplicaFallback, RoutingGroup};
use crate::routing::registry::Registry;
use crate::routing::shard::ShardedDatabase;
use crate::sharding::resolver::ShardResolver;

/// Registry and router for a process's database connection pools.
pub struct DbRouter<D: Driver> {
    driver: D,
    databases: Registry<RoutingGroup<D::Conn>>,
    sharded: Registry<ShardedDatabase<D::Conn>>,
    default_name: Mutex<Option<String>>,
}

impl<D: Driver> DbRouter<D> {
    /// A router that opens handles through `driver`.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            databases: Registry::new(),
            sharded: Registry::new(),
            default_name: Mutex::new(None),
        }
    }

    /// Register a master/replica database under its configured name.
    pub fn register_database(&self, config: DatabaseConfig) -> Result<(), Error> {
        if let Err(reasons) = validate_config(&config) {
            return Err(configuration_error(&config.name, reasons));
        }
        if config.is_sharding {
            return Err(configuration_error(
                &config.name,
                vec![ValidationError::ShardingMismatch { is_sharding: true }],
            ));
        }
        if self.databases.contains(&config.name) {
            return Err(Error::DuplicateName(config.name));
        }

        let settings = PoolSettings::from_config(&config);
        let group = self.build_group(&config, None, settings)?;
        let name = config.name.clone();
        self.databases.register(&name, group)?;

        info!(
            db = %name,
            instances = config.instances.len(),
            max_open = settings.max_open,
            max_idle = settings.max_idle,
            "registered database"
        );
        Ok(())
    }

    /// Register a sharded database with the given resolver.
    pub fn register_sharded_database<R>(
        &self,
        config: DatabaseConfig,
        resolver: R,
    ) -> Result<(), Error>
    where
        R: ShardResolver + 'static,
    {
        if let Err(reasons) = validate_config(&config) {
            return Err(configuration_error(&config.name, reasons));
        }
        if !config.is_sharding {
            return Err(configuration_error(
                &config.name,
                vec![ValidationError::ShardingMismatch { is_sharding: false }],
            ));
        }
        if self.sharded.contains(&config.name) {
            return Err(Error::DuplicateName(config.name));
        }

        let settings = PoolSettings::from_config(&config);
        let mut shards = HashMap::new();
        for shard_id in config.shard_ids() {
            let group = self.build_group(&config, Some(shard_id), settings)?;
            shards.insert(shard_id, Arc::new(group));
        }

        let name = config.name.clone();
        let shard_count = shards.len();
        let database = ShardedDatabase::new(name.as_str(), config, shards, Box::new(resolver));
        self.sharded.register(&name, database)?;

        info!(db = %name, shards = shard_count, "registered sharded database");
        Ok(())
    }

    /// The routing group of a registered database, for callers that want to
    /// drive selection themselves (e.g. with their own RNG).
    pub fn get_database(&self, name: &str) -> Result<Arc<RoutingGroup<D::Conn>>, Error> {
        self.databases.lookup(name)
    }

    /// Master handle of a registered database.
    pub fn get_master(&self, name: &str) -> Result<Arc<D::Conn>, Error> {
        self.databases.lookup(name)?.pick_master()
    }

    /// Replica handle of a registered database, by weighted random draw.
    pub fn get_replica(&self, name: &str) -> Result<Arc<D::Conn>, Error> {
        self.databases.lookup(name)?.pick_replica()
    }

    /// A registered sharded database.
    pub fn get_sharded_database(&self, name: &str) -> Result<Arc<ShardedDatabase<D::Conn>>, Error> {
        self.sharded.lookup(name)
    }

    /// Shard id that `key` resolves to for a registered sharded database.
    pub fn resolve_shard(&self, name: &str, key: &str) -> Result<u32, Error> {
        self.sharded.lookup(name)?.resolve_shard(key)
    }

    /// Master handle of the shard owning `key`.
    pub fn get_master_for_key(&self, name: &str, key: &str) -> Result<Arc<D::Conn>, Error> {
        self.sharded.lookup(name)?.group_for_key(key)?.pick_master()
    }

    /// Replica handle of the shard owning `key`, by weighted random draw.
    pub fn get_replica_for_key(&self, name: &str, key: &str) -> Result<Arc<D::Conn>, Error> {
        self.sharded.lookup(name)?.group_for_key(key)?.pick_replica()
    }

    /// Every shard group of a registered sharded database, keyed by id.
    pub fn get_all_shard_groups(
        &self,
        name: &str,
    ) -> Result<HashMap<u32, Arc<RoutingGroup<D::Conn>>>, Error> {
        Ok(self.sharded.lookup(name)?.shard_groups().clone())
    }

    /// Select the database that [`default_database`](Self::default_database)
    /// returns. The name does not have to be registered yet.
    pub fn set_default_database(&self, name: &str) {
        let mut guard = self
            .default_name
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(name.to_string());
    }

    /// The routing group of the selected default database.
    pub fn default_database(&self) -> Result<Arc<RoutingGroup<D::Conn>>, Error> {
        let name = {
            let guard = self
                .default_name
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            guard.clone().ok_or(Error::NoDefaultDatabase)?
        };
        self.databases.lookup(&name)
    }

    fn build_group(
        &self,
        config: &DatabaseConfig,
        shard: Option<u32>,
        settings: PoolSettings,
    ) -> Result<RoutingGroup<D::Conn>, Error> {
        let label = match shard {
            Some(id) => format!("{}#{id}", config.name),
            None => config.name.clone(),
        };
        let fallback = if config.strict_replica_reads {
            ReplicaFallback::Fail
        } else {
            ReplicaFallback::Master
        };

        let mut master = None;
        let mut replicas = Vec::new();
        let instances = config
            .instances
            .iter()
            .filter(|i| shard.map_or(true, |id| i.shard_id == id));
        for instance in instances {
            let dsn = connection_string(config, instance);
            let conn = self.driver.open(&dsn).map_err(Error::Driver)?;
            settings.apply(&self.driver, &conn);
            let conn = Arc::new(conn);

            if instance.is_master {
                // validation guarantees exactly one master per routing unit
                master = Some(conn);
            } else {
                replicas.push((conn, instance.weight));
            }
            debug!(
                db = %label,
                instance = %instance.name,
                master = instance.is_master,
                "opened handle"
            );
        }

        Ok(RoutingGroup::new(label, master, replicas, fallback))
    }
}

fn configuration_error(name: &str, reasons: Vec<ValidationError>) -> Error {
    Error::Configuration {
        name: name.to_string(),
        reasons: ValidationErrors(reasons),
    }
}
