//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check each routing unit has exactly one master
//! - Validate the fields a connection string depends on
//! - Check instance names are unique when they feed the shard ring
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DatabaseConfig → Result<(), Vec<ValidationError>>
//! - Runs before any connection handle is opened

use std::collections::{BTreeMap, HashSet};

use crate::config::schema::DatabaseConfig;

/// A single semantic problem found in a database configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The instance list is empty.
    NoInstances,
    /// A routing unit has no master-flagged instance.
    MissingMaster { shard_id: Option<u32> },
    /// A routing unit has more than one master-flagged instance.
    DuplicateMaster { shard_id: Option<u32> },
    /// An instance is missing a field the connection string needs.
    IncompleteInstance { name: String, field: &'static str },
    /// Two instances share a name; ring members must be unique.
    DuplicateInstanceName { name: String },
    /// The sharding flag does not match the registration entry point.
    ShardingMismatch { is_sharding: bool },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NoInstances => write!(f, "instance list is empty"),
            ValidationError::MissingMaster { shard_id: Some(id) } => {
                write!(f, "shard {} has no master instance", id)
            }
            ValidationError::MissingMaster { shard_id: None } => {
                write!(f, "no master instance")
            }
            ValidationError::DuplicateMaster { shard_id: Some(id) } => {
                write!(f, "shard {} has more than one master instance", id)
            }
            ValidationError::DuplicateMaster { shard_id: None } => {
                write!(f, "more than one master instance")
            }
            ValidationError::IncompleteInstance { name, field } => {
                write!(f, "instance `{}` has no {}", name, field)
            }
            ValidationError::DuplicateInstanceName { name } => {
                write!(f, "instance name `{}` is used more than once", name)
            }
            ValidationError::ShardingMismatch { is_sharding: true } => {
                write!(f, "database is sharding, register it with register_sharded_database")
            }
            ValidationError::ShardingMismatch { is_sharding: false } => {
                write!(f, "database is not sharding, register it with register_database")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Collected validation errors, displayed as one joined reason list.
#[derive(Debug)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Validate a snapshot before registration.
pub fn validate_config(config: &DatabaseConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.instances.is_empty() {
        errors.push(ValidationError::NoInstances);
        return Err(errors);
    }

    for instance in &config.instances {
        let display_name = if instance.name.is_empty() {
            format!("{}:{}", instance.server, instance.port)
        } else {
            instance.name.clone()
        };
        if instance.name.is_empty() {
            errors.push(ValidationError::IncompleteInstance {
                name: display_name.clone(),
                field: "name",
            });
        }
        if instance.server.is_empty() {
            errors.push(ValidationError::IncompleteInstance {
                name: display_name.clone(),
                field: "server",
            });
        }
        if instance.port == 0 {
            errors.push(ValidationError::IncompleteInstance {
                name: display_name.clone(),
                field: "port",
            });
        }
        if instance.user.is_empty() {
            errors.push(ValidationError::IncompleteInstance {
                name: display_name.clone(),
                field: "user",
            });
        }
        if instance.dbname.is_empty() {
            errors.push(ValidationError::IncompleteInstance {
                name: display_name,
                field: "dbname",
            });
        }
    }

    if config.is_sharding {
        // Every shard id present in the snapshot needs exactly one master.
        let mut masters_per_shard: BTreeMap<u32, u32> = BTreeMap::new();
        for instance in &config.instances {
            let count = masters_per_shard.entry(instance.shard_id).or_insert(0);
            if instance.is_master {
                *count += 1;
            }
        }
        for (shard_id, count) in masters_per_shard {
            match count {
                0 => errors.push(ValidationError::MissingMaster { shard_id: Some(shard_id) }),
                1 => {}
                _ => errors.push(ValidationError::DuplicateMaster { shard_id: Some(shard_id) }),
            }
        }

        // Instance names become ring members; duplicates would collapse
        // two endpoints into one ring identity.
        let mut seen = HashSet::new();
        for instance in &config.instances {
            if !instance.name.is_empty() && !seen.insert(instance.name.as_str()) {
                errors.push(ValidationError::DuplicateInstanceName {
                    name: instance.name.clone(),
                });
            }
        }
    } else {
        let masters = config.instances.iter().filter(|i| i.is_master).count();
        match masters {
            0 => errors.push(ValidationError::MissingMaster { shard_id: None }),
            1 => {}
            _ => errors.push(ValidationError::DuplicateMaster { shard_id: None }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
