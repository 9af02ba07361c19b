//! End-to-end routing scenarios against a mock driver.

mod common;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{database, instance, MockDriver};
use db_router::{ConsistentHashResolver, DbRouter, Error, HashRing};

#[test]
fn test_replica_draws_follow_weights() {
    let router = DbRouter::new(MockDriver::new());
    router
        .register_database(database(
            "orders",
            false,
            vec![
                instance("ORD_M", "orders_m", true, 0, 0),
                instance("ORD_R1", "orders_r1", false, 90, 0),
                instance("ORD_R2", "orders_r2", false, 10, 0),
            ],
        ))
        .unwrap();

    let group = router.get_database("orders").unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let mut heavy = 0u32;
    let mut light = 0u32;
    for _ in 0..10_000 {
        let conn = group.pick_replica_with(&mut rng).unwrap();
        if conn.dsn.contains("/orders_r1?") {
            heavy += 1;
        } else if conn.dsn.contains("/orders_r2?") {
            light += 1;
        } else {
            panic!("master picked while replicas exist: {}", conn.dsn);
        }
    }

    // 90/10 split within 5% of 10,000 draws
    assert!((8_500..=9_500).contains(&heavy), "heavy replica drew {heavy}");
    assert!((500..=1_500).contains(&light), "light replica drew {light}");
}

#[test]
fn test_reads_degrade_to_master_without_replicas() {
    let router = DbRouter::new(MockDriver::new());
    router
        .register_database(database(
            "audit",
            false,
            vec![instance("AUD_M", "audit", true, 0, 0)],
        ))
        .unwrap();

    let master = router.get_master("audit").unwrap();
    let replica = router.get_replica("audit").unwrap();
    assert!(Arc::ptr_eq(&master, &replica));
}

#[test]
fn test_strict_replica_reads_fail_without_replicas() {
    let router = DbRouter::new(MockDriver::new());
    let mut config = database(
        "audit",
        false,
        vec![instance("AUD_M", "audit", true, 0, 0)],
    );
    config.strict_replica_reads = true;
    router.register_database(config).unwrap();

    assert!(router.get_master("audit").is_ok());
    assert!(matches!(
        router.get_replica("audit"),
        Err(Error::NoReplica(_))
    ));
}

#[test]
fn test_unknown_database() {
    let router = DbRouter::new(MockDriver::new());
    assert!(matches!(
        router.get_master("unknown-db"),
        Err(Error::UnknownDatabase(name)) if name == "unknown-db"
    ));
    assert!(matches!(
        router.get_master_for_key("unknown-db", "k"),
        Err(Error::UnknownDatabase(_))
    ));
}

#[test]
fn test_pool_defaults_applied_to_every_handle() {
    let router = DbRouter::new(MockDriver::new());
    router
        .register_database(database(
            "orders",
            false,
            vec![
                instance("ORD_M", "orders_m", true, 0, 0),
                instance("ORD_R1", "orders_r1", false, 1, 0),
            ],
        ))
        .unwrap();

    let master = router.get_master("orders").unwrap();
    assert_eq!(master.max_open.load(std::sync::atomic::Ordering::Relaxed), 200);
    assert_eq!(master.max_idle.load(std::sync::atomic::Ordering::Relaxed), 60);
    assert_eq!(
        master.lifetime_secs.load(std::sync::atomic::Ordering::Relaxed),
        300
    );
}

#[test]
fn test_pool_hints_forwarded_verbatim() {
    let router = DbRouter::new(MockDriver::new());
    let mut config = database(
        "orders",
        false,
        vec![instance("ORD_M", "orders_m", true, 0, 0)],
    );
    config.max_active = 50;
    config.min_idle = 10;
    config.max_wait_time = 10;
    router.register_database(config).unwrap();

    let master = router.get_master("orders").unwrap();
    assert_eq!(master.max_open.load(std::sync::atomic::Ordering::Relaxed), 50);
    assert_eq!(master.max_idle.load(std::sync::atomic::Ordering::Relaxed), 10);
    assert_eq!(
        master.lifetime_secs.load(std::sync::atomic::Ordering::Relaxed),
        10
    );
}

fn users_config() -> db_router::DatabaseConfig {
    database(
        "users",
        true,
        vec![
            instance("USR_0_M", "users_0", true, 0, 0),
            instance("USR_0_R", "users_0_r", false, 1, 0),
            instance("USR_1_M", "users_1", true, 0, 1),
            instance("USR_1_R", "users_1_r", false, 1, 1),
            instance("USR_2_M", "users_2", true, 0, 2),
            instance("USR_2_R", "users_2_r", false, 1, 2),
        ],
    )
}

#[test]
fn test_sharded_keys_cover_all_shards() {
    let router = DbRouter::new(MockDriver::new());
    router
        .register_sharded_database(users_config(), ConsistentHashResolver::new(20))
        .unwrap();

    let mut seen = std::collections::HashSet::new();
    for i in 0..1_000 {
        let key = format!("user-{i}");
        let shard_id = router.resolve_shard("users", &key).unwrap();
        assert!(shard_id <= 2, "key {key} resolved to missing shard {shard_id}");
        seen.insert(shard_id);

        // the picked master belongs to the resolved shard
        let master = router.get_master_for_key("users", &key).unwrap();
        assert!(
            master.dsn.contains(&format!("/users_{shard_id}?")),
            "key {key} routed to {}",
            master.dsn
        );
    }
    assert_eq!(seen.len(), 3, "keys covered shards {seen:?}");
}

#[test]
fn test_shard_resolution_is_deterministic() {
    let driver_a = MockDriver::new();
    let driver_b = MockDriver::new();
    let router_a = DbRouter::new(driver_a);
    let router_b = DbRouter::new(driver_b);
    router_a
        .register_sharded_database(users_config(), ConsistentHashResolver::new(20))
        .unwrap();
    router_b
        .register_sharded_database(users_config(), ConsistentHashResolver::new(20))
        .unwrap();

    for i in 0..200 {
        let key = format!("user-{i}");
        let id = router_a.resolve_shard("users", &key).unwrap();
        assert_eq!(id, router_a.resolve_shard("users", &key).unwrap());
        assert_eq!(id, router_b.resolve_shard("users", &key).unwrap());
    }
}

#[test]
fn test_replica_for_key_stays_in_shard() {
    let router = DbRouter::new(MockDriver::new());
    router
        .register_sharded_database(users_config(), ConsistentHashResolver::new(20))
        .unwrap();

    for i in 0..100 {
        let key = format!("user-{i}");
        let shard_id = router.resolve_shard("users", &key).unwrap();
        let replica = router.get_replica_for_key("users", &key).unwrap();
        assert!(replica.dsn.contains(&format!("/users_{shard_id}_r?")));
    }
}

#[test]
fn test_all_shard_groups() {
    let router = DbRouter::new(MockDriver::new());
    router
        .register_sharded_database(users_config(), ConsistentHashResolver::new(20))
        .unwrap();

    let groups = router.get_all_shard_groups("users").unwrap();
    assert_eq!(groups.len(), 3);
    for (shard_id, group) in &groups {
        let master = group.pick_master().unwrap();
        assert!(master.dsn.contains(&format!("/users_{shard_id}?")));
    }
}

#[test]
fn test_empty_ring_fails_before_members_are_added() {
    let ring = HashRing::new(20);
    assert!(matches!(ring.get("user-1"), Err(Error::EmptyRing)));
}

#[test]
fn test_default_database() {
    let router = DbRouter::new(MockDriver::new());
    assert!(matches!(
        router.default_database(),
        Err(Error::NoDefaultDatabase)
    ));

    router
        .register_database(database(
            "orders",
            false,
            vec![instance("ORD_M", "orders_m", true, 0, 0)],
        ))
        .unwrap();
    router.set_default_database("orders");

    let group = router.default_database().unwrap();
    let master = group.pick_master().unwrap();
    assert!(master.dsn.contains("/orders_m?"));
}
