use tests::*;

use ormlet::driver::Sqlite;
use std::{sync::atomic::Ordering::SeqCst, time::Duration};
use tokio::time::timeout;

fn config(max_size: usize, min_size: usize) -> PoolConfig {
    PoolConfig { max_size, min_size }
}

#[tokio::test]
async fn opens_min_size_connections() {
    init_tracing();

    let driver = CountingDriver::new();
    let counters = driver.counters();
    let pool = Pool::new(driver, config(5, 3)).await.unwrap();

    assert_eq!(pool.state(), PoolState::Ready);
    assert_eq!(counters.opened.load(SeqCst), 3);
    assert_eq!(counters.open.load(SeqCst), 3);
    assert_eq!(pool.status().size, 3);
    assert_eq!(pool.status().max_size, 5);
}

#[tokio::test]
async fn rejects_invalid_sizes() {
    init_tracing();

    let err = Pool::new(CountingDriver::new(), config(1, 2))
        .await
        .unwrap_err();
    assert!(err.is_invalid_driver_configuration());

    let err = Pool::new(CountingDriver::new(), config(0, 0))
        .await
        .unwrap_err();
    assert!(err.is_invalid_driver_configuration());
}

#[tokio::test]
async fn unreachable_server_fails_creation() {
    init_tracing();

    let err = Pool::new(CountingDriver::refusing(), config(10, 1))
        .await
        .unwrap_err();
    assert!(err.is_connection());
}

#[tokio::test]
async fn in_memory_sqlite_uses_one_connection() {
    init_tracing();

    let db = Db::with_driver(Sqlite::in_memory(), config(5, 3))
        .await
        .unwrap();

    assert_eq!(db.pool().status().max_size, 1);
    assert_eq!(db.pool().status().size, 1);
}

#[tokio::test]
async fn file_sqlite_persists_across_pools() {
    init_tracing();

    let path = std::env::temp_dir().join(format!(
        "ormlet-{}.db",
        uuid::Uuid::new_v4().simple()
    ));
    let mut registry = Registry::new();
    let users = registry.register(users()).unwrap();

    let db = Db::with_driver(Sqlite::open(&path), config(2, 1))
        .await
        .unwrap();
    assert_eq!(db.pool().status().max_size, 2);
    db.execute(&create_table(&users), &[]).await.unwrap();

    let mut user = users.create().with("name", "on disk").unwrap();
    user.save(&db).await.unwrap();
    let id = user.primary_key().unwrap().clone();
    db.shutdown().await.unwrap();

    let db = Db::with_driver(Sqlite::open(&path), config(2, 1))
        .await
        .unwrap();
    let found = users.find(&db, id).await.unwrap().unwrap();
    assert_eq!(found, user);
    db.shutdown().await.unwrap();

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn never_exceeds_max_size() {
    init_tracing();

    let driver = CountingDriver::new().delay(Duration::from_millis(20));
    let counters = driver.counters();
    let db = Db::with_driver(driver, config(3, 1)).await.unwrap();

    let tasks: Vec<_> = (0..12)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                db.execute("UPDATE `t` SET `n` = ?", &[Value::from(i)])
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 1);
    }

    assert_eq!(counters.executed.load(SeqCst), 12);
    assert!(counters.peak.load(SeqCst) <= 3);
    assert!(counters.peak_busy.load(SeqCst) <= 3);
    assert!(counters.peak_busy.load(SeqCst) >= 2);
}

#[tokio::test]
async fn acquire_waits_for_release() {
    init_tracing();

    let pool = Pool::new(CountingDriver::new(), config(1, 1)).await.unwrap();

    let held = pool.acquire().await.unwrap();
    assert!(timeout(Duration::from_millis(50), pool.acquire())
        .await
        .is_err());

    let waiter = tokio::spawn({
        let pool = pool.clone();
        async move { pool.acquire().await.map(drop) }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    pool.release(held);
    timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn failed_statement_releases_connection() {
    init_tracing();

    let db = Db::with_driver(CountingDriver::new(), config(1, 1))
        .await
        .unwrap();

    let err = db.execute("fail", &[]).await.unwrap_err();
    assert!(err.is_driver_operation_failed());

    let rows = timeout(Duration::from_secs(1), db.select("SELECT 1", &[], None))
        .await
        .unwrap()
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn shutdown_drains_then_closes() {
    init_tracing();

    let driver = CountingDriver::new();
    let counters = driver.counters();
    let pool = Pool::new(driver, config(2, 2)).await.unwrap();

    let held = pool.acquire().await.unwrap();

    let shutdown = tokio::spawn({
        let pool = pool.clone();
        async move { pool.shutdown().await }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(pool.state(), PoolState::Draining);
    assert!(!shutdown.is_finished());

    // Draining pools hand out nothing, even with an idle connection left
    assert!(pool.acquire().await.unwrap_err().is_connection());

    pool.release(held);
    timeout(Duration::from_secs(1), shutdown)
        .await
        .unwrap()
        .unwrap()
        .unwrap();

    assert_eq!(pool.state(), PoolState::Closed);
    assert_eq!(counters.open.load(SeqCst), 0);
}

#[tokio::test]
async fn closed_pool_rejects_everything() {
    init_tracing();

    let db = Db::with_driver(CountingDriver::new(), config(2, 1))
        .await
        .unwrap();
    db.shutdown().await.unwrap();

    assert_eq!(db.pool().state(), PoolState::Closed);
    assert!(db.pool().acquire().await.unwrap_err().is_connection());
    assert!(db.select("SELECT 1", &[], None).await.unwrap_err().is_connection());
    assert!(db.execute("DELETE FROM `t`", &[]).await.unwrap_err().is_connection());
    assert!(db.shutdown().await.unwrap_err().is_connection());
}

#[tokio::test]
async fn shutdown_with_nothing_borrowed() {
    init_tracing();

    let (db, users) = Setup::users().await;
    assert_eq!(
        users.find_number(&db, "count(`id`)", Query::new()).await.unwrap(),
        Some(Value::I64(0))
    );

    timeout(Duration::from_secs(1), db.shutdown())
        .await
        .unwrap()
        .unwrap();
    assert!(users.find(&db, "x").await.unwrap_err().is_connection());
}
