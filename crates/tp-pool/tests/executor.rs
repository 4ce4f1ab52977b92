//! Unit-of-work executor tests

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use common::{init_tracing, pool_config, MockConnection, MockTracker};
use tp_core::error::{ConnectionError, PoolError};
use tp_core::traits::TrackerConnection;
use tp_pool::{ConnectionPool, Executor};

async fn build_executor(tracker: &Arc<MockTracker>, min: usize, max: usize) -> Executor<MockConnection> {
    let pool = ConnectionPool::build(pool_config(min, max), tracker.connector())
        .await
        .unwrap();
    Executor::new(Arc::new(pool))
}

#[tokio::test]
async fn test_successful_work_checks_connection_in() {
    init_tracing();
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 1, 1).await;

    let id = executor
        .run(|conn: &mut MockConnection| {
            async move { Ok::<_, ConnectionError>(conn.id().as_u64()) }.boxed()
        })
        .await
        .unwrap();

    assert_eq!(id, 1);
    let stats = executor.pool().stats();
    assert_eq!(stats.checked_in, 1);
    assert_eq!(stats.dropped, 0);
    assert_eq!(executor.pool().idle_count(), 1);
}

#[tokio::test]
async fn test_work_can_use_connection() {
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 1, 1).await;
    let probes_before = tracker.probes();

    executor
        .run(|conn: &mut MockConnection| async move { conn.active_test().await }.boxed())
        .await
        .unwrap();

    assert_eq!(tracker.probes(), probes_before + 1);
}

#[tokio::test]
async fn test_failed_work_drops_connection() {
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 1, 1).await;

    let result = executor
        .run(|_conn: &mut MockConnection| {
            async move { Err::<(), _>(ConnectionError::Closed) }.boxed()
        })
        .await;

    match result {
        Err(PoolError::Work(e)) => assert_eq!(e.to_string(), "Connection closed"),
        other => panic!("expected work error, got {:?}", other),
    }
    let stats = executor.pool().stats();
    assert_eq!(stats.checked_in, 0);
    assert_eq!(stats.dropped, 1);
    assert_eq!(tracker.closed(), vec![1]);
    assert_eq!(executor.pool().idle_count(), 0);
}

#[tokio::test]
async fn test_work_error_can_be_any_error() {
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 1, 1).await;

    let result = executor
        .run(|_conn: &mut MockConnection| {
            async move { Err::<(), _>(anyhow::anyhow!("bad reply")) }.boxed()
        })
        .await;

    assert!(matches!(result, Err(PoolError::Work(_))));
}

#[tokio::test(start_paused = true)]
async fn test_no_connection_skips_work() {
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 0, 1).await;
    let invoked = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&invoked);
    let result = executor
        .run(move |_conn: &mut MockConnection| {
            flag.store(true, Ordering::SeqCst);
            async move { Ok::<_, ConnectionError>(()) }.boxed()
        })
        .await;

    assert!(matches!(
        result,
        Err(PoolError::NoConnection(wait)) if wait == Duration::from_secs(2)
    ));
    assert!(!invoked.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_panicking_work_drops_connection() {
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 1, 1).await;

    let result = executor
        .run(|_conn: &mut MockConnection| {
            async move {
                if true {
                    panic!("storage reply malformed");
                }
                Ok::<(), ConnectionError>(())
            }
            .boxed()
        })
        .await;

    match result {
        Err(PoolError::WorkPanicked(message)) => {
            assert_eq!(message, "storage reply malformed")
        }
        other => panic!("expected panic error, got {:?}", other),
    }
    assert_eq!(executor.pool().stats().dropped, 1);
    assert_eq!(executor.pool().stats().checked_in, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_work_shares_pool() {
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 3, 3).await;

    let mut tasks = Vec::new();
    for _ in 0..12 {
        let executor = executor.clone();
        tasks.push(tokio::spawn(async move {
            executor
                .run(|conn: &mut MockConnection| {
                    async move {
                        tokio::task::yield_now().await;
                        conn.active_test().await
                    }
                    .boxed()
                })
                .await
        }));
    }

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(executor.pool().idle_count(), 3);
    assert_eq!(executor.pool().stats().checked_in, 12);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_work_drops_connection() {
    let tracker = MockTracker::new();
    let executor = build_executor(&tracker, 1, 1).await;

    let result = tokio::time::timeout(
        Duration::from_secs(1),
        executor.run(|_conn: &mut MockConnection| {
            async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, ConnectionError>(())
            }
            .boxed()
        }),
    )
    .await;
    assert!(result.is_err());

    // Let the spawned close finish
    tokio::time::sleep(Duration::from_millis(10)).await;

    let stats = executor.pool().stats();
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.checked_in, 0);
    assert_eq!(tracker.closed(), vec![1]);
    assert_eq!(executor.pool().idle_count(), 0);
}
