//! Unit-of-work executor
//!
//! Runs caller-supplied work against a pooled connection and decides the
//! connection's fate afterwards: checked back in when the work succeeds,
//! dropped when it fails, panics or is cancelled mid-flight.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use tp_core::error::{BoxError, PoolError};
use tp_core::traits::TrackerConnection;

use crate::connection::ConnectionPool;

/// Executes work items with a connection borrowed from a pool
pub struct Executor<T> {
    pool: Arc<ConnectionPool<T>>,
}

impl<T> Clone for Executor<T> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<T: TrackerConnection + 'static> Executor<T> {
    pub fn new(pool: Arc<ConnectionPool<T>>) -> Self {
        Self { pool }
    }

    /// The pool this executor draws from
    pub fn pool(&self) -> &Arc<ConnectionPool<T>> {
        &self.pool
    }

    /// Check out a connection, run `work` with exclusive access to it, then
    /// check it in on success or drop it on failure.
    ///
    /// If no connection becomes available within the pool's wait timeout the
    /// work is never invoked and [`PoolError::NoConnection`] is returned.
    /// Errors from the work are wrapped in [`PoolError::Work`]; a panic inside
    /// the work is caught and reported as [`PoolError::WorkPanicked`].
    ///
    /// ```ignore
    /// let n = executor
    ///     .run(|conn| async move { conn.active_test().await.map(|_| 1) }.boxed())
    ///     .await?;
    /// ```
    pub async fn run<R, E, F>(&self, work: F) -> Result<R, PoolError>
    where
        F: for<'c> FnOnce(&'c mut T) -> BoxFuture<'c, Result<R, E>> + Send,
        E: Into<BoxError> + Send,
        R: Send,
    {
        let conn = match self.pool.check_out().await? {
            Some(conn) => conn,
            None => {
                let wait = self.pool.config().wait_timeout();
                tracing::warn!(?wait, "No tracker connection for unit of work");
                return Err(PoolError::NoConnection(wait));
            }
        };

        let id = conn.id();
        let mut lease = Lease::new(Arc::clone(&self.pool));
        let outcome = {
            let conn = lease.slot.insert(conn);
            AssertUnwindSafe(async move { work(conn).await })
                .catch_unwind()
                .await
        };

        match outcome {
            Ok(Ok(value)) => {
                lease.check_in().await;
                Ok(value)
            }
            Ok(Err(e)) => {
                let e: BoxError = e.into();
                tracing::warn!(conn = %id, error = %e, "Unit of work failed, dropping connection");
                lease.drop_connection().await;
                Err(PoolError::Work(e))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(conn = %id, panic = %message, "Unit of work panicked, dropping connection");
                lease.drop_connection().await;
                Err(PoolError::WorkPanicked(message))
            }
        }
    }
}

/// A checked-out connection owned for the span of one unit of work.
///
/// If the `run` future is dropped while the work is still pending, the
/// connection's protocol state is unknown; `Drop` closes it on a spawned task
/// so it is counted as dropped and never re-enters the idle buffer.
struct Lease<T: TrackerConnection + 'static> {
    pool: Arc<ConnectionPool<T>>,
    slot: Option<T>,
}

impl<T: TrackerConnection + 'static> Lease<T> {
    fn new(pool: Arc<ConnectionPool<T>>) -> Self {
        Self { pool, slot: None }
    }

    async fn check_in(mut self) {
        if let Some(conn) = self.slot.take() {
            self.pool.check_in(conn).await;
        }
    }

    async fn drop_connection(mut self) {
        if let Some(conn) = self.slot.take() {
            self.pool.drop_connection(conn).await;
        }
    }
}

impl<T: TrackerConnection + 'static> Drop for Lease<T> {
    fn drop(&mut self) {
        let Some(conn) = self.slot.take() else {
            return;
        };

        tracing::warn!(conn = %conn.id(), "Unit of work cancelled, dropping connection");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let pool = Arc::clone(&self.pool);
                handle.spawn(async move { pool.drop_connection(conn).await });
            }
            Err(_) => {
                tracing::debug!("No runtime to close cancelled connection on");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_from_str() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
    }

    #[test]
    fn test_panic_message_from_string() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("formatted boom"));
        assert_eq!(panic_message(payload.as_ref()), "formatted boom");
    }

    #[test]
    fn test_panic_message_unknown() {
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
