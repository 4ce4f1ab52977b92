//! Session factory: opens and validates new tracker connections

use tp_core::error::ConnectionError;
use tp_core::traits::{Connector, TrackerConnection};

/// Opens connections through a [`Connector`], retrying absent results and
/// probing each new connection once before handing it out.
pub struct SessionFactory<C> {
    connector: C,
    reconnect_attempts: u32,
}

impl<C: Connector> SessionFactory<C> {
    /// Create a factory making at most `reconnect_attempts` open attempts per
    /// connection (values below 1 behave as 1)
    pub fn new(connector: C, reconnect_attempts: u32) -> Self {
        Self {
            connector,
            reconnect_attempts: reconnect_attempts.max(1),
        }
    }

    /// Open a validated connection.
    ///
    /// Returns `None` when no connection could be produced; every failure is
    /// logged here and never propagated.
    pub async fn create(&self) -> Option<C::Conn> {
        tracing::debug!("Creating tracker connection");

        let mut conn = match self.open_with_retry().await {
            Ok(Some(conn)) => conn,
            Ok(None) => {
                tracing::warn!(
                    attempts = self.reconnect_attempts,
                    "No tracker connection after {} attempts",
                    self.reconnect_attempts
                );
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Create tracker connection failed");
                return None;
            }
        };

        if let Err(e) = conn.active_test().await {
            let id = conn.id();
            tracing::error!(conn = %id, error = %e, "New tracker connection failed its first probe");
            if let Err(close_err) = conn.close().await {
                tracing::warn!(conn = %id, error = %close_err, "Closing unusable connection failed");
            }
            return None;
        }

        tracing::debug!(conn = %conn.id(), "Tracker connection ready");
        Some(conn)
    }

    /// First attempt counts as attempt 1; an error ends the loop immediately.
    async fn open_with_retry(&self) -> Result<Option<C::Conn>, ConnectionError> {
        let mut attempt = 1;
        let mut conn = self.connector.open().await?;

        while conn.is_none() && attempt < self.reconnect_attempts {
            tracing::info!(attempt, "Retrying tracker connection");
            attempt += 1;
            conn = self.connector.open().await?;
        }

        Ok(conn)
    }
}
