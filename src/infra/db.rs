//! Database connection and initialization.

use std::time::Duration;

use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::config::{Config, SERVER_SELECTION_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};

/// Database wrapper for connection management.
///
/// One handle is opened at startup and shared across all concurrently
/// served requests; the driver owns pooling and thread-safety.
#[derive(Clone)]
pub struct Database {
    client: Client,
    database: mongodb::Database,
}

impl Database {
    /// Open the process-wide connection and verify it with a ping.
    ///
    /// The ping makes connection failure fatal at boot instead of
    /// surfacing on first use.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = ClientOptions::parse(&config.mongodb_uri)
            .await
            .map_err(|e| AppError::config(format!("invalid MongoDB URI: {e}")))?;
        options.server_selection_timeout =
            Some(Duration::from_secs(SERVER_SELECTION_TIMEOUT_SECS));

        let client = Client::with_options(options)?;
        let database = client.database(&config.database_name);

        database.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database = %config.database_name, "MongoDB connected");

        Ok(Self { client, database })
    }

    /// Open a handle without the startup ping; connection errors surface
    /// on first use. Used by tests that exercise failure paths against
    /// an unreachable store.
    pub async fn connect_lazy(config: &Config) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.mongodb_uri)
            .await
            .map_err(|e| AppError::config(format!("invalid MongoDB URI: {e}")))?;
        let database = client.database(&config.database_name);
        Ok(Self { client, database })
    }

    /// Get a typed handle to a collection.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    /// Check database connectivity with a lightweight ping command.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// The underlying driver client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
