//! MySQL connection provider

use super::client::MySqlClient;
use crate::adapters::database::traits::{Connection, ConnectionProvider};
use crate::config::DatabaseSettings;
use crate::domain::DatabaseError;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::ConnectOptions;

/// Opens MySQL connections from [`DatabaseSettings`]
#[derive(Debug, Clone)]
pub struct MySqlProvider {
    settings: DatabaseSettings,
}

impl MySqlProvider {
    /// Creates a provider
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }

    /// Connect options for the configured server
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.settings.host)
            .port(self.settings.port)
            .username(&self.settings.username)
            .password(self.settings.password.expose_secret().as_ref())
            .database(&self.settings.database)
    }
}

#[async_trait]
impl ConnectionProvider for MySqlProvider {
    async fn connect(&self) -> Result<Box<dyn Connection>, DatabaseError> {
        let target = self.settings.display_safe();
        let timeout = self.settings.timeout();
        tracing::info!(target_db = %target, timeout_secs = self.settings.timeout_secs, "Connecting to MySQL");

        let options = self.connect_options();
        let conn = match tokio::time::timeout(timeout, options.connect()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                return Err(DatabaseError::ConnectionFailed(format!("{target}: {e}")));
            }
            Err(_) => {
                return Err(DatabaseError::Timeout {
                    operation: format!("connect to {target}"),
                    seconds: self.settings.timeout_secs,
                });
            }
        };

        tracing::info!(target_db = %target, "MySQL connection established");
        Ok(Box::new(MySqlClient::new(conn, timeout, target)))
    }
}
