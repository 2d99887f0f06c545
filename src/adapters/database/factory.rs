//! Connection provider factory

use crate::adapters::database::traits::ConnectionProvider;
use crate::adapters::mysql::MySqlProvider;
use crate::config::DatabaseSettings;

/// Create the connection provider for the configured database
///
/// MySQL is the only supported dialect.
pub fn create_provider(settings: &DatabaseSettings) -> Box<dyn ConnectionProvider> {
    tracing::debug!(target_db = %settings.display_safe(), "Creating MySQL connection provider");
    Box::new(MySqlProvider::new(settings.clone()))
}
