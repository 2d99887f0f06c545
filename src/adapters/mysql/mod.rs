//! MySQL implementation of the database traits
//!
//! Built on `sqlx` with the tokio runtime and rustls.

pub mod client;
pub mod provider;

pub use client::MySqlClient;
pub use provider::MySqlProvider;
