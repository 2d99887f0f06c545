//! Database abstraction layer
//!
//! Trait-based abstraction over a single connection, plus the statement
//! types the engine issues through it.

pub mod factory;
pub mod statement;
pub mod traits;

pub use factory::create_provider;
pub use statement::{
    quote_identifier, BatchRow, CountQuery, KeyPageQuery, RenderedStatement, UpdateBatch,
};
pub use traits::{Connection, ConnectionProvider};
