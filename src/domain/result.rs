//! Result type alias for the anonymizer

use super::errors::AnonymizerError;

/// Result type alias for operations outside a run
///
/// Database and generator errors convert into [`AnonymizerError`] with `?`.
///
/// ```
/// use anonymizer::domain::{DatabaseError, Result};
///
/// fn connect() -> std::result::Result<(), DatabaseError> {
///     Err(DatabaseError::Closed)
/// }
///
/// fn run() -> Result<()> {
///     connect()?;
///     Ok(())
/// }
///
/// assert!(run().is_err());
/// ```
pub type Result<T> = std::result::Result<T, AnonymizerError>;
