//! Result type alias for opsync

use super::errors::OpsyncError;

/// Result type alias for opsync operations
///
/// # Examples
///
/// ```
/// use opsync::domain::result::Result;
/// use opsync::domain::errors::OpsyncError;
///
/// fn failing_function() -> Result<()> {
///     Err(OpsyncError::Configuration("missing bounds".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, OpsyncError>;
