//! Result type alias for the syncer

use super::errors::SyncError;

/// Result type alias for syncer operations
///
/// # Examples
///
/// ```
/// use transcript_syncer::domain::result::Result;
/// use transcript_syncer::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
