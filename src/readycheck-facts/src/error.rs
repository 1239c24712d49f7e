//! Error types for fact collection.

use thiserror::Error;

/// Errors that can occur during fact collection.
///
/// Individual unreadable attributes are not errors; they surface as
/// [`crate::Fact::Unknown`]. A `FactError` means collection could not
/// proceed at all and the run should be treated as failed-to-run.
#[derive(Debug, Error)]
pub enum FactError {
    /// The host inventory facility could not be initialized.
    #[error("fact collection failed: {message}")]
    Collection {
        /// What went wrong.
        message: String,
    },

    /// Collection requires a privilege the process does not have.
    #[error("insufficient privileges for fact collection: {message}")]
    Privilege {
        /// What was denied.
        message: String,
    },
}
