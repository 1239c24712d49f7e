//! Error types for the verdict engine and delivery layer.

use thiserror::Error;

/// Errors that can occur while producing or delivering a run record.
///
/// A failed remote write is deliberately *not* represented here; the
/// delivery layer downgrades it to a queued record. These errors cover
/// the cases that genuinely abort an operation.
#[derive(Debug, Error)]
pub enum ReadinessError {
    /// Fact collection failed before any check could run.
    ///
    /// Maps to the FAILED_TO_RUN verdict; the run-once marker is not
    /// written so a later invocation retries from scratch.
    #[error(transparent)]
    FactCollection(#[from] readycheck_facts::FactError),

    /// The run-once marker could not be written.
    #[error("marker write failed at {path}: {message}")]
    Marker {
        /// Marker file path.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// The local delivery queue could not be read or written.
    #[error("queue error at {path}: {message}")]
    Queue {
        /// Queue directory or entry path.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// A remote write failed.
    ///
    /// Surfaced by [`crate::RemoteSink::write`]; callers inside the
    /// delivery layer catch it and queue instead of propagating.
    #[error("remote write failed for {name}: {message}")]
    Remote {
        /// Record filename being written.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// A run record could not be serialized or parsed.
    #[error("record serialization failed: {message}")]
    Serialization {
        /// What went wrong.
        message: String,
    },
}

impl ReadinessError {
    /// Whether this error leaves the device eligible for a retry on the
    /// next invocation (no marker was written).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FactCollection(_) | Self::Remote { .. })
    }
}

impl From<serde_json::Error> for ReadinessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readycheck_facts::FactError;

    #[test]
    fn retryable_errors_leave_no_marker_behind() {
        let collection = ReadinessError::from(FactError::Privilege {
            message: "inventory access denied".into(),
        });
        assert!(collection.is_retryable());

        let remote = ReadinessError::Remote {
            name: "dev-01-20260828T090000".into(),
            message: "unreachable".into(),
        };
        assert!(remote.is_retryable());

        let marker = ReadinessError::Marker {
            path: "/var/lib/readycheck/completed".into(),
            message: "read-only file system".into(),
        };
        assert!(!marker.is_retryable());
    }
}
