//! Run-once gate: the per-device completion marker.
//!
//! The marker's existence is the whole signal. Its content is advisory
//! diagnostic text (timestamp, verdict label) that no component reads
//! back. The marker is written only after a run record with a verdict
//! other than FAILED_TO_RUN has been constructed; delivery success is
//! not required — the marker records that evaluation happened, not that
//! delivery succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::ReadinessError;
use crate::record::RunRecord;

/// Gate state derived from marker-file existence at inspection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No marker: this device has not produced a verdict yet.
    NotRun,
    /// Marker present: evaluation already happened on this device.
    Completed,
}

/// The run-once gate, bound to an explicit marker path.
#[derive(Debug, Clone)]
pub struct RunOnceGate {
    marker_path: PathBuf,
}

impl RunOnceGate {
    /// Bind a gate to its marker path.
    #[must_use]
    pub fn new(marker_path: impl Into<PathBuf>) -> Self {
        Self {
            marker_path: marker_path.into(),
        }
    }

    /// The marker path this gate is bound to.
    #[must_use]
    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Current state, from marker existence.
    #[must_use]
    pub fn state(&self) -> GateState {
        if self.marker_path.exists() {
            GateState::Completed
        } else {
            GateState::NotRun
        }
    }

    /// Whether evaluation already happened on this device.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state() == GateState::Completed
    }

    /// Record completion after a run record was constructed.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::Marker`] when the marker cannot be
    /// written; the caller treats the run as incomplete and a later
    /// invocation retries.
    pub fn record_completion(&self, record: &RunRecord) -> Result<(), ReadinessError> {
        let content = format!(
            "completed {} verdict={} ({})\n",
            record.timestamp.to_rfc3339(),
            record.verdict_code,
            record.verdict_label,
        );
        self.write_marker(&content)?;
        info!(marker = %self.marker_path.display(), "run-once marker written");
        Ok(())
    }

    /// Record the OS-build bypass: the device already runs the target
    /// platform, so evaluation was skipped without producing a record.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::Marker`] when the marker cannot be
    /// written.
    pub fn record_bypass(&self, os_build: u32) -> Result<(), ReadinessError> {
        let content = format!(
            "bypassed {} os_build={os_build} already at target\n",
            Utc::now().to_rfc3339()
        );
        self.write_marker(&content)?;
        info!(
            marker = %self.marker_path.display(),
            os_build,
            "run-once marker written (build bypass)"
        );
        Ok(())
    }

    fn write_marker(&self, content: &str) -> Result<(), ReadinessError> {
        let marker_error = |err: std::io::Error| ReadinessError::Marker {
            path: self.marker_path.display().to_string(),
            message: err.to_string(),
        };
        if let Some(parent) = self.marker_path.parent() {
            fs::create_dir_all(parent).map_err(marker_error)?;
        }
        fs::write(&self.marker_path, content).map_err(marker_error)?;
        debug!(marker = %self.marker_path.display(), "marker content written");
        Ok(())
    }
}
