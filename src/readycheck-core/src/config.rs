//! Configuration for the readiness checker.
//!
//! All file-system locations (marker, queue, destination) are explicit
//! configuration rather than ambient paths, so the core can be exercised
//! against temporary directories in tests.

use std::path::PathBuf;

/// One gibibyte, the unit eligibility thresholds are stated in.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Configuration for a checker run.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Path of the run-once marker file.
    pub marker_path: PathBuf,
    /// Directory holding records that await remote delivery.
    pub queue_dir: PathBuf,
    /// Base directory of the remote destination.
    pub destination_dir: PathBuf,
    /// Minimum OS-disk capacity in GiB.
    pub min_storage_gb: u64,
    /// Minimum total memory in GiB.
    pub min_memory_gb: u64,
    /// Minimum TPM spec major version.
    pub min_tpm_major: u32,
    /// Minimum CPU clock speed in MHz.
    pub min_clock_mhz: u32,
    /// Minimum logical core count.
    pub min_logical_cores: u32,
    /// OS build at or above which evaluation is bypassed outright: the
    /// device already runs the target platform.
    pub target_os_build: u32,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            marker_path: PathBuf::from("/var/lib/readycheck/completed"),
            queue_dir: PathBuf::from("/var/lib/readycheck/outbox"),
            destination_dir: PathBuf::from("/srv/readycheck/results"),
            min_storage_gb: 64,
            min_memory_gb: 4,
            min_tpm_major: 2,
            min_clock_mhz: 1000,
            min_logical_cores: 2,
            target_os_build: 22000,
        }
    }
}

impl CheckerConfig {
    /// Config rooted under a single state directory, keeping the default
    /// thresholds. Convenience for the CLI and tests.
    #[must_use]
    pub fn rooted_at(state_dir: &std::path::Path, destination_dir: PathBuf) -> Self {
        Self {
            marker_path: state_dir.join("completed"),
            queue_dir: state_dir.join("outbox"),
            destination_dir,
            ..Self::default()
        }
    }
}
