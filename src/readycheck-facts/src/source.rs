//! Fact source boundary and the production host collector.

use sysinfo::{Disks, System};
use tracing::{debug, info};

use crate::error::FactError;
use crate::platform;
use crate::types::{CpuInfo, Fact, FactSet};

/// Boundary between fact collection and the check suite.
///
/// The production implementation reads the live host; tests inject a
/// [`StaticFacts`] snapshot so the core stays testable without real
/// hardware.
pub trait FactSource {
    /// Collect a fresh fact snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FactError`] only when collection cannot proceed at all;
    /// individual unreadable attributes surface as [`Fact::Unknown`]
    /// inside the returned set.
    fn collect(&self) -> Result<FactSet, FactError>;
}

/// The local hostname, with a stable placeholder when unreadable.
///
/// Also used on its own for FAILED_TO_RUN records, where a full fact
/// snapshot is unavailable.
#[must_use]
pub fn hostname() -> String {
    System::host_name().unwrap_or_else(|| "unknown-host".to_string())
}

/// Production fact source: reads the live host via `sysinfo` plus
/// platform firmware probes.
#[derive(Debug, Default)]
pub struct HostFacts;

impl HostFacts {
    /// Create a host fact source.
    pub fn new() -> Self {
        Self
    }
}

impl FactSource for HostFacts {
    fn collect(&self) -> Result<FactSet, FactError> {
        let mut sys = System::new_all();
        sys.refresh_all();

        let hostname = hostname();

        let total_memory = sys.total_memory();
        let total_memory_bytes = if total_memory > 0 {
            Fact::Known(total_memory)
        } else {
            Fact::Unknown
        };

        let disks = Disks::new_with_refreshed_list();
        let os_disk_bytes = os_disk_capacity(&disks);

        let cpu = collect_cpu(&sys);

        let os_build = if cfg!(target_os = "windows") {
            System::os_version()
                .as_deref()
                .and_then(platform::parse_os_build)
                .into()
        } else {
            // Kernel versions on other platforms are not comparable to
            // the target build number, so the build bypass never fires.
            Fact::Unknown
        };

        let facts = FactSet {
            hostname,
            os_disk_bytes,
            total_memory_bytes,
            tpm: platform::probe_tpm(),
            cpu,
            secure_boot: platform::probe_secure_boot(),
            secure_boot_record: platform::probe_secure_boot_record(),
            oem: platform::probe_oem(),
            os_build,
        };

        info!(
            hostname = %facts.hostname,
            os_disk = ?facts.os_disk_bytes,
            memory = ?facts.total_memory_bytes,
            tpm = ?facts.tpm,
            secure_boot = ?facts.secure_boot,
            "collected host facts"
        );

        Ok(facts)
    }
}

/// Capacity of the disk holding the OS, preferring the root mount.
fn os_disk_capacity(disks: &Disks) -> Fact<u64> {
    let os_mount = if cfg!(target_os = "windows") {
        "C:\\"
    } else {
        "/"
    };

    let by_mount = disks
        .iter()
        .find(|disk| disk.mount_point().to_str() == Some(os_mount))
        .map(|disk| disk.total_space());
    if let Some(capacity) = by_mount {
        return Fact::Known(capacity);
    }

    // No recognizable OS mount; fall back to the largest disk rather
    // than reporting a default.
    let largest = disks.iter().map(|disk| disk.total_space()).max();
    match largest {
        Some(capacity) if capacity > 0 => {
            debug!(capacity, "OS mount not found, using largest disk");
            Fact::Known(capacity)
        },
        _ => Fact::Unknown,
    }
}

fn collect_cpu(sys: &System) -> Fact<CpuInfo> {
    let cpus = sys.cpus();
    let Some(first) = cpus.first() else {
        return Fact::Unknown;
    };

    let address_width = if cfg!(target_pointer_width = "64") {
        64
    } else {
        32
    };

    Fact::Known(CpuInfo {
        address_width,
        clock_mhz: u32::try_from(first.frequency()).unwrap_or(0),
        logical_cores: u32::try_from(cpus.len()).unwrap_or(0),
        manufacturer: first.vendor_id().to_string(),
        caption: first.brand().to_string(),
        identity: platform::probe_cpu_identity(),
    })
}

/// Fixed fact source for tests and dry runs.
#[derive(Debug, Clone)]
pub struct StaticFacts {
    facts: FactSet,
}

impl StaticFacts {
    /// Wrap a prepared fact set.
    pub fn new(facts: FactSet) -> Self {
        Self { facts }
    }
}

impl FactSource for StaticFacts {
    fn collect(&self) -> Result<FactSet, FactError> {
        Ok(self.facts.clone())
    }
}
