//! Platform-specific firmware and identity probing.
//!
//! Each supported platform exposes the same probe surface:
//! - TPM presence and spec version
//! - secure-boot state (primary query plus the persisted firmware record)
//! - OEM manufacturer/model identity
//! - numeric CPU family/model identifiers
//!
//! Platforms without a probe implementation report every firmware fact as
//! [`Fact::Unknown`]; the check suite degrades those to UNDETERMINED
//! rather than guessing.

#[cfg(target_os = "linux")]
pub mod linux;

use crate::types::{CpuIdentity, Fact, OemIdentity, TpmInfo};

/// Probe TPM presence and spec version.
pub fn probe_tpm() -> Fact<TpmInfo> {
    #[cfg(target_os = "linux")]
    {
        linux::probe_tpm()
    }
    #[cfg(not(target_os = "linux"))]
    {
        Fact::Unknown
    }
}

/// Probe secure-boot state via the primary platform query.
pub fn probe_secure_boot() -> Fact<bool> {
    #[cfg(target_os = "linux")]
    {
        linux::probe_secure_boot()
    }
    #[cfg(not(target_os = "linux"))]
    {
        Fact::Unknown
    }
}

/// Probe the persisted firmware-state record for secure boot.
///
/// Consulted by the check suite only when [`probe_secure_boot`] reports
/// unknown; this is a last-resort fallback, not a second opinion.
pub fn probe_secure_boot_record() -> Fact<bool> {
    #[cfg(target_os = "linux")]
    {
        linux::probe_secure_boot_record()
    }
    #[cfg(not(target_os = "linux"))]
    {
        Fact::Unknown
    }
}

/// Probe the OEM manufacturer/model identity.
pub fn probe_oem() -> Fact<OemIdentity> {
    #[cfg(target_os = "linux")]
    {
        linux::probe_oem()
    }
    #[cfg(not(target_os = "linux"))]
    {
        Fact::Unknown
    }
}

/// Probe numeric CPU family/model identifiers.
pub fn probe_cpu_identity() -> CpuIdentity {
    #[cfg(target_os = "linux")]
    {
        linux::probe_cpu_identity()
    }
    #[cfg(not(target_os = "linux"))]
    {
        CpuIdentity::default()
    }
}

/// Extract a comparable OS build number from a version string.
///
/// Returns the last run of four or more digits, which matches the build
/// component of strings like "10.0.22631" or "11 (22631)".
pub fn parse_os_build(os_version: &str) -> Option<u32> {
    let mut best: Option<u32> = None;
    let mut current = String::new();
    for ch in os_version.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else {
            if current.len() >= 4 {
                if let Ok(build) = current.parse() {
                    best = Some(build);
                }
            }
            current.clear();
        }
    }
    best
}
