//! Fact types shared between collection and the check suite.

use serde::{Deserialize, Serialize};

/// A single host attribute: either a successfully read value or an
/// explicit unknown.
///
/// `Unknown` is not an error. It feeds an UNDETERMINED check outcome
/// downstream and must never be replaced by a default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fact<T> {
    /// The attribute was read successfully.
    Known(T),
    /// The attribute could not be read (unsupported, denied, missing).
    Unknown,
}

impl<T> Fact<T> {
    /// The value, if it was read successfully.
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }

    /// Whether the attribute could not be read.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl<T> From<Option<T>> for Fact<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Known(v),
            None => Self::Unknown,
        }
    }
}

/// TPM presence and reported specification version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpmInfo {
    /// Whether a TPM device is present.
    pub present: bool,
    /// Reported spec version string (e.g. "2.0"). Empty when absent.
    pub spec_version: String,
}

impl TpmInfo {
    /// Major component of the spec version, if parseable.
    pub fn major_version(&self) -> Option<u32> {
        self.spec_version
            .split(['.', ',', ' '])
            .next()
            .and_then(|major| major.trim().parse().ok())
    }
}

/// CPU descriptor as read from the host.
///
/// `clock_mhz` and `logical_cores` of zero mean the platform reported
/// nothing useful; the processor check treats them as unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Address width in bits (32 or 64).
    pub address_width: u32,
    /// Maximum clock speed in MHz.
    pub clock_mhz: u32,
    /// Number of logical processors.
    pub logical_cores: u32,
    /// Manufacturer string (e.g. "GenuineIntel", "AuthenticAMD").
    pub manufacturer: String,
    /// Model caption (e.g. "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz").
    pub caption: String,
    /// Numeric family/model identifiers, when the platform exposes them.
    pub identity: CpuIdentity,
}

/// Numeric CPU family/model identifiers, where the platform exposes them.
///
/// Purely diagnostic on platforms that describe the CPU by caption only;
/// both fields default to absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuIdentity {
    /// Numeric CPU family identifier.
    pub family: Option<u32>,
    /// Numeric CPU model identifier.
    pub model: Option<u32>,
}

/// OEM manufacturer and model identity of the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OemIdentity {
    /// System manufacturer (e.g. "Microsoft Corporation").
    pub manufacturer: String,
    /// System model (e.g. "Surface Studio 2").
    pub model: String,
}

impl OemIdentity {
    /// Combined "manufacturer model" identity string used by the
    /// exemption allow-list.
    pub fn identity(&self) -> String {
        format!("{} {}", self.manufacturer.trim(), self.model.trim())
    }
}

/// Immutable snapshot of raw host attributes for one run.
///
/// Created fresh each run and never persisted directly; only the run
/// record derived from it leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactSet {
    /// Host name used to identify the device in run records.
    pub hostname: String,
    /// Capacity of the OS disk in bytes.
    pub os_disk_bytes: Fact<u64>,
    /// Total physical memory in bytes.
    pub total_memory_bytes: Fact<u64>,
    /// TPM presence and version.
    pub tpm: Fact<TpmInfo>,
    /// CPU descriptor.
    pub cpu: Fact<CpuInfo>,
    /// Secure-boot state from the primary platform query.
    pub secure_boot: Fact<bool>,
    /// Secure-boot state from the persisted firmware-state record,
    /// consulted only when the primary query is unreadable.
    pub secure_boot_record: Fact<bool>,
    /// OEM manufacturer/model identity.
    pub oem: Fact<OemIdentity>,
    /// OS build number, when the platform exposes a comparable one.
    pub os_build: Fact<u32>,
}
