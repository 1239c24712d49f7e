//! Linux firmware probing via /dev, sysfs, and efivarfs.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::types::{CpuIdentity, Fact, OemIdentity, TpmInfo};

/// EFI global variable GUID, part of the SecureBoot variable name.
const EFI_GLOBAL_GUID: &str = "8be4df61-93ca-11d2-aa0d-00e098032b8c";

/// Probe TPM presence via device nodes, version via sysfs.
pub fn probe_tpm() -> Fact<TpmInfo> {
    probe_tpm_at(Path::new("/dev"), Path::new("/sys/class/tpm"))
}

pub(crate) fn probe_tpm_at(dev: &Path, sysfs: &Path) -> Fact<TpmInfo> {
    let present = dev.join("tpm0").exists() || dev.join("tpmrm0").exists();
    if !present {
        return Fact::Known(TpmInfo {
            present: false,
            spec_version: String::new(),
        });
    }

    // tpm_version_major exists on 2.0 devices since kernel 5.5; 1.2
    // devices expose a caps file instead.
    let spec_version = match fs::read_to_string(sysfs.join("tpm0/tpm_version_major")) {
        Ok(major) => format!("{}.0", major.trim()),
        Err(_) => match fs::read_to_string(sysfs.join("tpm0/device/caps")) {
            Ok(caps) => caps
                .lines()
                .find_map(|line| line.strip_prefix("TCG version: "))
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            Err(err) => {
                debug!(error = %err, "TPM present but version unreadable");
                String::new()
            },
        },
    };

    Fact::Known(TpmInfo {
        present: true,
        spec_version,
    })
}

/// Probe secure-boot state from efivarfs (the primary query).
pub fn probe_secure_boot() -> Fact<bool> {
    secure_boot_from_efivar(Path::new(&format!(
        "/sys/firmware/efi/efivars/SecureBoot-{EFI_GLOBAL_GUID}"
    )))
}

/// efivarfs prefixes the variable data with a 4-byte attribute word.
pub(crate) fn secure_boot_from_efivar(path: &Path) -> Fact<bool> {
    match fs::read(path) {
        Ok(bytes) if bytes.len() >= 5 => Fact::Known(bytes[4] == 1),
        Ok(_) => Fact::Unknown,
        Err(err) => {
            debug!(error = %err, "secure-boot efivar unreadable");
            Fact::Unknown
        },
    }
}

/// Probe the persisted firmware-state record for secure boot.
///
/// Reads the legacy sysfs efi vars interface, which persists the variable
/// data without the attribute prefix. Last resort for kernels or mounts
/// where efivarfs is unavailable.
pub fn probe_secure_boot_record() -> Fact<bool> {
    secure_boot_from_legacy_record(Path::new(&format!(
        "/sys/firmware/efi/vars/SecureBoot-{EFI_GLOBAL_GUID}/data"
    )))
}

pub(crate) fn secure_boot_from_legacy_record(path: &Path) -> Fact<bool> {
    match fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Fact::Known(bytes[0] == 1),
        _ => Fact::Unknown,
    }
}

/// Probe OEM identity from DMI.
pub fn probe_oem() -> Fact<OemIdentity> {
    probe_oem_at(Path::new("/sys/class/dmi/id"))
}

pub(crate) fn probe_oem_at(dmi: &Path) -> Fact<OemIdentity> {
    let manufacturer = fs::read_to_string(dmi.join("sys_vendor"));
    let model = fs::read_to_string(dmi.join("product_name"));
    match (manufacturer, model) {
        (Ok(manufacturer), Ok(model)) => Fact::Known(OemIdentity {
            manufacturer: manufacturer.trim().to_string(),
            model: model.trim().to_string(),
        }),
        _ => Fact::Unknown,
    }
}

/// Probe numeric CPU family/model identifiers from /proc/cpuinfo.
pub fn probe_cpu_identity() -> CpuIdentity {
    match fs::read_to_string("/proc/cpuinfo") {
        Ok(cpuinfo) => cpu_identity_from_cpuinfo(&cpuinfo),
        Err(_) => CpuIdentity::default(),
    }
}

pub(crate) fn cpu_identity_from_cpuinfo(cpuinfo: &str) -> CpuIdentity {
    let field = |name: &str| {
        cpuinfo.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim() == name {
                value.trim().parse().ok()
            } else {
                None
            }
        })
    };
    CpuIdentity {
        family: field("cpu family"),
        model: field("model"),
    }
}
