//! Secure-boot check: primary platform query with a firmware-record
//! fallback.

use readycheck_facts::FactSet;

use super::{CheckName, CheckOutcome, CheckStatus};

/// PASS iff secure boot is enabled.
///
/// The primary platform query is consulted first. Only when it is
/// unreadable does the persisted firmware-state record decide; it is a
/// last resort, not a second opinion. Neither readable yields
/// UNDETERMINED (non-UEFI hosts, access denied).
#[must_use]
pub fn evaluate(facts: &FactSet) -> CheckOutcome {
    if let Some(&enabled) = facts.secure_boot.known() {
        let status = if enabled {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        };
        return CheckOutcome::new(
            CheckName::SecureBoot,
            status,
            &format!("Enabled={enabled}"),
            Some(enabled.to_string()),
        );
    }

    match facts.secure_boot_record.known() {
        Some(&enabled) => {
            let status = if enabled {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            };
            let state = if enabled { "enabled" } else { "disabled" };
            CheckOutcome::new(
                CheckName::SecureBoot,
                status,
                &format!("FirmwareRecord={state}"),
                Some(state.to_string()),
            )
        },
        None => CheckOutcome::new(
            CheckName::SecureBoot,
            CheckStatus::Undetermined,
            "Enabled=unknown",
            None,
        ),
    }
}
