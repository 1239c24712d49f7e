//! Exemption policy: narrow, hard-coded overrides for one borderline
//! CPU model.
//!
//! This is a closed, static table — not an extensibility point. It is
//! consulted only when the Processor check fails, and only the devices
//! on the matching allow-list get the FAIL upgraded to PASS. Every other
//! check outcome passes through untouched.

use readycheck_facts::FactSet;
use tracing::info;

use crate::checks::{CheckName, CheckOutcome, CheckStatus};

/// One exemption rule: a restricted CPU model and the OEM/model device
/// identities permitted to carry it.
struct ExemptionRule {
    /// Substring identifying the restricted CPU in its model caption.
    cpu_caption: &'static str,
    /// Device identities ("manufacturer model") allowed to carry it.
    permitted_devices: &'static [&'static str],
}

/// The complete exemption table.
const EXEMPTIONS: &[ExemptionRule] = &[ExemptionRule {
    cpu_caption: "i7-7820HQ",
    permitted_devices: &[
        "Microsoft Corporation Surface Studio 2",
        "Dell Inc. Precision 5520",
    ],
}];

/// Apply the exemption policy to a processor outcome.
///
/// Upgrades FAIL to PASS when the CPU matches a restricted model whose
/// allow-list contains this device's OEM/model identity, annotating the
/// trail fragment with the override. Any other outcome — including
/// non-processor outcomes passed in by mistake — is returned unchanged.
#[must_use]
pub fn apply(outcome: CheckOutcome, facts: &FactSet) -> CheckOutcome {
    if outcome.name != CheckName::Processor || outcome.status != CheckStatus::Fail {
        return outcome;
    }

    let Some(cpu) = facts.cpu.known() else {
        return outcome;
    };
    let Some(oem) = facts.oem.known() else {
        return outcome;
    };

    let identity = oem.identity();
    let exempted = EXEMPTIONS.iter().any(|rule| {
        cpu.caption.contains(rule.cpu_caption)
            && rule
                .permitted_devices
                .iter()
                .any(|device| device.eq_ignore_ascii_case(&identity))
    });

    if !exempted {
        return outcome;
    }

    info!(
        cpu = %cpu.caption,
        device = %identity,
        "processor exemption applied"
    );

    CheckOutcome {
        status: CheckStatus::Pass,
        trail: format!(
            "{}. PASS (exemption: approved device {identity})",
            outcome
                .trail
                .strip_suffix(". FAIL")
                .unwrap_or(&outcome.trail)
        ),
        ..outcome
    }
}
