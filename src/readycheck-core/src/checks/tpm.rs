//! TPM check: presence and spec version.

use readycheck_facts::FactSet;

use super::{CheckName, CheckOutcome, CheckStatus};
use crate::config::CheckerConfig;

/// PASS iff a TPM is present and its spec version meets the configured
/// minimum major version.
///
/// Unknown presence yields UNDETERMINED, as does a present device whose
/// version string cannot be parsed; an absent device or an old version
/// is a confirmed FAIL.
#[must_use]
pub fn evaluate(facts: &FactSet, config: &CheckerConfig) -> CheckOutcome {
    let Some(tpm) = facts.tpm.known() else {
        return CheckOutcome::new(
            CheckName::Tpm,
            CheckStatus::Undetermined,
            "TPMVersion=unknown",
            None,
        );
    };

    if !tpm.present {
        return CheckOutcome::new(CheckName::Tpm, CheckStatus::Fail, "TPMVersion=none", None);
    }

    match tpm.major_version() {
        Some(major) if major >= config.min_tpm_major => CheckOutcome::new(
            CheckName::Tpm,
            CheckStatus::Pass,
            &format!("TPMVersion={}", tpm.spec_version),
            Some(tpm.spec_version.clone()),
        ),
        Some(_) => CheckOutcome::new(
            CheckName::Tpm,
            CheckStatus::Fail,
            &format!("TPMVersion={}", tpm.spec_version),
            Some(tpm.spec_version.clone()),
        ),
        None => CheckOutcome::new(
            CheckName::Tpm,
            CheckStatus::Undetermined,
            "TPMVersion=unreadable",
            None,
        ),
    }
}
