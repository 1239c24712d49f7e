//! Storage check: OS-disk capacity.

use readycheck_facts::FactSet;

use super::{CheckName, CheckOutcome, CheckStatus};
use crate::config::{CheckerConfig, GIB};

/// PASS iff the OS-disk capacity meets the configured minimum.
#[must_use]
pub fn evaluate(facts: &FactSet, config: &CheckerConfig) -> CheckOutcome {
    match facts.os_disk_bytes.known() {
        Some(&bytes) => {
            let gb = bytes / GIB;
            let status = if bytes >= config.min_storage_gb * GIB {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            };
            CheckOutcome::new(
                CheckName::Storage,
                status,
                &format!("OSDiskSize={gb}GB"),
                Some(gb.to_string()),
            )
        },
        None => CheckOutcome::new(
            CheckName::Storage,
            CheckStatus::Undetermined,
            "OSDiskSize=unknown",
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::tests::capable_facts;
    use readycheck_facts::Fact;

    #[test]
    fn large_disk_passes() {
        let outcome = evaluate(&capable_facts(), &CheckerConfig::default());
        assert_eq!(outcome.status, CheckStatus::Pass);
        assert_eq!(outcome.trail, "Storage: OSDiskSize=120GB. PASS");
    }

    #[test]
    fn small_disk_fails() {
        let mut facts = capable_facts();
        facts.os_disk_bytes = Fact::Known(32 * GIB);
        let outcome = evaluate(&facts, &CheckerConfig::default());
        assert_eq!(outcome.status, CheckStatus::Fail);
        assert_eq!(outcome.trail, "Storage: OSDiskSize=32GB. FAIL");
    }

    #[test]
    fn boundary_is_inclusive() {
        let mut facts = capable_facts();
        facts.os_disk_bytes = Fact::Known(64 * GIB);
        assert_eq!(
            evaluate(&facts, &CheckerConfig::default()).status,
            CheckStatus::Pass
        );

        facts.os_disk_bytes = Fact::Known(64 * GIB - 1);
        assert_eq!(
            evaluate(&facts, &CheckerConfig::default()).status,
            CheckStatus::Fail
        );
    }

    #[test]
    fn unreadable_disk_is_undetermined() {
        let mut facts = capable_facts();
        facts.os_disk_bytes = Fact::Unknown;
        let outcome = evaluate(&facts, &CheckerConfig::default());
        assert_eq!(outcome.status, CheckStatus::Undetermined);
        assert_eq!(outcome.trail, "Storage: OSDiskSize=unknown. UNDETERMINED");
        assert!(outcome.observed.is_none());
    }
}
