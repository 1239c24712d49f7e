//! Memory check: total physical memory.

use readycheck_facts::FactSet;

use super::{CheckName, CheckOutcome, CheckStatus};
use crate::config::{CheckerConfig, GIB};

/// PASS iff total memory meets the configured minimum.
#[must_use]
pub fn evaluate(facts: &FactSet, config: &CheckerConfig) -> CheckOutcome {
    match facts.total_memory_bytes.known() {
        Some(&bytes) => {
            let gb = bytes / GIB;
            let status = if bytes >= config.min_memory_gb * GIB {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            };
            CheckOutcome::new(
                CheckName::Memory,
                status,
                &format!("SystemMemory={gb}GB"),
                Some(gb.to_string()),
            )
        },
        None => CheckOutcome::new(
            CheckName::Memory,
            CheckStatus::Undetermined,
            "SystemMemory=unknown",
            None,
        ),
    }
}
