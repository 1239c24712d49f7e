//! The check suite: five independent eligibility predicates.
//!
//! Each check is a pure function from a [`FactSet`] (plus thresholds) to
//! a [`CheckOutcome`]. Checks never abort one another; an unreadable
//! input yields UNDETERMINED for that check only. Evaluation order is
//! fixed — Storage, Memory, TPM, Processor, SecureBoot — because trail
//! fragment ordering is part of the observable record format.

pub mod memory;
pub mod processor;
pub mod secure_boot;
pub mod storage;
pub mod tpm;

use std::fmt;

use readycheck_facts::FactSet;
use serde::{Deserialize, Serialize};

use crate::config::CheckerConfig;

/// Outcome status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    /// The requirement is met.
    Pass,
    /// The requirement is confirmed unmet.
    Fail,
    /// The inputs could not be read; no claim either way.
    Undetermined,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Undetermined => "UNDETERMINED",
        };
        f.write_str(token)
    }
}

/// Identity of a check, in fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckName {
    /// OS-disk capacity.
    Storage,
    /// Total physical memory.
    Memory,
    /// TPM presence and spec version.
    #[serde(rename = "TPM")]
    Tpm,
    /// CPU capability and approved family/model.
    Processor,
    /// Secure-boot state.
    SecureBoot,
}

impl CheckName {
    /// Display name used in trail fragments and reason strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "Storage",
            Self::Memory => "Memory",
            Self::Tpm => "TPM",
            Self::Processor => "Processor",
            Self::SecureBoot => "SecureBoot",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one check: status plus a human-readable trail fragment and
/// the observed value, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Which check produced this outcome.
    pub name: CheckName,
    /// The tri-state status.
    pub status: CheckStatus,
    /// The raw value(s) the check observed, when readable.
    pub observed: Option<String>,
    /// Trail fragment: `<CheckName>: <key>=<value>[<unit>]. <STATUS>`.
    pub trail: String,
}

impl CheckOutcome {
    /// Build an outcome, deriving the trail fragment from the detail
    /// text in the canonical format.
    #[must_use]
    pub fn new(
        name: CheckName,
        status: CheckStatus,
        detail: &str,
        observed: Option<String>,
    ) -> Self {
        Self {
            name,
            status,
            observed,
            trail: format!("{name}: {detail}. {status}"),
        }
    }
}

/// Evaluate all five checks in fixed order.
///
/// The exemption policy has not been applied yet; the engine applies it
/// to the processor outcome before aggregation.
#[must_use]
pub fn run_all(facts: &FactSet, config: &CheckerConfig) -> Vec<CheckOutcome> {
    vec![
        storage::evaluate(facts, config),
        memory::evaluate(facts, config),
        tpm::evaluate(facts, config),
        processor::evaluate(facts, config),
        secure_boot::evaluate(facts),
    ]
}
