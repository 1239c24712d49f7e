//! Verdict aggregation: one deterministic result from five outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checks::{CheckOutcome, CheckStatus};

/// Final verdict for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Every check passed.
    Capable,
    /// At least one check confirmed a failure.
    NotCapable,
    /// No failures, but at least one check could not decide.
    Undetermined,
    /// Evaluation itself failed before any outcome set was produced.
    FailedToRun,
}

impl Verdict {
    /// Integer verdict code written to run records.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Capable => 0,
            Self::NotCapable => 1,
            Self::Undetermined => -1,
            Self::FailedToRun => -2,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Capable => "CAPABLE",
            Self::NotCapable => "NOT CAPABLE",
            Self::Undetermined => "UNDETERMINED",
            Self::FailedToRun => "FAILED TO RUN",
        }
    }

    /// Verdict from a stored code, for record readers.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Capable),
            1 => Some(Self::NotCapable),
            -1 => Some(Self::Undetermined),
            -2 => Some(Self::FailedToRun),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregated verdict plus the reason string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregated {
    /// The combined verdict.
    pub verdict: Verdict,
    /// Comma-joined names of failed or undetermined checks, in
    /// evaluation order. Empty when capable.
    pub reason: String,
}

/// Combine post-exemption check outcomes into a single verdict.
///
/// Precedence: any FAIL wins over any number of UNDETERMINED outcomes —
/// a confirmed failure is always reported over an unknown. Only a set
/// with no failures and at least one unknown aggregates to UNDETERMINED.
/// FAILED_TO_RUN is never produced here; it is reserved for the
/// pre-evaluation error path in the engine.
#[must_use]
pub fn aggregate(outcomes: &[CheckOutcome]) -> Aggregated {
    let any_fail = outcomes.iter().any(|o| o.status == CheckStatus::Fail);
    let any_undetermined = outcomes
        .iter()
        .any(|o| o.status == CheckStatus::Undetermined);

    let verdict = if any_fail {
        Verdict::NotCapable
    } else if any_undetermined {
        Verdict::Undetermined
    } else {
        Verdict::Capable
    };

    let reason = if verdict == Verdict::Capable {
        String::new()
    } else {
        outcomes
            .iter()
            .filter(|o| o.status != CheckStatus::Pass)
            .map(|o| o.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    Aggregated { verdict, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckName;

    fn outcome(name: CheckName, status: CheckStatus) -> CheckOutcome {
        CheckOutcome::new(name, status, "x=y", None)
    }

    fn suite(statuses: [CheckStatus; 5]) -> Vec<CheckOutcome> {
        let names = [
            CheckName::Storage,
            CheckName::Memory,
            CheckName::Tpm,
            CheckName::Processor,
            CheckName::SecureBoot,
        ];
        names
            .into_iter()
            .zip(statuses)
            .map(|(name, status)| outcome(name, status))
            .collect()
    }

    #[test]
    fn all_pass_is_capable_with_empty_reason() {
        let aggregated = aggregate(&suite([CheckStatus::Pass; 5]));
        assert_eq!(aggregated.verdict, Verdict::Capable);
        assert!(aggregated.reason.is_empty());
    }

    #[test]
    fn single_fail_is_not_capable() {
        let aggregated = aggregate(&suite([
            CheckStatus::Fail,
            CheckStatus::Pass,
            CheckStatus::Pass,
            CheckStatus::Pass,
            CheckStatus::Pass,
        ]));
        assert_eq!(aggregated.verdict, Verdict::NotCapable);
        assert_eq!(aggregated.reason, "Storage");
    }

    #[test]
    fn fail_beats_undetermined() {
        let aggregated = aggregate(&suite([
            CheckStatus::Undetermined,
            CheckStatus::Undetermined,
            CheckStatus::Fail,
            CheckStatus::Undetermined,
            CheckStatus::Undetermined,
        ]));
        assert_eq!(aggregated.verdict, Verdict::NotCapable);
        assert_eq!(aggregated.reason, "Storage, Memory, TPM, Processor, SecureBoot");
    }

    #[test]
    fn undetermined_without_fail_is_undetermined() {
        let aggregated = aggregate(&suite([
            CheckStatus::Pass,
            CheckStatus::Pass,
            CheckStatus::Undetermined,
            CheckStatus::Pass,
            CheckStatus::Pass,
        ]));
        assert_eq!(aggregated.verdict, Verdict::Undetermined);
        assert_eq!(aggregated.reason, "TPM");
    }

    #[test]
    fn reason_preserves_evaluation_order() {
        let aggregated = aggregate(&suite([
            CheckStatus::Fail,
            CheckStatus::Pass,
            CheckStatus::Undetermined,
            CheckStatus::Fail,
            CheckStatus::Pass,
        ]));
        assert_eq!(aggregated.reason, "Storage, TPM, Processor");
    }

    #[test]
    fn verdict_codes_are_stable() {
        assert_eq!(Verdict::Capable.code(), 0);
        assert_eq!(Verdict::NotCapable.code(), 1);
        assert_eq!(Verdict::Undetermined.code(), -1);
        assert_eq!(Verdict::FailedToRun.code(), -2);
        for verdict in [
            Verdict::Capable,
            Verdict::NotCapable,
            Verdict::Undetermined,
            Verdict::FailedToRun,
        ] {
            assert_eq!(Verdict::from_code(verdict.code()), Some(verdict));
        }
        assert_eq!(Verdict::from_code(7), None);
    }
}
