//! The run record: the immutable unit of delivery.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::checks::{CheckName, CheckOutcome, CheckStatus};
use crate::error::ReadinessError;
use crate::verdict::{Aggregated, Verdict};

/// Structured result of one check inside a run record.
///
/// Carried alongside the human-readable trail so downstream tooling does
/// not have to regex-parse values back out of the trail text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name.
    pub name: CheckName,
    /// Tri-state status.
    pub status: CheckStatus,
    /// Raw observed value(s), when readable.
    pub observed: Option<String>,
}

/// One run's diagnostic record, immutable after creation.
///
/// Identified by [`RunRecord::file_name`]; re-delivering a record under
/// the same name overwrites rather than duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Device hostname.
    pub hostname: String,
    /// UTC timestamp of the run.
    pub timestamp: DateTime<Utc>,
    /// Integer verdict code (0, 1, -1, -2).
    pub verdict_code: i32,
    /// Verdict label string.
    pub verdict_label: String,
    /// Comma-joined failed/undetermined check names; empty when capable.
    pub reason: String,
    /// Full per-check trail, fragments joined with "; ".
    pub trail: String,
    /// Structured per-check results, in evaluation order.
    pub checks: Vec<CheckResult>,
}

impl RunRecord {
    /// Build a record from an aggregated verdict and its check outcomes.
    #[must_use]
    pub fn new(
        hostname: &str,
        timestamp: DateTime<Utc>,
        aggregated: &Aggregated,
        outcomes: &[CheckOutcome],
    ) -> Self {
        let trail = outcomes
            .iter()
            .map(|o| format!("{}; ", o.trail))
            .collect::<String>();
        let checks = outcomes
            .iter()
            .map(|o| CheckResult {
                name: o.name,
                status: o.status,
                observed: o.observed.clone(),
            })
            .collect();
        Self {
            hostname: hostname.to_string(),
            timestamp,
            verdict_code: aggregated.verdict.code(),
            verdict_label: aggregated.verdict.label().to_string(),
            reason: aggregated.reason.clone(),
            trail,
            checks,
        }
    }

    /// Build a FAILED_TO_RUN record for a pre-evaluation error.
    #[must_use]
    pub fn failed_to_run(hostname: &str, timestamp: DateTime<Utc>, message: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            timestamp,
            verdict_code: Verdict::FailedToRun.code(),
            verdict_label: Verdict::FailedToRun.label().to_string(),
            reason: message.to_string(),
            trail: String::new(),
            checks: Vec::new(),
        }
    }

    /// The verdict, decoded from the stored code.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        Verdict::from_code(self.verdict_code)
    }

    /// Canonical delivery filename: `HOST-YYYYMMDDTHHMMSS`.
    ///
    /// The hostname+timestamp identity makes delivery idempotent: the
    /// same record always maps to the same remote name.
    #[must_use]
    pub fn file_name(&self) -> String {
        let host: String = self
            .hostname
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        format!("{host}-{}", self.timestamp.format("%Y%m%dT%H%M%S"))
    }

    /// Serialize to the JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>, ReadinessError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Parse a record from its JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::Serialization`] on malformed input.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ReadinessError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Short human-readable summary line for logs and CLI output.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} {} verdict={} ({}) reason={:?}",
            self.hostname,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.verdict_code,
            self.verdict_label,
            self.reason
        )
    }
}
