//! Orchestration: one strictly sequential invocation of the checker.
//!
//! Order per invocation: flush the queue → run-once gate → fact
//! collection → check suite → exemption → aggregation → run record →
//! delivery → marker write. Everything is single-threaded; I/O blocks.

use chrono::Utc;
use tracing::{info, warn};

use readycheck_facts::{Fact, FactSource};

use crate::checks;
use crate::config::CheckerConfig;
use crate::delivery::{DeliveryLayer, DeliveryStatus, FlushSummary, RemoteSink};
use crate::error::ReadinessError;
use crate::exemption;
use crate::gate::RunOnceGate;
use crate::record::RunRecord;
use crate::verdict::{self, Verdict};

/// Which path an invocation took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The marker already existed; no facts were collected and no record
    /// was produced.
    AlreadyCompleted,
    /// The host OS build already meets the target; evaluation was
    /// skipped and the marker written without a record.
    Bypassed {
        /// The observed OS build number.
        os_build: u32,
    },
    /// A full evaluation ran and produced a record.
    Evaluated {
        /// The aggregated verdict.
        verdict: Verdict,
        /// Comma-joined failed/undetermined check names.
        reason: String,
        /// Whether the record reached the destination or was queued.
        delivery: DeliveryStatus,
        /// The produced record.
        record: RunRecord,
    },
    /// Fact collection failed before any check could run. No marker was
    /// written; the next invocation retries from scratch.
    FailedToRun {
        /// The collection error, as text.
        message: String,
        /// Whether the diagnostic record reached the destination.
        delivery: DeliveryStatus,
    },
}

/// Result of one invocation: the flush pass that always runs, plus the
/// path taken afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Outcome of the queue flush performed at the start.
    pub flush: FlushSummary,
    /// The path this invocation took.
    pub outcome: RunOutcome,
}

/// The readiness engine, generic over the fact source and remote sink
/// so tests can inject both.
pub struct ReadinessEngine<F: FactSource, S: RemoteSink> {
    config: CheckerConfig,
    source: F,
    gate: RunOnceGate,
    delivery: DeliveryLayer<S>,
}

impl<F: FactSource, S: RemoteSink> ReadinessEngine<F, S> {
    /// Assemble an engine from its collaborators.
    #[must_use]
    pub fn new(config: CheckerConfig, source: F, sink: S) -> Self {
        let gate = RunOnceGate::new(config.marker_path.clone());
        let delivery = DeliveryLayer::new(config.queue_dir.clone(), sink);
        Self {
            config,
            source,
            gate,
            delivery,
        }
    }

    /// Run one invocation end to end.
    ///
    /// # Errors
    ///
    /// Returns an error only for faults that leave the run incomplete
    /// and retryable in an unexpected way (marker unwritable, record
    /// neither deliverable nor queueable). Fact-collection failure is
    /// not an error here; it is the FAILED_TO_RUN outcome.
    pub fn run(&self) -> Result<RunSummary, ReadinessError> {
        // Flush first, on every invocation, whether or not this run
        // produces a new record.
        let flush = self.delivery.flush();

        if self.gate.is_completed() {
            info!("run-once marker present, skipping evaluation");
            return Ok(RunSummary {
                flush,
                outcome: RunOutcome::AlreadyCompleted,
            });
        }

        let facts = match self.source.collect() {
            Ok(facts) => facts,
            Err(err) => {
                warn!(error = %err, "fact collection failed, reporting FAILED_TO_RUN");
                let record = RunRecord::failed_to_run(
                    &readycheck_facts::hostname(),
                    Utc::now(),
                    &err.to_string(),
                );
                let delivery = self.delivery.deliver(&record)?;
                // No marker: evaluation never happened, retry next time.
                return Ok(RunSummary {
                    flush,
                    outcome: RunOutcome::FailedToRun {
                        message: err.to_string(),
                        delivery,
                    },
                });
            },
        };

        if let Fact::Known(os_build) = facts.os_build {
            if os_build >= self.config.target_os_build {
                info!(os_build, "host already at target build, bypassing evaluation");
                self.gate.record_bypass(os_build)?;
                return Ok(RunSummary {
                    flush,
                    outcome: RunOutcome::Bypassed { os_build },
                });
            }
        }

        let outcomes: Vec<_> = checks::run_all(&facts, &self.config)
            .into_iter()
            .map(|outcome| exemption::apply(outcome, &facts))
            .collect();

        let aggregated = verdict::aggregate(&outcomes);
        let record = RunRecord::new(&facts.hostname, Utc::now(), &aggregated, &outcomes);

        info!(
            verdict = record.verdict_code,
            reason = %record.reason,
            "evaluation complete"
        );

        let delivery = self.delivery.deliver(&record)?;
        self.gate.record_completion(&record)?;

        Ok(RunSummary {
            flush,
            outcome: RunOutcome::Evaluated {
                verdict: aggregated.verdict,
                reason: aggregated.reason,
                delivery,
                record,
            },
        })
    }

    /// Flush the queue without evaluating. Used by the `flush`
    /// subcommand.
    #[must_use]
    pub fn flush_only(&self) -> FlushSummary {
        self.delivery.flush()
    }

    /// Evaluate without side effects: no marker, no queue, no delivery.
    /// Used by the `evaluate` dry-run subcommand.
    ///
    /// # Errors
    ///
    /// Returns the fact-collection error when collection fails.
    pub fn evaluate_only(&self) -> Result<RunRecord, ReadinessError> {
        let facts = self.source.collect()?;
        let outcomes: Vec<_> = checks::run_all(&facts, &self.config)
            .into_iter()
            .map(|outcome| exemption::apply(outcome, &facts))
            .collect();
        let aggregated = verdict::aggregate(&outcomes);
        Ok(RunRecord::new(
            &facts.hostname,
            Utc::now(),
            &aggregated,
            &outcomes,
        ))
    }
}
