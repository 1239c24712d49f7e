//! # readycheck-core
//!
//! Verdict engine and delivery-resilience layer for readycheck.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   ReadinessEngine                           │
//! │                                                             │
//! │  ┌────────────┐   ┌─────────────┐   ┌──────────────────┐   │
//! │  │ RunOnceGate │  │  FactSource │   │  DeliveryLayer   │   │
//! │  │  (marker)   │  │ (host facts)│   │ (queue + flush)  │   │
//! │  └────────────┘   └─────────────┘   └──────────────────┘   │
//! │                          │                                  │
//! │                          ▼                                  │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │                  Check Suite                          │  │
//! │  │  Storage → Memory → TPM → Processor → SecureBoot      │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                          │                                  │
//! │                          ▼                                  │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │          Exemption Policy (processor only)            │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                          │                                  │
//! │                          ▼                                  │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │       Verdict Aggregator → RunRecord → delivery       │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Deterministic verdicts**: checks run in a fixed order and the
//!   aggregation precedence is explicit (FAIL beats UNDETERMINED).
//! - **Once per device**: a marker file records that evaluation happened;
//!   later invocations short-circuit before any fact collection.
//! - **Eventual delivery**: records that cannot reach the destination are
//!   queued locally and flushed on every later invocation; filenames make
//!   re-delivery idempotent.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod checks;
pub mod config;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod exemption;
pub mod gate;
pub mod record;
pub mod verdict;

pub use checks::{CheckName, CheckOutcome, CheckStatus};
pub use config::CheckerConfig;
pub use delivery::{DeliveryLayer, DeliveryStatus, DirectorySink, FlushSummary, RemoteSink};
pub use engine::{ReadinessEngine, RunOutcome, RunSummary};
pub use error::ReadinessError;
pub use gate::{GateState, RunOnceGate};
pub use record::{CheckResult, RunRecord};
pub use verdict::{aggregate, Aggregated, Verdict};
