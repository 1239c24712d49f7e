//! # readycheck-facts
//!
//! Raw hardware/firmware fact collection for readycheck.
//!
//! This crate is pure data gathering: it reads host attributes (disk
//! capacity, memory, TPM, CPU, secure-boot state, OEM identity, OS build)
//! and reports each one as either a known value or an explicit unknown.
//! No eligibility policy lives here; the check suite in `readycheck-core`
//! consumes the [`FactSet`] produced by a [`FactSource`].
//!
//! Every fact read distinguishes "value read successfully" from "value
//! unreadable". An unreadable fact is surfaced as [`Fact::Unknown`], never
//! as a default numeric value.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod platform;
pub mod source;
pub mod types;

pub use error::FactError;
pub use source::{hostname, FactSource, HostFacts, StaticFacts};
pub use types::{CpuIdentity, CpuInfo, Fact, FactSet, OemIdentity, TpmInfo};
