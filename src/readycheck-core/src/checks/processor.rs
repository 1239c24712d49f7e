//! Processor check: capability minimums plus the approved family/model
//! table.
//!
//! The approved table is closed, static data: Intel Core generation 8 or
//! later, AMD Ryzen 2000-series or later, and 64-bit Qualcomm parts. The
//! one borderline Intel model (i7-7820HQ) stays unapproved here; the
//! exemption policy upgrades it for allow-listed devices only.

use std::sync::OnceLock;

use readycheck_facts::{CpuInfo, FactSet};
use regex::Regex;

use super::{CheckName, CheckOutcome, CheckStatus};
use crate::config::CheckerConfig;

fn intel_model_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[iI][3579]-(\d{4,5})").expect("static regex"))
}

fn ryzen_series_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Ryzen\s+\d+\s+\w*?(\d{4})").expect("static regex"))
}

/// Whether the CPU family/model is on the approved list.
fn family_approved(cpu: &CpuInfo) -> bool {
    let manufacturer = cpu.manufacturer.as_str();
    let caption = cpu.caption.as_str();

    if manufacturer.contains("GenuineIntel") || caption.contains("Intel") {
        return intel_generation(caption).is_some_and(|generation| generation >= 8);
    }

    if manufacturer.contains("AuthenticAMD") || caption.contains("AMD") {
        return ryzen_series_regex()
            .captures(caption)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .is_some_and(|series| series >= 2000);
    }

    if manufacturer.contains("Qualcomm") || caption.contains("Snapdragon") {
        return cpu.address_width == 64;
    }

    false
}

/// Intel Core generation parsed from the model caption: the leading one
/// or two digits of the four-or-five-digit model number.
///
/// First-generation Core models were three digits, so a four-digit
/// model starting with "10" is a 10th-generation part (i5-1035G1), not
/// generation 1.
fn intel_generation(caption: &str) -> Option<u32> {
    let model = intel_model_regex().captures(caption)?;
    let digits = &model[1];
    let generation_digits = if digits.len() == 5 || digits.starts_with("10") {
        &digits[..2]
    } else {
        &digits[..1]
    };
    generation_digits.parse().ok()
}

/// PASS iff the CPU is 64-bit, meets the clock and core minimums, and is
/// on the approved family/model list.
#[must_use]
pub fn evaluate(facts: &FactSet, config: &CheckerConfig) -> CheckOutcome {
    let Some(cpu) = facts.cpu.known() else {
        return CheckOutcome::new(
            CheckName::Processor,
            CheckStatus::Undetermined,
            "Cpu=unknown",
            None,
        );
    };

    // Zero clock or core count means the platform reported nothing
    // useful for a required field.
    if cpu.clock_mhz == 0 || cpu.logical_cores == 0 {
        return CheckOutcome::new(
            CheckName::Processor,
            CheckStatus::Undetermined,
            &format!("{{Model={}; required fields unreadable}}", cpu.caption),
            Some(cpu.caption.clone()),
        );
    }

    let capable = cpu.address_width == 64
        && cpu.clock_mhz >= config.min_clock_mhz
        && cpu.logical_cores >= config.min_logical_cores
        && family_approved(cpu);

    let status = if capable {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };

    CheckOutcome::new(
        CheckName::Processor,
        status,
        &format!(
            "{{AddressWidth={}; ClockMHz={}; LogicalCores={}; Model={}}}",
            cpu.address_width, cpu.clock_mhz, cpu.logical_cores, cpu.caption
        ),
        Some(cpu.caption.clone()),
    )
}
