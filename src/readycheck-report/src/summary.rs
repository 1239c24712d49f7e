//! Aggregation of run record files into a fleet summary.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use readycheck_core::{RunRecord, Verdict};

/// Canonical record filename: `HOST-YYYYMMDDTHHMMSS`.
fn record_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9-]+-\d{8}T\d{6}$").expect("static regex"))
}

/// One device's latest record, as it appears in the summary.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRow {
    /// Device hostname.
    pub hostname: String,
    /// Record timestamp (RFC 3339).
    pub timestamp: String,
    /// Verdict code.
    pub verdict_code: i32,
    /// Verdict label.
    pub verdict_label: String,
    /// Failed/undetermined check names.
    pub reason: String,
}

/// Fleet-wide aggregation over a destination directory.
#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary {
    /// Records parsed.
    pub total_records: usize,
    /// Files skipped (non-record names or malformed content).
    pub skipped: usize,
    /// Record count per verdict label, stable order.
    pub by_verdict: BTreeMap<String, usize>,
    /// One row per logical record, sorted by hostname then timestamp.
    pub devices: Vec<DeviceRow>,
}

impl FleetSummary {
    /// Scan a destination directory and aggregate every run record in it.
    ///
    /// Files whose names do not match the canonical record pattern, or
    /// whose content fails to parse, are skipped with a warning; one bad
    /// file never aborts the report. The same hostname+timestamp can only
    /// occur once (it is a single file), so re-delivered records count
    /// once.
    ///
    /// # Errors
    ///
    /// Fails only when the directory itself cannot be walked.
    pub fn scan(dir: &Path) -> anyhow::Result<Self> {
        let mut summary = Self {
            total_records: 0,
            skipped: 0,
            by_verdict: BTreeMap::new(),
            devices: Vec::new(),
        };

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                summary.skipped += 1;
                continue;
            };
            if !record_name_regex().is_match(name) {
                debug!(name, "skipping non-record file");
                summary.skipped += 1;
                continue;
            }

            match read_record(entry.path()) {
                Ok(record) => summary.push(&record),
                Err(err) => {
                    warn!(name, error = %err, "skipping malformed record");
                    summary.skipped += 1;
                },
            }
        }

        summary
            .devices
            .sort_by(|a, b| (&a.hostname, &a.timestamp).cmp(&(&b.hostname, &b.timestamp)));
        Ok(summary)
    }

    fn push(&mut self, record: &RunRecord) {
        self.total_records += 1;
        let label = record
            .verdict()
            .map_or_else(|| format!("UNKNOWN({})", record.verdict_code), |v| {
                v.label().to_string()
            });
        *self.by_verdict.entry(label).or_insert(0) += 1;
        self.devices.push(DeviceRow {
            hostname: record.hostname.clone(),
            timestamp: record.timestamp.to_rfc3339(),
            verdict_code: record.verdict_code,
            verdict_label: record.verdict_label.clone(),
            reason: record.reason.clone(),
        });
    }

    /// Count for one verdict, zero when absent.
    #[must_use]
    pub fn count(&self, verdict: Verdict) -> usize {
        self.by_verdict.get(verdict.label()).copied().unwrap_or(0)
    }

    /// Render the text summary.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "records: {} (skipped {})\n",
            self.total_records, self.skipped
        ));
        for (label, count) in &self.by_verdict {
            out.push_str(&format!("  {label}: {count}\n"));
        }
        for row in &self.devices {
            out.push_str(&format!(
                "{} {} {} ({}){}\n",
                row.hostname,
                row.timestamp,
                row.verdict_code,
                row.verdict_label,
                if row.reason.is_empty() {
                    String::new()
                } else {
                    format!(" reason: {}", row.reason)
                }
            ));
        }
        out
    }

    /// Render rows as CSV.
    ///
    /// # Errors
    ///
    /// Fails when a row cannot be encoded.
    pub fn to_csv(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.devices {
            writer.serialize(row).context("encoding csv row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("finishing csv output: {err}"))?;
        String::from_utf8(bytes).context("csv output was not utf-8")
    }
}

fn read_record(path: &Path) -> anyhow::Result<RunRecord> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(RunRecord::from_json(&bytes)?)
}
