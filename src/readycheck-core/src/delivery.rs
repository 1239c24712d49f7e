//! Delivery layer: direct write with a durable local queue fallback.
//!
//! A failed remote write is the designed degraded path, not an error:
//! the record is persisted into the queue directory and retried on every
//! later invocation. Queue entries are self-contained files deleted only
//! after their remote write is confirmed, so a crash mid-flush loses
//! nothing and redelivers at most a record whose filename makes the
//! overwrite idempotent.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::ReadinessError;
use crate::record::RunRecord;

/// Result of a delivery attempt. Both variants are success from the
/// caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// The record reached the remote destination.
    Delivered,
    /// The destination was unreachable; the record is queued locally.
    Queued,
}

/// Outcome of a queue flush pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Entries delivered and removed from the queue.
    pub delivered: usize,
    /// Entries that failed again and remain queued.
    pub remaining: usize,
}

/// The remote destination boundary: the only required operation is
/// "write named file". The checker never reads back from the
/// destination.
pub trait RemoteSink {
    /// Write `contents` under `name` at the destination, overwriting any
    /// existing file of that name.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::Remote`] on any I/O failure; the
    /// delivery layer downgrades it to a queued record.
    fn write(&self, name: &str, contents: &[u8]) -> Result<(), ReadinessError>;
}

/// Remote sink backed by a base directory (e.g. mounted shared storage).
#[derive(Debug, Clone)]
pub struct DirectorySink {
    base: PathBuf,
}

impl DirectorySink {
    /// Bind a sink to its destination base directory.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl RemoteSink for DirectorySink {
    fn write(&self, name: &str, contents: &[u8]) -> Result<(), ReadinessError> {
        let remote_error = |err: std::io::Error| ReadinessError::Remote {
            name: name.to_string(),
            message: err.to_string(),
        };
        fs::create_dir_all(&self.base).map_err(remote_error)?;
        fs::write(self.base.join(name), contents).map_err(remote_error)
    }
}

/// Delivery layer: flush-then-deliver against an explicit queue
/// directory and remote sink.
#[derive(Debug)]
pub struct DeliveryLayer<S: RemoteSink> {
    queue_dir: PathBuf,
    sink: S,
}

impl<S: RemoteSink> DeliveryLayer<S> {
    /// Bind the layer to its queue directory and remote sink.
    #[must_use]
    pub fn new(queue_dir: impl Into<PathBuf>, sink: S) -> Self {
        Self {
            queue_dir: queue_dir.into(),
            sink,
        }
    }

    /// Deliver a run record: direct write first, queue on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ReadinessError::Queue`] only when the record can
    /// neither be delivered nor queued — both the destination and local
    /// durable storage are unavailable.
    pub fn deliver(&self, record: &RunRecord) -> Result<DeliveryStatus, ReadinessError> {
        let name = record.file_name();
        let contents = record.to_json()?;

        match self.sink.write(&name, &contents) {
            Ok(()) => {
                info!(name = %name, "record delivered");
                Ok(DeliveryStatus::Delivered)
            },
            Err(err) => {
                warn!(name = %name, error = %err, "remote write failed, queueing");
                self.enqueue(&name, &contents)?;
                Ok(DeliveryStatus::Queued)
            },
        }
    }

    /// Flush the queue: attempt every entry, oldest name first, deleting
    /// each local copy only after its remote write succeeds.
    ///
    /// Per-entry failures are contained; entries that still fail remain
    /// queued for the next invocation in their original order, with no
    /// backoff. A missing or unreadable queue directory is an empty
    /// queue, not an error.
    #[must_use]
    pub fn flush(&self) -> FlushSummary {
        let mut summary = FlushSummary::default();

        for (name, path) in self.queued_entries() {
            let contents = match fs::read(&path) {
                Ok(contents) => contents,
                Err(err) => {
                    warn!(entry = %path.display(), error = %err, "queue entry unreadable, leaving in place");
                    summary.remaining += 1;
                    continue;
                },
            };

            match self.sink.write(&name, &contents) {
                Ok(()) => match fs::remove_file(&path) {
                    Ok(()) => {
                        debug!(name = %name, "queued record delivered");
                        summary.delivered += 1;
                    },
                    Err(err) => {
                        // Delivered but not dequeued: the next flush
                        // redelivers under the same name, which the
                        // destination treats as an overwrite.
                        warn!(entry = %path.display(), error = %err, "delivered but could not dequeue");
                        summary.remaining += 1;
                    },
                },
                Err(err) => {
                    debug!(name = %name, error = %err, "queued record still undeliverable");
                    summary.remaining += 1;
                },
            }
        }

        if summary.delivered > 0 || summary.remaining > 0 {
            info!(
                delivered = summary.delivered,
                remaining = summary.remaining,
                "queue flush finished"
            );
        }
        summary
    }

    /// Number of entries currently queued.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queued_entries().len()
    }

    fn enqueue(&self, name: &str, contents: &[u8]) -> Result<(), ReadinessError> {
        let queue_error = |err: std::io::Error| ReadinessError::Queue {
            path: self.queue_dir.display().to_string(),
            message: err.to_string(),
        };
        fs::create_dir_all(&self.queue_dir).map_err(queue_error)?;
        fs::write(self.queue_dir.join(name), contents).map_err(queue_error)?;
        info!(name = %name, queue = %self.queue_dir.display(), "record queued");
        Ok(())
    }

    /// Queued entry names and paths in stable (filename) order, which is
    /// enqueue order for a single device's timestamped records.
    fn queued_entries(&self) -> Vec<(String, PathBuf)> {
        let Ok(entries) = fs::read_dir(&self.queue_dir) else {
            return Vec::new();
        };
        let mut queued: Vec<(String, PathBuf)> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                Some((name, entry.path()))
            })
            .collect();
        queued.sort();
        queued
    }
}
