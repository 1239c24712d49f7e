//! End-to-end engine flow tests against temporary directories.

use std::path::Path;

use readycheck_core::{
    CheckerConfig, DeliveryStatus, DirectorySink, ReadinessEngine, ReadinessError, RemoteSink,
    RunOutcome, Verdict,
};
use readycheck_facts::{
    CpuIdentity, CpuInfo, Fact, FactError, FactSet, FactSource, OemIdentity, StaticFacts, TpmInfo,
};

const GIB: u64 = 1024 * 1024 * 1024;

fn capable_facts() -> FactSet {
    FactSet {
        hostname: "dev-01".into(),
        os_disk_bytes: Fact::Known(120 * GIB),
        total_memory_bytes: Fact::Known(8 * GIB),
        tpm: Fact::Known(TpmInfo {
            present: true,
            spec_version: "2.0".into(),
        }),
        cpu: Fact::Known(CpuInfo {
            address_width: 64,
            clock_mhz: 2400,
            logical_cores: 8,
            manufacturer: "GenuineIntel".into(),
            caption: "Intel(R) Core(TM) i7-8650U CPU @ 1.90GHz".into(),
            identity: CpuIdentity {
                family: Some(6),
                model: Some(142),
            },
        }),
        secure_boot: Fact::Known(true),
        secure_boot_record: Fact::Unknown,
        oem: Fact::Known(OemIdentity {
            manufacturer: "Dell Inc.".into(),
            model: "XPS 13 9370".into(),
        }),
        os_build: Fact::Unknown,
    }
}

fn config_in(state: &Path, destination: &Path) -> CheckerConfig {
    CheckerConfig::rooted_at(state, destination.to_path_buf())
}

/// Sink that always fails, simulating an unreachable destination.
struct DeadSink;

impl RemoteSink for DeadSink {
    fn write(&self, name: &str, _contents: &[u8]) -> Result<(), ReadinessError> {
        Err(ReadinessError::Remote {
            name: name.to_string(),
            message: "unreachable".into(),
        })
    }
}

/// Fact source that fails outright, simulating a missing privilege.
struct BrokenSource;

impl FactSource for BrokenSource {
    fn collect(&self) -> Result<FactSet, FactError> {
        Err(FactError::Privilege {
            message: "inventory access denied".into(),
        })
    }
}

fn remote_files(destination: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(destination) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

#[test]
fn capable_host_delivers_and_marks_done() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();
    let config = config_in(state.path(), destination.path());
    let engine = ReadinessEngine::new(
        config.clone(),
        StaticFacts::new(capable_facts()),
        DirectorySink::new(destination.path()),
    );

    let summary = engine.run().unwrap();
    match &summary.outcome {
        RunOutcome::Evaluated {
            verdict,
            reason,
            delivery,
            record,
        } => {
            assert_eq!(*verdict, Verdict::Capable);
            assert!(reason.is_empty());
            assert_eq!(*delivery, DeliveryStatus::Delivered);
            assert_eq!(record.verdict_code, 0);
        },
        other => panic!("expected Evaluated, got {other:?}"),
    }

    assert!(config.marker_path.exists());
    assert_eq!(remote_files(destination.path()).len(), 1);
    assert_eq!(remote_files(&config.queue_dir).len(), 0);
}

#[test]
fn second_invocation_short_circuits() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();
    let config = config_in(state.path(), destination.path());

    let engine = ReadinessEngine::new(
        config.clone(),
        StaticFacts::new(capable_facts()),
        DirectorySink::new(destination.path()),
    );
    engine.run().unwrap();
    let first_files = remote_files(destination.path());

    // A second engine (fresh invocation) sees the marker and collects no
    // facts; a broken source proves collection is never reached.
    let engine = ReadinessEngine::new(config, BrokenSource, DirectorySink::new(destination.path()));
    let summary = engine.run().unwrap();
    assert_eq!(summary.outcome, RunOutcome::AlreadyCompleted);
    assert_eq!(remote_files(destination.path()), first_files);
}

#[test]
fn unreachable_destination_queues_then_flushes() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();
    let config = config_in(state.path(), destination.path());

    let engine = ReadinessEngine::new(config.clone(), StaticFacts::new(capable_facts()), DeadSink);
    let summary = engine.run().unwrap();
    match summary.outcome {
        RunOutcome::Evaluated { delivery, .. } => assert_eq!(delivery, DeliveryStatus::Queued),
        other => panic!("expected Evaluated, got {other:?}"),
    }
    // Marker still written: the marker records evaluation, not delivery.
    assert!(config.marker_path.exists());
    assert_eq!(remote_files(&config.queue_dir).len(), 1);
    assert!(remote_files(destination.path()).is_empty());

    // Next invocation with the destination back: flush drains the queue
    // even though evaluation short-circuits.
    let engine = ReadinessEngine::new(
        config.clone(),
        BrokenSource,
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    assert_eq!(summary.flush.delivered, 1);
    assert_eq!(summary.flush.remaining, 0);
    assert_eq!(summary.outcome, RunOutcome::AlreadyCompleted);
    assert_eq!(remote_files(destination.path()).len(), 1);
    assert!(remote_files(&config.queue_dir).is_empty());
}

#[test]
fn collection_failure_is_retryable() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();
    let config = config_in(state.path(), destination.path());

    let engine = ReadinessEngine::new(
        config.clone(),
        BrokenSource,
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    match &summary.outcome {
        RunOutcome::FailedToRun { message, delivery } => {
            assert!(message.contains("denied"));
            assert_eq!(*delivery, DeliveryStatus::Delivered);
        },
        other => panic!("expected FailedToRun, got {other:?}"),
    }
    // No marker: the next invocation retries evaluation from scratch.
    assert!(!config.marker_path.exists());

    let engine = ReadinessEngine::new(
        config.clone(),
        StaticFacts::new(capable_facts()),
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    assert!(matches!(summary.outcome, RunOutcome::Evaluated { .. }));
    assert!(config.marker_path.exists());
}

#[test]
fn target_build_bypasses_evaluation() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();
    let config = config_in(state.path(), destination.path());

    let mut facts = capable_facts();
    facts.os_build = Fact::Known(22631);

    let engine = ReadinessEngine::new(
        config.clone(),
        StaticFacts::new(facts),
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    assert_eq!(summary.outcome, RunOutcome::Bypassed { os_build: 22631 });

    // Marker written, but no record was produced or delivered.
    assert!(config.marker_path.exists());
    assert!(remote_files(destination.path()).is_empty());
    assert!(remote_files(&config.queue_dir).is_empty());
}

#[test]
fn below_target_build_still_evaluates() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();
    let config = config_in(state.path(), destination.path());

    let mut facts = capable_facts();
    facts.os_build = Fact::Known(19045);

    let engine = ReadinessEngine::new(
        config,
        StaticFacts::new(facts),
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    assert!(matches!(summary.outcome, RunOutcome::Evaluated { .. }));
}

#[test]
fn evaluate_only_leaves_no_traces() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();
    let config = config_in(state.path(), destination.path());

    let engine = ReadinessEngine::new(
        config.clone(),
        StaticFacts::new(capable_facts()),
        DirectorySink::new(destination.path()),
    );
    let record = engine.evaluate_only().unwrap();
    assert_eq!(record.verdict(), Some(Verdict::Capable));

    assert!(!config.marker_path.exists());
    assert!(remote_files(destination.path()).is_empty());
    assert!(remote_files(&config.queue_dir).is_empty());
}

#[test]
fn small_disk_yields_not_capable_storage_reason() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();

    let mut facts = capable_facts();
    facts.os_disk_bytes = Fact::Known(32 * GIB);

    let engine = ReadinessEngine::new(
        config_in(state.path(), destination.path()),
        StaticFacts::new(facts),
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    match summary.outcome {
        RunOutcome::Evaluated {
            verdict, reason, ..
        } => {
            assert_eq!(verdict, Verdict::NotCapable);
            assert_eq!(reason, "Storage");
        },
        other => panic!("expected Evaluated, got {other:?}"),
    }
}

#[test]
fn unreadable_tpm_yields_undetermined_tpm_reason() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();

    let mut facts = capable_facts();
    facts.tpm = Fact::Unknown;

    let engine = ReadinessEngine::new(
        config_in(state.path(), destination.path()),
        StaticFacts::new(facts),
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    match summary.outcome {
        RunOutcome::Evaluated {
            verdict, reason, ..
        } => {
            assert_eq!(verdict, Verdict::Undetermined);
            assert_eq!(reason, "TPM");
        },
        other => panic!("expected Evaluated, got {other:?}"),
    }
}

#[test]
fn exempted_device_ends_capable() {
    let state = tempfile::tempdir().unwrap();
    let destination = tempfile::tempdir().unwrap();

    let mut facts = capable_facts();
    facts.cpu = Fact::Known(CpuInfo {
        address_width: 64,
        clock_mhz: 2904,
        logical_cores: 8,
        manufacturer: "GenuineIntel".into(),
        caption: "Intel(R) Core(TM) i7-7820HQ CPU @ 2.90GHz".into(),
        identity: CpuIdentity {
            family: Some(6),
            model: Some(158),
        },
    });
    facts.oem = Fact::Known(OemIdentity {
        manufacturer: "Microsoft Corporation".into(),
        model: "Surface Studio 2".into(),
    });

    let engine = ReadinessEngine::new(
        config_in(state.path(), destination.path()),
        StaticFacts::new(facts),
        DirectorySink::new(destination.path()),
    );
    let summary = engine.run().unwrap();
    match summary.outcome {
        RunOutcome::Evaluated {
            verdict, record, ..
        } => {
            assert_eq!(verdict, Verdict::Capable);
            assert!(record.trail.contains("exemption"));
        },
        other => panic!("expected Evaluated, got {other:?}"),
    }
}
