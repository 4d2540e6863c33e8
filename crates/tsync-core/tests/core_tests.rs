use std::path::PathBuf;

use tsync_core::{
    plan_download, DownloadInputs, DownloadPlan, RunId, SnapshotRecord, StaleReason, SyncError, SyncMode, SyncOptions,
    TaskReport, TaskState, ToolCommand, TranslationSnapshot,
};

#[test]
fn test_run_id_new() {
    let a = RunId::new();
    let b = RunId::new();
    assert_ne!(a, b);
}

#[test]
fn test_download_invocation_from_options() {
    let opts = SyncOptions::new(PathBuf::from("/proj"), PathBuf::from("/proj/build/out"), true);
    let inv = ToolCommand::download(&opts).invocation("crowdin", &opts.working_directory);
    assert_eq!(inv.program, "crowdin");
    assert_eq!(inv.cwd, PathBuf::from("/proj"));
    assert!(inv.has_flag("--export-only-approved"));
}

#[test]
fn test_record_roundtrips_the_filter() {
    let snap = TranslationSnapshot::new("status");
    let rec = SnapshotRecord::new(&snap, true, RunId::from_str("r"), 42);
    assert!(rec.export_only_approved);
    assert_eq!(rec.recorded_at_unix, 42);

    let plan = plan_download(&DownloadInputs {
        previous: Some(&rec),
        current: &snap,
        export_only_approved: true,
        output_exists: true,
        force: false,
    });
    assert_eq!(plan, DownloadPlan::Skip);

    let plan = plan_download(&DownloadInputs {
        previous: Some(&rec),
        current: &TranslationSnapshot::new("status changed"),
        export_only_approved: true,
        output_exists: true,
        force: false,
    });
    assert_eq!(plan, DownloadPlan::Run(StaleReason::SnapshotChanged));
}

#[test]
fn test_external_tool_error_keeps_exit_code() {
    let err = SyncError::ExternalTool {
        program: "crowdin".into(),
        exit_code: Some(2),
        stderr: "unauthorized".into(),
    };
    assert_eq!(err.exit_code(), Some(2));
    assert!(err.to_string().contains("unauthorized"));
    assert_eq!(SyncError::config("x").exit_code(), None);
}

#[test]
fn test_report_final_state() {
    let report = TaskReport {
        run_id: RunId::new(),
        mode: SyncMode::Download,
        states: vec![TaskState::Idle, TaskState::Probing, TaskState::Skipped],
        plan: Some(DownloadPlan::Skip),
        snapshot_digest: None,
        result: None,
    };
    assert!(report.skipped());
    assert_eq!(report.final_state(), TaskState::Skipped);
}
