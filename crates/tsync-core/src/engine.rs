use crate::{SnapshotRecord, TranslationSnapshot};

/// Why a download has to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaleReason {
    NoRecord,
    SnapshotChanged,
    FilterChanged,
    OutputMissing,
    Forced,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadPlan {
    Skip,
    Run(StaleReason),
}

impl DownloadPlan {
    pub fn should_run(&self) -> bool {
        matches!(self, DownloadPlan::Run(_))
    }
}

/// Inputs to the skip check. The shell gathers these; planning stays pure.
#[derive(Clone, Debug)]
pub struct DownloadInputs<'a> {
    pub previous: Option<&'a SnapshotRecord>,
    pub current: &'a TranslationSnapshot,
    pub export_only_approved: bool,
    pub output_exists: bool,
    pub force: bool,
}

/// Content-addressed skip check run before the executor.
pub fn plan_download(inputs: &DownloadInputs<'_>) -> DownloadPlan {
    if inputs.force {
        return DownloadPlan::Run(StaleReason::Forced);
    }
    let Some(prev) = inputs.previous else {
        return DownloadPlan::Run(StaleReason::NoRecord);
    };
    if prev.digest != inputs.current.digest() {
        return DownloadPlan::Run(StaleReason::SnapshotChanged);
    }
    if prev.export_only_approved != inputs.export_only_approved {
        return DownloadPlan::Run(StaleReason::FilterChanged);
    }
    if !inputs.output_exists {
        return DownloadPlan::Run(StaleReason::OutputMissing);
    }
    DownloadPlan::Skip
}
