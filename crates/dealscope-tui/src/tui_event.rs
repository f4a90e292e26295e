use std::path::PathBuf;

use bytes::Bytes;

use dealscope_core::orchestrator::AnalysisEvent;

/// Events flowing from spawned backend tasks to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    /// Health probe resolved for the given normalized endpoint.
    ProbeFinished {
        base_url: String,
        outcome: Result<(), String>,
    },
    /// A staged-file candidate was read from disk.
    FileLoaded { name: String, content: Bytes },
    FileLoadFailed { path: PathBuf, error: String },
    /// Submission lifecycle event, routed into the orchestrator.
    Analysis(AnalysisEvent),
    /// Report export finished.
    ExportFinished { outcome: Result<PathBuf, String> },
}
