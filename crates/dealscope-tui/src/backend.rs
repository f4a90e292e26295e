//! Side-effect execution for the TUI.
//!
//! `App::update` stays synchronous and returns a [`Command`] when an action
//! needs I/O; each command is executed on its own task here and reports
//! back over the backend event channel. File reads go through
//! `spawn_blocking` so they never stall the draw loop.

use std::path::PathBuf;

use bytes::Bytes;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use dealscope_client::{AnalysisClient, ClientOptions};
use dealscope_core::orchestrator::{run_submission, AnalysisEvent, Submission};
use dealscope_core::render::Rendered;
use dealscope_reporting::ExportFormat;

use crate::tui_event::BackendEvent;

/// Side effects requested by the update loop.
#[derive(Debug)]
pub enum Command {
    Probe { base_url: String },
    LoadFile { path: PathBuf },
    RunAnalysis { base_url: String, submission: Submission },
    Export { path: PathBuf, rendered: Rendered },
}

/// Spawn a task for one command.
pub fn execute(command: Command, tx: UnboundedSender<BackendEvent>, cancel: CancellationToken) {
    match command {
        Command::Probe { base_url } => {
            tokio::spawn(async move {
                let outcome = match AnalysisClient::new(&base_url, ClientOptions::default()) {
                    Ok(client) => tokio::select! {
                        _ = cancel.cancelled() => return,
                        health = client.health() => health.map_err(|e| e.to_string()),
                    },
                    Err(e) => Err(e.to_string()),
                };
                let _ = tx.send(BackendEvent::ProbeFinished { base_url, outcome });
            });
        }
        Command::LoadFile { path } => {
            tokio::spawn(async move {
                let read_path = path.clone();
                let read = tokio::task::spawn_blocking(move || std::fs::read(&read_path)).await;
                let event = match read {
                    Ok(Ok(content)) => {
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string());
                        BackendEvent::FileLoaded {
                            name,
                            content: Bytes::from(content),
                        }
                    }
                    Ok(Err(e)) => BackendEvent::FileLoadFailed {
                        path,
                        error: e.to_string(),
                    },
                    Err(e) => BackendEvent::FileLoadFailed {
                        path,
                        error: e.to_string(),
                    },
                };
                let _ = tx.send(event);
            });
        }
        Command::RunAnalysis {
            base_url,
            submission,
        } => {
            tokio::spawn(async move {
                match AnalysisClient::new(&base_url, ClientOptions::default()) {
                    Ok(client) => {
                        let events = tx.clone();
                        tokio::select! {
                            _ = cancel.cancelled() => {}
                            _ = run_submission(&client, &submission, move |event| {
                                let _ = events.send(BackendEvent::Analysis(event));
                            }) => {}
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(BackendEvent::Analysis(AnalysisEvent::Finished {
                            id: submission.id,
                            outcome: Err(e.to_string()),
                        }));
                    }
                }
            });
        }
        Command::Export { path, rendered } => {
            tokio::spawn(async move {
                let write_path = path.clone();
                let written = tokio::task::spawn_blocking(move || {
                    dealscope_reporting::write_report(&write_path, &rendered, ExportFormat::Markdown)
                })
                .await;
                let outcome = match written {
                    Ok(Ok(())) => Ok(path),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                let _ = tx.send(BackendEvent::ExportFinished { outcome });
            });
        }
    }
}
