//! Single-flight analysis request lifecycle.
//!
//! The orchestrator is the only writer of the progress log and the only
//! gate onto the analyze endpoint. `begin` captures the staged files and
//! options into a [`Submission`] so later staging edits cannot touch an
//! in-flight request, and hands out a fresh [`RequestId`]; every event the
//! async driver emits carries that id, and events from a superseded
//! submission are dropped instead of racing shared state. Results are not
//! shown the instant they arrive: a successful response schedules a reveal
//! one second out so the final progress message stays readable, and a new
//! submission cancels a reveal that has not fired yet.

use std::time::{Duration, Instant};

use thiserror::Error;

use dealscope_client::{AnalysisClient, AnalysisReport, FileUpload};

use crate::staging::StagedFile;
use crate::Session;

/// Pause between a response arriving and the result view replacing the
/// progress log. Interactive pacing only; batch callers use
/// [`Orchestrator::take_reveal`].
pub const REVEAL_DELAY: Duration = Duration::from_secs(1);

/// Token identifying one submission; stale events are matched against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Fixed points in the submission lifecycle, appended to the progress log
/// in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Uploading,
    Processing,
    Complete,
}

impl Milestone {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uploading => "Uploading documents...",
            Self::Processing => "Running remote analysis...",
            Self::Complete => "Analysis complete. Preparing results...",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("not connected to an analysis service")]
    NotConnected,
    #[error("no files staged for analysis")]
    NoFiles,
    #[error("an analysis request is already in flight")]
    InFlight,
}

/// Everything the analyze request needs, snapshotted at submission time.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: RequestId,
    pub files: Vec<StagedFile>,
    pub sector: Option<String>,
    pub stage: Option<String>,
}

/// Events flowing from the async driver back to the orchestrator's owner.
#[derive(Debug)]
pub enum AnalysisEvent {
    Milestone {
        id: RequestId,
        milestone: Milestone,
    },
    /// Terminal event. The error string is display-ready; request-level
    /// failures (transport, non-2xx) land here, while a 2xx body that
    /// reports its own `error` flows through as a report and becomes an
    /// error presentation at render time.
    Finished {
        id: RequestId,
        outcome: Result<AnalysisReport, String>,
    },
}

/// What the owner should do after feeding an event in.
#[derive(Debug, PartialEq)]
pub enum SubmissionUpdate {
    /// The progress log grew.
    Progress,
    /// Success; the report will surface via `poll_reveal`.
    AwaitingReveal,
    /// Persistent failure, shown in the results area until the next
    /// submission.
    Failed { message: String },
}

/// Ordered, append-only status messages for one submission's lifetime.
#[derive(Debug, Default)]
pub struct ProgressLog {
    entries: Vec<String>,
}

impl ProgressLog {
    fn push(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug)]
struct PendingReveal {
    report: AnalysisReport,
    due: Instant,
}

/// Owner of the in-flight request state.
#[derive(Debug, Default)]
pub struct Orchestrator {
    next_id: u64,
    in_flight: Option<RequestId>,
    progress: ProgressLog,
    pending_reveal: Option<PendingReveal>,
}

impl Orchestrator {
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn progress(&self) -> &[String] {
        self.progress.entries()
    }

    /// True while a finished report is waiting out its reveal delay.
    pub fn reveal_pending(&self) -> bool {
        self.pending_reveal.is_some()
    }

    /// Start a submission: enforce the single-flight guard and the
    /// eligibility preconditions, clear the progress log, cancel any
    /// pending reveal, and snapshot the payload.
    pub fn begin(
        &mut self,
        session: &Session,
        sector: Option<String>,
        stage: Option<String>,
    ) -> Result<Submission, SubmitError> {
        if self.in_flight.is_some() {
            return Err(SubmitError::InFlight);
        }
        if !session.connection.state().is_connected() {
            return Err(SubmitError::NotConnected);
        }
        if session.staging.is_empty() {
            return Err(SubmitError::NoFiles);
        }

        self.progress.clear();
        self.pending_reveal = None;
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.in_flight = Some(id);
        Ok(Submission {
            id,
            files: session.staging.files().to_vec(),
            sector,
            stage,
        })
    }

    /// Feed an event from the async driver. Events whose id does not match
    /// the current submission are dropped.
    pub fn handle_event(&mut self, event: AnalysisEvent, now: Instant) -> Option<SubmissionUpdate> {
        match event {
            AnalysisEvent::Milestone { id, milestone } => {
                if self.in_flight != Some(id) {
                    log::debug!("dropping stale milestone {milestone:?}");
                    return None;
                }
                self.progress.push(milestone.label());
                Some(SubmissionUpdate::Progress)
            }
            AnalysisEvent::Finished { id, outcome } => {
                if self.in_flight != Some(id) {
                    log::debug!("dropping stale completion");
                    return None;
                }
                self.in_flight = None;
                match outcome {
                    Ok(report) => {
                        self.progress.push(Milestone::Complete.label());
                        self.pending_reveal = Some(PendingReveal {
                            report,
                            due: now + REVEAL_DELAY,
                        });
                        Some(SubmissionUpdate::AwaitingReveal)
                    }
                    Err(message) => Some(SubmissionUpdate::Failed { message }),
                }
            }
        }
    }

    /// Yield the finished report once its reveal deadline has passed.
    /// Called from the tick handler.
    pub fn poll_reveal(&mut self, now: Instant) -> Option<AnalysisReport> {
        if self.pending_reveal.as_ref().is_some_and(|p| now >= p.due) {
            return self.pending_reveal.take().map(|p| p.report);
        }
        None
    }

    /// Take the finished report without waiting out the display pacing.
    /// For batch surfaces with no progress view to protect.
    pub fn take_reveal(&mut self) -> Option<AnalysisReport> {
        self.pending_reveal.take().map(|p| p.report)
    }
}

/// Drive one captured submission against the service.
///
/// Emits the uploading and processing milestones in order, posts the
/// multipart payload, and finishes with the outcome. No retry: a failed
/// submission is terminal until the user submits again.
pub async fn run_submission(
    client: &AnalysisClient,
    submission: &Submission,
    emit: impl Fn(AnalysisEvent),
) {
    let id = submission.id;
    emit(AnalysisEvent::Milestone {
        id,
        milestone: Milestone::Uploading,
    });

    let uploads: Vec<FileUpload> = submission
        .files
        .iter()
        .map(|f| FileUpload {
            file_name: f.name.clone(),
            content: f.content.clone(),
        })
        .collect();

    emit(AnalysisEvent::Milestone {
        id,
        milestone: Milestone::Processing,
    });

    let outcome = client
        .analyze(
            &uploads,
            submission.sector.as_deref(),
            submission.stage.as_deref(),
        )
        .await
        .map_err(|e| e.to_string());

    emit(AnalysisEvent::Finished { id, outcome });
}
