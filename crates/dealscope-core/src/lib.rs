//! Client-side workflow state for dealscope.
//!
//! Four thin state owners, each with a single concern:
//! [`connection::ConnectionManager`] gates submission on a health probe,
//! [`staging::StagingArea`] holds the deduplicated file set,
//! [`orchestrator::Orchestrator`] owns the single in-flight request
//! lifecycle, and [`render::derive`] projects the service's deeply-optional
//! report into display-ready fields. Presentation surfaces (the TUI and the
//! batch CLI) own a [`Session`] and drive these machines; all I/O goes
//! through `dealscope-client`.

pub mod connection;
pub mod notice;
pub mod orchestrator;
pub mod render;
pub mod staging;

// Re-export for convenience
pub use dealscope_client::AnalysisReport;

pub use connection::{ConnectionManager, ConnectionState};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use orchestrator::{
    AnalysisEvent, Milestone, Orchestrator, RequestId, Submission, SubmissionUpdate, SubmitError,
};
pub use render::{DerivedDisplay, Rendered, RiskLevel, ScoreClass};
pub use staging::{StagedFile, StagingArea};

/// Mutable session state, owned by the driving surface.
///
/// Endpoint, connectivity, and the staged file set live here rather than in
/// free-floating globals; each field is mutated only by its owner in
/// response to a direct user action.
#[derive(Debug, Default)]
pub struct Session {
    pub connection: ConnectionManager,
    pub staging: StagingArea,
}

impl Session {
    /// Submission is permitted iff connected and at least one file is staged.
    ///
    /// Derived on demand, never stored, so it is correct after every
    /// mutation of either input.
    pub fn submit_eligible(&self) -> bool {
        self.connection.state().is_connected() && !self.staging.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn staged(name: &str) -> StagedFile {
        StagedFile::new(name, Bytes::from_static(b"%PDF-1.4"))
    }

    #[test]
    fn eligibility_needs_both_inputs() {
        let mut session = Session::default();
        assert!(!session.submit_eligible());

        session.staging.add([staged("pitch.pdf")]);
        assert!(!session.submit_eligible(), "staged but untested");

        let base = session.connection.begin_probe("http://api.example.com").unwrap();
        assert_eq!(base, "http://api.example.com");
        assert!(!session.submit_eligible(), "probe still running");

        session.connection.complete_probe(true);
        assert!(session.submit_eligible());

        session.staging.remove("pitch.pdf");
        assert!(!session.submit_eligible(), "staging emptied");
    }

    #[test]
    fn eligibility_lost_on_disconnect() {
        let mut session = Session::default();
        session.staging.add([staged("pitch.pdf")]);
        session.connection.begin_probe("http://api.example.com").unwrap();
        session.connection.complete_probe(true);
        assert!(session.submit_eligible());

        session.connection.begin_probe("http://api.example.com").unwrap();
        session.connection.complete_probe(false);
        assert!(!session.submit_eligible());
    }
}
