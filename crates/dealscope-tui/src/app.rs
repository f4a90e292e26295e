use std::path::PathBuf;
use std::time::Instant;

use dealscope_core::render::{derive, Rendered};
use dealscope_core::{NoticeBoard, NoticeKind, Orchestrator, Session, StagedFile, SubmissionUpdate};

use crate::action::Action;
use crate::backend::Command;
use crate::theme::Theme;
use crate::tui_event::BackendEvent;

/// Sector presets cycled with `s`; `None` lets the service auto-detect.
pub const SECTORS: &[&str] = &["SaaS", "fintech", "healthtech", "edtech", "ecommerce", "deeptech"];

/// Funding-stage presets cycled with `S`.
pub const STAGES: &[&str] = &["Pre-Seed", "Seed", "Series A", "Series B", "Growth"];

/// Which widget is capturing keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingEndpoint,
    AddingFile,
}

/// Contents of the results panel.
///
/// `Failed` and a `Ready(ServiceError)` are persistent: they stay up until
/// the next submission replaces them. Transient feedback goes through the
/// notice board instead.
#[derive(Debug)]
pub enum ResultsPane {
    Idle,
    Running,
    Failed { message: String },
    Ready(Rendered),
}

/// Main application state.
pub struct App {
    pub input_mode: InputMode,
    pub endpoint_input: String,
    pub file_input: String,
    pub session: Session,
    pub orchestrator: Orchestrator,
    pub notices: NoticeBoard,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub results: ResultsPane,
    pub files_cursor: usize,
    pub results_scroll: u16,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub visible_rows: usize,
}

impl App {
    pub fn new(endpoint: Option<String>, sector: Option<String>, stage: Option<String>) -> Self {
        Self {
            input_mode: InputMode::Normal,
            endpoint_input: endpoint.unwrap_or_default(),
            file_input: String::new(),
            session: Session::default(),
            orchestrator: Orchestrator::default(),
            notices: NoticeBoard::default(),
            sector,
            stage,
            results: ResultsPane::Idle,
            files_cursor: 0,
            results_scroll: 0,
            theme: Theme::ledger(),
            tick: 0,
            should_quit: false,
            show_help: false,
            visible_rows: 20,
        }
    }

    /// Process a user action. Returns a command when the action needs I/O.
    pub fn update(&mut self, action: Action, now: Instant) -> Option<Command> {
        // When help overlay is shown, only allow a few actions through
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::ToggleHelp | Action::InputCancel => self.show_help = false,
                Action::Tick => self.on_tick(now),
                Action::Resize(_w, h) => self.visible_rows = (h as usize).saturating_sub(8),
                _ => {} // swallow everything else
            }
            return None;
        }

        if self.input_mode != InputMode::Normal {
            return self.update_input(action, now);
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::ToggleHelp => {
                self.show_help = true;
                None
            }
            Action::EditEndpoint => {
                self.input_mode = InputMode::EditingEndpoint;
                None
            }
            Action::AddFile => {
                self.input_mode = InputMode::AddingFile;
                self.file_input.clear();
                None
            }
            Action::TestConnection => self.start_probe(now),
            Action::RemoveSelected => {
                let name = self
                    .session
                    .staging
                    .files()
                    .get(self.files_cursor)
                    .map(|f| f.name.clone());
                if let Some(name) = name {
                    self.session.staging.remove(&name);
                    let last = self.session.staging.len().saturating_sub(1);
                    self.files_cursor = self.files_cursor.min(last);
                }
                None
            }
            Action::MoveDown => {
                if self.files_cursor + 1 < self.session.staging.len() {
                    self.files_cursor += 1;
                }
                None
            }
            Action::MoveUp => {
                self.files_cursor = self.files_cursor.saturating_sub(1);
                None
            }
            Action::CycleSector => {
                self.sector = cycle_choice(SECTORS, &self.sector);
                None
            }
            Action::CycleStage => {
                self.stage = cycle_choice(STAGES, &self.stage);
                None
            }
            Action::Submit => self.start_submission(now),
            Action::ExportReport => self.start_export(now),
            Action::ScrollResultsDown => {
                let page = (self.visible_rows.max(2) / 2) as u16;
                self.results_scroll = self.results_scroll.saturating_add(page);
                None
            }
            Action::ScrollResultsUp => {
                let page = (self.visible_rows.max(2) / 2) as u16;
                self.results_scroll = self.results_scroll.saturating_sub(page);
                None
            }
            Action::Tick => {
                self.on_tick(now);
                None
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
                None
            }
            Action::InputChar(_)
            | Action::InputBackspace
            | Action::InputSubmit
            | Action::InputCancel
            | Action::None => None,
        }
    }

    fn update_input(&mut self, action: Action, now: Instant) -> Option<Command> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::InputChar(c) => {
                match self.input_mode {
                    InputMode::EditingEndpoint => self.endpoint_input.push(c),
                    InputMode::AddingFile => self.file_input.push(c),
                    InputMode::Normal => {}
                }
                None
            }
            Action::InputBackspace => {
                match self.input_mode {
                    InputMode::EditingEndpoint => {
                        self.endpoint_input.pop();
                    }
                    InputMode::AddingFile => {
                        self.file_input.pop();
                    }
                    InputMode::Normal => {}
                }
                None
            }
            Action::InputSubmit => {
                let mode = self.input_mode;
                self.input_mode = InputMode::Normal;
                match mode {
                    InputMode::EditingEndpoint => self.start_probe(now),
                    InputMode::AddingFile => {
                        let path = self.file_input.trim().to_string();
                        self.file_input.clear();
                        if path.is_empty() {
                            None
                        } else {
                            Some(Command::LoadFile {
                                path: PathBuf::from(path),
                            })
                        }
                    }
                    InputMode::Normal => None,
                }
            }
            Action::InputCancel => {
                self.input_mode = InputMode::Normal;
                self.file_input.clear();
                None
            }
            Action::Tick => {
                self.on_tick(now);
                None
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
                None
            }
            _ => None,
        }
    }

    fn start_probe(&mut self, now: Instant) -> Option<Command> {
        if self.session.connection.state() == dealscope_core::ConnectionState::Testing {
            return None;
        }
        match self.session.connection.begin_probe(&self.endpoint_input) {
            Ok(base_url) => Some(Command::Probe { base_url }),
            Err(_) => {
                self.notices
                    .post(NoticeKind::Error, "Please enter an API URL", now);
                None
            }
        }
    }

    fn start_submission(&mut self, now: Instant) -> Option<Command> {
        let Some(base_url) = self.session.connection.base_url().map(str::to_string) else {
            self.notices.post(
                NoticeKind::Error,
                "Connect to an analysis service first",
                now,
            );
            return None;
        };
        match self
            .orchestrator
            .begin(&self.session, self.sector.clone(), self.stage.clone())
        {
            Ok(submission) => {
                self.results = ResultsPane::Running;
                self.results_scroll = 0;
                Some(Command::RunAnalysis {
                    base_url,
                    submission,
                })
            }
            Err(e) => {
                self.notices.post(NoticeKind::Error, e.to_string(), now);
                None
            }
        }
    }

    fn start_export(&mut self, now: Instant) -> Option<Command> {
        match &self.results {
            ResultsPane::Ready(rendered) => Some(Command::Export {
                path: export_path(),
                rendered: rendered.clone(),
            }),
            _ => {
                self.notices
                    .post(NoticeKind::Error, "No report to export yet", now);
                None
            }
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        self.notices.sweep(now);
        if let Some(report) = self.orchestrator.poll_reveal(now) {
            self.results = ResultsPane::Ready(derive(&report));
        }
    }

    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent, now: Instant) {
        match event {
            BackendEvent::ProbeFinished { base_url, outcome } => {
                // A probe for a superseded endpoint must not flip the state.
                if self.session.connection.base_url() != Some(base_url.as_str()) {
                    return;
                }
                match outcome {
                    Ok(()) => {
                        self.session.connection.complete_probe(true);
                        self.notices.post(
                            NoticeKind::Success,
                            "Connected successfully. Service is healthy.",
                            now,
                        );
                    }
                    Err(error) => {
                        self.session.connection.complete_probe(false);
                        self.notices.post(
                            NoticeKind::Error,
                            format!("Connection failed: {error}"),
                            now,
                        );
                    }
                }
            }
            BackendEvent::FileLoaded { name, content } => {
                self.session.staging.add([StagedFile::new(name, content)]);
            }
            BackendEvent::FileLoadFailed { path, error } => {
                self.notices.post(
                    NoticeKind::Error,
                    format!("Could not read {}: {error}", path.display()),
                    now,
                );
            }
            BackendEvent::Analysis(event) => {
                match self.orchestrator.handle_event(event, now) {
                    Some(SubmissionUpdate::Failed { message }) => {
                        self.results = ResultsPane::Failed { message };
                    }
                    // Progress shows up via the log; the reveal arrives on a
                    // later tick once its pacing delay has passed.
                    Some(SubmissionUpdate::Progress)
                    | Some(SubmissionUpdate::AwaitingReveal)
                    | None => {}
                }
            }
            BackendEvent::ExportFinished { outcome } => match outcome {
                Ok(path) => self.notices.post(
                    NoticeKind::Success,
                    format!("Report written to {}", path.display()),
                    now,
                ),
                Err(error) => {
                    self.notices
                        .post(NoticeKind::Error, format!("Export failed: {error}"), now);
                }
            },
        }
    }

    /// Render the workbench.
    pub fn view(&self, f: &mut ratatui::Frame) {
        crate::view::render(f, self);
        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

fn cycle_choice(options: &[&str], current: &Option<String>) -> Option<String> {
    match current {
        None => options.first().map(|o| o.to_string()),
        Some(value) => match options.iter().position(|o| o == value) {
            Some(i) if i + 1 < options.len() => Some(options[i + 1].to_string()),
            // Past the end (or a CLI-supplied custom value): back to auto-detect.
            _ => None,
        },
    }
}

fn export_path() -> PathBuf {
    let dir = dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("dealscope-report-{stamp}.md"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn now() -> Instant {
        Instant::now()
    }

    fn app_with_connection() -> App {
        let mut app = App::new(Some("http://api.example.com".into()), None, None);
        let cmd = app.update(Action::TestConnection, now());
        assert!(matches!(cmd, Some(Command::Probe { .. })));
        app.handle_backend_event(
            BackendEvent::ProbeFinished {
                base_url: "http://api.example.com".into(),
                outcome: Ok(()),
            },
            now(),
        );
        app
    }

    #[test]
    fn submit_before_connecting_posts_a_notice_and_sends_nothing() {
        let mut app = App::new(None, None, None);
        let at = now();
        assert!(app.update(Action::Submit, at).is_none());
        assert!(app.notices.visible(at).is_some());
    }

    #[test]
    fn submit_with_staged_file_produces_a_run_command() {
        let mut app = app_with_connection();
        app.handle_backend_event(
            BackendEvent::FileLoaded {
                name: "pitch.pdf".into(),
                content: Bytes::from_static(b"%PDF"),
            },
            now(),
        );
        let cmd = app.update(Action::Submit, now());
        match cmd {
            Some(Command::RunAnalysis { base_url, submission }) => {
                assert_eq!(base_url, "http://api.example.com");
                assert_eq!(submission.files.len(), 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(app.results, ResultsPane::Running));
    }

    #[test]
    fn duplicate_loaded_files_stage_once() {
        let mut app = app_with_connection();
        for _ in 0..2 {
            app.handle_backend_event(
                BackendEvent::FileLoaded {
                    name: "a.pdf".into(),
                    content: Bytes::from_static(b"x"),
                },
                now(),
            );
        }
        assert_eq!(app.session.staging.len(), 1);
    }

    #[test]
    fn stale_probe_result_is_ignored() {
        let mut app = app_with_connection();
        app.handle_backend_event(
            BackendEvent::ProbeFinished {
                base_url: "http://other.example.com".into(),
                outcome: Err("connection refused".into()),
            },
            now(),
        );
        assert!(app.session.connection.state().is_connected());
    }

    #[test]
    fn endpoint_editing_round_trip() {
        let mut app = App::new(None, None, None);
        app.update(Action::EditEndpoint, now());
        assert_eq!(app.input_mode, InputMode::EditingEndpoint);
        for c in "http://x/".chars() {
            app.update(Action::InputChar(c), now());
        }
        app.update(Action::InputBackspace, now());
        let cmd = app.update(Action::InputSubmit, now());
        assert_eq!(app.input_mode, InputMode::Normal);
        match cmd {
            Some(Command::Probe { base_url }) => assert_eq!(base_url, "http://x"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn sector_cycle_wraps_back_to_auto() {
        let mut app = App::new(None, None, None);
        assert!(app.sector.is_none());
        for _ in 0..SECTORS.len() {
            app.update(Action::CycleSector, now());
        }
        assert_eq!(app.sector.as_deref(), Some(SECTORS[SECTORS.len() - 1]));
        app.update(Action::CycleSector, now());
        assert!(app.sector.is_none());
    }
}
