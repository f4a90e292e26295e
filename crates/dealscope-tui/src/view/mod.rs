pub mod connect;
pub mod help;
pub mod results;
pub mod staging;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "…" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.len() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

/// Render the workbench: connection and staging on the left, progress and
/// results on the right.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(10),   // panels
        Constraint::Length(1), // footer
    ])
    .split(f.area());

    render_header(f, chunks[0], app);

    let columns =
        Layout::horizontal([Constraint::Percentage(42), Constraint::Percentage(58)]).split(chunks[1]);
    let left = Layout::vertical([Constraint::Length(8), Constraint::Min(4)]).split(columns[0]);
    connect::render(f, left[0], app);
    staging::render(f, left[1], app);

    let right = Layout::vertical([Constraint::Length(7), Constraint::Min(4)]).split(columns[1]);
    results::render_progress(f, right[0], app);
    results::render_results(f, right[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" DEALSCOPE ", theme.header_style()),
        Span::styled(
            " Analysis Workbench",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let (status, status_color) = if app.orchestrator.is_in_flight() {
        ("Analyzing…", theme.testing)
    } else if app.session.submit_eligible() {
        ("Ready to analyze", theme.connected)
    } else {
        ("Connect and stage files", theme.dim)
    };

    let hints = match app.input_mode {
        InputMode::Normal => {
            " | c:endpoint  t:test  a:add  d:remove  s/S:sector/stage  Enter:analyze  e:export  ?:help  q:quit"
        }
        InputMode::EditingEndpoint | InputMode::AddingFile => " | Enter:confirm  Esc:cancel",
    };

    let footer = Line::from(vec![
        Span::styled(format!(" {status} "), Style::default().fg(status_color)),
        Span::styled(hints, theme.footer_style()),
    ]);
    f.render_widget(Paragraph::new(footer), area);
}
