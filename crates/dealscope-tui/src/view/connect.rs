use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use dealscope_core::ConnectionState;

use crate::app::{App, InputMode};
use crate::view::spinner_char;

/// Render the Connection panel: endpoint, state badge, option presets, and
/// the current transient notice.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let editing = app.input_mode == InputMode::EditingEndpoint;

    let mut lines: Vec<Line> = Vec::new();

    let mut endpoint_spans = vec![Span::styled(
        "  Endpoint: ",
        Style::default().fg(theme.dim),
    )];
    if app.endpoint_input.is_empty() && !editing {
        endpoint_spans.push(Span::styled("(not set)", Style::default().fg(theme.dim)));
    } else {
        endpoint_spans.push(Span::styled(
            app.endpoint_input.clone(),
            Style::default().fg(theme.text),
        ));
    }
    if editing {
        endpoint_spans.push(Span::styled(
            "▏",
            Style::default().fg(theme.active).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    lines.push(Line::from(endpoint_spans));

    let state = app.session.connection.state();
    let mut status_spans = vec![
        Span::styled("  Status:   ", Style::default().fg(theme.dim)),
        Span::styled(
            state.label(),
            Style::default()
                .fg(theme.connection_color(state))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if state == ConnectionState::Testing {
        status_spans.push(Span::styled(
            format!(" {}", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }
    lines.push(Line::from(status_spans));

    lines.push(Line::from(vec![
        Span::styled("  Sector:   ", Style::default().fg(theme.dim)),
        Span::styled(
            app.sector.clone().unwrap_or_else(|| "Auto-detect".into()),
            Style::default().fg(theme.text),
        ),
        Span::styled("   Stage: ", Style::default().fg(theme.dim)),
        Span::styled(
            app.stage.clone().unwrap_or_else(|| "Auto-detect".into()),
            Style::default().fg(theme.text),
        ),
    ]));

    lines.push(Line::from(""));
    if let Some(notice) = app.notices.visible(Instant::now()) {
        lines.push(Line::from(Span::styled(
            format!("  {}", notice.text),
            theme.notice_style(notice.kind),
        )));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Connection "),
    );
    f.render_widget(panel, area);
}
