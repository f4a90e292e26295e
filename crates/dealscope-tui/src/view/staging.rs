use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use dealscope_core::staging::human_size;

use crate::app::{App, InputMode};
use crate::view::truncate;

/// Render the staged-files panel.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let adding = app.input_mode == InputMode::AddingFile;

    let (table_area, input_area) = if adding {
        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let header = Row::new(
        ["#", "File", "Size"].iter().map(|h| {
            Cell::from(*h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        }),
    )
    .height(1);

    let rows: Vec<Row> = app
        .session
        .staging
        .files()
        .iter()
        .enumerate()
        .map(|(i, file)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(truncate(
                    &file.name,
                    (table_area.width as usize).saturating_sub(16),
                )),
                Cell::from(human_size(file.size)).style(Style::default().fg(theme.dim)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(format!(" Files ({}) ", app.session.staging.len())),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if !app.session.staging.is_empty() {
        state.select(Some(app.files_cursor));
    }
    f.render_stateful_widget(table, table_area, &mut state);

    if let Some(input_area) = input_area {
        let prompt = Line::from(vec![
            Span::styled(" Add path: ", Style::default().fg(theme.dim)),
            Span::styled(app.file_input.clone(), Style::default().fg(theme.text)),
            Span::styled("▏", Style::default().fg(theme.active)),
        ]);
        f.render_widget(Paragraph::new(prompt), input_area);
    }
}
