use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use dealscope_core::render::{DerivedDisplay, Rendered};

use crate::app::{App, ResultsPane};
use crate::theme::Theme;
use crate::view::spinner_char;

/// Render the progress-log panel.
pub fn render_progress(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let entries = app.orchestrator.progress();

    let mut lines: Vec<Line> = Vec::new();
    if entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No submission yet.",
            Style::default().fg(theme.dim),
        )));
    }
    for (i, entry) in entries.iter().enumerate() {
        let last = i + 1 == entries.len();
        if last && app.orchestrator.is_in_flight() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", spinner_char(app.tick)),
                    Style::default().fg(theme.spinner),
                ),
                Span::styled(entry.clone(), Style::default().fg(theme.active)),
            ]));
        } else {
            lines.push(Line::from(Span::styled(
                format!("  {entry}"),
                Style::default().fg(theme.text),
            )));
        }
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Progress "),
    );
    f.render_widget(panel, area);
}

/// Render the results panel: idle/running placeholder, persistent error, or
/// the derived report.
pub fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let lines: Vec<Line> = match &app.results {
        ResultsPane::Idle => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No analysis yet. Stage files and press Enter.",
                Style::default().fg(theme.dim),
            )),
        ],
        ResultsPane::Running => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("  {} ", spinner_char(app.tick)),
                    Style::default().fg(theme.spinner),
                ),
                Span::styled("Analyzing documents...", Style::default().fg(theme.active)),
            ]),
        ],
        ResultsPane::Failed { message } => error_lines("Analysis Failed", message, theme),
        ResultsPane::Ready(Rendered::ServiceError(message)) => {
            error_lines("API Error", message, theme)
        }
        ResultsPane::Ready(Rendered::Report(display)) => report_lines(display, theme),
    };

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Results "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.results_scroll, 0));
    f.render_widget(panel, area);
}

fn error_lines<'a>(title: &'a str, message: &str, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(theme.text),
        )),
    ]
}

fn report_lines<'a>(display: &'a DerivedDisplay, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            format!("  {}/100", display.overall_score),
            Style::default()
                .fg(theme.score_color(display.score_class))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({})", display.score_class.label()),
            Style::default().fg(theme.dim),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {}", display.company_name),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} / {}", display.sector, display.funding_stage),
            Style::default().fg(theme.dim),
        ),
    ]));

    lines.push(Line::from(""));
    section_header(&mut lines, "RISK ASSESSMENT", theme);
    lines.push(Line::from(vec![
        Span::styled("  Overall risk:  ", Style::default().fg(theme.dim)),
        Span::styled(
            format!(
                "{} ({}/10)",
                display.risk_level_text, display.risk_score
            ),
            Style::default()
                .fg(theme.risk_color(display.risk_level))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    for factor in &display.risk_factors {
        lines.push(Line::from(Span::styled(
            format!("  - {factor}"),
            Style::default().fg(theme.text),
        )));
    }

    lines.push(Line::from(""));
    section_header(&mut lines, "RECOMMENDATION", theme);
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {}", display.action_text()),
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({} confidence)", display.confidence_text()),
            Style::default().fg(theme.dim),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {}", display.reasoning_text()),
        Style::default().fg(theme.text),
    )));

    if !display.category_scores.is_empty() {
        lines.push(Line::from(""));
        section_header(&mut lines, "CATEGORY SCORES", theme);
        for category in &display.category_scores {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<22}", category.name),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    format!("{:>5.1}/100", category.score),
                    Style::default().fg(theme.score_color(
                        dealscope_core::render::ScoreClass::from_score(category.score),
                    )),
                ),
            ]));
        }
    }

    if let Some(benchmarks) = &display.benchmarks {
        lines.push(Line::from(""));
        section_header(&mut lines, "SECTOR BENCHMARKS", theme);
        labeled_line(
            &mut lines,
            "Revenue growth",
            &format!("{:.2}", benchmarks.avg_revenue_growth),
            theme,
        );
        labeled_line(&mut lines, "CAC", &format!("{:.0}", benchmarks.avg_cac), theme);
        labeled_line(&mut lines, "LTV", &format!("{:.0}", benchmarks.avg_ltv), theme);
        labeled_line(
            &mut lines,
            "Burn rate",
            &format!("{:.0}", benchmarks.avg_burn_rate),
            theme,
        );
        labeled_line(
            &mut lines,
            "Runway",
            &format!("{:.1} months", benchmarks.avg_runway),
            theme,
        );
        labeled_line(
            &mut lines,
            "Sample size",
            &format!("{}", benchmarks.sample_size),
            theme,
        );
    }

    let mut meta: Vec<String> = Vec::new();
    if let Some(filename) = &display.filename {
        meta.push(filename.clone());
    }
    if let Some(id) = &display.analysis_id {
        meta.push(format!("id {id}"));
    }
    if let Some(at) = &display.analyzed_at {
        meta.push(at.clone());
    }
    if !meta.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", meta.join("  ")),
            Style::default().fg(theme.dim),
        )));
    }

    lines
}

fn section_header<'a>(lines: &mut Vec<Line<'a>>, title: &'a str, theme: &Theme) {
    lines.push(Line::from(Span::styled(
        format!("  {title}"),
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
    )));
}

fn labeled_line<'a>(lines: &mut Vec<Line<'a>>, label: &'a str, value: &str, theme: &Theme) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:<16}"), Style::default().fg(theme.dim)),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ]));
}
