use ratatui::style::{Color, Modifier, Style};

use dealscope_core::render::{RiskLevel, ScoreClass};
use dealscope_core::{ConnectionState, NoticeKind};

/// Color theme for the TUI.
pub struct Theme {
    pub excellent: Color,
    pub good: Color,
    pub average: Color,
    pub poor: Color,

    pub risk_low: Color,
    pub risk_medium: Color,
    pub risk_high: Color,

    pub connected: Color,
    pub disconnected: Color,
    pub testing: Color,
    pub untested: Color,

    pub success: Color,
    pub error: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Default green-on-black terminal theme.
    pub fn ledger() -> Self {
        Self {
            excellent: Color::Green,
            good: Color::Cyan,
            average: Color::Yellow,
            poor: Color::Red,

            risk_low: Color::Green,
            risk_medium: Color::Yellow,
            risk_high: Color::Red,

            connected: Color::Green,
            disconnected: Color::Red,
            testing: Color::Cyan,
            untested: Color::DarkGray,

            success: Color::Green,
            error: Color::Red,

            header_fg: Color::Black,
            header_bg: Color::Green,
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    pub fn score_color(&self, class: ScoreClass) -> Color {
        match class {
            ScoreClass::Excellent => self.excellent,
            ScoreClass::Good => self.good,
            ScoreClass::Average => self.average,
            ScoreClass::Poor => self.poor,
        }
    }

    pub fn risk_color(&self, level: RiskLevel) -> Color {
        match level {
            RiskLevel::Low => self.risk_low,
            RiskLevel::Medium => self.risk_medium,
            RiskLevel::High => self.risk_high,
        }
    }

    pub fn connection_color(&self, state: ConnectionState) -> Color {
        match state {
            ConnectionState::Untested => self.untested,
            ConnectionState::Testing => self.testing,
            ConnectionState::Connected => self.connected,
            ConnectionState::Disconnected => self.disconnected,
        }
    }

    pub fn notice_style(&self, kind: NoticeKind) -> Style {
        let color = match kind {
            NoticeKind::Success => self.success,
            NoticeKind::Error => self.error,
        };
        Style::default().fg(color)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg).add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().bg(self.highlight_bg).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
