//! Health view
//!
//! Self-contained: owns its own probes of the backend liveness endpoint
//! and the bearer-authenticated private endpoint. Each probe's failure
//! stays local to its row.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::HealthStatus;
use crate::app::{App, LoadingState};
use crate::theme::Theme;

/// Health view state.
pub struct HealthPane {
    pub api: LoadingState<HealthStatus>,
    pub private: LoadingState<()>,
    pub api_generation: u64,
    pub private_generation: u64,
    probed: bool,
}

impl HealthPane {
    pub fn new() -> Self {
        Self {
            api: LoadingState::NotStarted,
            private: LoadingState::NotStarted,
            api_generation: 0,
            private_generation: 0,
            probed: false,
        }
    }

    /// Probes run once on first entry, then only on manual refresh.
    pub fn needs_probe(&self) -> bool {
        !self.probed
    }

    pub fn mark_probed(&mut self) {
        self.probed = true;
    }
}

impl Default for HealthPane {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " Backend Health ",
            Style::default().fg(theme.text_secondary),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" Backend: {}", app.config.api_base),
            Style::default().fg(theme.text_muted),
        ))),
        rows[0],
    );

    render_probe_row(frame, rows[1], theme, "API", &describe_api(&app.health.api, theme));
    let private = if app.authenticated {
        describe_private(&app.health.private, theme)
    } else {
        (
            "sign-in required".to_string(),
            Style::default().fg(theme.warning),
        )
    };
    render_probe_row(frame, rows[2], theme, "Private probe", &private);
}

fn describe_api(state: &LoadingState<HealthStatus>, theme: &Theme) -> (String, Style) {
    match state {
        LoadingState::NotStarted => ("not probed".to_string(), Style::default().fg(theme.text_muted)),
        LoadingState::Loading => ("probing…".to_string(), Style::default().fg(theme.warning)),
        LoadingState::Loaded(status) => (
            format!("healthy ({})", status.status),
            Style::default().fg(theme.positive).add_modifier(Modifier::BOLD),
        ),
        LoadingState::Error(err) => (
            format!("unreachable — {err}"),
            Style::default().fg(theme.negative),
        ),
    }
}

fn describe_private(state: &LoadingState<()>, theme: &Theme) -> (String, Style) {
    match state {
        LoadingState::NotStarted => ("not probed".to_string(), Style::default().fg(theme.text_muted)),
        LoadingState::Loading => ("probing…".to_string(), Style::default().fg(theme.warning)),
        LoadingState::Loaded(()) => (
            "authorized".to_string(),
            Style::default().fg(theme.positive).add_modifier(Modifier::BOLD),
        ),
        LoadingState::Error(err) => (
            format!("rejected — {err}"),
            Style::default().fg(theme.negative),
        ),
    }
}

fn render_probe_row(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    label: &str,
    (text, style): &(String, Style),
) {
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {label:<14}"), Style::default().fg(theme.text_secondary)),
            Span::styled(text.clone(), *style),
        ]))
        .wrap(Wrap { trim: true }),
        area,
    );
}
