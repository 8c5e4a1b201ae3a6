//! Navigation shell
//!
//! Sidebar, title bar, and status bar. The shell owns which view is
//! active and whether the sidebar is expanded; view selection is
//! unconditional and never persisted.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::theme::Theme;

/// Width of the expanded sidebar, in cells.
pub const SIDEBAR_WIDTH: u16 = 22;

/// The four dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Portfolio,
    Heatmap,
    Trading,
    Health,
}

impl ActiveView {
    pub fn label(&self) -> &'static str {
        match self {
            ActiveView::Portfolio => "Portfolio",
            ActiveView::Heatmap => "Heatmap",
            ActiveView::Trading => "Trading",
            ActiveView::Health => "Health",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            ActiveView::Portfolio => '1',
            ActiveView::Heatmap => '2',
            ActiveView::Trading => '3',
            ActiveView::Health => '4',
        }
    }

    pub fn all() -> &'static [ActiveView] {
        &[
            ActiveView::Portfolio,
            ActiveView::Heatmap,
            ActiveView::Trading,
            ActiveView::Health,
        ]
    }

    pub fn next(&self) -> ActiveView {
        let all = Self::all();
        let idx = all.iter().position(|v| v == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(&self) -> ActiveView {
        let all = Self::all();
        let idx = all.iter().position(|v| v == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, active: ActiveView, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.panel_bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            " Trust Me Bro",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            " Investment Dashboard",
            Style::default().fg(theme.text_muted),
        )),
        Line::from(""),
    ];
    for view in ActiveView::all() {
        let selected = *view == active;
        let marker = if selected { "▸" } else { " " };
        let style = if selected {
            Style::default()
                .fg(theme.accent)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_secondary)
        };
        lines.push(Line::from(Span::styled(
            format!(" {marker} [{}] {:<14}", view.shortcut(), view.label()),
            style,
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_title_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let session = if app.authenticated {
        Span::styled("● signed in ", Style::default().fg(theme.positive))
    } else {
        Span::styled("○ anonymous ", Style::default().fg(theme.text_muted))
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", app.active_view.label()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled("— Trust Me Bro Capital", Style::default().fg(theme.text_muted)),
    ]);
    let bar = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.panel_bg));
    let inner = bar.inner(area);
    frame.render_widget(bar, area);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(14)])
        .split(inner);
    frame.render_widget(Paragraph::new(title), halves[0]);
    frame.render_widget(
        Paragraph::new(Line::from(session)).alignment(Alignment::Right),
        halves[1],
    );
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let hints = match app.input_mode {
        InputMode::Normal => match app.active_view {
            ActiveView::Portfolio => "1-4 views  tab next  a add holding  j/k select  r refresh  m menu  q quit",
            ActiveView::Heatmap => "1-4 views  tab next  r refresh  m menu  q quit",
            ActiveView::Trading => "1-4 views  j/k ticker  i ask assistant  m menu  q quit",
            ActiveView::Health => "1-4 views  r re-probe  m menu  q quit",
        },
        InputMode::AddHolding => "tab next field  ↑/↓ suggestions  enter submit  esc cancel",
        InputMode::Chat => "enter send  esc done",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {hints}"),
            Style::default().fg(theme.text_muted),
        )))
        .style(Style::default().bg(theme.panel_bg)),
        area,
    );
}
