//! Trading view
//!
//! Ticker selector over the current holdings, the external chart widget
//! for the selected ticker, and the assistant chat panel.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::Holding;
use crate::app::{App, InputMode};

/// One line in the assistant scrollback.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    User(String),
    Assistant(String),
}

/// Trading view state.
pub struct TradingPane {
    /// Selected index into the holdings list.
    pub selected: usize,
    pub chat: Vec<ChatMessage>,
    pub input: String,
}

impl TradingPane {
    pub fn new() -> Self {
        Self {
            selected: 0,
            chat: vec![
                ChatMessage::Assistant("Welcome to Trust Me Bro Trading!".to_string()),
                ChatMessage::Assistant("Select a ticker to view its chart.".to_string()),
            ],
            input: String::new(),
        }
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn selected_symbol<'a>(&self, holdings: &'a [Holding]) -> Option<&'a str> {
        holdings.get(self.selected).map(|h| h.symbol.as_str())
    }

    /// Send the typed message: append it and the assistant's reply.
    pub fn send(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.chat.push(ChatMessage::User(text));
        self.chat
            .push(ChatMessage::Assistant(ASSISTANT_REPLY.to_string()));
        self.input.clear();
    }
}

impl Default for TradingPane {
    fn default() -> Self {
        Self::new()
    }
}

const ASSISTANT_REPLY: &str = "Trust me bro, that's a great trade!";

/// Embed URL for the external chart widget, templated with the ticker.
pub fn chart_widget_url(symbol: &str) -> String {
    format!(
        "https://s.tradingview.com/widgetembed/?frameElementId=tradingview_chart&symbol={symbol}&interval=D&hidesidetoolbar=0&symboledit=1&saveimage=1&toolbarbg=0f172a&studies=[]&theme=dark&style=1&timezone=Etc%2FUTC&withdateranges=1&hide_side_toolbar=0"
    )
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18),
            Constraint::Percentage(52),
            Constraint::Min(30),
        ])
        .split(area);

    render_ticker_list(frame, columns[0], app);
    render_chart_panel(frame, columns[1], app);
    render_assistant(frame, columns[2], app);
}

fn render_ticker_list(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Tickers ", Style::default().fg(theme.text_secondary)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(holdings) = app.holdings.data() else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Loading…",
                Style::default().fg(theme.text_muted),
            ))),
            inner,
        );
        return;
    };
    let lines: Vec<Line> = holdings
        .iter()
        .take(inner.height as usize)
        .enumerate()
        .map(|(i, h)| {
            let style = if i == app.trading.selected {
                Style::default()
                    .fg(theme.accent)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_secondary)
            };
            Line::from(Span::styled(format!(" {:<6}", h.symbol), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_chart_panel(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let symbol = app
        .holdings
        .data()
        .and_then(|h| app.trading.selected_symbol(h))
        .unwrap_or("—");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" Chart — {symbol} "),
            Style::default().fg(theme.text_secondary),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "External chart widget (open in a browser):",
            Style::default().fg(theme.text_muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            chart_widget_url(symbol),
            Style::default().fg(theme.accent),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_assistant(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " Trading Assistant ",
            Style::default().fg(theme.text_secondary),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let scrollback = parts[0].height as usize;
    let start = app.trading.chat.len().saturating_sub(scrollback);
    let lines: Vec<Line> = app.trading.chat[start..]
        .iter()
        .map(|msg| match msg {
            ChatMessage::User(text) => Line::from(vec![
                Span::styled("You: ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
                Span::styled(text.clone(), Style::default().fg(theme.text)),
            ]),
            ChatMessage::Assistant(text) => Line::from(Span::styled(
                text.clone(),
                Style::default().fg(theme.text_secondary),
            )),
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), parts[0]);

    let typing = app.input_mode == InputMode::Chat;
    let prompt = if typing {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.accent)),
            Span::styled(app.trading.input.clone(), Style::default().fg(theme.text)),
            Span::styled("\u{2588}", Style::default().fg(theme.accent)),
        ])
    } else {
        Line::from(Span::styled(
            "Ask for trading advice… [i]",
            Style::default().fg(theme.text_muted),
        ))
    };
    frame.render_widget(Paragraph::new(prompt).alignment(Alignment::Left), parts[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::demo_holdings;

    #[test]
    fn test_chart_url_templates_the_ticker() {
        let url = chart_widget_url("NVDA");
        assert!(url.contains("symbol=NVDA"));
        assert!(url.starts_with("https://s.tradingview.com/widgetembed/"));
    }

    #[test]
    fn test_selected_symbol_follows_selection() {
        let holdings = demo_holdings();
        let mut pane = TradingPane::new();
        assert_eq!(pane.selected_symbol(&holdings), Some("AAPL"));
        pane.select_next(holdings.len());
        assert_eq!(pane.selected_symbol(&holdings), Some("GOOGL"));
        pane.clamp_selection(1);
        assert_eq!(pane.selected_symbol(&holdings), Some("AAPL"));
    }
}
