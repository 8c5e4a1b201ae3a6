//! Portfolio view
//!
//! Summary cards over the holdings list, the add-holding form with
//! debounced symbol autocomplete, and the news feed.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::api::{Holding, NewHoldingRequest, SymbolMatch};
use crate::app::{App, InputMode, LoadingState};
use crate::components::forms::{NumberInput, Required, SymbolPattern, TextInput, ValidatorChain};
use crate::metrics;
use crate::theme::Theme;

/// Portfolio view state.
pub struct PortfolioPane {
    pub form: AddHoldingForm,
    /// Selected row in the holdings table.
    pub selected: usize,
}

impl PortfolioPane {
    pub fn new() -> Self {
        Self {
            form: AddHoldingForm::new(),
            selected: 0,
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
}

impl Default for PortfolioPane {
    fn default() -> Self {
        Self::new()
    }
}

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Symbol,
    Shares,
    Price,
}

/// The add-holding form. Values survive a failed submission; only a
/// confirmed create clears them.
pub struct AddHoldingForm {
    pub symbol: TextInput,
    pub shares: NumberInput,
    pub price: NumberInput,
    pub focus: FormField,
    pub submitting: bool,
    /// Backend error from the last rejected submission.
    pub error: Option<String>,
    /// Cursor into the live suggestion list.
    pub suggestion_cursor: Option<usize>,
    /// Display name carried over from an applied suggestion.
    selected_name: Option<String>,
}

impl AddHoldingForm {
    pub fn new() -> Self {
        Self {
            symbol: TextInput::new("Symbol")
                .placeholder("AAPL")
                .uppercase()
                .max_length(5)
                .validators(ValidatorChain::new().add(Required::new()).add(SymbolPattern::new())),
            shares: NumberInput::new("Shares").placeholder("50"),
            price: NumberInput::new("Avg price").placeholder("150.00"),
            focus: FormField::Symbol,
            submitting: false,
            error: None,
            suggestion_cursor: None,
            selected_name: None,
        }
    }

    pub fn reset(&mut self) {
        self.symbol.clear();
        self.shares.clear();
        self.price.clear();
        self.focus = FormField::Symbol;
        self.submitting = false;
        self.error = None;
        self.suggestion_cursor = None;
        self.selected_name = None;
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            FormField::Symbol => FormField::Shares,
            FormField::Shares => FormField::Price,
            FormField::Price => FormField::Symbol,
        };
    }

    pub fn previous_field(&mut self) {
        self.focus = match self.focus {
            FormField::Symbol => FormField::Price,
            FormField::Shares => FormField::Symbol,
            FormField::Price => FormField::Shares,
        };
    }

    /// The symbol field changed by hand: any carried-over display name
    /// no longer applies.
    pub fn symbol_edited(&mut self) {
        self.selected_name = None;
        self.suggestion_cursor = None;
    }

    pub fn apply_suggestion(&mut self, suggestion: &SymbolMatch) {
        self.symbol.set_value(suggestion.symbol.clone());
        self.selected_name = Some(suggestion.name.clone());
        self.suggestion_cursor = None;
        self.focus = FormField::Shares;
    }

    pub fn move_suggestion_cursor(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.suggestion_cursor = None;
            return;
        }
        let next = match self.suggestion_cursor {
            None => 0,
            Some(cur) => {
                let cur = cur as i32 + delta;
                cur.rem_euclid(len as i32) as usize
            }
        };
        self.suggestion_cursor = Some(next);
    }

    /// Validate every field; on success build the request body.
    pub fn validate_request(&mut self) -> Option<NewHoldingRequest> {
        let symbol_ok = self.symbol.validate().is_valid();
        let shares_ok = self.shares.validate().is_valid();
        let price_ok = self.price.validate().is_valid();
        if !(symbol_ok && shares_ok && price_ok) {
            return None;
        }
        let shares = self.shares.parsed()?;
        let avg_price = self.price.parsed()?;
        Some(NewHoldingRequest {
            symbol: self.symbol.value().trim().to_string(),
            shares,
            avg_price,
            name: self.selected_name.clone(),
        })
    }
}

impl Default for AddHoldingForm {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::AddHolding;
    let show_suggestions = editing
        && app.portfolio.form.focus == FormField::Symbol
        && (!app.search.results.is_empty() || app.search.loading || app.search.error.is_some());
    let suggestion_height = if show_suggestions {
        (app.search.results.len().min(4) as u16).max(1) + 2
    } else {
        0
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(suggestion_height),
            Constraint::Min(5),
        ])
        .split(area);

    render_summary_cards(frame, rows[0], app);
    render_form(frame, rows[1], app, editing);
    if show_suggestions {
        render_suggestions(frame, rows[2], app);
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[3]);
    render_holdings(frame, body[0], app);
    render_news(frame, body[1], app);
}

fn render_summary_cards(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let summary = match app.holdings.data() {
        Some(holdings) => metrics::summarize(holdings),
        None => metrics::PortfolioSummary::default(),
    };
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let change_color = if summary.total_change >= 0.0 {
        theme.positive
    } else {
        theme.negative
    };
    render_card(
        frame,
        cards[0],
        theme,
        "Total Value",
        format!("${}", format_amount(summary.total_value)),
        theme.text,
    );
    render_card(
        frame,
        cards[1],
        theme,
        "Total Change",
        format!("{}${}", sign_prefix(summary.total_change), format_amount(summary.total_change.abs())),
        change_color,
    );
    render_card(
        frame,
        cards[2],
        theme,
        "Change %",
        format!("{}{:.2}%", sign_prefix(summary.total_change_percent), summary.total_change_percent.abs()),
        if summary.total_change_percent >= 0.0 {
            theme.positive
        } else {
            theme.negative
        },
    );
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    label: &str,
    value: String,
    value_color: ratatui::style::Color,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.panel_bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(label.to_string(), Style::default().fg(theme.text_muted))),
            Line::from(Span::styled(
                value,
                Style::default().fg(value_color).add_modifier(Modifier::BOLD),
            )),
        ]),
        inner,
    );
}

fn render_form(frame: &mut Frame, area: Rect, app: &App, editing: bool) {
    if area.height < 4 || area.width < 20 {
        return;
    }
    let theme = &app.theme;
    let form = &app.portfolio.form;
    let fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(22),
            Constraint::Percentage(24),
            Constraint::Percentage(24),
        ])
        .split(Rect {
            height: 3,
            ..area
        });

    form.symbol.render(
        frame,
        fields[0],
        theme,
        editing && form.focus == FormField::Symbol,
    );
    form.shares.render(
        frame,
        fields[1],
        theme,
        editing && form.focus == FormField::Shares,
    );
    form.price.render(
        frame,
        fields[2],
        theme,
        editing && form.focus == FormField::Price,
    );

    let action = if form.submitting {
        Span::styled("  Adding…", Style::default().fg(theme.warning))
    } else if editing {
        Span::styled("  [enter] Add", Style::default().fg(theme.accent))
    } else {
        Span::styled("  [a] Add holding", Style::default().fg(theme.text_muted))
    };
    let action_area = Rect {
        y: fields[3].y + 1,
        height: 1,
        ..fields[3]
    };
    frame.render_widget(Paragraph::new(Line::from(action)), action_area);

    if let Some(err) = &form.error {
        let error_area = Rect {
            y: area.y + 3,
            height: 1,
            ..area
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {err}"),
                Style::default().fg(theme.negative),
            ))),
            error_area,
        );
    }
}

fn render_suggestions(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Matches ", Style::default().fg(theme.text_secondary)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = if let Some(err) = &app.search.error {
        vec![Line::from(Span::styled(
            err.clone(),
            Style::default().fg(theme.negative),
        ))]
    } else if app.search.loading && app.search.results.is_empty() {
        vec![Line::from(Span::styled(
            "Searching…",
            Style::default().fg(theme.text_muted),
        ))]
    } else {
        app.search
            .results
            .iter()
            .take(inner.height as usize)
            .enumerate()
            .map(|(i, m)| {
                let style = if app.portfolio.form.suggestion_cursor == Some(i) {
                    Style::default().fg(theme.accent).bg(theme.selection_bg)
                } else {
                    Style::default().fg(theme.text_secondary)
                };
                Line::from(Span::styled(format!("{:<6} {}", m.symbol, m.name), style))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_holdings(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Holdings ", Style::default().fg(theme.text_secondary)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.holdings {
        LoadingState::NotStarted | LoadingState::Loading => {
            render_notice(frame, inner, theme, "Loading holdings…", theme.text_muted);
        }
        LoadingState::Error(err) => {
            render_notice(frame, inner, theme, err, theme.negative);
        }
        LoadingState::Loaded(holdings) if holdings.is_empty() => {
            render_notice(frame, inner, theme, "No holdings yet — press a to add one", theme.text_muted);
        }
        LoadingState::Loaded(holdings) => {
            render_holdings_table(frame, inner, app, holdings);
        }
    }
}

fn render_holdings_table(frame: &mut Frame, area: Rect, app: &App, holdings: &[Holding]) {
    let theme = &app.theme;
    let visible = area.height.saturating_sub(1) as usize;
    let selected = app.portfolio.selected.min(holdings.len().saturating_sub(1));
    let offset = if visible == 0 {
        0
    } else {
        selected.saturating_sub(visible.saturating_sub(1))
    };

    let header = Row::new(
        ["SYMBOL", "NAME", "SHARES", "AVG", "PRICE", "VALUE", "CHANGE"]
            .into_iter()
            .map(|h| Cell::from(Span::styled(h, Style::default().fg(theme.text_muted)))),
    );
    let rows: Vec<Row> = holdings
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, h)| {
            let pct = h.change_percent();
            let pct_color = if pct >= 0.0 { theme.positive } else { theme.negative };
            let row_style = if i == selected {
                Style::default().bg(theme.selection_bg)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    h.symbol.clone(),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                )),
                Cell::from(Span::styled(h.name.clone(), Style::default().fg(theme.text_secondary))),
                Cell::from(Span::styled(
                    format_amount(h.shares),
                    Style::default().fg(theme.text_secondary),
                )),
                Cell::from(Span::styled(
                    format!("${}", format_amount(h.avg_price)),
                    Style::default().fg(theme.text_secondary),
                )),
                Cell::from(Span::styled(
                    format!("${}", format_amount(h.current_price)),
                    Style::default().fg(theme.text_secondary),
                )),
                Cell::from(Span::styled(
                    format!("${}", format_amount(h.market_value())),
                    Style::default().fg(theme.text),
                )),
                Cell::from(Span::styled(
                    format!("{}{:.2}%", sign_prefix(pct), pct.abs()),
                    Style::default().fg(pct_color),
                )),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(14),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .column_spacing(1);
    frame.render_widget(table, area);
}

fn render_news(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" News ", Style::default().fg(theme.text_secondary)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.news {
        LoadingState::NotStarted | LoadingState::Loading => {
            render_notice(frame, inner, theme, "Loading news…", theme.text_muted);
        }
        LoadingState::Error(err) => {
            render_notice(frame, inner, theme, err, theme.negative);
        }
        LoadingState::Loaded(items) if items.is_empty() => {
            render_notice(frame, inner, theme, "No news", theme.text_muted);
        }
        LoadingState::Loaded(items) => {
            let mut lines = Vec::new();
            for item in items {
                if lines.len() + 2 > inner.height as usize {
                    break;
                }
                lines.push(Line::from(Span::styled(
                    item.title.clone(),
                    Style::default().fg(theme.text),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {} · {}", item.source, item.published.format("%b %d %H:%M")),
                    Style::default().fg(theme.text_muted),
                )));
            }
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        }
    }
}

fn render_notice(
    frame: &mut Frame,
    area: Rect,
    _theme: &Theme,
    message: &str,
    color: ratatui::style::Color,
) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(color),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true }),
        area,
    );
}

fn sign_prefix(value: f64) -> &'static str {
    if value >= 0.0 {
        "+"
    } else {
        "-"
    }
}

/// Format a dollar amount with thousands separators and two decimals.
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let total_cents = (value.abs() * 100.0).round() as u64;
    let whole = total_cents / 100;
    let cents = total_cents % 100;
    let mut digits = whole.to_string();
    let mut grouped = String::new();
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() {
            tail
        } else {
            format!("{tail},{grouped}")
        };
    }
    grouped = if grouped.is_empty() {
        digits
    } else {
        format!("{digits},{grouped}")
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{cents:02}")
}
