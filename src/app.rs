//! Main application state and rendering
//!
//! All state transitions happen here, on the event loop: key events,
//! fetch completions drained from the channel, and debounce ticks.
//! Nothing else mutates state.

use std::time::Instant;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use tracing::debug;

use crate::api::{Holding, NewsItem, SymbolMatch};
use crate::config::{Config, ThemeChoice};
use crate::fetch::{Debouncer, FetchMessage, Fetcher, SEARCH_DEBOUNCE};
use crate::health::HealthPane;
use crate::navigation::{self, ActiveView, SIDEBAR_WIDTH};
use crate::portfolio::{FormField, PortfolioPane};
use crate::theme::Theme;
use crate::trading::TradingPane;
use crate::{heatmap, portfolio, trading};

/// Loading state for async data. At most one of data/error is
/// meaningful; `Loading` only while a request is in flight.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    NotStarted,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Where key events are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    AddHolding,
    Chat,
}

/// Symbol-search state for the add-holding autocomplete.
#[derive(Debug, Default)]
pub struct SearchState {
    pub results: Vec<SymbolMatch>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Main application state.
pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub theme_choice: ThemeChoice,
    /// Whether the session carries a bearer token.
    pub authenticated: bool,

    pub active_view: ActiveView,
    pub sidebar_visible: bool,
    pub input_mode: InputMode,
    pub should_quit: bool,

    pub holdings: LoadingState<Vec<Holding>>,
    pub holdings_generation: u64,
    pub news: LoadingState<Vec<NewsItem>>,
    pub news_generation: u64,
    pub search: SearchState,
    pub search_generation: u64,
    pub debouncer: Debouncer,

    pub portfolio: PortfolioPane,
    pub trading: TradingPane,
    pub health: HealthPane,

    fetcher: Fetcher,
}

impl App {
    pub fn new(config: Config, authenticated: bool, fetcher: Fetcher) -> Self {
        let theme_choice = config.theme;
        Self {
            theme: Theme::from_choice(theme_choice),
            theme_choice,
            authenticated,
            active_view: ActiveView::Portfolio,
            sidebar_visible: true,
            input_mode: InputMode::Normal,
            should_quit: false,
            holdings: LoadingState::NotStarted,
            holdings_generation: 0,
            news: LoadingState::NotStarted,
            news_generation: 0,
            search: SearchState::default(),
            search_generation: 0,
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            portfolio: PortfolioPane::new(),
            trading: TradingPane::new(),
            health: HealthPane::new(),
            fetcher,
            config,
        }
    }

    /// Kick off the initial loads (or seed the demo portfolio).
    pub fn start(&mut self) {
        if self.config.demo {
            self.holdings = LoadingState::Loaded(demo_holdings());
            self.news = LoadingState::Loaded(demo_news());
            return;
        }
        self.refresh_holdings();
        self.refresh_news();
    }

    // =========================================================================
    // Fetch dispatch
    // =========================================================================

    pub fn refresh_holdings(&mut self) {
        if self.config.demo {
            return;
        }
        self.holdings_generation += 1;
        self.holdings = LoadingState::Loading;
        self.fetcher.spawn_holdings(self.holdings_generation);
    }

    pub fn refresh_news(&mut self) {
        if self.config.demo {
            return;
        }
        self.news_generation += 1;
        self.news = LoadingState::Loading;
        self.fetcher.spawn_news(self.news_generation);
    }

    fn probe_health(&mut self) {
        self.health.api_generation += 1;
        self.health.api = LoadingState::Loading;
        self.fetcher.spawn_health(self.health.api_generation);
        if self.authenticated {
            self.health.private_generation += 1;
            self.health.private = LoadingState::Loading;
            self.fetcher.spawn_private_probe(self.health.private_generation);
        }
        self.health.mark_probed();
    }

    fn refresh_active(&mut self) {
        match self.active_view {
            ActiveView::Portfolio => {
                self.refresh_holdings();
                self.refresh_news();
            }
            ActiveView::Heatmap | ActiveView::Trading => self.refresh_holdings(),
            ActiveView::Health => self.probe_health(),
        }
    }

    /// Release a debounced search query once its timer expires.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            self.search_generation += 1;
            self.search.loading = true;
            self.search.error = None;
            self.fetcher.spawn_search(self.search_generation, query);
        }
    }

    // =========================================================================
    // Fetch completion
    // =========================================================================

    /// Apply a fetch completion. Completions tagged with a superseded
    /// generation are dropped; everything else applies regardless of
    /// which view is active.
    pub fn apply(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Holdings { generation, result } => {
                if generation != self.holdings_generation {
                    debug!(generation, "dropping stale holdings result");
                    return;
                }
                match result {
                    Ok(holdings) => {
                        self.portfolio.clamp_selection(holdings.len());
                        self.trading.clamp_selection(holdings.len());
                        self.holdings = LoadingState::Loaded(holdings);
                    }
                    Err(err) => self.holdings = LoadingState::Error(err.to_string()),
                }
            }
            FetchMessage::News { generation, result } => {
                if generation != self.news_generation {
                    debug!(generation, "dropping stale news result");
                    return;
                }
                match result {
                    Ok(items) => self.news = LoadingState::Loaded(items),
                    Err(err) => self.news = LoadingState::Error(err.to_string()),
                }
            }
            FetchMessage::Search {
                generation,
                query,
                result,
            } => {
                if generation != self.search_generation {
                    debug!(generation, %query, "dropping stale search result");
                    return;
                }
                self.search.loading = false;
                match result {
                    Ok(results) => {
                        self.search.error = None;
                        self.search.results = results;
                        self.portfolio.form.suggestion_cursor = None;
                    }
                    Err(err) => {
                        self.search.error = Some(err.to_string());
                        self.search.results.clear();
                        self.portfolio.form.suggestion_cursor = None;
                    }
                }
            }
            FetchMessage::Health { generation, result } => {
                if generation != self.health.api_generation {
                    return;
                }
                self.health.api = match result {
                    Ok(status) => LoadingState::Loaded(status),
                    Err(err) => LoadingState::Error(err.to_string()),
                };
            }
            FetchMessage::PrivateProbe { generation, result } => {
                if generation != self.health.private_generation {
                    return;
                }
                self.health.private = match result {
                    Ok(()) => LoadingState::Loaded(()),
                    Err(err) => LoadingState::Error(err.to_string()),
                };
            }
            FetchMessage::HoldingCreated { result } => match result {
                Ok(()) => {
                    self.portfolio.form.reset();
                    self.debouncer.cancel();
                    self.clear_search();
                    self.input_mode = InputMode::Normal;
                    self.refresh_holdings();
                }
                Err(err) => {
                    // The user's entries stay in place for another try.
                    self.portfolio.form.submitting = false;
                    self.portfolio.form.error = Some(err.to_string());
                }
            },
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::AddHolding => self.handle_form_key(key, now),
            InputMode::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('m') => self.sidebar_visible = !self.sidebar_visible,
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('r') => self.refresh_active(),
            KeyCode::Tab => self.set_view(self.active_view.next()),
            KeyCode::BackTab => self.set_view(self.active_view.previous()),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(view) = ActiveView::all()
                    .iter()
                    .find(|v| v.shortcut() == c)
                    .copied()
                {
                    self.set_view(view);
                }
            }
            _ => self.handle_view_key(key),
        }
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        let holdings_len = self.holdings.data().map_or(0, Vec::len);
        match self.active_view {
            ActiveView::Portfolio => match key.code {
                KeyCode::Char('a') => {
                    self.input_mode = InputMode::AddHolding;
                    self.portfolio.form.error = None;
                }
                KeyCode::Down | KeyCode::Char('j') => self.portfolio.select_next(holdings_len),
                KeyCode::Up | KeyCode::Char('k') => self.portfolio.select_previous(),
                _ => {}
            },
            ActiveView::Trading => match key.code {
                KeyCode::Char('i') => self.input_mode = InputMode::Chat,
                KeyCode::Down | KeyCode::Char('j') => self.trading.select_next(holdings_len),
                KeyCode::Up | KeyCode::Char('k') => self.trading.select_previous(),
                _ => {}
            },
            ActiveView::Heatmap | ActiveView::Health => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.debouncer.cancel();
                self.clear_search();
            }
            KeyCode::Tab => self.portfolio.form.next_field(),
            KeyCode::BackTab => self.portfolio.form.previous_field(),
            KeyCode::Down if self.symbol_suggestions_open() => {
                let len = self.search.results.len();
                self.portfolio.form.move_suggestion_cursor(1, len);
            }
            KeyCode::Up if self.symbol_suggestions_open() => {
                let len = self.search.results.len();
                self.portfolio.form.move_suggestion_cursor(-1, len);
            }
            KeyCode::Enter => {
                let cursor = self.portfolio.form.suggestion_cursor;
                if self.portfolio.form.focus == FormField::Symbol {
                    if let Some(choice) =
                        cursor.and_then(|i| self.search.results.get(i).cloned())
                    {
                        self.portfolio.form.apply_suggestion(&choice);
                        self.debouncer.cancel();
                        self.clear_search();
                        return;
                    }
                }
                self.submit_form();
            }
            KeyCode::Backspace => match self.portfolio.form.focus {
                FormField::Symbol => {
                    if self.portfolio.form.symbol.backspace() {
                        self.portfolio.form.symbol_edited();
                        self.symbol_changed(now);
                    }
                }
                FormField::Shares => {
                    self.portfolio.form.shares.backspace();
                }
                FormField::Price => {
                    self.portfolio.form.price.backspace();
                }
            },
            KeyCode::Char(c) => match self.portfolio.form.focus {
                FormField::Symbol => {
                    if self.portfolio.form.symbol.insert(c) {
                        self.portfolio.form.symbol_edited();
                        self.symbol_changed(now);
                    }
                }
                FormField::Shares => {
                    self.portfolio.form.shares.insert(c);
                }
                FormField::Price => {
                    self.portfolio.form.price.insert(c);
                }
            },
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.trading.send(),
            KeyCode::Backspace => {
                self.trading.input.pop();
            }
            KeyCode::Char(c) => self.trading.input.push(c),
            _ => {}
        }
    }

    fn symbol_suggestions_open(&self) -> bool {
        self.portfolio.form.focus == FormField::Symbol && !self.search.results.is_empty()
    }

    /// The symbol field changed: restart the debounce timer, or clear
    /// results immediately when the query emptied.
    fn symbol_changed(&mut self, now: Instant) {
        let query = self.portfolio.form.symbol.value().trim().to_string();
        if query.is_empty() {
            self.debouncer.cancel();
            self.clear_search();
        } else {
            self.debouncer.input(query, now);
        }
    }

    fn clear_search(&mut self) {
        self.search.results.clear();
        self.search.loading = false;
        self.search.error = None;
        self.portfolio.form.suggestion_cursor = None;
    }

    /// Validate and submit the add-holding form. Disabled while a
    /// submission is in flight.
    pub fn submit_form(&mut self) {
        if self.portfolio.form.submitting {
            return;
        }
        let Some(request) = self.portfolio.form.validate_request() else {
            return;
        };
        if self.config.demo {
            self.demo_add_holding(&request.symbol, request.shares, request.avg_price);
            self.portfolio.form.reset();
            self.debouncer.cancel();
            self.clear_search();
            self.input_mode = InputMode::Normal;
            return;
        }
        self.portfolio.form.submitting = true;
        self.portfolio.form.error = None;
        self.fetcher.spawn_create_holding(request);
    }

    fn demo_add_holding(&mut self, symbol: &str, shares: f64, avg_price: f64) {
        let mut holdings = match std::mem::take(&mut self.holdings) {
            LoadingState::Loaded(h) => h,
            _ => Vec::new(),
        };
        holdings.push(Holding {
            id: format!("demo-{}", holdings.len() + 1),
            symbol: symbol.to_string(),
            name: format!("{symbol} Company"),
            shares,
            avg_price,
            current_price: avg_price,
        });
        self.holdings = LoadingState::Loaded(holdings);
    }

    fn set_view(&mut self, view: ActiveView) {
        self.active_view = view;
        if view == ActiveView::Health && self.health.needs_probe() {
            self.probe_health();
        }
    }

    fn toggle_theme(&mut self) {
        self.theme_choice = match self.theme_choice {
            ThemeChoice::Dark => ThemeChoice::Light,
            ThemeChoice::Light => ThemeChoice::Dark,
        };
        self.theme = Theme::from_choice(self.theme_choice);
    }
}

// =============================================================================
// Rendering
// =============================================================================

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let (sidebar_area, main_area) = if app.sidebar_visible && area.width > SIDEBAR_WIDTH * 2 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        (Some(columns[0]), columns[1])
    } else {
        (None, area)
    };

    if let Some(sidebar) = sidebar_area {
        navigation::render_sidebar(frame, sidebar, app.active_view, &app.theme);
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(main_area);

    navigation::render_title_bar(frame, rows[0], app);
    match app.active_view {
        ActiveView::Portfolio => portfolio::render(frame, rows[1], app),
        ActiveView::Heatmap => heatmap::render(frame, rows[1], app),
        ActiveView::Trading => trading::render(frame, rows[1], app),
        ActiveView::Health => crate::health::render(frame, rows[1], app),
    }
    navigation::render_status_bar(frame, rows[2], app);
}

// =============================================================================
// Demo data
// =============================================================================

/// The five-position demo portfolio.
pub fn demo_holdings() -> Vec<Holding> {
    [
        ("1", "AAPL", "Apple Inc.", 50.0, 150.0, 175.0),
        ("2", "GOOGL", "Alphabet Inc.", 30.0, 2800.0, 2950.0),
        ("3", "MSFT", "Microsoft Corp.", 40.0, 300.0, 320.0),
        ("4", "TSLA", "Tesla Inc.", 25.0, 700.0, 680.0),
        ("5", "NVDA", "NVIDIA Corp.", 35.0, 450.0, 520.0),
    ]
    .into_iter()
    .map(|(id, symbol, name, shares, avg_price, current_price)| Holding {
        id: id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        shares,
        avg_price,
        current_price,
    })
    .collect()
}

fn demo_news() -> Vec<NewsItem> {
    [
        (
            "n1",
            "Markets rally as tech earnings beat expectations",
            "Newswire",
            2,
        ),
        (
            "n2",
            "Chipmakers extend gains on data-center demand",
            "Market Daily",
            5,
        ),
        (
            "n3",
            "EV deliveries slip for a second straight quarter",
            "Street Brief",
            9,
        ),
    ]
    .into_iter()
    .map(|(id, title, source, hours_ago)| NewsItem {
        id: id.to_string(),
        title: title.to_string(),
        source: source.to_string(),
        published: Utc::now() - chrono::Duration::hours(hours_ago),
        url: format!("https://news.example.com/{id}"),
    })
    .collect()
}
