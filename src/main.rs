//! Trust Me Bro Capital — terminal dashboard
//!
//! A keyboard-driven dashboard over the portfolio backend: holdings and
//! derived totals, a value/performance heatmap, a trading view with the
//! external chart widget and the assistant, and a backend health view.

mod api;
mod app;
mod components;
mod config;
mod fetch;
mod health;
mod heatmap;
mod metrics;
mod navigation;
mod portfolio;
mod session;
mod theme;
mod trading;

#[cfg(test)]
mod tests;

use std::fs::OpenOptions;
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::api::ApiClient;
use crate::app::App;
use crate::config::Config;
use crate::fetch::{FetchMessage, Fetcher};

/// Idle redraw interval when nothing is pending.
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logging(&config)?;

    let session = session::from_token(config.api_token.clone());
    let client = Arc::new(ApiClient::new(config.api_base.clone(), session));
    let authenticated = client.is_authenticated();
    let (tx, rx) = mpsc::channel();
    let fetcher = Fetcher::new(client, tx);

    let mut app = App::new(config, authenticated, fetcher);
    app.start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &Receiver<FetchMessage>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app::render(frame, app))?;

        let now = Instant::now();
        let timeout = app
            .debouncer
            .time_until_ready(now)
            .map_or(TICK, |remaining| remaining.min(TICK));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                _ => {}
            }
        }

        while let Ok(message) = rx.try_recv() {
            app.apply(message);
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    info!(api_base = %config.api_base, demo = config.demo, "starting dashboard");
    Ok(())
}
