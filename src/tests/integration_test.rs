//! Integration tests: fetch completions flowing through the app state

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app_test::test_app;
use crate::api::{ApiError, HealthStatus, SymbolMatch};
use crate::app::{demo_holdings, App, InputMode, LoadingState};
use crate::fetch::FetchMessage;
use crate::navigation::ActiveView;

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::empty()), Instant::now());
}

// ============================================================================
// GENERATION HANDLING
// ============================================================================

#[test]
fn test_holdings_result_applies_after_tab_switch() {
    let (mut app, _rx) = test_app(false);
    app.holdings_generation = 1;
    app.holdings = LoadingState::Loading;

    // The user wanders off to another tab while the fetch is in flight.
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.active_view, ActiveView::Heatmap);

    app.apply(FetchMessage::Holdings {
        generation: 1,
        result: Ok(demo_holdings()),
    });
    assert_eq!(app.holdings.data().map(Vec::len), Some(5));
}

#[test]
fn test_stale_holdings_result_is_dropped() {
    let (mut app, _rx) = test_app(false);
    app.holdings_generation = 2;
    app.holdings = LoadingState::Loading;

    app.apply(FetchMessage::Holdings {
        generation: 1,
        result: Ok(demo_holdings()),
    });
    assert!(app.holdings.is_loading());
}

#[test]
fn test_holdings_error_replaces_data() {
    let (mut app, _rx) = test_app(false);
    app.holdings_generation = 1;
    app.holdings = LoadingState::Loaded(demo_holdings());

    app.apply(FetchMessage::Holdings {
        generation: 1,
        result: Err(ApiError::Http {
            status: 502,
            message: "bad gateway".to_string(),
        }),
    });
    assert!(app.holdings.is_error());
    assert!(app.holdings.data().is_none());
    assert_eq!(app.holdings.error_message(), Some("HTTP 502: bad gateway"));
}

#[test]
fn test_loaded_holdings_clamp_selections() {
    let (mut app, _rx) = test_app(false);
    app.holdings_generation = 1;
    app.portfolio.selected = 10;
    app.trading.selected = 10;

    app.apply(FetchMessage::Holdings {
        generation: 1,
        result: Ok(demo_holdings()),
    });
    assert_eq!(app.portfolio.selected, 4);
    assert_eq!(app.trading.selected, 4);
}

// ============================================================================
// SEARCH FLOW
// ============================================================================

#[test]
fn test_search_results_apply_for_current_generation() {
    let (mut app, _rx) = test_app(false);
    app.search_generation = 3;
    app.search.loading = true;

    app.apply(FetchMessage::Search {
        generation: 3,
        query: "AAPL".to_string(),
        result: Ok(vec![SymbolMatch {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
        }]),
    });
    assert!(!app.search.loading);
    assert_eq!(app.search.results.len(), 1);
    assert!(app.search.error.is_none());
}

#[test]
fn test_stale_search_results_are_dropped() {
    let (mut app, _rx) = test_app(false);
    app.search_generation = 3;
    app.search.loading = true;

    app.apply(FetchMessage::Search {
        generation: 2,
        query: "AAP".to_string(),
        result: Ok(vec![SymbolMatch {
            symbol: "AAP".to_string(),
            name: "Advance Auto Parts".to_string(),
        }]),
    });
    assert!(app.search.loading);
    assert!(app.search.results.is_empty());
}

#[test]
fn test_search_failure_clears_results() {
    let (mut app, _rx) = test_app(false);
    app.search_generation = 1;
    app.search.loading = true;
    app.search.results = vec![SymbolMatch {
        symbol: "AAPL".to_string(),
        name: "Apple Inc.".to_string(),
    }];

    app.apply(FetchMessage::Search {
        generation: 1,
        query: "AAPL".to_string(),
        result: Err(ApiError::Network("connection refused".to_string())),
    });
    assert!(app.search.results.is_empty());
    assert!(app.search.error.is_some());
}

#[test]
fn test_typing_then_tick_issues_one_search() {
    let (mut app, _rx) = test_app(false);
    let t0 = Instant::now();
    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.input_mode, InputMode::AddHolding);

    app.handle_key(
        KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()),
        t0,
    );
    app.handle_key(
        KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()),
        t0 + std::time::Duration::from_millis(100),
    );

    // Still inside the debounce window: no request yet.
    app.tick(t0 + std::time::Duration::from_millis(250));
    assert_eq!(app.search_generation, 0);

    // Quiet period elapsed: exactly one generation is issued.
    app.tick(t0 + std::time::Duration::from_millis(450));
    assert_eq!(app.search_generation, 1);
    assert!(app.search.loading);

    app.tick(t0 + std::time::Duration::from_millis(900));
    assert_eq!(app.search_generation, 1);
}

#[test]
fn test_emptying_the_query_clears_results_immediately() {
    let (mut app, _rx) = test_app(false);
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Char('x'));
    app.search.results = vec![SymbolMatch {
        symbol: "X".to_string(),
        name: "US Steel".to_string(),
    }];

    press(&mut app, KeyCode::Backspace);
    assert!(app.search.results.is_empty());
    assert!(!app.debouncer.is_pending());
}

// ============================================================================
// ADD-HOLDING SUBMISSION
// ============================================================================

fn fill_form(app: &mut App) {
    press(app, KeyCode::Char('a'));
    for c in "AAPL".chars() {
        press(app, KeyCode::Char(c));
    }
    press(app, KeyCode::Tab);
    for c in "50".chars() {
        press(app, KeyCode::Char(c));
    }
    press(app, KeyCode::Tab);
    for c in "150".chars() {
        press(app, KeyCode::Char(c));
    }
}

#[test]
fn test_rejected_submission_retains_entered_values() {
    let (mut app, _rx) = test_app(false);
    fill_form(&mut app);
    app.portfolio.form.submitting = true;

    app.apply(FetchMessage::HoldingCreated {
        result: Err(ApiError::Http {
            status: 422,
            message: "invalid symbol".to_string(),
        }),
    });

    assert!(!app.portfolio.form.submitting);
    assert_eq!(
        app.portfolio.form.error.as_deref(),
        Some("HTTP 422: invalid symbol")
    );
    assert_eq!(app.portfolio.form.symbol.value(), "AAPL");
    assert_eq!(app.portfolio.form.shares.value(), "50");
    assert_eq!(app.portfolio.form.price.value(), "150");
    assert_eq!(app.input_mode, InputMode::AddHolding);
}

#[test]
fn test_accepted_submission_clears_form_and_refetches() {
    let (mut app, _rx) = test_app(false);
    fill_form(&mut app);
    app.portfolio.form.submitting = true;
    let generation_before = app.holdings_generation;

    app.apply(FetchMessage::HoldingCreated { result: Ok(()) });

    assert!(app.portfolio.form.symbol.value().is_empty());
    assert!(app.portfolio.form.error.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.holdings_generation, generation_before + 1);
    assert!(app.holdings.is_loading());
}

#[test]
fn test_submit_is_disabled_while_in_flight() {
    let (mut app, _rx) = test_app(false);
    fill_form(&mut app);
    app.portfolio.form.submitting = true;

    app.submit_form();
    assert!(app.portfolio.form.submitting);
    assert!(app.portfolio.form.error.is_none());
}

// ============================================================================
// HEALTH PROBES
// ============================================================================

#[test]
fn test_health_completion_applies() {
    let (mut app, _rx) = test_app(false);
    press(&mut app, KeyCode::Char('4'));
    assert!(app.health.api.is_loading());

    app.apply(FetchMessage::Health {
        generation: app.health.api_generation,
        result: Ok(HealthStatus::default()),
    });
    assert!(app.health.api.is_loaded());
}

#[test]
fn test_health_failure_is_local_to_its_row() {
    let (mut app, _rx) = test_app(false);
    app.holdings_generation = 1;
    app.holdings = LoadingState::Loaded(demo_holdings());
    press(&mut app, KeyCode::Char('4'));

    app.apply(FetchMessage::Health {
        generation: app.health.api_generation,
        result: Err(ApiError::Network("connection refused".to_string())),
    });
    assert!(app.health.api.is_error());
    // Other panels keep their data.
    assert!(app.holdings.is_loaded());
}
