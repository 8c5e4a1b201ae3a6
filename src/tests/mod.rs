//! Test modules for the dashboard
//!
//! - `api_test` - payload normalization, derived holding math, error display
//! - `metrics_test` - portfolio summary calculator
//! - `fetch_test` - search debouncer
//! - `app_test` - application state, navigation, input modes
//! - `integration_test` - fetch-completion flow through the app state

#[cfg(test)]
pub mod api_test;


#[cfg(test)]
pub mod fetch_test;

#[cfg(test)]
pub mod integration_test;
