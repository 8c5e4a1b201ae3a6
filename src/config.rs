//! Runtime configuration
//!
//! All settings come from the environment (a `.env` file is honored).
//! The API base falls back to the local development backend.

use std::env;

/// Default backend when `TMB_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, no trailing slash.
    pub api_base: String,
    /// Bearer token for the session; `None` runs anonymously.
    pub api_token: Option<String>,
    pub theme: ThemeChoice,
    /// Log file path; logging is disabled when unset.
    pub log_file: Option<String>,
    /// Seed the demo portfolio instead of fetching.
    pub demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let api_base = env::var("TMB_API_BASE")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_token = env::var("TMB_API_TOKEN")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let theme = match env::var("TMB_THEME").as_deref() {
            Ok("light") => ThemeChoice::Light,
            _ => ThemeChoice::Dark,
        };
        let log_file = env::var("TMB_LOG")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let demo = matches!(env::var("TMB_DEMO").as_deref(), Ok("1") | Ok("true"));
        Self {
            api_base,
            api_token,
            theme,
            log_file,
            demo,
        }
    }
}
