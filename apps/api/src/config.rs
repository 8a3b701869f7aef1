use std::time::Duration;

use anyhow::{Context, Result};

use crate::enrichment::validator::PageHeuristics;

const DEFAULT_PROFILE_HOST: &str = "github.com";
const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 200_000;
const DEFAULT_MIN_CONTENT_LENGTH: usize = 2_500;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Host a profile URL must point at to be resolvable.
    pub profile_host: String,
    pub github_api_base_url: String,
    /// Applies to every outbound acquisition request.
    pub fetch_timeout: Duration,
    /// Raw documents are truncated to this many characters.
    pub max_content_length: usize,
    pub heuristics: PageHeuristics,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mut heuristics = PageHeuristics {
            min_content_length: parse_env("MIN_CONTENT_LENGTH", DEFAULT_MIN_CONTENT_LENGTH)?,
            ..PageHeuristics::default()
        };
        if let Some(phrases) = list_env("LOGIN_PAGE_PHRASES") {
            heuristics.login_phrases = phrases;
        }
        if let Some(phrases) = list_env("ERROR_PAGE_PHRASES") {
            heuristics.error_phrases = phrases;
        }
        if let Some(signatures) = list_env("MALFORMED_UPSTREAM_SIGNATURES") {
            heuristics.malformed_signatures = signatures;
        }

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            profile_host: std::env::var("PROFILE_HOST")
                .unwrap_or_else(|_| DEFAULT_PROFILE_HOST.to_string()),
            github_api_base_url: std::env::var("GITHUB_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_BASE_URL.to_string()),
            fetch_timeout: Duration::from_secs(parse_env(
                "FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            max_content_length: parse_env("MAX_CONTENT_LENGTH", DEFAULT_MAX_CONTENT_LENGTH)?,
            heuristics,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Reads a comma-separated list. Unset or all-blank values keep the defaults.
fn list_env(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let items = split_list(&raw);
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
