//! Content Acquisition — the two interchangeable ways of getting profile content.
//!
//! - `page`: raw-document fetch of the profile page (feeds the validator).
//! - `github_api`: structured fetch of user + repositories via the REST API.
//!
//! Both strategies sit behind a trait, the same way `FitScorer` backends do, so the
//! orchestrator can run against in-memory fakes. Neither strategy retries: one
//! failure classification maps to exactly one attempt.

pub mod github_api;
pub mod page;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use github_api::GitHubApiClient;
pub use page::PageFetcher;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Text of a fetched document, already capped at the configured maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub text: String,
    /// Length in characters.
    pub length: usize,
    pub content_type: Option<String>,
}

impl RawContent {
    pub fn new(text: String, content_type: Option<String>) -> Self {
        let length = text.chars().count();
        Self {
            text,
            length,
            content_type,
        }
    }
}

/// A public repository owned by the profile. Forks never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub url: String,
    pub fork: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredProfile {
    pub username: String,
    pub bio: Option<String>,
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub public_repo_count: u64,
    pub followers: u64,
    pub following: u64,
    /// Most recently updated first, at most 50 before fork filtering.
    pub repositories: Vec<Repository>,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionErrorKind {
    /// Raw-document fetch got a non-success status.
    HttpError,
    /// DNS, connect, TLS, timeout or body read failure.
    TransportError,
    /// Structured-API user lookup failed.
    ApiError,
}

impl fmt::Display for AcquisitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AcquisitionErrorKind::HttpError => "HttpError",
            AcquisitionErrorKind::TransportError => "TransportError",
            AcquisitionErrorKind::ApiError => "ApiError",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct AcquisitionError {
    pub kind: AcquisitionErrorKind,
    /// Upstream HTTP status, when one was received.
    pub status: Option<u16>,
    pub detail: String,
}

impl AcquisitionError {
    pub fn http(status: u16, detail: impl Into<String>) -> Self {
        Self {
            kind: AcquisitionErrorKind::HttpError,
            status: Some(status),
            detail: detail.into(),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            kind: AcquisitionErrorKind::TransportError,
            status: None,
            detail: detail.into(),
        }
    }

    pub fn api(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            kind: AcquisitionErrorKind::ApiError,
            status,
            detail: detail.into(),
        }
    }

    /// True when the API reported that the user does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Describes a reqwest failure without leaking the full error chain formatting.
pub(crate) fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}

/// Formats a status as "404 Not Found".
pub(crate) fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy traits
// ────────────────────────────────────────────────────────────────────────────

/// Raw-document strategy.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document(&self, url: &str) -> Result<RawContent, AcquisitionError>;
}

/// Structured-API strategy.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch_profile(&self, username: &str) -> Result<StructuredProfile, AcquisitionError>;
}

/// Caps `text` at `max_chars` characters. Never fails; shorter input is returned as-is.
pub fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
    text
}
