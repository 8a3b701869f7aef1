//! Content Quality Validator — classifies a fetched profile page before it
//! reaches the generator.
//!
//! Login walls, not-found pages and relayed serialization errors all look like
//! "some HTML" to a model, which will happily invent a profile from them.
//! `classify` is pure: no I/O, same input → same verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enrichment::acquisition::RawContent;

/// Phrases typical of authentication walls.
const DEFAULT_LOGIN_PHRASES: &[&str] = &[
    "sign in to github",
    "username or email address",
    "forgot password?",
    "sign in to continue",
    "you must be logged in",
    "please log in",
];

/// Phrases typical of not-found and generic error pages.
const DEFAULT_ERROR_PHRASES: &[&str] = &[
    "this is not the web page you are looking for",
    "page not found",
    "404 not found",
    "whoa there!",
    "something went wrong",
    "internal server error",
    "service unavailable",
];

/// Textual signatures of serialization errors relayed by an upstream proxy.
const DEFAULT_MALFORMED_SIGNATURES: &[&str] = &[
    "syntaxerror: unexpected token",
    "is not valid json",
    "unexpected end of json input",
    "failed to serialize",
    "serialization error",
];

/// Heuristic data used by the validator. Kept out of the classification logic
/// so deployments and tests can swap the lists.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeuristics {
    /// Minimum length in characters.
    pub min_content_length: usize,
    pub login_phrases: Vec<String>,
    pub error_phrases: Vec<String>,
    pub malformed_signatures: Vec<String>,
}

impl Default for PageHeuristics {
    fn default() -> Self {
        let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            min_content_length: 2_500,
            login_phrases: owned(DEFAULT_LOGIN_PHRASES),
            error_phrases: owned(DEFAULT_ERROR_PHRASES),
            malformed_signatures: owned(DEFAULT_MALFORMED_SIGNATURES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ValidationVerdict {
    Usable,
    TooShort { actual: usize, minimum: usize },
    LoginPage { matched: String },
    ErrorPage { matched: String },
    MalformedUpstream { detail: String },
}

impl ValidationVerdict {
    pub fn is_usable(&self) -> bool {
        matches!(self, ValidationVerdict::Usable)
    }

    /// Short category name used in flagged items and logs.
    pub fn category(&self) -> &'static str {
        match self {
            ValidationVerdict::Usable => "Usable",
            ValidationVerdict::TooShort { .. } => "TooShort",
            ValidationVerdict::LoginPage { .. } => "LoginPage",
            ValidationVerdict::ErrorPage { .. } => "ErrorPage",
            ValidationVerdict::MalformedUpstream { .. } => "MalformedUpstream",
        }
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationVerdict::Usable => write!(f, "Fetched content is usable"),
            ValidationVerdict::TooShort { actual, minimum } => write!(
                f,
                "Fetched content too short (length: {actual}, minimum: {minimum})"
            ),
            ValidationVerdict::LoginPage { matched } => write!(
                f,
                "Fetched content appears to be a login page (matched phrase: '{matched}')"
            ),
            ValidationVerdict::ErrorPage { matched } => write!(
                f,
                "Fetched content appears to be an error page (matched phrase: '{matched}')"
            ),
            ValidationVerdict::MalformedUpstream { detail } => write!(
                f,
                "Fetched content is an upstream serialization error, not a profile page ({detail})"
            ),
        }
    }
}

/// Classifies raw content. Rules run in order and the first match wins:
/// length, login phrase, error phrase, malformed-upstream signature.
pub fn classify(content: &RawContent, heuristics: &PageHeuristics) -> ValidationVerdict {
    if content.length < heuristics.min_content_length {
        return ValidationVerdict::TooShort {
            actual: content.length,
            minimum: heuristics.min_content_length,
        };
    }

    let lowered = content.text.to_lowercase();

    if let Some(matched) = first_match(&lowered, &heuristics.login_phrases) {
        return ValidationVerdict::LoginPage { matched };
    }

    if let Some(matched) = first_match(&lowered, &heuristics.error_phrases) {
        return ValidationVerdict::ErrorPage { matched };
    }

    if let Some(signature) = first_match(&lowered, &heuristics.malformed_signatures) {
        return ValidationVerdict::MalformedUpstream {
            detail: format!("matched signature: '{signature}'"),
        };
    }

    ValidationVerdict::Usable
}

fn first_match(haystack_lower: &str, needles: &[String]) -> Option<String> {
    needles
        .iter()
        .filter(|n| !n.trim().is_empty())
        .find(|n| haystack_lower.contains(&n.to_lowercase()))
        .cloned()
}
