//! Identifier Resolver — turns a user-supplied profile URL into a username.
//!
//! First gate of every run: nothing downstream executes without a resolved
//! identifier, and a failure here happens before any network activity.

use reqwest::Url;
use thiserror::Error;

/// A username extracted from a profile URL on the configured host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileIdentifier {
    pub username: String,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid GitHub profile URL '{input}': {reason}")]
pub struct ResolutionError {
    pub input: String,
    pub reason: String,
}

impl ResolutionError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Extracts the first non-empty path segment of `input` as the username.
///
/// Accepts `host` itself or its `www.` alias, case-insensitively. Pure.
pub fn resolve_profile_url(input: &str, host: &str) -> Result<ProfileIdentifier, ResolutionError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ResolutionError::new(input, format!("could not parse URL ({e})")))?;

    let actual_host = url
        .host_str()
        .ok_or_else(|| ResolutionError::new(input, "URL has no host"))?
        .to_ascii_lowercase();
    let expected = host.to_ascii_lowercase();
    let host_matches =
        actual_host == expected || actual_host.strip_prefix("www.") == Some(expected.as_str());
    if !host_matches {
        return Err(ResolutionError::new(
            input,
            format!("host '{actual_host}' is not {expected}"),
        ));
    }

    let username = url
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()))
        .ok_or_else(|| ResolutionError::new(input, "URL has no username path segment"))?;

    Ok(ProfileIdentifier {
        username: username.to_string(),
        source_url: trimmed.to_string(),
    })
}
