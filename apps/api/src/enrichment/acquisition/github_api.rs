//! Structured-API strategy: user resource, then the user's owned repositories.
//!
//! The user lookup is a precondition; repositories are an enrichment. A failed
//! repository call degrades to an empty list instead of failing the acquisition.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use super::{
    describe_transport_error, status_line, AcquisitionError, ProfileApi, Repository,
    StructuredProfile,
};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const API_USER_AGENT: &str = concat!("gittalent/", env!("CARGO_PKG_VERSION"));
/// Upper bound on repositories requested per profile.
pub const REPOSITORY_PAGE_SIZE: u32 = 50;
/// How much of an upstream error body is echoed into diagnostics.
const ERROR_SNIPPET_CHARS: usize = 100;

/// JSON shape of `GET /users/{username}`.
#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
    name: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
}

/// JSON shape of one entry of `GET /users/{username}/repos`.
#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    html_url: String,
    #[serde(default)]
    fork: bool,
    updated_at: DateTime<Utc>,
}

impl From<ApiRepository> for Repository {
    fn from(repo: ApiRepository) -> Self {
        Repository {
            name: repo.name,
            description: repo.description,
            language: repo.language,
            stars: repo.stargazers_count,
            url: repo.html_url,
            fork: repo.fork,
            updated_at: repo.updated_at,
        }
    }
}

/// Client for the subset of the GitHub REST API the pipeline consumes.
#[derive(Clone)]
pub struct GitHubApiClient {
    client: Client,
    base_url: String,
}

impl GitHubApiClient {
    /// `base_url` should be like `https://api.github.com` (trailing slash is ignored).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(API_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_user(&self, username: &str) -> Result<ApiUser, AcquisitionError> {
        let url = format!("{}/users/{username}", self.base_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            let detail = describe_transport_error(&e);
            warn!(username, "user lookup failed: {detail}");
            AcquisitionError::api(None, format!("GitHub API request failed: {detail}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(ERROR_SNIPPET_CHARS).collect();
            warn!(username, status = status.as_u16(), "user lookup returned non-success status");
            return Err(AcquisitionError::api(
                Some(status.as_u16()),
                format!(
                    "GitHub API error for user profile: {}. User might not exist or API limit \
                    reached. Details: {snippet}",
                    status_line(status)
                ),
            ));
        }

        response.json::<ApiUser>().await.map_err(|e| {
            AcquisitionError::api(
                Some(status.as_u16()),
                format!("GitHub API returned an undecodable user payload: {e}"),
            )
        })
    }

    async fn fetch_repositories(&self, username: &str) -> Result<Vec<Repository>, AcquisitionError> {
        let url = format!("{}/users/{username}/repos", self.base_url);
        let page_size = REPOSITORY_PAGE_SIZE.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("type", "owner"),
                ("sort", "updated"),
                ("per_page", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AcquisitionError::api(None, describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::api(
                Some(status.as_u16()),
                status_line(status),
            ));
        }

        let repos: Vec<ApiRepository> = response.json().await.map_err(|e| {
            AcquisitionError::api(Some(status.as_u16()), format!("undecodable repositories: {e}"))
        })?;

        let total = repos.len();
        let owned: Vec<Repository> = repos
            .into_iter()
            .filter(|r| !r.fork)
            .map(Repository::from)
            .collect();
        info!(username, total, kept = owned.len(), "fetched repositories (forks excluded)");
        Ok(owned)
    }
}

#[async_trait]
impl ProfileApi for GitHubApiClient {
    async fn fetch_profile(&self, username: &str) -> Result<StructuredProfile, AcquisitionError> {
        info!(username, "fetching profile via GitHub API");
        let user = self.fetch_user(username).await?;
        info!(username, public_repos = user.public_repos, "fetched user data");

        let repositories = match self.fetch_repositories(username).await {
            Ok(repos) => repos,
            Err(e) => {
                warn!(username, "could not fetch repositories, continuing without them: {e}");
                Vec::new()
            }
        };

        Ok(StructuredProfile {
            username: user.login,
            bio: user.bio,
            display_name: user.name,
            location: user.location,
            public_repo_count: user.public_repos,
            followers: user.followers,
            following: user.following,
            repositories,
        })
    }
}
