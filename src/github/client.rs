//! HTTP client for the GitHub REST API.
//!
//! Only two read-only endpoints are used: the owned-repository listing
//! and the per-repository clone traffic.

use crate::github::pagination::collect_pages;
use crate::models::{CloneTraffic, RepoSummary};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Everything the client needs to talk to the API.
#[derive(Clone)]
pub struct ApiConfig {
    pub api_url: String,
    pub token: String,
    pub username: String,
    pub per_page: u32,
    pub max_pages: u32,
    pub timeout_seconds: u64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("per_page", &self.per_page)
            .field("max_pages", &self.max_pages)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ApiConfig {
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    fn repos_page_url(&self, page: u32) -> String {
        self.endpoint(&format!(
            "user/repos?per_page={}&page={}&type=owner",
            self.per_page, page
        ))
    }

    fn clone_traffic_url(&self, repo: &str) -> String {
        self.endpoint(&format!("repos/{}/{}/traffic/clones", self.username, repo))
    }
}

/// Why a single request produced no data.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("access denied (HTTP 403)")]
    Forbidden,
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Source of repository listings and clone traffic.
///
/// The collector is written against this trait so runs can be driven
/// without the network.
#[allow(async_fn_in_trait)]
pub trait TrafficSource {
    /// Name of the account whose repositories are listed.
    fn account(&self) -> &str;

    /// Repositories owned by the account. May be partial.
    async fn list_repositories(&self) -> Vec<RepoSummary>;

    /// Clone traffic window for one repository.
    async fn clone_traffic(&self, repo: &str) -> Result<CloneTraffic, FetchError>;
}

/// Client for the GitHub REST API.
pub struct GithubClient {
    config: ApiConfig,
    http_client: reqwest::Client,
}

impl GithubClient {
    /// Create a client with auth, accept and user-agent headers preset.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .context("GitHub token contains characters not allowed in a header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("clonetrack/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        info!("GitHub client ready for {} at {}", config.username, config.api_url);

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch one page of the owned-repository listing.
    pub async fn list_repositories_page(&self, page: u32) -> Result<Vec<RepoSummary>, FetchError> {
        self.get_json(&self.config.repos_page_url(page)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.config.timeout_seconds)
            } else {
                FetchError::Transport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = if status == StatusCode::FORBIDDEN {
                String::new()
            } else {
                response.text().await.unwrap_or_default()
            };
            return Err(status_error(status, body));
        }

        let bytes = response.bytes().await?;
        decode_body(&bytes)
    }
}

/// Error for a non-success status. A 403 is what GitHub returns for
/// traffic the token may not see, so it gets its own variant.
fn status_error(status: StatusCode, mut body: String) -> FetchError {
    if status == StatusCode::FORBIDDEN {
        return FetchError::Forbidden;
    }
    truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
    FetchError::Status { status, body }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))
}

impl TrafficSource for GithubClient {
    fn account(&self) -> &str {
        &self.config.username
    }

    async fn list_repositories(&self) -> Vec<RepoSummary> {
        collect_pages(self.config.max_pages, |page| self.list_repositories_page(page)).await
    }

    async fn clone_traffic(&self, repo: &str) -> Result<CloneTraffic, FetchError> {
        self.get_json(&self.config.clone_traffic_url(repo)).await
    }
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
