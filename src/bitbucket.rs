use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::config::Config;
use crate::error::{Error, Result};

/// Lists are fetched in pages of this size, following the server's paging
/// envelope until `isLastPage`.
const PAGE_SIZE: u32 = 100;

const API_PREFIX: [&str; 3] = ["rest", "api", "1.0"];

/// One pooled client for the Bitbucket REST API, shared by every tool and
/// route for the process lifetime. Safe for concurrent use; the semaphore
/// caps how many requests are in flight at once.
pub struct BitbucketClient {
    http: reqwest::Client,
    permits: Semaphore,
    base_url: Url,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
struct Page<T> {
    #[serde(default)]
    values: Vec<T>,
    #[serde(rename = "isLastPage", default)]
    is_last_page: bool,
    #[serde(rename = "nextPageStart")]
    next_page_start: Option<u32>,
}

/// One pull request as returned by the server. Every field is optional —
/// the formatter substitutes a null marker rather than failing the call.
#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub author: Option<Participant>,
    #[serde(rename = "fromRef")]
    pub from_ref: Option<GitRef>,
    #[serde(rename = "toRef")]
    pub to_ref: Option<GitRef>,
}

impl PullRequest {
    /// Author display name, when the server includes one.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.user.display_name.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct Participant {
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// A branch or tag pointer, e.g. `refs/heads/main`.
#[derive(Debug, Deserialize)]
pub struct GitRef {
    pub id: Option<String>,
}

/// One changed file in a pull request.
#[derive(Debug, Deserialize)]
pub struct Change {
    pub path: Option<ChangePath>,
    #[serde(rename = "type")]
    pub change_type: Option<String>,
    #[serde(rename = "linesAdded")]
    pub lines_added: Option<u64>,
    #[serde(rename = "linesRemoved")]
    pub lines_removed: Option<u64>,
}

impl Change {
    pub fn path_string(&self) -> Option<&str> {
        self.path.as_ref().and_then(|p| p.full.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePath {
    #[serde(rename = "toString")]
    pub full: Option<String>,
}

impl BitbucketClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid base url {:?}: {e}", config.base_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(concat!("bitbridge/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .pool_max_idle_per_host(config.http.max_idle_connections)
            .pool_idle_timeout(Duration::from_secs(config.http.idle_timeout_secs))
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self {
            http,
            permits: Semaphore::new(config.http.max_connections),
            base_url,
            credentials: config.credentials.clone(),
        })
    }

    /// Open pull requests for a repository, in server order (newest first).
    pub async fn list_open_pull_requests(
        &self,
        project: &str,
        repository: &str,
    ) -> Result<Vec<PullRequest>> {
        let url = self.api_url(&["projects", project, "repos", repository, "pull-requests"])?;
        self.get_paged(url, &[("state", "OPEN"), ("order", "newest")])
            .await
    }

    /// Files touched by a pull request.
    pub async fn list_changes(
        &self,
        project: &str,
        repository: &str,
        pull_request_id: u64,
    ) -> Result<Vec<Change>> {
        let id = pull_request_id.to_string();
        let url = self.api_url(&[
            "projects",
            project,
            "repos",
            repository,
            "pull-requests",
            &id,
            "changes",
        ])?;
        self.get_paged(url, &[]).await
    }

    /// Raw diff for one file in a pull request, returned exactly as the
    /// server sends it.
    pub async fn file_diff(
        &self,
        project: &str,
        repository: &str,
        pull_request_id: u64,
        path: &str,
    ) -> Result<String> {
        let id = pull_request_id.to_string();
        let mut segments: Vec<&str> = vec![
            "projects",
            project,
            "repos",
            repository,
            "pull-requests",
            &id,
            "diff",
        ];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let url = self.api_url(&segments)?;
        self.get_body(url, "text/plain").await
    }

    /// Join `segments` onto the base URL under the API prefix. Each segment
    /// is percent-encoded, so project keys, slugs, and file names may contain
    /// characters that need escaping.
    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("base url {} cannot carry a path", self.base_url))
            })?;
            parts.pop_if_empty();
            parts.extend(API_PREFIX);
            parts.extend(segments.iter().copied());
        }
        Ok(url)
    }

    /// Walk the paging envelope until the server reports the last page,
    /// collecting `values` from each page in order.
    async fn get_paged<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut start = 0u32;
        loop {
            let mut page_url = url.clone();
            {
                let mut query = page_url.query_pairs_mut();
                for (key, value) in params {
                    query.append_pair(key, value);
                }
                query.append_pair("start", &start.to_string());
                query.append_pair("limit", &PAGE_SIZE.to_string());
            }
            let body = self.get_body(page_url, "application/json").await?;
            let page: Page<T> =
                serde_json::from_str(&body).map_err(|e| Error::Processing(e.to_string()))?;
            items.extend(page.values);
            match (page.is_last_page, page.next_page_start) {
                (false, Some(next)) => start = next,
                _ => break,
            }
        }
        Ok(items)
    }

    /// Issue one GET and read the whole body. The `Accept` override is set
    /// per request, merged over the client-wide JSON default; the shared
    /// default header map is never mutated.
    async fn get_body(&self, url: Url, accept: &str) -> Result<String> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::Processing("request limiter closed".into()))?;

        debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .header(ACCEPT, accept)
            .header(AUTHORIZATION, self.credentials.header_value())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%url, %status, %body, "Bitbucket request failed");
            return Err(Error::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}
