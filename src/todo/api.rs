//! Async client for the task REST API.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::tag::{Tag, TagRequest, TagStats};
use super::task::{Priority, Status, Todo, TodoRequest, TodoStats};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API url {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        code: Option<String>,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The server's `errorCode`, e.g. `TAG_IN_USE`.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Server-side ordering of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "dueDate")]
    DueDate,
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "none")]
    Unsorted,
}

impl SortOrder {
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            SortOrder::DueDate => Some("dueDate"),
            SortOrder::Created => Some("created"),
            SortOrder::Unsorted => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SortOrder::DueDate => SortOrder::Created,
            SortOrder::Created => SortOrder::Unsorted,
            SortOrder::Unsorted => SortOrder::DueDate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::DueDate => "due date",
            SortOrder::Created => "created",
            SortOrder::Unsorted => "default",
        }
    }
}

/// Filters for `GET /todos`. The server applies only the first present
/// filter in the order search, tag, status, priority, sort.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoQuery {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub sort: SortOrder,
    pub tag_id: Option<i64>,
}

impl TodoQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_query().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_query().to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(sort) = self.sort.as_query() {
            pairs.push(("sort", sort.to_string()));
        }
        if let Some(tag_id) = self.tag_id {
            pairs.push(("tagId", tag_id.to_string()));
        }
        pairs
    }
}

/// Tag endpoints wrap their payload in `{success, data, message}`; task
/// endpoints answer bare. Accept either everywhere.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Envelope { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> T {
        match self {
            Payload::Envelope { data } => data,
            Payload::Bare(data) => data,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: Option<String>,
    error_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // ── Tasks ──

    pub async fn list_todos(&self, query: &TodoQuery) -> Result<Vec<Todo>> {
        let mut url = self.endpoint(&["todos"])?;
        let pairs = query.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        self.fetch(self.request(Method::GET, url)).await
    }

    pub async fn get_todo(&self, id: i64) -> Result<Todo> {
        let url = self.endpoint(&["todos", &id.to_string()])?;
        self.fetch(self.request(Method::GET, url)).await
    }

    pub async fn create_todo(&self, body: &TodoRequest) -> Result<Todo> {
        let url = self.endpoint(&["todos"])?;
        self.fetch(self.request(Method::POST, url).json(body)).await
    }

    pub async fn update_todo(&self, id: i64, body: &TodoRequest) -> Result<Todo> {
        let url = self.endpoint(&["todos", &id.to_string()])?;
        self.fetch(self.request(Method::PUT, url).json(body)).await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&["todos", &id.to_string()])?;
        self.execute(self.request(Method::DELETE, url)).await.map(|_| ())
    }

    pub async fn complete_todo(&self, id: i64) -> Result<Todo> {
        let url = self.endpoint(&["todos", &id.to_string(), "complete"])?;
        self.fetch(self.request(Method::PATCH, url)).await
    }

    pub async fn restart_todo(&self, id: i64) -> Result<Todo> {
        let url = self.endpoint(&["todos", &id.to_string(), "restart"])?;
        self.fetch(self.request(Method::PATCH, url)).await
    }

    /// Flip a task between pending and done, given its current status.
    pub async fn toggle_todo(&self, id: i64, current: Status) -> Result<Todo> {
        match current {
            Status::Done => self.restart_todo(id).await,
            Status::Pending => self.complete_todo(id).await,
        }
    }

    pub async fn change_priority(&self, id: i64, priority: Priority) -> Result<Todo> {
        let mut url = self.endpoint(&["todos", &id.to_string(), "priority"])?;
        url.query_pairs_mut().append_pair("priority", priority.as_query());
        self.fetch(self.request(Method::PATCH, url)).await
    }

    pub async fn stats(&self) -> Result<TodoStats> {
        let url = self.endpoint(&["todos", "stats"])?;
        self.fetch(self.request(Method::GET, url)).await
    }

    // ── Tags ──

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let url = self.endpoint(&["tags"])?;
        self.fetch(self.request(Method::GET, url)).await
    }

    pub async fn get_tag(&self, id: i64) -> Result<Tag> {
        let url = self.endpoint(&["tags", &id.to_string()])?;
        self.fetch(self.request(Method::GET, url)).await
    }

    pub async fn create_tag(&self, body: &TagRequest) -> Result<Tag> {
        let url = self.endpoint(&["tags"])?;
        self.fetch(self.request(Method::POST, url).json(body)).await
    }

    pub async fn update_tag(&self, id: i64, body: &TagRequest) -> Result<Tag> {
        let url = self.endpoint(&["tags", &id.to_string()])?;
        self.fetch(self.request(Method::PUT, url).json(body)).await
    }

    /// Fails with code `TAG_IN_USE` while any task still uses the tag.
    pub async fn delete_tag(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&["tags", &id.to_string()])?;
        self.execute(self.request(Method::DELETE, url)).await.map(|_| ())
    }

    pub async fn search_tags(&self, name: &str) -> Result<Vec<Tag>> {
        let mut url = self.endpoint(&["tags", "search"])?;
        url.query_pairs_mut().append_pair("name", name);
        self.fetch(self.request(Method::GET, url)).await
    }

    pub async fn tag_stats(&self, id: i64) -> Result<TagStats> {
        let url = self.endpoint(&["tags", &id.to_string(), "stats"])?;
        self.fetch(self.request(Method::GET, url)).await
    }

    // ── Plumbing ──

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let body = self.execute(req).await?;
        let payload: Payload<T> = serde_json::from_str(&body)?;
        Ok(payload.into_inner())
    }

    async fn execute(&self, req: RequestBuilder) -> Result<String> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        let err: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        log::warn!("API error {}: {}", status, body);
        Err(ApiError::Status {
            status,
            message: err
                .message
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
            code: err.error_code,
        })
    }
}
