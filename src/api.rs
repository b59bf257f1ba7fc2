//! Backend REST API client with headline retry.
//!
//! This module talks to the news backend over HTTP. Every endpoint answers
//! with a `{status, data, message}` envelope (see [`ApiEnvelope`]).
//!
//! # Architecture
//!
//! - [`NewsSource`]: core trait for fetching articles and summaries
//! - [`HttpNewsClient`]: `reqwest` implementation against the backend
//! - [`RetryingSource`]: decorator that retries the initial headlines load
//!
//! The auth endpoints (`auth/login`, `auth/register`) do not use the
//! envelope; they answer with bare `{token, user}` or `{message}` bodies.
//!
//! # Retry Strategy
//!
//! Only [`NewsSource::top_headlines`] is retried. After a failed first
//! attempt (including an empty result) up to 3 more attempts are made,
//! spaced by a fixed 2 seconds. Category, search and summary calls fail
//! straight through.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::{AppConfig, RetryConfig};
use crate::error::{NewsError, Result};
use crate::models::{
    ApiEnvelope, ApiStatus, Article, Category, Credentials, LoginResponse, MessageBody, SummaryData,
    SummaryRequest,
};
use crate::utils::truncate_for_log;

/// User agent sent with every request
const USER_AGENT: &str = concat!("newssum/", env!("CARGO_PKG_VERSION"));

/// Trait for fetching news and summaries.
///
/// Implementors return backend article lists and summary text; decorators
/// such as [`RetryingSource`] wrap another implementation.
pub trait NewsSource {
    /// Top headlines for a country.
    async fn top_headlines(&self, country: &str, page_size: usize) -> Result<Vec<Article>>;

    /// Headlines within one category feed.
    async fn by_category(
        &self,
        category: Category,
        country: &str,
        page_size: usize,
    ) -> Result<Vec<Article>>;

    /// Free-text search. A blank query yields no results.
    async fn search(&self, query: &str, page_size: usize) -> Result<Vec<Article>>;

    /// Summarize `text` to at most `max_length` words.
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String>;
}

/// HTTP client for the news backend.
#[derive(Debug, Clone)]
pub struct HttpNewsClient {
    http: Client,
    base: Url,
}

impl HttpNewsClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `http://localhost:5000/api`; endpoint
    ///   paths are joined beneath it
    /// * `timeout` - Per-request timeout applied to every call
    ///
    /// # Errors
    ///
    /// [`NewsError::Config`] when `base_url` is not an http(s) URL, or
    /// [`NewsError::Http`] when the TLS backend cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http, base })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for `path` (no leading slash) with a raw query string.
    fn endpoint(&self, path: &str, query: &str) -> Result<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| NewsError::Config(format!("Invalid endpoint {path}: {e}")))?;
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }

    /// Exchange credentials for an access token.
    ///
    /// # Returns
    ///
    /// The token from a `200 {token, user}` response.
    ///
    /// # Errors
    ///
    /// [`NewsError::Auth`] with the backend's message on 401 (wrong
    /// password or unknown user), [`NewsError::Api`] with the message for
    /// other rejections such as a missing field.
    #[instrument(level = "info", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = self.endpoint("auth/login", "")?;
        let resp = self
            .http
            .post(url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let login: LoginResponse = read_auth(resp).await?;
        info!("Login accepted");
        Ok(login.token)
    }

    /// Create an account. Returns the backend's confirmation message.
    #[instrument(level = "info", skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        let url = self.endpoint("auth/register", "")?;
        let resp = self
            .http
            .post(url)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body: MessageBody = read_auth(resp).await?;
        Ok(body
            .message
            .unwrap_or_else(|| "User created successfully".to_string()))
    }

    async fn get_articles(&self, url: Url) -> Result<Vec<Article>> {
        let t0 = Instant::now();
        let resp = self.http.get(url.clone()).send().await?;
        let articles = read_envelope::<Vec<Article>>(resp).await?.unwrap_or_default();
        debug!(
            %url,
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched articles"
        );
        Ok(articles)
    }
}

impl NewsSource for HttpNewsClient {
    #[instrument(level = "info", skip(self))]
    async fn top_headlines(&self, country: &str, page_size: usize) -> Result<Vec<Article>> {
        let query = format!(
            "country={}&pageSize={}",
            urlencoding::encode(country),
            page_size
        );
        let url = self.endpoint("news/top-headlines", &query)?;
        self.get_articles(url).await
    }

    #[instrument(level = "info", skip(self))]
    async fn by_category(
        &self,
        category: Category,
        country: &str,
        page_size: usize,
    ) -> Result<Vec<Article>> {
        let query = format!(
            "country={}&pageSize={}",
            urlencoding::encode(country),
            page_size
        );
        let url = self.endpoint(&format!("news/category/{}", category.slug()), &query)?;
        self.get_articles(url).await
    }

    #[instrument(level = "info", skip(self))]
    async fn search(&self, query: &str, page_size: usize) -> Result<Vec<Article>> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Blank search query; skipping request");
            return Ok(Vec::new());
        }
        let qs = format!("q={}&pageSize={}", urlencoding::encode(query), page_size);
        let url = self.endpoint("news/search", &qs)?;
        self.get_articles(url).await
    }

    #[instrument(level = "info", skip(self, text), fields(text_len = text.len()))]
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String> {
        let url = self.endpoint("summary/summarize", "")?;
        let t0 = Instant::now();
        let resp = self
            .http
            .post(url)
            .json(&SummaryRequest { text, max_length })
            .send()
            .await?;

        let data = read_envelope::<SummaryData>(resp)
            .await?
            .ok_or_else(|| NewsError::Api("summary response had no data".to_string()))?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Summary received");
        Ok(data.summary)
    }
}

/// Parse and validate the backend base URL.
///
/// A trailing slash is added so relative endpoint paths join beneath it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| NewsError::Config(format!("Invalid API base URL '{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(NewsError::Config(format!(
            "API base URL must be http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Decode a backend envelope, mapping error statuses to [`NewsError`].
async fn read_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>> {
    let status = resp.status();
    let body = resp.text().await?;

    match serde_json::from_str::<ApiEnvelope<T>>(&body) {
        Ok(envelope) if envelope.status == ApiStatus::Error => {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), %message, "Backend returned error envelope");
            Err(NewsError::Api(message))
        }
        Ok(envelope) if status.is_success() => Ok(envelope.data),
        Ok(_) => Err(NewsError::Status {
            code: status.as_u16(),
            body: truncate_for_log(&body, 200),
        }),
        Err(e) if status.is_success() => {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Backend returned non-conforming JSON"
            );
            Err(NewsError::Json(e))
        }
        Err(_) => Err(NewsError::Status {
            code: status.as_u16(),
            body: truncate_for_log(&body, 200),
        }),
    }
}

/// Decode a bare auth response, mapping `{message}` error bodies.
async fn read_auth<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;

    if status.is_success() {
        return serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Auth endpoint returned non-conforming JSON"
            );
            NewsError::Json(e)
        });
    }

    let message = serde_json::from_str::<MessageBody>(&body)
        .ok()
        .and_then(|b| b.message);
    warn!(status = status.as_u16(), message = ?message, "Auth request rejected");
    match (status.as_u16(), message) {
        (401, message) => Err(NewsError::Auth(
            message.unwrap_or_else(|| "Invalid credentials".to_string()),
        )),
        (_, Some(message)) => Err(NewsError::Api(message)),
        (code, None) => Err(NewsError::Status {
            code,
            body: truncate_for_log(&body, 200),
        }),
    }
}

/// Decorator that retries the initial headlines load.
///
/// # Retry Schedule
///
/// ```text
/// attempt 1 -> fail -> wait delay -> attempt 2 -> ... -> attempt 1 + retries
/// ```
///
/// An empty headline list counts as a failure ([`NewsError::NoArticles`]).
pub struct RetryingSource<T> {
    inner: T,
    retries: usize,
    delay: Duration,
}

impl<T> RetryingSource<T>
where
    T: NewsSource,
{
    /// Wrap `inner`, allowing `retries` extra attempts `delay` apart.
    pub fn new(inner: T, retries: usize, delay: Duration) -> Self {
        Self {
            inner,
            retries,
            delay,
        }
    }

    pub fn from_config(inner: T, config: &RetryConfig) -> Self {
        Self::new(
            inner,
            config.headline_retries,
            Duration::from_secs(config.delay_secs),
        )
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for RetryingSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingSource")
            .field("retries", &self.retries)
            .field("delay", &self.delay)
            .finish()
    }
}

impl<T> NewsSource for RetryingSource<T>
where
    T: NewsSource,
{
    #[instrument(level = "info", skip(self))]
    async fn top_headlines(&self, country: &str, page_size: usize) -> Result<Vec<Article>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            let result = match self.inner.top_headlines(country, page_size).await {
                Ok(articles) if articles.is_empty() => Err(NewsError::NoArticles),
                other => other,
            };

            match result {
                Ok(articles) => {
                    if attempt > 1 {
                        info!(attempt, "Headlines loaded after retry");
                    }
                    return Ok(articles);
                }
                Err(e) => {
                    let total_dt = total_t0.elapsed();
                    if attempt > self.retries {
                        error!(
                            attempt,
                            max_retries = self.retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "Headlines exhausted retries"
                        );
                        return Err(e);
                    }

                    warn!(
                        attempt,
                        max_retries = self.retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        delay = ?self.delay,
                        error = %e,
                        "Headlines attempt failed; retrying"
                    );
                    sleep(self.delay).await;
                }
            }
        }
    }

    async fn by_category(
        &self,
        category: Category,
        country: &str,
        page_size: usize,
    ) -> Result<Vec<Article>> {
        self.inner.by_category(category, country, page_size).await
    }

    async fn search(&self, query: &str, page_size: usize) -> Result<Vec<Article>> {
        self.inner.search(query, page_size).await
    }

    async fn summarize(&self, text: &str, max_length: usize) -> Result<String> {
        self.inner.summarize(text, max_length).await
    }
}
