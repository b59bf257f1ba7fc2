//! Article summaries
//!
//! [`Summarizer`] produces the summary shown on a card: from its cache,
//! from the canned demo paragraphs, or from the backend. Backend failures
//! never propagate; the card gets [`SUMMARY_UNAVAILABLE`] instead.

pub mod demo;

pub use demo::{SummaryTopic, classify, demo_summary};

use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::api::NewsSource;
use crate::config::{SummaryConfig, SummaryMode};
use crate::models::Article;

/// Message shown when the backend could not produce a summary
pub const SUMMARY_UNAVAILABLE: &str = "Unable to generate summary. Please try again later.";

/// Per-URL summary cache in front of a [`NewsSource`]
pub struct Summarizer<'a, S> {
    source: &'a S,
    mode: SummaryMode,
    max_length: usize,
    cache: Mutex<HashMap<String, String>>,
}

impl<'a, S> Summarizer<'a, S>
where
    S: NewsSource,
{
    pub fn new(source: &'a S, mode: SummaryMode, max_length: usize) -> Self {
        Self {
            source,
            mode,
            max_length,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(source: &'a S, config: &SummaryConfig) -> Self {
        Self::new(source, config.mode, config.max_length)
    }

    pub fn mode(&self) -> SummaryMode {
        self.mode
    }

    /// Previously produced summary for `url`, if any
    pub fn cached(&self, url: &str) -> Option<String> {
        self.cache.lock().ok()?.get(url).cloned()
    }

    /// Summary for `article`; never fails.
    ///
    /// Successful summaries are cached by URL. A failed backend call is not
    /// retried or cached and yields [`SUMMARY_UNAVAILABLE`].
    #[instrument(level = "info", skip_all, fields(url = %article.url))]
    pub async fn summarize(&self, article: &Article) -> String {
        if let Some(hit) = self.cached(&article.url) {
            debug!("Summary cache hit");
            return hit;
        }

        let summary = match self.mode {
            SummaryMode::Demo => {
                demo_summary(&article.title, article.description.as_deref(), &article.url)
            }
            SummaryMode::Backend => {
                let text = article.summary_input();
                match self.source.summarize(&text, self.max_length).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!(error = %e, "Error generating summary");
                        return SUMMARY_UNAVAILABLE.to_string();
                    }
                }
            }
        };

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(article.url.clone(), summary.clone());
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NewsError, Result};
    use crate::models::Category;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Summaries come back as "S:<text>"; fails when `fail` is set
    struct Echo {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Echo {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl NewsSource for Echo {
        async fn top_headlines(&self, _: &str, _: usize) -> Result<Vec<Article>> {
            Ok(Vec::new())
        }
        async fn by_category(&self, _: Category, _: &str, _: usize) -> Result<Vec<Article>> {
            Ok(Vec::new())
        }
        async fn search(&self, _: &str, _: usize) -> Result<Vec<Article>> {
            Ok(Vec::new())
        }
        async fn summarize(&self, text: &str, max_length: usize) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(max_length, 150);
            if self.fail {
                Err(NewsError::Api("model offline".to_string()))
            } else {
                Ok(format!("S:{text}"))
            }
        }
    }

    #[tokio::test]
    async fn test_backend_summary_is_cached() {
        let echo = Echo::new(false);
        let summarizer = Summarizer::new(&echo, SummaryMode::Backend, 150);
        let article = Article::new("Title", "https://e.com/1").with_description("Desc");

        assert_eq!(summarizer.summarize(&article).await, "S:Title. Desc");
        assert_eq!(summarizer.summarize(&article).await, "S:Title. Desc");
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            summarizer.cached("https://e.com/1").as_deref(),
            Some("S:Title. Desc")
        );
    }

    #[tokio::test]
    async fn test_backend_failure_yields_fallback_and_is_not_cached() {
        let echo = Echo::new(true);
        let summarizer = Summarizer::new(&echo, SummaryMode::Backend, 150);
        let article = Article::new("Title", "https://e.com/1");

        assert_eq!(summarizer.summarize(&article).await, SUMMARY_UNAVAILABLE);
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
        assert_eq!(summarizer.cached("https://e.com/1"), None);
    }

    #[tokio::test]
    async fn test_demo_mode_never_calls_backend() {
        let echo = Echo::new(false);
        let summarizer = Summarizer::new(&echo, SummaryMode::Demo, 150);
        let article = Article::new("Tennis final tonight", "https://e.com/2");

        let summary = summarizer.summarize(&article).await;
        assert_eq!(summary, SummaryTopic::Sports.paragraph());
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }
}
