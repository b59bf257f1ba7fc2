//! Data models for articles and the backend's response envelopes.
//!
//! This module defines the core data structures shared by the API client,
//! the favorites store and the terminal output:
//! - [`Article`]: a news article as returned by the backend and echoed back on save
//! - [`Source`]: the publisher of an article
//! - [`Category`]: the fixed set of category feeds the backend serves
//! - [`ApiEnvelope`] / [`SummaryData`]: the `{status, data, message}` wrapper
//!   every backend endpoint responds with
//!
//! Field names follow the backend's camelCase JSON, so `urlToImage` and
//! `publishedAt` map onto snake_case Rust fields through serde renames.

use chrono::DateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::upcase;

/// Placeholder text shown when an article carries no description.
pub const NO_DESCRIPTION: &str = "No description available for this article.";

/// Placeholder image for articles without `urlToImage`.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";

/// Number of summary characters shown before the preview is cut off.
pub const SUMMARY_PREVIEW_CHARS: usize = 150;

/// The publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    /// Backend-specific source identifier, often `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable publisher name.
    #[serde(default)]
    pub name: String,
}

/// A news article.
///
/// `url` is the identity key: two articles with the same URL are the same
/// article as far as favorites are concerned. Any extra fields the backend
/// sends (author, content, ...) are dropped on deserialization, so a saved
/// favorite holds exactly the fields below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Headline; also the display key.
    pub title: String,
    /// Optional teaser paragraph.
    #[serde(default)]
    pub description: Option<String>,
    /// Canonical article URL.
    pub url: String,
    /// Optional lead image.
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// ISO-8601 publication timestamp.
    #[serde(default)]
    pub published_at: Option<String>,
    /// Publisher.
    #[serde(default)]
    pub source: Source,
}

impl Article {
    /// Build a minimal article with only a title and URL.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: url.into(),
            url_to_image: None,
            published_at: None,
            source: Source::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, url_to_image: impl Into<String>) -> Self {
        self.url_to_image = Some(url_to_image.into());
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_source(mut self, name: impl Into<String>) -> Self {
        self.source = Source {
            id: None,
            name: name.into(),
        };
        self
    }

    /// Description, or `""` when absent.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Description, or the fixed "no description" placeholder.
    pub fn description_or_placeholder(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => NO_DESCRIPTION,
        }
    }

    /// Lead image URL, or the placeholder image.
    pub fn image_or_placeholder(&self) -> &str {
        match self.url_to_image.as_deref() {
            Some(u) if !u.is_empty() => u,
            _ => PLACEHOLDER_IMAGE,
        }
    }

    /// Publication date as `"<Month> <day>, <year>"`.
    ///
    /// Unparseable timestamps are returned verbatim; a missing timestamp
    /// yields an empty string.
    pub fn display_date(&self) -> String {
        let Some(raw) = self.published_at.as_deref() else {
            return String::new();
        };
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt.format("%B %-d, %Y").to_string(),
            Err(_) => raw.to_string(),
        }
    }

    /// Text sent to the summarization endpoint: `"<title>. <description>"`.
    pub fn summary_input(&self) -> String {
        format!("{}. {}", self.title, self.description_text())
    }
}

/// Collapsed form of a summary for card display.
///
/// Summaries longer than [`SUMMARY_PREVIEW_CHARS`] characters are cut and
/// suffixed with `...`.
pub fn summary_preview(summary: &str) -> String {
    if summary.chars().count() > SUMMARY_PREVIEW_CHARS {
        let head: String = summary.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        summary.to_string()
    }
}

/// Category feeds served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Technology,
    Sports,
    Entertainment,
    Science,
    Health,
    General,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Technology,
        Category::Sports,
        Category::Entertainment,
        Category::Science,
        Category::Health,
        Category::General,
    ];

    /// Path segment used in `/news/category/<slug>`.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Science => "science",
            Category::Health => "health",
            Category::General => "general",
        }
    }

    /// Capitalized name for headings, e.g. `"Business"`.
    pub fn display_name(&self) -> String {
        upcase(self.slug())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// `status` field of every backend response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// `{status, data, message}` wrapper around backend payloads.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    pub status: ApiStatus,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` payload of the summarization endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryData {
    pub summary: String,
}

/// Request body of the login and register endpoints.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login response. The `user` record is not needed.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of auth responses that carry only a message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body of the summarization endpoint.
#[derive(Debug, Serialize)]
pub struct SummaryRequest<'a> {
    pub text: &'a str,
    pub max_length: usize,
}
