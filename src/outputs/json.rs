//! JSON output of article lists.
//!
//! Writes the same array shape the backend serves and favorites are stored
//! in, so the file can be fed back into other tools.

use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::models::Article;

/// Write `articles` as a pretty-printed JSON array to `path`.
///
/// Parent directories are created as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(articles: &[Article], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(articles)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent).await {
                error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
                return Err(e.into());
            }
        }
    }

    fs::write(path, json).await?;
    info!("Wrote JSON article list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_articles_creates_parents() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out").join("headlines.json");
        let articles = vec![Article::new("One", "https://e.com/1").with_source("Wire")];

        write_articles(&articles, &path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Article> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, articles);
    }
}
