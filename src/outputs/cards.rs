//! Plain-text article cards.

use std::fmt::Write;

use crate::models::{Article, summary_preview};

/// Heading for the favorites badge, e.g. `Favorites (3)`.
pub fn favorites_badge(count: usize) -> String {
    if count > 0 {
        format!("Favorites ({count})")
    } else {
        "Favorites".to_string()
    }
}

/// Render one article card.
///
/// `summary` is shown collapsed (see [`summary_preview`]); `saved` toggles
/// the saved marker next to the title.
pub fn render_card(index: usize, article: &Article, summary: Option<&str>, saved: bool) -> String {
    let mut out = String::new();
    let marker = if saved { " [saved]" } else { "" };

    let _ = writeln!(out, "{}. {}{}", index, article.title, marker);

    let date = article.display_date();
    match (article.source.name.is_empty(), date.is_empty()) {
        (false, false) => {
            let _ = writeln!(out, "   {} | {}", article.source.name, date);
        }
        (false, true) => {
            let _ = writeln!(out, "   {}", article.source.name);
        }
        (true, false) => {
            let _ = writeln!(out, "   {}", date);
        }
        (true, true) => {}
    }

    let _ = writeln!(out, "   {}", article.description_or_placeholder());
    if let Some(summary) = summary {
        let _ = writeln!(out, "   AI Summary: {}", summary_preview(summary));
    }
    let _ = writeln!(out, "   {}", article.url);
    out
}

/// Render a numbered list of cards, or `empty_message` when there are none.
///
/// `summaries` is matched to `articles` by position; `is_saved` marks
/// favorites.
pub fn render_list(
    articles: &[Article],
    summaries: &[Option<String>],
    is_saved: impl Fn(&Article) -> bool,
    empty_message: &str,
) -> String {
    if articles.is_empty() {
        return format!("{empty_message}\n");
    }

    articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let summary = summaries.get(i).and_then(|s| s.as_deref());
            render_card(i + 1, article, summary, is_saved(article))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
