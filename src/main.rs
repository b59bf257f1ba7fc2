//! # newssum
//!
//! Terminal front end for the news backend: browse headlines, category
//! feeds and search results as cards, summarize articles, and keep a
//! per-user favorites list.
//!
//! ## Usage
//!
//! ```sh
//! newssum headlines --summarize
//! newssum login me@example.com --password "$PW"
//! newssum favorites toggle --title "Story" --url https://e.com/1
//! newssum favorites list
//! ```
//!
//! Logs go to stderr (`RUST_LOG=info` for more detail); cards go to stdout.

use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use newssum::api::{HttpNewsClient, NewsSource, RetryingSource};
use newssum::cli::{Cli, Command, FavoritesAction, ListArgs};
use newssum::config::{AppConfig, SummaryMode};
use newssum::favorites::FavoritesStore;
use newssum::models::{Article, Category};
use newssum::outputs::{cards, json};
use newssum::session::{IdentityProvider, StoredSession, normalize_email};
use newssum::storage::{AccessMode, open_data_dir};
use newssum::summary::Summarizer;
use newssum::NewsError;

/// Cards summarized concurrently with `--summarize`
const PARALLEL_SUMMARIES: usize = 4;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(
        config = ?args.config,
        demo_summaries = args.demo_summaries,
        "Parsed CLI arguments"
    );

    let config = resolve_config(&args)?;
    info!(api = %config.api_base_url, data_dir = %config.data_dir.display(), "Configuration resolved");

    let start_time = std::time::Instant::now();
    let result = run(args.command, &config).await;
    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "Command finished");
    result
}

/// Merge CLI overrides into the loaded config file.
fn resolve_config(args: &Cli) -> Result<AppConfig, Box<dyn Error>> {
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(ref api_url) = args.api_url {
        config.api_base_url = api_url.clone();
    }
    if let Some(ref data_dir) = args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if args.demo_summaries {
        config.summary.mode = SummaryMode::Demo;
    }
    config.validate()?;
    Ok(config)
}

async fn run(command: Command, config: &AppConfig) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Command::Headlines { country, list } => {
            let country = country.unwrap_or_else(|| config.country.clone());
            let page_size = list.page_size.unwrap_or(config.page_size);
            let source = RetryingSource::from_config(HttpNewsClient::from_config(config)?, &config.retry);

            let articles = match source.top_headlines(&country, page_size).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(error = %e, "Error fetching top headlines");
                    eprintln!("Failed to load news. Please try again later. (Run the command again to retry.)");
                    return Err(e.into());
                }
            };

            println!("Today's Top Headlines\n");
            show_articles(&source, config, articles, &list, "No articles available.").await
        }

        Command::Category {
            category,
            country,
            list,
        } => {
            let country = country.unwrap_or_else(|| config.country.clone());
            let page_size = list.page_size.unwrap_or(config.page_size);
            let source = HttpNewsClient::from_config(config)?;

            let articles = match source.by_category(category, &country, page_size).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(%category, error = %e, "Error fetching category news");
                    eprintln!("{}", category_error_banner(category));
                    return Err(e.into());
                }
            };

            println!("{} News\n", category.display_name());
            show_articles(&source, config, articles, &list, "No articles available.").await
        }

        Command::Search { query, list } => {
            let page_size = list.page_size.unwrap_or(config.page_size);
            let source = HttpNewsClient::from_config(config)?;

            let articles = match source.search(&query, page_size).await {
                Ok(articles) => articles,
                Err(e) => {
                    error!(%query, error = %e, "Error searching news");
                    eprintln!("Failed to load search results. Please try again later.");
                    return Err(e.into());
                }
            };

            println!("Search Results: \"{}\"", query);
            println!("{} results found\n", articles.len());
            show_articles(&source, config, articles, &list, "No results.").await
        }

        Command::Summarize { article } => {
            let article = Article::from(article);
            let source = HttpNewsClient::from_config(config)?;
            let summarizer = Summarizer::from_config(&source, &config.summary);

            let summary = summarizer.summarize(&article).await;
            println!("{}\n\n{}", article.title, summary);
            Ok(ExitCode::SUCCESS)
        }

        Command::Favorites { action } => {
            let (_, favorites) = open_local_state(config, action.access_mode()).await?;
            run_favorites(action, &favorites).await
        }

        Command::Login { email, password } => {
            let email = normalize_email(&email)?;
            let (session, favorites) = open_local_state(config, AccessMode::ReadWrite).await?;
            let client = HttpNewsClient::from_config(config)?;

            let token = match client.login(email, &password).await {
                Ok(token) => token,
                Err(e) => {
                    error!(error = %e, "Login failed");
                    eprintln!("{}", auth_error_banner(&e));
                    return Err(e.into());
                }
            };
            session.sign_in(email, &token)?;
            println!("Signed in as {email}");
            println!("{}", cards::favorites_badge(favorites.count()));
            Ok(ExitCode::SUCCESS)
        }

        Command::Register { email, password } => {
            let email = normalize_email(&email)?;
            let client = HttpNewsClient::from_config(config)?;

            match client.register(email, &password).await {
                Ok(message) => {
                    println!("{message}");
                    println!("Sign in with `newssum login {email}`.");
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!(error = %e, "Registration failed");
                    eprintln!("{}", auth_error_banner(&e));
                    Err(e.into())
                }
            }
        }

        Command::Logout => {
            let (session, _) = open_local_state(config, AccessMode::ReadWrite).await?;
            session.sign_out()?;
            println!("Signed out");
            Ok(ExitCode::SUCCESS)
        }

        Command::Whoami => {
            let (session, _) = open_local_state(config, AccessMode::ReadOnly).await?;
            match session.current_email() {
                Some(email) => println!("{email}"),
                None => println!("Not signed in"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_favorites(
    action: FavoritesAction,
    favorites: &FavoritesStore,
) -> Result<ExitCode, Box<dyn Error>> {
    match action {
        FavoritesAction::List { json_out } => {
            let saved = favorites.load_favorites();
            println!("Your Favorite Articles ({})\n", favorites.owner_key());
            print!(
                "{}",
                cards::render_list(
                    &saved,
                    &[],
                    |_| true,
                    "You haven't saved any articles yet.\nUse `newssum favorites toggle` to save one.",
                )
            );
            if let Some(path) = json_out {
                write_json(&saved, &path).await;
            }
            Ok(ExitCode::SUCCESS)
        }

        FavoritesAction::Check { url } => {
            if favorites.is_favorite(&url) {
                println!("saved");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("not saved");
                Ok(ExitCode::FAILURE)
            }
        }

        FavoritesAction::Toggle { article } => {
            let article = Article::from(article);
            let mut header = favorites.subscribe();

            let saved = favorites.toggle_favorite(&article)?;
            header.refresh_if_changed(favorites);

            let verb = if saved { "Saved" } else { "Removed" };
            println!("{verb}: {}", article.title);
            println!("{}", cards::favorites_badge(header.count()));
            Ok(ExitCode::SUCCESS)
        }

        FavoritesAction::Clear { yes } => {
            if favorites.count() == 0 {
                println!("No favorites to clear.");
                return Ok(ExitCode::SUCCESS);
            }
            let mut header = favorites.subscribe();
            let cleared = favorites
                .clear_favorites(|| yes || confirm("Are you sure you want to clear all favorites?"));

            if cleared {
                header.refresh_if_changed(favorites);
                println!("Cleared. {}", cards::favorites_badge(header.count()));
            } else {
                println!("Cancelled.");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print cards (optionally summarized) and write the JSON file if asked.
async fn show_articles<S: NewsSource>(
    source: &S,
    config: &AppConfig,
    articles: Vec<Article>,
    list: &ListArgs,
    empty_message: &str,
) -> Result<ExitCode, Box<dyn Error>> {
    let summaries: Vec<Option<String>> = if list.summarize {
        let summarizer = Summarizer::from_config(source, &config.summary);
        stream::iter(articles.iter())
            .map(|article| {
                let summarizer = &summarizer;
                async move { Some(summarizer.summarize(article).await) }
            })
            .buffered(PARALLEL_SUMMARIES)
            .collect()
            .await
    } else {
        Vec::new()
    };

    let (_, favorites) = open_local_state(config, AccessMode::ReadOnly).await?;
    print!(
        "{}",
        cards::render_list(
            &articles,
            &summaries,
            |a| favorites.is_favorite(&a.url),
            empty_message
        )
    );

    if let Some(ref path) = list.json_out {
        write_json(&articles, path).await;
    }
    Ok(ExitCode::SUCCESS)
}

/// Open the on-disk store with the session and favorites on top of it.
///
/// Read-only callers never fail here; see [`open_data_dir`].
async fn open_local_state(
    config: &AppConfig,
    mode: AccessMode,
) -> Result<(Arc<StoredSession>, FavoritesStore), Box<dyn Error>> {
    let store = open_data_dir(&config.data_dir, mode).await?;
    let session = Arc::new(StoredSession::new(store.clone()));
    let favorites = FavoritesStore::new(store, session.clone());
    Ok((session, favorites))
}

async fn write_json(articles: &[Article], path: &Path) {
    match json::write_articles(articles, path).await {
        Ok(()) => eprintln!("Wrote {} articles to {}", articles.len(), path.display()),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to write JSON output");
            eprintln!("Could not write {}: {}", path.display(), e);
        }
    }
}

fn auth_error_banner(e: &NewsError) -> String {
    match e {
        NewsError::Auth(message) | NewsError::Api(message) => message.clone(),
        _ => "Authentication error".to_string(),
    }
}

fn category_error_banner(category: Category) -> String {
    format!("Failed to load {} news. Please try again later.", category.slug())
}

/// Ask a yes/no question on stdin; anything but "y"/"yes" declines.
fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
