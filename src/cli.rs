//! Command-line interface definitions for newssum.
//!
//! This module defines the CLI arguments and subcommands using the `clap`
//! crate. Global options can also be provided via environment variables.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{Article, Category, Source};
use crate::storage::AccessMode;

/// Command-line arguments for newssum.
///
/// # Examples
///
/// ```sh
/// # Today's top headlines, with summaries
/// newssum headlines --summarize
///
/// # Sports feed from the UK, saved to a file
/// newssum category sports --country gb --json-out ./sports.json
///
/// # Save an article to favorites
/// newssum favorites toggle --title "Story" --url https://e.com/1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend API base URL (overrides config)
    #[arg(long, env = "NEWSSUM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory for favorites and session data (overrides config)
    #[arg(long, env = "NEWSSUM_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Use canned demo summaries instead of the backend
    #[arg(long, global = true)]
    pub demo_summaries: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Today's top headlines
    Headlines {
        /// Two-letter country code (defaults to config)
        #[arg(long)]
        country: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Headlines from one category feed
    Category {
        #[arg(value_enum)]
        category: Category,
        /// Two-letter country code (defaults to config)
        #[arg(long)]
        country: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Search all articles
    Search {
        query: String,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Summarize a single article
    Summarize {
        #[command(flatten)]
        article: ArticleArgs,
    },

    /// Manage saved articles
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Sign in against the backend and remember the session on this device
    Login {
        email: String,
        /// Account password
        #[arg(long, env = "NEWSSUM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a backend account (then use `login`)
    Register {
        email: String,
        /// Account password
        #[arg(long, env = "NEWSSUM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out on this device
    Logout,

    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List saved articles
    List {
        /// Also write the list to this JSON file
        #[arg(long)]
        json_out: Option<PathBuf>,
    },

    /// Exit with success if URL is saved
    Check { url: String },

    /// Save the article, or remove it if already saved
    Toggle {
        #[command(flatten)]
        article: ArticleArgs,
    },

    /// Remove all saved articles
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl FavoritesAction {
    /// Listing and checking only read; an unusable data dir reads as empty.
    pub fn access_mode(&self) -> AccessMode {
        match self {
            FavoritesAction::List { .. } | FavoritesAction::Check { .. } => AccessMode::ReadOnly,
            FavoritesAction::Toggle { .. } | FavoritesAction::Clear { .. } => AccessMode::ReadWrite,
        }
    }
}

/// Options shared by the article list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Number of articles to request (defaults to config)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Summarize every article in the list
    #[arg(long)]
    pub summarize: bool,

    /// Also write the list to this JSON file
    #[arg(long)]
    pub json_out: Option<PathBuf>,
}

/// An article given on the command line
#[derive(Args, Debug, Clone)]
pub struct ArticleArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Lead image URL
    #[arg(long)]
    pub image: Option<String>,
    /// ISO-8601 publication timestamp
    #[arg(long)]
    pub published_at: Option<String>,
    /// Publisher name
    #[arg(long)]
    pub source: Option<String>,
}

impl From<ArticleArgs> for Article {
    fn from(args: ArticleArgs) -> Self {
        Article {
            title: args.title,
            description: args.description,
            url: args.url,
            url_to_image: args.image,
            published_at: args.published_at,
            source: Source {
                id: None,
                name: args.source.unwrap_or_default(),
            },
        }
    }
}
