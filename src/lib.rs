//! # newssum
//!
//! A terminal news client. Headlines, category feeds and search results come
//! from a backend REST API; summaries come from the backend's summarization
//! endpoint or from canned demo paragraphs; favorites are kept per signed-in
//! user in a local key-value store.
//!
//! ## Modules
//!
//! - [`api`]: backend client and headline retry decorator
//! - [`favorites`]: per-owner saved articles with change notification
//! - [`storage`]: injectable key-value persistence
//! - [`session`]: who is signed in on this device
//! - [`summary`]: summary cache, backend call and demo heuristic
//! - [`outputs`]: terminal cards and JSON files

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod outputs;
pub mod session;
pub mod storage;
pub mod summary;
pub mod utils;

pub use error::{NewsError, Result};
