//! Output generation for article lists.
//!
//! # Submodules
//!
//! - [`cards`]: renders articles as plain-text cards for the terminal
//! - [`json`]: writes article lists to JSON files for other tools
//!
//! Cards go to stdout; logs go to stderr so the two never interleave in a
//! redirected file.

pub mod cards;
pub mod json;
