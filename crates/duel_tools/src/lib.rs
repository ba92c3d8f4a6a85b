//! # Duel Development Tools
//!
//! Command-line tools for development:
//! - Scenario runner
//! - Replay verifier
//! - Data validators

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod scenario;
pub mod validate;
