//! Cardsmith CLI - Command-line interface for the card-content pipeline
//!
//! This crate ties the pipeline stages together: argument parsing, the
//! sequential batch drivers with per-item failure isolation, and the final
//! summary/exit-code handling.

pub mod config;
pub mod pipeline;

pub use config::{Command, Config};
