//! Configuration module for Artifact Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) yields a
//! configuration that targets the public CI bucket.
//!
//! # Example
//!
//! ```no_run
//! use artifact_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Looking for: {:?}", config.crawl.target_filenames);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    CrawlConfig, DiscoveryConfig, HttpConfig, TranslationConfig, DEFAULT_FRONTEND_PREFIX,
    DEFAULT_STORAGE_PREFIX,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
