//! Configuration module for surface-scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use surface_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Discovery will visit at most {} pages", config.discovery.max_pages);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, DiscoveryConfig, OutputConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_discovery_config};
