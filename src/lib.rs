//! Surface-Scout: site discovery and classification for QA planning
//!
//! This crate crawls the reachable pages of a web application, classifies each
//! page (role, auth gate, priority) and its interactive elements (CTAs, menus,
//! forms), and produces a whole-site service-type verdict with summary metrics.

pub mod classify;
pub mod config;
pub mod discovery;
pub mod eval;
pub mod output;
pub mod render;
pub mod url;

use thiserror::Error;

/// Main error type for Surface-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Render error: {0}")]
    Render(#[from] render::RenderError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Result type alias for Surface-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use discovery::{discover, Discoverer, DiscoveryOptions};
pub use render::{HttpRenderer, Renderer};
pub use url::{canonicalize, CanonicalUrl};
