use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for surface-scout
///
/// Every section is optional; missing sections and keys take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Traversal budget configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiscoveryConfig {
    /// Maximum number of pages to record
    pub max_pages: usize,

    /// Maximum link depth from the start URL
    pub max_depth: u32,

    /// Per-navigation timeout (milliseconds)
    pub navigation_timeout_ms: u64,
}

impl DiscoveryConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_depth: 3,
            navigation_timeout_ms: 15_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SurfaceScout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory the analysis reports are written to, if any
    pub report_dir: Option<PathBuf>,
}
