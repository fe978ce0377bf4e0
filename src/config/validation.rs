use crate::config::types::{Config, DiscoveryConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

const MAX_PAGES_LIMIT: usize = 10_000;
const MAX_DEPTH_LIMIT: u32 = 32;
const MIN_NAVIGATION_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_discovery_config(&config.discovery)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates traversal budgets
pub fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > MAX_PAGES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGES_LIMIT, config.max_pages
        )));
    }

    if config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    if config.navigation_timeout_ms < MIN_NAVIGATION_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_ms must be >= {}ms, got {}ms",
            MIN_NAVIGATION_TIMEOUT_MS, config.navigation_timeout_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(dir) = &config.report_dir {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "report_dir cannot be empty when set".to_string(),
            ));
        }
    }
    Ok(())
}
