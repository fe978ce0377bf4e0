//! Site discovery
//!
//! This module contains the discovery engine, including:
//! - The breadth-first frontier
//! - The traversal loop and its dedup rules
//! - Per-page element extraction
//! - The result types handed to reports and evaluation

mod controller;
mod extract;
mod frontier;
mod types;

pub use controller::{Traversal, TraversalOutcome};
pub use extract::{extract_elements, is_cta_text, BUTTON_SCORE, CTA_SCORE};
pub use frontier::{Frontier, FrontierEntry};
pub use types::{
    DiscoveredElement, DiscoveredPage, DiscoveryResult, ElementKind, Limits, Metrics,
};

use crate::classify::classify_service_type;
use crate::config::DiscoveryConfig;
use crate::output::aggregate_metrics;
use crate::render::Renderer;
use crate::url::canonicalize;
use crate::{ScoutError, UrlError};
use std::time::Duration;
use url::Url;

/// Traversal bounds for one discovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub max_pages: usize,
    pub max_depth: u32,
    /// Upper bound on each navigation
    pub navigation_timeout: Duration,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        DiscoveryConfig::default().into()
    }
}

impl From<&DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            max_depth: config.max_depth,
            navigation_timeout: config.navigation_timeout(),
        }
    }
}

impl From<DiscoveryConfig> for DiscoveryOptions {
    fn from(config: DiscoveryConfig) -> Self {
        Self::from(&config)
    }
}

/// Parses a start URL, accepting only http and https
fn parse_start_url(start_url: &str) -> Result<Url, UrlError> {
    let url = Url::parse(start_url.trim()).map_err(|e| UrlError::InvalidUrl {
        input: start_url.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::UnsupportedScheme(other.to_string())),
    }
}

/// Discovers and classifies the site reachable from `start_url`
///
/// Only a start URL that cannot be parsed, or that is not http/https, makes
/// this fail. Everything that goes wrong on individual pages is absorbed
/// into the result.
///
/// # Example
///
/// ```no_run
/// use surface_scout::{discover, DiscoveryOptions, HttpRenderer};
/// use surface_scout::config::UserAgentConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut renderer = HttpRenderer::new(&UserAgentConfig::default())?;
/// let result = discover(&mut renderer, "https://example.com", &DiscoveryOptions::default()).await?;
/// println!("{}: {} pages", result.service_type, result.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn discover<R>(
    renderer: &mut R,
    start_url: &str,
    options: &DiscoveryOptions,
) -> Result<DiscoveryResult, ScoutError>
where
    R: Renderer + ?Sized,
{
    let started_at = chrono::Utc::now();
    let base = parse_start_url(start_url)?;
    let start = canonicalize(start_url, &base)?;
    let origin = base.origin().ascii_serialization();

    let outcome = Traversal::new(renderer, *options, start_url.trim(), base, start)
        .run()
        .await;

    let metrics = aggregate_metrics(&outcome.pages, &outcome.elements, options.max_pages, outcome.queued);
    let service_type = classify_service_type(&outcome.pages, metrics.cta_count);
    let auth_likely = outcome.pages.iter().any(|p| p.auth_likely);

    tracing::info!(
        "{} classified as {} ({} pages, {} critical, coverage {})",
        origin,
        service_type,
        metrics.crawled,
        metrics.critical_pages,
        metrics.coverage_score
    );

    Ok(DiscoveryResult {
        base_url: start_url.to_string(),
        origin,
        limits: Limits {
            max_pages: options.max_pages,
            max_depth: options.max_depth,
            same_origin_only: true,
            ignore_robots: true,
        },
        pages: outcome.pages,
        elements: outcome.elements,
        service_type,
        auth_likely,
        metrics,
        started_at,
        finished_at: chrono::Utc::now(),
    })
}

/// A renderer bundled with the options it discovers under
pub struct Discoverer<R: Renderer> {
    renderer: R,
    options: DiscoveryOptions,
}

impl<R: Renderer> Discoverer<R> {
    pub fn new(renderer: R, options: DiscoveryOptions) -> Self {
        Self { renderer, options }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    pub async fn discover(&mut self, start_url: &str) -> Result<DiscoveryResult, ScoutError> {
        discover(&mut self.renderer, start_url, &self.options).await
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
