//! Service-type evaluation harness
//!
//! Runs discovery over a labelled seed list and reports how often the
//! service-type verdict matches the expected label.

use crate::classify::ServiceType;
use crate::discovery::{discover, DiscoveryOptions, Metrics};
use crate::render::Renderer;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A labelled seed list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalSeed {
    pub policy: String,
    /// How many sites from the front of `sites` to evaluate
    pub sample_size: usize,
    pub sites: Vec<SeedSite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSite {
    pub url: String,
    pub expected_service_type: ServiceType,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Outcome for one evaluated site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalRow {
    pub url: String,
    pub expected_service_type: ServiceType,
    /// None when discovery could not start for this site
    pub actual_service_type: Option<ServiceType>,
    pub auth_likely: bool,
    pub metrics: Option<Metrics>,
    pub notes: String,
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalReport {
    pub policy: String,
    /// Number of rows actually evaluated
    pub sample_size: usize,
    /// Percentage of rows whose verdict matched, rounded
    pub service_type_accuracy: u8,
    pub rows: Vec<EvalRow>,
}

/// Discovery bounds used for evaluation runs
pub fn eval_options(navigation_timeout: Duration) -> DiscoveryOptions {
    DiscoveryOptions {
        max_pages: 20,
        max_depth: 2,
        navigation_timeout,
    }
}

pub fn load_seed(path: &Path) -> anyhow::Result<EvalSeed> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read eval seed {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse eval seed {}", path.display()))
}

/// round(100 * matched / rows), 0 for no rows
pub fn accuracy(rows: &[EvalRow]) -> u8 {
    if rows.is_empty() {
        return 0;
    }
    let matched = rows.iter().filter(|r| r.matched).count();
    (matched as f64 / rows.len() as f64 * 100.0).round() as u8
}

/// Evaluates the first `sample_size` seed sites
///
/// A site whose discovery cannot start is recorded as unmatched rather than
/// aborting the evaluation.
pub async fn run_eval<R>(
    renderer: &mut R,
    seed: &EvalSeed,
    options: &DiscoveryOptions,
) -> EvalReport
where
    R: Renderer + ?Sized,
{
    let mut rows = Vec::new();

    for site in seed.sites.iter().take(seed.sample_size) {
        tracing::info!("Evaluating {} (expected {})", site.url, site.expected_service_type);
        let notes = site.notes.clone().unwrap_or_default();

        let row = match discover(renderer, &site.url, options).await {
            Ok(result) => EvalRow {
                url: site.url.clone(),
                expected_service_type: site.expected_service_type,
                actual_service_type: Some(result.service_type),
                auth_likely: result.auth_likely,
                matched: result.service_type == site.expected_service_type,
                metrics: Some(result.metrics),
                notes,
                error: None,
            },
            Err(e) => {
                tracing::warn!("Evaluation of {} failed: {}", site.url, e);
                EvalRow {
                    url: site.url.clone(),
                    expected_service_type: site.expected_service_type,
                    actual_service_type: None,
                    auth_likely: false,
                    metrics: None,
                    notes,
                    matched: false,
                    error: Some(e.to_string()),
                }
            }
        };
        rows.push(row);
    }

    let report = EvalReport {
        policy: seed.policy.clone(),
        sample_size: rows.len(),
        service_type_accuracy: accuracy(&rows),
        rows,
    };
    tracing::info!(
        "Service type accuracy: {}% over {} sites",
        report.service_type_accuracy,
        report.sample_size
    );
    report
}

/// Writes an evaluation report as pretty JSON, creating parent directories
pub fn write_eval_report(path: &Path, report: &EvalReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
