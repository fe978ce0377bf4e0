//! Markdown summary generation
//!
//! This module renders a human-readable summary of a discovery run: the
//! service verdict, metrics, depth breakdown, critical pages, form types and
//! quality risks.

use crate::discovery::DiscoveryResult;
use crate::output::report::QualityReport;
use std::collections::BTreeMap;

const MAX_CRITICAL_ROWS: usize = 20;

/// Formats a discovery result and its quality report as markdown
pub fn format_markdown_summary(result: &DiscoveryResult, quality: &QualityReport) -> String {
    let m = &result.metrics;
    let mut md = String::new();

    md.push_str("# Surface-Scout Discovery Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Base URL**: {}\n", result.base_url));
    md.push_str(&format!("- **Origin**: {}\n", result.origin));
    md.push_str(&format!("- **Started**: {}\n", result.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", result.finished_at.to_rfc3339()));
    let duration = result.finished_at - result.started_at;
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        duration.num_milliseconds() as f64 / 1000.0
    ));
    md.push_str(&format!(
        "- **Limits**: {} pages, depth {}\n\n",
        result.limits.max_pages, result.limits.max_depth
    ));

    // Verdict
    md.push_str("## Verdict\n\n");
    md.push_str(&format!("- **Service Type**: {}\n", result.service_type));
    md.push_str(&format!(
        "- **Auth Likely**: {}\n",
        if result.auth_likely { "yes" } else { "no" }
    ));
    md.push_str(&format!("- **Confidence**: {}/100\n\n", quality.confidence));

    // Metrics
    md.push_str("## Metrics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Queued | {} |\n", m.queued));
    md.push_str(&format!("| Crawled | {} |\n", m.crawled));
    md.push_str(&format!("| Unique Paths | {} |\n", m.unique_path_count));
    md.push_str(&format!("| CTAs | {} |\n", m.cta_count));
    md.push_str(&format!("| Menus | {} |\n", m.menu_count));
    md.push_str(&format!("| Forms | {} |\n", m.form_count));
    md.push_str(&format!("| Coverage Score | {} |\n", m.coverage_score));
    md.push_str(&format!("| Critical Pages | {} |\n", m.critical_pages));
    md.push_str(&format!("| Avg Priority Score | {:.1} |\n", m.avg_priority_score));
    md.push_str(&format!("| Auth Gate Pages | {} |\n\n", m.auth_gate_pages));

    // Depth breakdown
    let mut depths: BTreeMap<u32, usize> = BTreeMap::new();
    for page in &result.pages {
        *depths.entry(page.depth).or_insert(0) += 1;
    }
    if !depths.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &depths {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    // Critical pages
    let critical: Vec<_> = quality
        .top_priority_pages
        .iter()
        .filter(|row| row.priority_tier.is_critical())
        .take(MAX_CRITICAL_ROWS)
        .collect();
    if !critical.is_empty() {
        md.push_str("## Critical Pages\n\n");
        md.push_str("| Tier | Score | Role | Path | Status |\n");
        md.push_str("|------|-------|------|------|--------|\n");
        for row in critical {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                row.priority_tier, row.priority_score, row.role, row.path, row.http_status
            ));
        }
        md.push('\n');
    }

    // Form types
    if !m.form_type_counts.is_empty() {
        md.push_str("## Form Types\n\n");
        md.push_str("| Type | Count |\n");
        md.push_str("|------|-------|\n");
        for (form_type, count) in &m.form_type_counts {
            md.push_str(&format!("| {} | {} |\n", form_type, count));
        }
        md.push_str(&format!(
            "\nEstimated precision: {}% (UNKNOWN: {}%)\n\n",
            quality.form_precision.precision_score, quality.form_precision.unknown_ratio
        ));
    }

    // Risks
    if !quality.risks.is_empty() {
        md.push_str("## Risks\n\n");
        for risk in &quality.risks {
            md.push_str(&format!("- {}\n", risk));
        }
        md.push('\n');
    }

    md
}
