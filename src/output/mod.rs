//! Output module for discovery results
//!
//! This module handles:
//! - Aggregating site-wide metrics
//! - Building the sitemap, menu and quality reports
//! - Generating markdown summaries

mod markdown;
pub mod metrics;
pub mod report;

pub use markdown::format_markdown_summary;
pub use metrics::{aggregate_metrics, coverage_score};
pub use report::{
    build_menu_report, build_quality_report, build_sitemap_report, write_reports, MenuReport,
    QualityReport, ReportPaths, SitemapReport,
};
