//! URL handling module for Surface-Scout
//!
//! This module provides URL canonicalization, the path key used for coarse
//! deduplication, and link filtering for hrefs that can never be navigated.

mod canonical;

pub use canonical::{canonicalize, CanonicalUrl, TRACKING_PARAMS};

/// Returns true if an href points somewhere a crawler can navigate to
///
/// Excludes:
/// - empty hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - fragment-only links (same page anchors)
pub fn is_navigable_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:"))
}
