//! Site-wide statistics over a finished traversal

use crate::classify::FormType;
use crate::discovery::{DiscoveredElement, DiscoveredPage, ElementKind, Metrics};
use std::collections::{BTreeMap, HashSet};

/// Computes the 0-100 coverage score
///
/// 40 points scale with how much of the page budget was used; menus and
/// CTAs are worth 20 each; forms, and more than one distinct form type,
/// are worth 10 each.
pub fn coverage_score(
    crawled: usize,
    max_pages: usize,
    menus: usize,
    ctas: usize,
    forms: usize,
    distinct_form_types: usize,
) -> u8 {
    let mut score = crawled as f64 / max_pages.max(1) as f64 * 40.0;
    if menus > 0 {
        score += 20.0;
    }
    if ctas > 0 {
        score += 20.0;
    }
    if forms > 0 {
        score += 10.0;
    }
    if distinct_form_types > 1 {
        score += 10.0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

/// Aggregates pages and elements into [`Metrics`]
///
/// `queued` is the number of frontier entries the traversal created.
pub fn aggregate_metrics(
    pages: &[DiscoveredPage],
    elements: &[DiscoveredElement],
    max_pages: usize,
    queued: usize,
) -> Metrics {
    let count = |kind: ElementKind| elements.iter().filter(|e| e.kind == kind).count();
    let cta_count = count(ElementKind::Cta);
    let menu_count = count(ElementKind::Menu);
    let form_count = count(ElementKind::Form);

    let mut form_type_counts: BTreeMap<FormType, usize> = BTreeMap::new();
    for form in elements.iter().filter(|e| e.kind == ElementKind::Form) {
        *form_type_counts
            .entry(form.form_type.unwrap_or(FormType::Unknown))
            .or_insert(0) += 1;
    }

    let avg_priority_score = if pages.is_empty() {
        0.0
    } else {
        let total: f64 = pages.iter().map(|p| f64::from(p.priority_score)).sum();
        (total / pages.len() as f64 * 10.0).round() / 10.0
    };

    Metrics {
        queued,
        crawled: pages.len(),
        unique_path_count: pages
            .iter()
            .map(|p| p.final_path.as_str())
            .collect::<HashSet<_>>()
            .len(),
        cta_count,
        menu_count,
        form_count,
        coverage_score: coverage_score(
            pages.len(),
            max_pages,
            menu_count,
            cta_count,
            form_count,
            form_type_counts.len(),
        ),
        form_type_counts,
        critical_pages: pages.iter().filter(|p| p.priority_tier.is_critical()).count(),
        avg_priority_score,
        auth_gate_pages: pages.iter().filter(|p| p.auth_likely).count(),
    }
}
