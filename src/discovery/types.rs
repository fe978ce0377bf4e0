use crate::classify::{AuthSignal, FormType, PageRole, PriorityTier, ServiceType};
use crate::render::Zone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One visited page
///
/// Failed navigations are recorded too, with `http_status` 0 and an empty
/// title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPage {
    /// The canonical URL that was visited
    pub url: String,
    /// The URL the page ended up on after redirects
    pub final_url: String,
    /// Path component of `url`
    pub canonical_path: String,
    /// Path component of `final_url`, the path the page actually lives at
    pub final_path: String,
    pub depth: u32,
    pub title: String,
    pub http_status: u16,
    pub auth_likely: bool,
    /// Auth signals in recording order
    pub auth_signals: Vec<AuthSignal>,
    pub role: PageRole,
    pub priority_score: u8,
    pub priority_tier: PriorityTier,
}

/// The kind of an interactive element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    Cta,
    Form,
    Button,
    Menu,
    Input,
}

/// An interactive element found on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredElement {
    /// `url` of the page the element was found on
    pub page_url: String,
    pub kind: ElementKind,
    /// Selector-like locator for the element
    pub selector_hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<Zone>,
    /// CTA likelihood, set on CTA and BUTTON elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<FormType>,
}

impl DiscoveredElement {
    pub(crate) fn new(page_url: &str, kind: ElementKind, selector_hint: impl Into<String>) -> Self {
        Self {
            page_url: page_url.to_string(),
            kind,
            selector_hint: selector_hint.into(),
            text: None,
            href: None,
            zone: None,
            score: None,
            form_type: None,
        }
    }
}

/// Traversal bounds a result was produced under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub max_pages: usize,
    pub max_depth: u32,
    pub same_origin_only: bool,
    pub ignore_robots: bool,
}

/// Site-wide statistics over a finished traversal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Frontier entries ever created, including the start URL
    pub queued: usize,
    /// Pages recorded
    pub crawled: usize,
    pub unique_path_count: usize,
    pub cta_count: usize,
    pub menu_count: usize,
    pub form_count: usize,
    pub form_type_counts: BTreeMap<FormType, usize>,
    /// 0-100
    pub coverage_score: u8,
    /// Pages in tier P0 or P1
    pub critical_pages: usize,
    /// Mean priority score, one decimal
    pub avg_priority_score: f64,
    pub auth_gate_pages: usize,
}

/// Everything a discovery run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    /// The start URL as given
    pub base_url: String,
    /// ASCII serialization of the start URL's origin
    pub origin: String,
    pub limits: Limits,
    pub pages: Vec<DiscoveredPage>,
    pub elements: Vec<DiscoveredElement>,
    pub service_type: ServiceType,
    /// True if any page is auth-likely
    pub auth_likely: bool,
    pub metrics: Metrics,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl DiscoveryResult {
    pub fn elements_of(&self, kind: ElementKind) -> impl Iterator<Item = &DiscoveredElement> {
        self.elements.iter().filter(move |e| e.kind == kind)
    }
}
