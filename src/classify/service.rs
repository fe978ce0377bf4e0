//! Whole-site service type classification
//!
//! No single ratio separates marketing sites from login walls from
//! dashboards, so the verdict comes from an ordered cascade that starts with
//! the most specific evidence and falls back to increasingly permissive
//! rules.

use crate::classify::{pattern, PageRole};
use crate::discovery::DiscoveredPage;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static DASHBOARD_PATH: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)dashboard|admin|workspace|console"));

/// What kind of product surface a site is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    /// Marketing or content site
    Landing,
    /// Mostly an authentication gate
    Login,
    /// Authenticated application surface
    Dashboard,
    /// Public pages and gated pages side by side
    Mixed,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landing => "LANDING",
            Self::Login => "LOGIN",
            Self::Dashboard => "DASHBOARD",
            Self::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site-wide aggregates the service cascade decides on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteEvidence {
    /// Number of pages, at least 1
    pub total: usize,
    pub auth_pages: usize,
    /// Auth-likely pages carrying at least one strong signal
    pub strong_auth_pages: usize,
    pub landing_pages: usize,
    pub cta_count: usize,
    pub has_dashboard_path: bool,
    pub has_home_page: bool,
    pub has_login_page: bool,
}

impl SiteEvidence {
    pub fn gather(pages: &[DiscoveredPage], cta_count: usize) -> Self {
        let auth_pages: Vec<&DiscoveredPage> = pages.iter().filter(|p| p.auth_likely).collect();

        Self {
            total: pages.len().max(1),
            auth_pages: auth_pages.len(),
            strong_auth_pages: auth_pages
                .iter()
                .filter(|p| p.auth_signals.iter().any(|s| s.is_strong()))
                .count(),
            landing_pages: pages.iter().filter(|p| p.role.is_landing_like()).count(),
            cta_count,
            has_dashboard_path: pages
                .iter()
                .any(|p| p.role == PageRole::Dashboard || DASHBOARD_PATH.is_match(&p.final_path)),
            has_home_page: pages.iter().any(|p| p.role == PageRole::Home),
            has_login_page: pages.iter().any(|p| p.role.is_login_like()),
        }
    }

    pub fn auth_ratio(&self) -> f64 {
        self.auth_pages as f64 / self.total as f64
    }

    /// ceil(total * percent / 100), computed without floating point
    pub fn share(&self, percent: usize) -> usize {
        (self.total * percent).div_ceil(100)
    }
}

/// One step of the service type cascade
pub struct ServiceRule {
    pub name: &'static str,
    pub applies: fn(&SiteEvidence) -> bool,
    pub outcome: ServiceType,
}

/// The service type cascade, most specific evidence first
pub static SERVICE_RULES: &[ServiceRule] = &[
    ServiceRule {
        name: "gated-dashboard",
        applies: |e| e.has_dashboard_path && e.strong_auth_pages >= 1,
        outcome: ServiceType::Dashboard,
    },
    ServiceRule {
        name: "auth-entrypoint",
        applies: |e| e.has_login_page && e.auth_pages >= 1,
        outcome: ServiceType::Mixed,
    },
    ServiceRule {
        name: "broad-auth-wall",
        applies: |e| {
            (e.strong_auth_pages >= 2 || e.auth_ratio() >= 0.35)
                && e.cta_count < 10
                && e.landing_pages < e.share(40)
        },
        outcome: ServiceType::Login,
    },
    ServiceRule {
        name: "login-beside-content",
        applies: |e| e.has_login_page && e.landing_pages >= e.share(20),
        outcome: ServiceType::Mixed,
    },
    ServiceRule {
        name: "several-gated-pages",
        applies: |e| e.strong_auth_pages >= 1 && e.auth_pages >= 2,
        outcome: ServiceType::Mixed,
    },
    ServiceRule {
        name: "marketing-majority",
        applies: |e| (e.landing_pages >= e.share(50) || e.cta_count >= 8) && e.auth_ratio() < 0.3,
        outcome: ServiceType::Landing,
    },
    ServiceRule {
        name: "sparse-auth-content",
        applies: |e| {
            e.auth_ratio() < 0.15 && (e.landing_pages >= e.share(25) || e.has_home_page)
        },
        outcome: ServiceType::Landing,
    },
    ServiceRule {
        name: "auth-and-content",
        applies: |e| e.auth_ratio() >= 0.25 && e.landing_pages >= e.share(30),
        outcome: ServiceType::Mixed,
    },
    ServiceRule {
        name: "cta-heavy",
        applies: |e| e.cta_count >= 5,
        outcome: ServiceType::Landing,
    },
];

/// Returns the first cascade rule that fires for this evidence, if any
pub fn matching_service_rule(evidence: &SiteEvidence) -> Option<&'static ServiceRule> {
    SERVICE_RULES.iter().find(|rule| (rule.applies)(evidence))
}

/// Classifies the whole site from its finished page set and CTA count
pub fn classify_service_type(pages: &[DiscoveredPage], cta_count: usize) -> ServiceType {
    let evidence = SiteEvidence::gather(pages, cta_count);
    match matching_service_rule(&evidence) {
        Some(rule) => {
            tracing::debug!("Service type {} from rule {}", rule.outcome, rule.name);
            rule.outcome
        }
        None => ServiceType::Mixed,
    }
}
