//! Rule-based classifiers
//!
//! Each classifier is a pure function over signals extracted from a page (or
//! from the whole finished crawl). Cascades are encoded as ordered rule
//! tables so precedence can be read, and tested, one rule at a time.

pub mod auth;
pub mod form;
pub mod priority;
pub mod role;
pub mod service;

pub use auth::{assess_auth, AuthAssessment, AuthObservation, AuthSignal, SignalStrength};
pub use form::{classify_form_type, matching_form_rule, FormSnapshot, FormType};
pub use priority::{score_page, PagePriority, PriorityTier};
pub use role::{classify_role, PageRole};
pub use service::{classify_service_type, matching_service_rule, ServiceType, SiteEvidence};

use regex::Regex;

/// Compiles a classifier pattern that is known to be valid at build time
pub(crate) fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("hardcoded classifier pattern is valid")
}
