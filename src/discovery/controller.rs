//! Crawl traversal controller - the breadth-first discovery loop
//!
//! A [`Traversal`] owns every piece of per-run state (frontier, dedup sets,
//! collected pages and elements) and drives the renderer one page at a time.
//! A page that fails to load is still recorded, with whatever was learned
//! before the failure, and the loop moves on.

use crate::classify::{
    assess_auth, classify_role, score_page, AuthAssessment, AuthObservation, PageRole,
};
use crate::discovery::extract::{extract_elements, or_empty};
use crate::discovery::frontier::{Frontier, FrontierEntry};
use crate::discovery::{DiscoveredElement, DiscoveredPage, DiscoveryOptions};
use crate::render::{Navigation, Renderer, SelectorClass};
use crate::url::{canonicalize, is_navigable_href, CanonicalUrl};
use std::collections::HashSet;
use std::time::Instant;
use url::Url;

const PROGRESS_INTERVAL: usize = 10;

/// Why a frontier entry was dropped without a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Discard {
    TooDeep,
    InvalidUrl,
    CrossOrigin,
    Visited,
    PathSeen,
}

/// What a single visit produced
struct Visit {
    page: DiscoveredPage,
    elements: Vec<DiscoveredElement>,
    /// Canonical same-origin links to follow
    links: Vec<CanonicalUrl>,
}

/// Pages and elements collected by a finished traversal
#[derive(Debug)]
pub struct TraversalOutcome {
    pub pages: Vec<DiscoveredPage>,
    pub elements: Vec<DiscoveredElement>,
    /// Frontier entries ever created
    pub queued: usize,
}

/// State of one discovery run
pub struct Traversal<'r, R: Renderer + ?Sized> {
    renderer: &'r mut R,
    options: DiscoveryOptions,
    /// The parsed start URL, base for resolving frontier entries
    base: Url,
    start: CanonicalUrl,
    frontier: Frontier,
    visited: HashSet<String>,
    seen_paths: HashSet<String>,
    pages: Vec<DiscoveredPage>,
    elements: Vec<DiscoveredElement>,
}

impl<'r, R: Renderer + ?Sized> Traversal<'r, R> {
    pub fn new(
        renderer: &'r mut R,
        options: DiscoveryOptions,
        start_url: &str,
        base: Url,
        start: CanonicalUrl,
    ) -> Self {
        Self {
            renderer,
            options,
            base,
            start,
            frontier: Frontier::seeded(start_url),
            visited: HashSet::new(),
            seen_paths: HashSet::new(),
            pages: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Runs the loop until the frontier drains or the page budget is spent
    pub async fn run(mut self) -> TraversalOutcome {
        tracing::info!(
            "Starting discovery of {} (max {} pages, depth {})",
            self.start,
            self.options.max_pages,
            self.options.max_depth
        );
        let start_time = Instant::now();

        while self.pages.len() < self.options.max_pages {
            let Some(entry) = self.frontier.pop() else {
                break;
            };

            let canonical = match self.admit(&entry) {
                Ok(canonical) => canonical,
                Err(reason) => {
                    tracing::debug!("Discarding {} (depth {}): {:?}", entry.url, entry.depth, reason);
                    continue;
                }
            };

            let visit = self.visit(&canonical, entry.depth).await;
            self.enqueue(&visit.links, entry.depth);
            self.pages.push(visit.page);
            self.elements.extend(visit.elements);

            if self.pages.len() % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    "Progress: {} pages discovered, {} in frontier, {} elements",
                    self.pages.len(),
                    self.frontier.len(),
                    self.elements.len()
                );
            }
        }

        if !self.frontier.is_empty() {
            tracing::info!(
                "Page budget of {} reached with {} URLs left in frontier",
                self.options.max_pages,
                self.frontier.len()
            );
        }
        tracing::info!(
            "Discovery completed: {} pages in {:?}",
            self.pages.len(),
            start_time.elapsed()
        );

        TraversalOutcome {
            queued: self.frontier.queued(),
            pages: self.pages,
            elements: self.elements,
        }
    }

    /// Decides whether an entry gets visited, marking it visited if so
    fn admit(&mut self, entry: &FrontierEntry) -> Result<CanonicalUrl, Discard> {
        if entry.depth > self.options.max_depth {
            return Err(Discard::TooDeep);
        }

        let canonical = canonicalize(&entry.url, &self.base).map_err(|_| Discard::InvalidUrl)?;

        if !canonical.is_same_origin(&self.start) {
            return Err(Discard::CrossOrigin);
        }
        if self.visited.contains(canonical.as_str()) {
            return Err(Discard::Visited);
        }
        // Query-only variants collapse onto the first page seen for a path
        if self.seen_paths.contains(canonical.path_key()) && canonical != self.start {
            return Err(Discard::PathSeen);
        }

        self.visited.insert(canonical.as_str().to_string());
        self.seen_paths.insert(canonical.path_key().to_string());
        Ok(canonical)
    }

    async fn navigate(&mut self, url: &CanonicalUrl) -> Option<Navigation> {
        let timeout = self.options.navigation_timeout;
        match tokio::time::timeout(timeout, self.renderer.navigate(url.as_url(), timeout)).await {
            Ok(Ok(navigation)) => Some(navigation),
            Ok(Err(e)) => {
                tracing::warn!("{}", e);
                None
            }
            Err(_) => {
                tracing::warn!("Navigation to {} timed out after {:?}", url, timeout);
                None
            }
        }
    }

    async fn visit(&mut self, url: &CanonicalUrl, depth: u32) -> Visit {
        let Some(navigation) = self.navigate(url).await else {
            let role = classify_role(url.path_key(), "");
            return Visit {
                page: record_page(url, url.as_str(), depth, String::new(), 0, role, AuthAssessment::default()),
                elements: Vec::new(),
                links: Vec::new(),
            };
        };

        let page_url = url.as_str();
        let renderer = &*self.renderer;

        // Role comes from where the navigation landed, not where it started
        let final_url = Url::parse(&navigation.final_url).ok();
        let final_path = final_url.as_ref().map_or(url.path_key(), |u| u.path());

        let title = or_empty(renderer.title().await, page_url);
        let role = classify_role(final_path, &title);

        let password_inputs =
            or_empty(renderer.count_matching(SelectorClass::PasswordInput).await, page_url);
        let access_denied =
            or_empty(renderer.count_matching(SelectorClass::AccessDeniedText).await, page_url);
        let auth = assess_auth(&AuthObservation {
            password_input: password_inputs > 0,
            final_url: &navigation.final_url,
            http_status: navigation.http_status,
            access_denied_text: access_denied > 0,
        });

        let raw_links = or_empty(renderer.extract_links().await, page_url);
        let elements = extract_elements(renderer, page_url, role).await;

        let link_base = final_url.as_ref().unwrap_or(url.as_url());
        let links = raw_links
            .iter()
            .filter(|link| is_navigable_href(&link.href))
            .filter_map(|link| canonicalize(&link.href, link_base).ok())
            .filter(|link| link.is_same_origin(&self.start) && link.path_key() != url.path_key())
            .collect();

        let page = record_page(
            url,
            &navigation.final_url,
            depth,
            title,
            navigation.http_status,
            role,
            auth,
        );
        tracing::debug!(
            "Visited {} ({}, {}, status {})",
            page.url,
            page.role,
            page.priority_tier,
            page.http_status
        );

        Visit {
            page,
            elements,
            links,
        }
    }

    fn enqueue(&mut self, links: &[CanonicalUrl], depth: u32) {
        let next_depth = depth + 1;
        if next_depth > self.options.max_depth {
            return;
        }
        for link in links {
            self.frontier.push(FrontierEntry {
                url: link.as_str().to_string(),
                depth: next_depth,
            });
        }
    }
}

fn record_page(
    url: &CanonicalUrl,
    final_url: &str,
    depth: u32,
    title: String,
    http_status: u16,
    role: PageRole,
    auth: AuthAssessment,
) -> DiscoveredPage {
    let priority = score_page(role, auth.likely, depth, http_status);
    let final_path = Url::parse(final_url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.path_key().to_string());

    DiscoveredPage {
        url: url.as_str().to_string(),
        final_url: final_url.to_string(),
        canonical_path: url.path_key().to_string(),
        final_path,
        depth,
        title,
        http_status,
        auth_likely: auth.likely,
        auth_signals: auth.signals,
        role,
        priority_score: priority.score,
        priority_tier: priority.tier,
    }
}
