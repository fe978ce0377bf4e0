//! Rendering backend abstraction
//!
//! Discovery does not load pages itself. It drives a [`Renderer`]: navigate to
//! a URL, then query the loaded page for its title, links, menus, buttons,
//! forms and auth cues. A browser-backed implementation can sit behind the
//! same trait; [`HttpRenderer`] is the default, fetching HTML over HTTP and
//! querying it with CSS selectors.

mod http;

pub use http::{build_http_client, HttpRenderer};

use crate::classify::FormSnapshot;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a rendering backend
#[derive(Debug, Error)]
pub enum RenderError {
    /// Network error, non-HTTP response, or anything else that kept the page
    /// from loading
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// A DOM query failed on a (possibly partially) loaded page
    #[error("Extraction of {what} failed: {message}")]
    Extraction { what: &'static str, message: String },
}

/// Outcome of a successful navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The URL the page ended up on after redirects
    pub final_url: String,
    pub http_status: u16,
}

/// A hyperlink as found in the DOM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    /// The raw `href` attribute
    pub href: String,
    /// Trimmed text content
    pub text: String,
}

/// The part of a page an element lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Header,
    Footer,
    Sidebar,
    Content,
}

impl Zone {
    /// Zones that carry navigation menus
    pub const MENU_ZONES: [Zone; 3] = [Zone::Header, Zone::Footer, Zone::Sidebar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "HEADER",
            Self::Footer => "FOOTER",
            Self::Sidebar => "SIDEBAR",
            Self::Content => "CONTENT",
        }
    }
}

/// Element classes a renderer can count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorClass {
    /// `input[type=password]`
    PasswordInput,
    /// Text such as "access denied", "forbidden", "unauthorized",
    /// "sign in required" or "members only"
    AccessDeniedText,
}

/// The capability set discovery needs from a rendering backend
///
/// `navigate` loads a page; every other method queries the page loaded by
/// the most recent successful `navigate`.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<Navigation, RenderError>;

    async fn title(&self) -> Result<String, RenderError>;

    async fn count_matching(&self, class: SelectorClass) -> Result<usize, RenderError>;

    async fn extract_links(&self) -> Result<Vec<LinkInfo>, RenderError>;

    /// Links inside the navigation menus of one zone
    async fn extract_menus(&self, zone: Zone) -> Result<Vec<LinkInfo>, RenderError>;

    /// Non-empty texts of buttons and button-like links
    async fn extract_buttons(&self) -> Result<Vec<String>, RenderError>;

    async fn extract_forms(&self) -> Result<Vec<FormSnapshot>, RenderError>;

    /// Number of `input`, `textarea` and `select` elements
    async fn count_inputs(&self) -> Result<usize, RenderError>;
}
