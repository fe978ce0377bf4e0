use crate::classify::pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// The product role a page plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageRole {
    Home,
    Pricing,
    Docs,
    Blog,
    Support,
    Login,
    Signup,
    Dashboard,
    Checkout,
    Other,
}

impl PageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Pricing => "PRICING",
            Self::Docs => "DOCS",
            Self::Blog => "BLOG",
            Self::Support => "SUPPORT",
            Self::Login => "LOGIN",
            Self::Signup => "SIGNUP",
            Self::Dashboard => "DASHBOARD",
            Self::Checkout => "CHECKOUT",
            Self::Other => "OTHER",
        }
    }

    /// Marketing and content pages: HOME, PRICING, DOCS, BLOG
    pub fn is_landing_like(&self) -> bool {
        matches!(self, Self::Home | Self::Pricing | Self::Docs | Self::Blog)
    }

    /// Authentication entry points: LOGIN, SIGNUP
    pub fn is_login_like(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role patterns in precedence order. Patterns overlap ("/docs/blog" is both
/// DOCS and BLOG), so the first match wins.
static ROLE_RULES: LazyLock<Vec<(PageRole, Regex)>> = LazyLock::new(|| {
    vec![
        (PageRole::Home, pattern(r"home|welcome")),
        (PageRole::Pricing, pattern(r"pricing|plans|price")),
        (PageRole::Docs, pattern(r"docs|documentation|guide|api")),
        (PageRole::Blog, pattern(r"blog|news|article")),
        (PageRole::Support, pattern(r"support|help|faq|contact")),
        (PageRole::Login, pattern(r"login|signin|auth")),
        (PageRole::Signup, pattern(r"signup|register|join")),
        (PageRole::Dashboard, pattern(r"dashboard|admin|workspace|console")),
        (PageRole::Checkout, pattern(r"checkout|cart|payment|billing")),
    ]
});

/// Classifies a page's role from its path and title
///
/// The root path is always HOME. Otherwise the lowercased `path title`
/// haystack is tested against the ordered role patterns and the first match
/// wins; pages matching nothing are OTHER.
///
/// # Examples
///
/// ```
/// use surface_scout::classify::{classify_role, PageRole};
///
/// assert_eq!(classify_role("/", ""), PageRole::Home);
/// assert_eq!(classify_role("/docs/blog", ""), PageRole::Docs);
/// assert_eq!(classify_role("/account/signin", "Sign in"), PageRole::Login);
/// ```
pub fn classify_role(path: &str, title: &str) -> PageRole {
    if path == "/" {
        return PageRole::Home;
    }

    let haystack = format!("{} {}", path, title).to_lowercase();
    ROLE_RULES
        .iter()
        .find(|(_, re)| re.is_match(&haystack))
        .map(|(role, _)| *role)
        .unwrap_or(PageRole::Other)
}
