use crate::UrlError;
use std::fmt;
use url::{Origin, Url};

/// Query parameters removed during canonicalization (matched case-insensitively)
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "ref",
];

/// A URL in canonical form
///
/// Two canonical URLs are equal iff their string forms are equal. The path
/// key (the path alone, without query) is used for coarser deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// The canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The canonical path component, used as the coarse dedup key
    pub fn path_key(&self) -> &str {
        self.0.path()
    }

    pub fn origin(&self) -> Origin {
        self.0.origin()
    }

    /// Returns true if both URLs share scheme, host and port
    pub fn is_same_origin(&self, other: &CanonicalUrl) -> bool {
        self.origin() == other.origin()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalizes a URL relative to a base URL
///
/// # Canonicalization Steps
///
/// 1. Resolve `raw` against `base`; reject if unparsable
/// 2. Remove the fragment
/// 3. Remove tracking query parameters (case-insensitive key match)
/// 4. Sort remaining query parameters by key and re-encode them; drop an
///    empty query string entirely
/// 5. Remove trailing slashes from the path unless the path is exactly `/`
///
/// The result is a fixed point: canonicalizing an already-canonical URL
/// yields the same URL.
///
/// # Examples
///
/// ```
/// use surface_scout::url::canonicalize;
/// use url::Url;
///
/// let base = Url::parse("https://a.com/").unwrap();
/// let url = canonicalize("/x/?utm_source=y&b=2#top", &base).unwrap();
/// assert_eq!(url.as_str(), "https://a.com/x?b=2");
/// ```
pub fn canonicalize(raw: &str, base: &Url) -> Result<CanonicalUrl, UrlError> {
    let mut url = base.join(raw.trim()).map_err(|e| UrlError::InvalidUrl {
        input: raw.to_string(),
        reason: e.to_string(),
    })?;

    url.set_fragment(None);

    if url.query().is_some() {
        let mut kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        // Stable sort: repeated keys keep their relative order
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    if !url.cannot_be_a_base() {
        let path = url.path();
        if path.len() > 1 && path.ends_with('/') {
            let trimmed = path.trim_end_matches('/');
            let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
            url.set_path(&trimmed);
        }
    }

    Ok(CanonicalUrl(url))
}

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    TRACKING_PARAMS.contains(&key.as_str())
}
