//! HTTP rendering backend
//!
//! Fetches pages with `reqwest` and answers DOM queries by running CSS
//! selectors over the static HTML with `scraper`. Nothing is executed, so
//! content injected by client-side scripts is invisible to this backend.

use crate::classify::FormSnapshot;
use crate::config::UserAgentConfig;
use crate::render::{LinkInfo, Navigation, RenderError, Renderer, SelectorClass, Zone};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{redirect::Policy, Client};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

const MAX_REDIRECTS: usize = 10;
const FORM_TEXT_LIMIT: usize = 500;
const SUBMIT_TEXT_LIMIT: usize = 120;

static ACCESS_DENIED_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)access denied|forbidden|unauthorized|sign in required|members only")
        .expect("hardcoded access denied pattern is valid")
});

/// The page loaded by the last successful navigation
#[derive(Debug, Clone)]
struct LoadedPage {
    body: String,
}

/// Renderer that loads pages over plain HTTP
pub struct HttpRenderer {
    client: Client,
    page: Option<LoadedPage>,
}

/// Builds an HTTP client identifying the crawler
///
/// Format: `CrawlerName/Version (+ContactURL)`. Redirects are followed (up
/// to 10 hops) so the final URL of a navigation reflects login redirects.
///
/// # Example
///
/// ```no_run
/// use surface_scout::config::UserAgentConfig;
/// use surface_scout::render::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

impl HttpRenderer {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client, page: None }
    }

    fn document(&self, what: &'static str) -> Result<Html, RenderError> {
        let page = self.page.as_ref().ok_or_else(|| RenderError::Extraction {
            what,
            message: "no page loaded".to_string(),
        })?;
        Ok(Html::parse_document(&page.body))
    }
}

fn selector(css: &str, what: &'static str) -> Result<Selector, RenderError> {
    Selector::parse(css).map_err(|e| RenderError::Extraction {
        what,
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}

/// Trimmed text content with inner whitespace collapsed
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn collect_links(document: &Html, selector: &Selector) -> Vec<LinkInfo> {
    document
        .select(selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(LinkInfo {
                href: href.to_string(),
                text: element_text(&element),
            })
        })
        .collect()
}

fn menu_selector(zone: Zone) -> Option<&'static str> {
    match zone {
        Zone::Header => Some("header nav a[href], nav[aria-label] a[href], nav a[href]"),
        Zone::Footer => Some("footer a[href]"),
        Zone::Sidebar => Some("aside a[href]"),
        Zone::Content => None,
    }
}

fn snapshot_form(form: &ElementRef<'_>, inputs: &Selector, textareas: &Selector, submits: &Selector) -> FormSnapshot {
    let attr = |name: &str| form.value().attr(name).unwrap_or("").to_string();
    let fields: Vec<ElementRef<'_>> = form.select(inputs).collect();

    let input_types = fields
        .iter()
        .map(|input| input.value().attr("type").unwrap_or("text").to_lowercase())
        .collect();
    let input_names = fields
        .iter()
        .filter_map(|input| input.value().attr("name"))
        .map(str::to_lowercase)
        .filter(|name| !name.is_empty())
        .collect();
    let placeholders = fields
        .iter()
        .filter_map(|input| input.value().attr("placeholder"))
        .map(str::to_lowercase)
        .filter(|placeholder| !placeholder.is_empty())
        .collect();

    let submit_text = form
        .select(submits)
        .map(|button| {
            let text = element_text(&button);
            if text.is_empty() {
                button.value().attr("value").unwrap_or("").trim().to_string()
            } else {
                text
            }
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    FormSnapshot {
        id: attr("id"),
        action: attr("action"),
        text: truncate(&element_text(form), FORM_TEXT_LIMIT),
        input_types,
        input_names,
        placeholders,
        has_multiline_field: form.select(textareas).next().is_some(),
        submit_text: truncate(&submit_text, SUBMIT_TEXT_LIMIT),
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<Navigation, RenderError> {
        self.page = None;

        let response = self
            .client
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout {
                        url: url.to_string(),
                        timeout,
                    }
                } else {
                    RenderError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let http_status = response.status().as_u16();
        let final_url = response.url().to_string();
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("html"))
            .unwrap_or(true);

        let body = response.text().await.map_err(|e| RenderError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !is_html {
            tracing::debug!("Non-HTML response from {}, treating page as empty", final_url);
        }

        self.page = Some(LoadedPage {
            body: if is_html { body } else { String::new() },
        });

        Ok(Navigation {
            final_url,
            http_status,
        })
    }

    async fn title(&self) -> Result<String, RenderError> {
        let document = self.document("title")?;
        let title = selector("title", "title")?;
        Ok(document
            .select(&title)
            .next()
            .map(|element| element_text(&element))
            .unwrap_or_default())
    }

    async fn count_matching(&self, class: SelectorClass) -> Result<usize, RenderError> {
        let document = self.document("selector count")?;
        match class {
            SelectorClass::PasswordInput => {
                let password = selector(r#"input[type="password" i]"#, "password inputs")?;
                Ok(document.select(&password).count())
            }
            SelectorClass::AccessDeniedText => {
                let body = selector("body", "page text")?;
                Ok(document
                    .select(&body)
                    .map(|element| {
                        let text = element_text(&element);
                        ACCESS_DENIED_TEXT.find_iter(&text).count()
                    })
                    .sum())
            }
        }
    }

    async fn extract_links(&self) -> Result<Vec<LinkInfo>, RenderError> {
        let document = self.document("links")?;
        let anchors = selector("a[href]:not([download])", "links")?;
        Ok(collect_links(&document, &anchors))
    }

    async fn extract_menus(&self, zone: Zone) -> Result<Vec<LinkInfo>, RenderError> {
        let Some(css) = menu_selector(zone) else {
            return Ok(Vec::new());
        };
        let document = self.document("menus")?;
        let menus = selector(css, "menus")?;
        Ok(collect_links(&document, &menus))
    }

    async fn extract_buttons(&self) -> Result<Vec<String>, RenderError> {
        let document = self.document("buttons")?;
        let buttons = selector(r#"button, a[role="button"], a[class*="btn" i]"#, "buttons")?;
        Ok(document
            .select(&buttons)
            .map(|element| element_text(&element))
            .filter(|text| !text.is_empty())
            .collect())
    }

    async fn extract_forms(&self) -> Result<Vec<FormSnapshot>, RenderError> {
        let document = self.document("forms")?;
        let forms = selector("form", "forms")?;
        let inputs = selector("input", "forms")?;
        let textareas = selector("textarea", "forms")?;
        let submits = selector(r#"button, input[type="submit"]"#, "forms")?;

        Ok(document
            .select(&forms)
            .map(|form| snapshot_form(&form, &inputs, &textareas, &submits))
            .collect())
    }

    async fn count_inputs(&self) -> Result<usize, RenderError> {
        let document = self.document("inputs")?;
        let fields = selector("input, textarea, select", "inputs")?;
        Ok(document.select(&fields).count())
    }
}
