//! A scripted in-memory rendering backend
//!
//! Pages are keyed by path. Navigating to an unknown path yields an empty
//! 404 page, like a real server would.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use surface_scout::classify::FormSnapshot;
use surface_scout::render::{LinkInfo, Navigation, RenderError, Renderer, SelectorClass, Zone};
use url::Url;

pub const ORIGIN: &str = "https://app.example.com";

/// What the scripted backend reports for one path
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub status: u16,
    pub title: String,
    /// Path the navigation ends up on
    pub redirect_to: Option<String>,
    pub password_inputs: usize,
    pub access_denied: usize,
    pub links: Vec<String>,
    pub menus: Vec<(Zone, String, String)>,
    pub buttons: Vec<String>,
    pub forms: Vec<FormSnapshot>,
    pub inputs: usize,
    /// Navigation errors out
    pub broken: bool,
    /// Navigation never completes
    pub hangs: bool,
}

impl FakePage {
    pub fn new(title: &str) -> Self {
        Self {
            status: 200,
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn links(mut self, hrefs: &[&str]) -> Self {
        self.links = hrefs.iter().map(|h| h.to_string()).collect();
        self
    }

    pub fn menu(mut self, zone: Zone, text: &str, href: &str) -> Self {
        self.menus.push((zone, text.to_string(), href.to_string()));
        self
    }

    pub fn buttons(mut self, texts: &[&str]) -> Self {
        self.buttons = texts.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn form(mut self, form: FormSnapshot) -> Self {
        self.inputs += form.input_types.len();
        self.forms.push(form);
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn redirect(mut self, path: &str) -> Self {
        self.redirect_to = Some(path.to_string());
        self
    }
}

pub fn login_form() -> FormSnapshot {
    FormSnapshot {
        id: "login".to_string(),
        action: "/session".to_string(),
        text: "Email Password Sign in".to_string(),
        input_types: vec!["email".to_string(), "password".to_string()],
        input_names: vec!["email".to_string(), "password".to_string()],
        submit_text: "Sign in".to_string(),
        ..Default::default()
    }
}

pub fn search_form() -> FormSnapshot {
    FormSnapshot {
        text: "Search docs".to_string(),
        input_types: vec!["search".to_string()],
        input_names: vec!["q".to_string()],
        placeholders: vec!["search the docs".to_string()],
        ..Default::default()
    }
}

#[derive(Default)]
pub struct ScriptedRenderer {
    pages: HashMap<String, FakePage>,
    current: Option<FakePage>,
    /// Every URL navigated to, in order
    pub navigations: Vec<String>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, page: FakePage) -> Self {
        self.pages.insert(path.to_string(), page);
        self
    }

    fn loaded(&self, what: &'static str) -> Result<&FakePage, RenderError> {
        self.current.as_ref().ok_or_else(|| RenderError::Extraction {
            what,
            message: "no page loaded".to_string(),
        })
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn navigate(&mut self, url: &Url, _timeout: Duration) -> Result<Navigation, RenderError> {
        self.navigations.push(url.to_string());
        self.current = None;

        let page = self
            .pages
            .get(url.path())
            .cloned()
            .unwrap_or_else(|| FakePage::new("Not Found").status(404));

        if page.hangs {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if page.broken {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }

        let (final_url, page) = match &page.redirect_to {
            Some(target) => {
                let landed = self.pages.get(target.as_str()).cloned().unwrap_or_default();
                (format!("{}{}", ORIGIN, target), FakePage { status: page.status, ..landed })
            }
            None => (url.to_string(), page),
        };

        let http_status = page.status;
        self.current = Some(page);
        Ok(Navigation {
            final_url,
            http_status,
        })
    }

    async fn title(&self) -> Result<String, RenderError> {
        Ok(self.loaded("title")?.title.clone())
    }

    async fn count_matching(&self, class: SelectorClass) -> Result<usize, RenderError> {
        let page = self.loaded("selector count")?;
        Ok(match class {
            SelectorClass::PasswordInput => page.password_inputs
                + page
                    .forms
                    .iter()
                    .flat_map(|f| &f.input_types)
                    .filter(|t| t.as_str() == "password")
                    .count(),
            SelectorClass::AccessDeniedText => page.access_denied,
        })
    }

    async fn extract_links(&self) -> Result<Vec<LinkInfo>, RenderError> {
        let page = self.loaded("links")?;
        Ok(page
            .links
            .iter()
            .map(|href| LinkInfo {
                href: href.clone(),
                text: String::new(),
            })
            .collect())
    }

    async fn extract_menus(&self, zone: Zone) -> Result<Vec<LinkInfo>, RenderError> {
        let page = self.loaded("menus")?;
        Ok(page
            .menus
            .iter()
            .filter(|(z, _, _)| *z == zone)
            .map(|(_, text, href)| LinkInfo {
                href: href.clone(),
                text: text.clone(),
            })
            .collect())
    }

    async fn extract_buttons(&self) -> Result<Vec<String>, RenderError> {
        Ok(self.loaded("buttons")?.buttons.clone())
    }

    async fn extract_forms(&self) -> Result<Vec<FormSnapshot>, RenderError> {
        Ok(self.loaded("forms")?.forms.clone())
    }

    async fn count_inputs(&self) -> Result<usize, RenderError> {
        Ok(self.loaded("inputs")?.inputs)
    }
}
