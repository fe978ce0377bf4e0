//! Per-page element extraction
//!
//! Turns what the renderer reports about a loaded page into
//! [`DiscoveredElement`]s: menus per zone, buttons split into CTAs and plain
//! buttons, classified forms, and inputs. Each renderer query that fails is
//! logged and treated as having found nothing.

use crate::classify::{classify_form_type, FormSnapshot, PageRole};
use crate::discovery::{DiscoveredElement, ElementKind};
use crate::render::{LinkInfo, RenderError, Renderer, Zone};
use regex::Regex;
use std::sync::LazyLock;

const MAX_BUTTONS: usize = 80;
const MAX_FORMS: usize = 20;
const MAX_INPUTS: usize = 50;

pub const CTA_SCORE: f64 = 0.9;
pub const BUTTON_SCORE: f64 = 0.4;

static CTA_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"START|TRY|SIGN|가입|시작|신청|문의|BUY|GET|BOOK|DEMO|CONTACT")
        .expect("hardcoded CTA pattern is valid")
});

/// Unwraps an extraction result, logging and defaulting on failure
pub(crate) fn or_empty<T: Default>(result: Result<T, RenderError>, page_url: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Extraction failed on {}: {}", page_url, e);
            T::default()
        }
    }
}

fn menu_limit(zone: Zone) -> usize {
    match zone {
        Zone::Header | Zone::Footer => 40,
        Zone::Sidebar => 20,
        Zone::Content => 0,
    }
}

fn menu_hint(zone: Zone) -> &'static str {
    match zone {
        Zone::Header => "nav a[href]",
        Zone::Footer => "footer a[href]",
        Zone::Sidebar => "aside a[href]",
        Zone::Content => "a[href]",
    }
}

/// Returns true if a button's text reads as a call to action
pub fn is_cta_text(text: &str) -> bool {
    CTA_TEXT.is_match(&text.to_uppercase())
}

pub fn menu_elements(page_url: &str, zone: Zone, links: Vec<LinkInfo>) -> Vec<DiscoveredElement> {
    links
        .into_iter()
        .take(menu_limit(zone))
        .map(|link| {
            let mut element = DiscoveredElement::new(page_url, ElementKind::Menu, menu_hint(zone));
            element.text = Some(link.text);
            element.href = Some(link.href);
            element.zone = Some(zone);
            element
        })
        .collect()
}

pub fn button_elements(page_url: &str, texts: Vec<String>) -> Vec<DiscoveredElement> {
    texts
        .into_iter()
        .take(MAX_BUTTONS)
        .map(|text| {
            let (kind, score) = if is_cta_text(&text) {
                (ElementKind::Cta, CTA_SCORE)
            } else {
                (ElementKind::Button, BUTTON_SCORE)
            };
            let mut element = DiscoveredElement::new(page_url, kind, "button");
            element.text = Some(text);
            element.zone = Some(Zone::Content);
            element.score = Some(score);
            element
        })
        .collect()
}

pub fn form_elements(page_url: &str, forms: &[FormSnapshot], role: PageRole) -> Vec<DiscoveredElement> {
    forms
        .iter()
        .take(MAX_FORMS)
        .enumerate()
        .map(|(index, form)| {
            let hint = format!("form:nth-of-type({})", index + 1);
            let mut element = DiscoveredElement::new(page_url, ElementKind::Form, hint);
            element.zone = Some(Zone::Content);
            element.form_type = Some(classify_form_type(form, role));
            element
        })
        .collect()
}

pub fn input_elements(page_url: &str, count: usize) -> Vec<DiscoveredElement> {
    (1..=count.min(MAX_INPUTS))
        .map(|n| {
            let mut element =
                DiscoveredElement::new(page_url, ElementKind::Input, format!("input,textarea,select#{}", n));
            element.zone = Some(Zone::Content);
            element
        })
        .collect()
}

/// Extracts every element of the currently loaded page
///
/// `role` is the page's role, used to classify its forms.
pub async fn extract_elements<R>(renderer: &R, page_url: &str, role: PageRole) -> Vec<DiscoveredElement>
where
    R: Renderer + ?Sized,
{
    let mut elements = Vec::new();

    for zone in Zone::MENU_ZONES {
        let links = or_empty(renderer.extract_menus(zone).await, page_url);
        elements.extend(menu_elements(page_url, zone, links));
    }

    let buttons = or_empty(renderer.extract_buttons().await, page_url);
    elements.extend(button_elements(page_url, buttons));

    let forms = or_empty(renderer.extract_forms().await, page_url);
    elements.extend(form_elements(page_url, &forms, role));

    let inputs = or_empty(renderer.count_inputs().await, page_url);
    elements.extend(input_elements(page_url, inputs));

    elements
}
