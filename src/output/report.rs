//! Analysis reports derived from a discovery result
//!
//! Three JSON documents are produced per analysis:
//! - a sitemap (one row per page, shallow and important pages first)
//! - a menu inventory (menu links grouped across pages, global vs local)
//! - a quality report (confidence score, risks, form precision estimate)

use crate::classify::{AuthSignal, FormType, PageRole, PriorityTier, ServiceType};
use crate::discovery::{DiscoveryResult, ElementKind, Metrics};
use crate::output::markdown::format_markdown_summary;
use crate::render::Zone;
use crate::ScoutError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

const GLOBAL_MENU_RATIO: f64 = 0.4;
const TOP_ROWS: usize = 10;
const LOW_CONFIDENCE: u8 = 70;
const HIGH_UNKNOWN_RATIO: u8 = 50;

static PUNCTUATION_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\W_]+$").expect("hardcoded menu noise pattern is valid"));
static GENERIC_LINK_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(more|learn more|read more|go|next|prev)$")
        .expect("hardcoded menu noise pattern is valid")
});

/// One page in the sitemap report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapRow {
    pub path: String,
    pub url: String,
    pub title: String,
    pub depth: u32,
    pub role: PageRole,
    pub http_status: u16,
    pub auth_likely: bool,
    pub auth_signals: Vec<AuthSignal>,
    pub priority_score: u8,
    pub priority_tier: PriorityTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapReport {
    pub base_url: String,
    pub origin: String,
    pub service_type: ServiceType,
    pub auth_likely: bool,
    pub metrics: Metrics,
    pub rows: Vec<SitemapRow>,
}

/// Whether a menu entry is site-wide navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuScope {
    Global,
    Local,
}

/// One menu link, grouped across every page it appears on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRow {
    pub name: String,
    pub href: String,
    pub zone: Zone,
    /// Total occurrences
    pub count: usize,
    /// Distinct pages, in first-seen order
    pub pages: Vec<String>,
    pub scope: MenuScope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuReport {
    pub base_url: String,
    pub total_menus: usize,
    pub global_menus: usize,
    pub local_menus: usize,
    pub rows: Vec<MenuRow>,
}

/// Heuristic estimate of how trustworthy the form classifications are
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPrecision {
    pub total_forms: usize,
    pub by_type: BTreeMap<FormType, usize>,
    /// 0-100
    pub precision_score: u8,
    /// Percentage of forms classified UNKNOWN
    pub unknown_ratio: u8,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub base_url: String,
    pub service_type: ServiceType,
    pub auth_likely: bool,
    /// 0-100
    pub confidence: u8,
    pub reasons: Vec<String>,
    pub risks: Vec<String>,
    pub metrics: Metrics,
    pub form_precision: FormPrecision,
    pub top_priority_pages: Vec<SitemapRow>,
    pub top_global_menus: Vec<MenuRow>,
}

/// Where [`write_reports`] put each file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub sitemap: PathBuf,
    pub menu: PathBuf,
    pub quality: PathBuf,
    pub summary: PathBuf,
}

pub fn build_sitemap_report(result: &DiscoveryResult) -> SitemapReport {
    let mut rows: Vec<SitemapRow> = result
        .pages
        .iter()
        .map(|p| SitemapRow {
            path: p.final_path.clone(),
            url: p.url.clone(),
            title: p.title.clone(),
            depth: p.depth,
            role: p.role,
            http_status: p.http_status,
            auth_likely: p.auth_likely,
            auth_signals: p.auth_signals.clone(),
            priority_score: p.priority_score,
            priority_tier: p.priority_tier,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.depth
            .cmp(&b.depth)
            .then_with(|| b.priority_score.cmp(&a.priority_score))
            .then_with(|| a.path.cmp(&b.path))
    });

    SitemapReport {
        base_url: result.base_url.clone(),
        origin: result.origin.clone(),
        service_type: result.service_type,
        auth_likely: result.auth_likely,
        metrics: result.metrics.clone(),
        rows,
    }
}

fn normalize_menu_name(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Origin plus path, without query, fragment, or trailing slash
fn normalize_menu_href(href: &str, base: Option<&Url>) -> String {
    let resolved = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    match resolved {
        Ok(url) if !url.cannot_be_a_base() => {
            let path = url.path();
            let path = if path.len() > 1 {
                path.strip_suffix('/').unwrap_or(path)
            } else {
                path
            };
            format!("{}{}", url.origin().ascii_serialization(), path)
        }
        _ => href.to_string(),
    }
}

fn is_noise_name(name: &str) -> bool {
    name.chars().count() < 2 || PUNCTUATION_ONLY.is_match(name) || GENERIC_LINK_TEXT.is_match(name)
}

fn is_noise_href(href: &str) -> bool {
    let href = href.to_lowercase();
    href.starts_with("javascript:") || href.starts_with("mailto:") || href.ends_with('#')
}

pub fn build_menu_report(result: &DiscoveryResult) -> MenuReport {
    let base = Url::parse(&result.base_url).ok();
    let mut rows: Vec<MenuRow> = Vec::new();
    let mut index: BTreeMap<(String, String, Zone), usize> = BTreeMap::new();

    for element in result.elements_of(ElementKind::Menu) {
        let (Some(text), Some(href)) = (&element.text, &element.href) else {
            continue;
        };
        let name = normalize_menu_name(text);
        if name.is_empty() || is_noise_name(&name) {
            continue;
        }
        let href = normalize_menu_href(href, base.as_ref());
        if href.is_empty() || is_noise_href(&href) {
            continue;
        }
        let zone = element.zone.unwrap_or(Zone::Content);

        let key = (name.to_lowercase(), href.clone(), zone);
        let position = *index.entry(key).or_insert_with(|| {
            rows.push(MenuRow {
                name,
                href,
                zone,
                count: 0,
                pages: Vec::new(),
                scope: MenuScope::Local,
            });
            rows.len() - 1
        });

        let row = &mut rows[position];
        row.count += 1;
        if !row.pages.contains(&element.page_url) {
            row.pages.push(element.page_url.clone());
        }
    }

    let page_count = result.pages.len().max(1) as f64;
    for row in &mut rows {
        let ratio = row.pages.len() as f64 / page_count;
        let global_zone = matches!(row.zone, Zone::Header | Zone::Footer);
        if global_zone && ratio >= GLOBAL_MENU_RATIO {
            row.scope = MenuScope::Global;
        }
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let global_menus = rows.iter().filter(|r| r.scope == MenuScope::Global).count();
    MenuReport {
        base_url: result.base_url.clone(),
        total_menus: rows.len(),
        global_menus,
        local_menus: rows.len() - global_menus,
        rows,
    }
}

fn form_type_weight(form_type: FormType) -> f64 {
    match form_type {
        FormType::Login => 0.85,
        FormType::Signup => 0.8,
        FormType::Contact => 0.72,
        FormType::Checkout => 0.9,
        FormType::Search => 0.7,
        FormType::Unknown => 0.4,
    }
}

fn percent(part: f64, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        (part / total as f64 * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

pub fn estimate_form_precision(result: &DiscoveryResult) -> FormPrecision {
    let mut by_type: BTreeMap<FormType, usize> = BTreeMap::new();
    for form in result.elements_of(ElementKind::Form) {
        *by_type.entry(form.form_type.unwrap_or(FormType::Unknown)).or_insert(0) += 1;
    }
    let total_forms: usize = by_type.values().sum();

    let weighted: f64 = by_type
        .iter()
        .map(|(form_type, count)| form_type_weight(*form_type) * *count as f64)
        .sum();
    let type_count = |form_type: FormType| by_type.get(&form_type).copied().unwrap_or(0);
    let unknown_ratio = percent(type_count(FormType::Unknown) as f64, total_forms);

    let mut notes = Vec::new();
    if unknown_ratio > HIGH_UNKNOWN_RATIO {
        notes.push("High UNKNOWN ratio: form rules need more patterns".to_string());
    }
    let logins = type_count(FormType::Login);
    if logins > 0 && type_count(FormType::Search) > logins * 10 {
        notes.push("Possible SEARCH bias: check search classification".to_string());
    }

    FormPrecision {
        total_forms,
        precision_score: percent(weighted, total_forms),
        unknown_ratio,
        by_type,
        notes,
    }
}

/// `min(1, part / whole) * 100` with `whole` floored at 1
fn saturating_share(part: usize, whole: usize) -> f64 {
    (part as f64 / whole.max(1) as f64).min(1.0) * 100.0
}

/// Scores how much the discovery result can be trusted, 0-100
pub fn confidence_score(metrics: &Metrics) -> u8 {
    let crawled = metrics.crawled;
    let mut score = f64::from(metrics.coverage_score) * 0.35
        + saturating_share(metrics.unique_path_count, crawled) * 0.15
        + saturating_share(metrics.menu_count, crawled * 10) * 0.10
        + saturating_share(metrics.cta_count, crawled) * 0.10
        + saturating_share(metrics.form_count, crawled) * 0.10;
    if metrics.auth_gate_pages > 0 {
        score += 10.0;
    }
    if metrics.critical_pages > 0 {
        score += 10.0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

pub fn build_quality_report(
    result: &DiscoveryResult,
    sitemap: &SitemapReport,
    menu: &MenuReport,
) -> QualityReport {
    let m = &result.metrics;
    let confidence = confidence_score(m);
    let form_precision = estimate_form_precision(result);

    let reasons = vec![
        format!("coverageScore={}", m.coverage_score),
        format!("crawled={}, uniquePathCount={}", m.crawled, m.unique_path_count),
        format!("menus={}, ctas={}, forms={}", m.menu_count, m.cta_count, m.form_count),
        format!("authGatePages={}, criticalPages={}", m.auth_gate_pages, m.critical_pages),
    ];

    let mut risks = Vec::new();
    if m.auth_gate_pages > 0 {
        risks.push("Auth-gated or access-restricted area present".to_string());
    }
    if m.critical_pages == 0 {
        risks.push("No P0/P1 critical path detected".to_string());
    }
    if menu.global_menus == 0 {
        risks.push("Global menu extraction may be incomplete".to_string());
    }
    if confidence < LOW_CONFIDENCE {
        risks.push("Low analysis confidence: deeper crawl recommended".to_string());
    }
    if form_precision.unknown_ratio > HIGH_UNKNOWN_RATIO {
        risks.push("High ratio of UNKNOWN form classifications".to_string());
    }

    let mut top_priority_pages = sitemap.rows.clone();
    top_priority_pages.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    top_priority_pages.truncate(TOP_ROWS);

    QualityReport {
        base_url: result.base_url.clone(),
        service_type: result.service_type,
        auth_likely: result.auth_likely,
        confidence,
        reasons,
        risks,
        metrics: m.clone(),
        form_precision,
        top_priority_pages,
        top_global_menus: menu
            .rows
            .iter()
            .filter(|r| r.scope == MenuScope::Global)
            .take(TOP_ROWS)
            .cloned()
            .collect(),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ScoutError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Writes the sitemap, menu and quality reports plus a markdown summary
///
/// Files are named `analysis_<id>_{sitemap,menu,quality}.json` and
/// `analysis_<id>_summary.md`; `dir` is created if missing.
pub fn write_reports(
    dir: &Path,
    analysis_id: &str,
    result: &DiscoveryResult,
) -> Result<ReportPaths, ScoutError> {
    std::fs::create_dir_all(dir)?;

    let sitemap = build_sitemap_report(result);
    let menu = build_menu_report(result);
    let quality = build_quality_report(result, &sitemap, &menu);

    let paths = ReportPaths {
        sitemap: dir.join(format!("analysis_{}_sitemap.json", analysis_id)),
        menu: dir.join(format!("analysis_{}_menu.json", analysis_id)),
        quality: dir.join(format!("analysis_{}_quality.json", analysis_id)),
        summary: dir.join(format!("analysis_{}_summary.md", analysis_id)),
    };

    write_json(&paths.sitemap, &sitemap)?;
    write_json(&paths.menu, &menu)?;
    write_json(&paths.quality, &quality)?;
    std::fs::write(&paths.summary, format_markdown_summary(result, &quality))?;

    tracing::info!("Reports written to {}", dir.display());
    Ok(paths)
}
