//! End-to-end discovery runs against the scripted renderer

use crate::support::{login_form, search_form, FakePage, ScriptedRenderer, ORIGIN};
use std::collections::HashSet;
use std::time::Duration;
use surface_scout::classify::{AuthSignal, FormType, PageRole, PriorityTier, ServiceType};
use surface_scout::discovery::{DiscoveryResult, ElementKind};
use surface_scout::output::{build_sitemap_report, write_reports};
use surface_scout::render::Zone;
use surface_scout::{discover, Discoverer, DiscoveryOptions, ScoutError};

fn options(max_pages: usize, max_depth: u32) -> DiscoveryOptions {
    DiscoveryOptions {
        max_pages,
        max_depth,
        navigation_timeout: Duration::from_secs(1),
    }
}

/// Home, a login page, six docs/blog pages and two plain pages
fn product_site() -> ScriptedRenderer {
    ScriptedRenderer::new()
        .page(
            "/",
            FakePage::new("Acme")
                .links(&["/login", "/docs", "/blog", "/about", "/team"])
                .menu(Zone::Header, "Docs", "/docs")
                .menu(Zone::Header, "Blog", "/blog")
                .menu(Zone::Footer, "Terms", "/terms")
                .buttons(&["Get started", "Learn more", "Book a demo"]),
        )
        .page(
            "/login",
            FakePage::new("Sign in")
                .links(&["/"])
                .menu(Zone::Header, "Docs", "/docs")
                .form(login_form()),
        )
        .page(
            "/docs",
            FakePage::new("Documentation")
                .links(&["/docs/guide", "/docs/api", "/"])
                .menu(Zone::Header, "Docs", "/docs")
                .menu(Zone::Sidebar, "Guide", "/docs/guide")
                .form(search_form()),
        )
        .page("/docs/guide", FakePage::new("Guide").links(&["/docs/api"]))
        .page("/docs/api", FakePage::new("API reference"))
        .page(
            "/blog",
            FakePage::new("Blog")
                .links(&["/blog/post-1", "/blog/post-2"])
                .menu(Zone::Header, "Docs", "/docs"),
        )
        .page("/blog/post-1", FakePage::new("First post"))
        .page("/blog/post-2", FakePage::new("Second post"))
        .page("/about", FakePage::new("About us"))
        .page("/team", FakePage::new("Our people"))
}

fn page<'a>(result: &'a DiscoveryResult, path: &str) -> &'a surface_scout::discovery::DiscoveredPage {
    result
        .pages
        .iter()
        .find(|p| p.canonical_path == path)
        .unwrap_or_else(|| panic!("no page for {}", path))
}

#[tokio::test]
async fn test_product_site_is_mixed() {
    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    assert_eq!(result.pages.len(), 10);
    assert_eq!(result.service_type, ServiceType::Mixed);
    assert!(result.auth_likely);
    assert!(result.metrics.critical_pages >= 1);

    let home = &result.pages[0];
    assert_eq!(home.canonical_path, "/");
    assert_eq!(home.depth, 0);
    assert_eq!(home.role, PageRole::Home);

    let login = page(&result, "/login");
    assert_eq!(login.depth, 1);
    assert_eq!(login.role, PageRole::Login);
    assert!(login.auth_likely);
    assert!(login.auth_signals.contains(&AuthSignal::PasswordInput));
    assert_eq!(login.priority_tier, PriorityTier::P0);

    let reading = result
        .pages
        .iter()
        .filter(|p| matches!(p.role, PageRole::Docs | PageRole::Blog))
        .count();
    assert_eq!(reading, 6);
    assert_eq!(page(&result, "/docs/api").depth, 2);
    assert_eq!(page(&result, "/about").role, PageRole::Other);
}

#[tokio::test]
async fn test_visits_breadth_first() {
    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    let depths: Vec<u32> = result.pages.iter().map(|p| p.depth).collect();
    let mut sorted = depths.clone();
    sorted.sort();
    assert_eq!(depths, sorted);

    let paths: Vec<&str> = result.pages.iter().take(6).map(|p| p.canonical_path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/login", "/docs", "/blog", "/about", "/team"]);
}

#[tokio::test]
async fn test_elements_and_metrics() {
    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();
    let metrics = &result.metrics;

    assert_eq!(metrics.crawled, 10);
    assert_eq!(metrics.unique_path_count, 10);
    // "Get started" and "Book a demo"
    assert_eq!(metrics.cta_count, 2);
    assert_eq!(result.elements_of(ElementKind::Button).count(), 1);
    // Header, footer and sidebar menus across /, /login, /docs and /blog
    assert_eq!(metrics.menu_count, 7);
    assert_eq!(metrics.form_count, 2);
    assert_eq!(metrics.form_type_counts.get(&FormType::Login), Some(&1));
    assert_eq!(metrics.form_type_counts.get(&FormType::Search), Some(&1));
    assert_eq!(metrics.auth_gate_pages, 1);
    assert!(metrics.queued >= metrics.crawled);

    let login_form = result
        .elements_of(ElementKind::Form)
        .find(|e| e.form_type == Some(FormType::Login))
        .unwrap();
    assert_eq!(login_form.page_url, format!("{}/login", ORIGIN));
    assert_eq!(result.elements_of(ElementKind::Input).count(), 3);
}

#[tokio::test]
async fn test_page_budget_is_respected() {
    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(4, 3)).await.unwrap();

    assert_eq!(result.pages.len(), 4);
    assert_eq!(renderer.navigations.len(), 4);
    assert_eq!(result.limits.max_pages, 4);
    assert_eq!(result.metrics.crawled, 4);
}

#[tokio::test]
async fn test_depth_limit_is_respected() {
    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(50, 1)).await.unwrap();

    assert_eq!(result.pages.len(), 6);
    assert!(result.pages.iter().all(|p| p.depth <= 1));

    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(50, 0)).await.unwrap();
    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.metrics.queued, 1);
}

#[tokio::test]
async fn test_url_variants_are_deduplicated() {
    let mut renderer = ScriptedRenderer::new()
        .page(
            "/",
            FakePage::new("Home").links(&[
                "/docs",
                "/docs/",
                "/docs?utm_source=newsletter",
                "/docs?page=2",
                "/docs#install",
                "https://app.example.com/docs",
                "https://elsewhere.example.org/docs",
                "mailto:team@example.com",
                "javascript:void(0)",
                "#top",
            ]),
        )
        .page("/docs", FakePage::new("Docs").links(&["/", "/docs?page=3"]));

    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    assert_eq!(result.pages.len(), 2);
    assert_eq!(renderer.navigations.len(), 2);

    let urls: HashSet<&str> = result.pages.iter().map(|p| p.url.as_str()).collect();
    let paths: HashSet<&str> = result.pages.iter().map(|p| p.canonical_path.as_str()).collect();
    assert_eq!(urls.len(), 2);
    assert_eq!(paths.len(), 2);
    assert!(renderer
        .navigations
        .iter()
        .all(|url| url.starts_with(ORIGIN)));
}

#[tokio::test]
async fn test_redirect_to_login_gates_page() {
    let mut renderer = ScriptedRenderer::new()
        .page("/", FakePage::new("Home").links(&["/app"]))
        .page("/app", FakePage::new("App").redirect("/login"))
        .page("/login", FakePage::new("Sign in").form(login_form()));

    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    let app = page(&result, "/app");
    assert_eq!(app.url, format!("{}/app", ORIGIN));
    assert_eq!(app.final_url, format!("{}/login", ORIGIN));
    assert_eq!(app.role, PageRole::Login);
    assert!(app.auth_likely);
    assert!(app.auth_signals.contains(&AuthSignal::RedirectToLogin));
    assert!(app.auth_signals.contains(&AuthSignal::PasswordInput));
}

#[tokio::test]
async fn test_dashboard_redirecting_to_login_is_mixed() {
    let mut renderer = ScriptedRenderer::new()
        .page("/", FakePage::new("Acme").links(&["/dashboard"]))
        .page("/dashboard", FakePage::new("Dashboard").redirect("/login"))
        .page("/login", FakePage::new("Sign in").form(login_form()));

    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    let dashboard = page(&result, "/dashboard");
    assert_eq!(dashboard.final_path, "/login");
    assert_eq!(dashboard.role, PageRole::Login);
    assert!(dashboard.auth_signals.contains(&AuthSignal::RedirectToLogin));
    // The requested path looks like a dashboard, but the page is a login form
    assert_eq!(result.service_type, ServiceType::Mixed);
}

#[tokio::test]
async fn test_redirects_to_one_target_share_a_path() {
    let mut renderer = ScriptedRenderer::new()
        .page("/", FakePage::new("Acme").links(&["/app", "/account"]))
        .page("/app", FakePage::new("App").redirect("/login"))
        .page("/account", FakePage::new("Account").redirect("/login"))
        .page("/login", FakePage::new("Sign in").form(login_form()));

    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    assert_eq!(result.pages.len(), 3);
    assert_eq!(result.metrics.crawled, 3);
    assert_eq!(result.metrics.unique_path_count, 2);

    let sitemap = build_sitemap_report(&result);
    let paths: Vec<&str> = sitemap.rows.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/login", "/login"]);
}

#[tokio::test]
async fn test_query_variant_of_start_path_is_skipped() {
    let mut renderer = ScriptedRenderer::new()
        .page("/", FakePage::new("Acme").links(&["/docs"]))
        .page("/docs", FakePage::new("Docs").links(&["/?tab=1", "/"]));

    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    let urls: Vec<&str> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://app.example.com/", "https://app.example.com/docs"]
    );
    assert_eq!(renderer.navigations.len(), 2);
}

#[tokio::test]
async fn test_start_url_with_query_owns_its_path() {
    let mut renderer = ScriptedRenderer::new()
        .page("/", FakePage::new("Acme").links(&["/docs"]))
        .page("/docs", FakePage::new("Docs").links(&["/", "/?lang=en"]));

    let start = format!("{}/?lang=en", ORIGIN);
    let result = discover(&mut renderer, &start, &options(50, 3)).await.unwrap();

    // The bare "/" shares the start page's path and is never visited
    let urls: Vec<&str> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://app.example.com/?lang=en",
            "https://app.example.com/docs"
        ]
    );
    assert_eq!(renderer.navigations.len(), 2);
}

#[tokio::test]
async fn test_gated_dashboard_site() {
    let mut renderer = ScriptedRenderer::new()
        .page("/", FakePage::new("Console").links(&["/dashboard", "/reports"]))
        .page("/dashboard", FakePage::new("Overview"))
        .page("/reports", FakePage::new("Reports").status(401));

    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    assert_eq!(result.service_type, ServiceType::Dashboard);
    let reports = page(&result, "/reports");
    assert_eq!(reports.http_status, 401);
    assert!(reports.auth_signals.contains(&AuthSignal::Http401));
    // 30 base + 10 auth + 10 shallow + 15 error status
    assert_eq!(reports.priority_score, 65);
}

#[tokio::test]
async fn test_failed_navigations_are_recorded() {
    let mut renderer = ScriptedRenderer::new()
        .page("/", FakePage::new("Home").links(&["/slow", "/down", "/pricing"]))
        .page(
            "/slow",
            FakePage {
                hangs: true,
                ..FakePage::new("Slow")
            },
        )
        .page(
            "/down",
            FakePage {
                broken: true,
                ..FakePage::new("Down")
            },
        )
        .page("/pricing", FakePage::new("Pricing"));

    let mut opts = options(50, 3);
    opts.navigation_timeout = Duration::from_millis(50);
    let result = discover(&mut renderer, ORIGIN, &opts).await.unwrap();

    assert_eq!(result.pages.len(), 4);
    for path in ["/slow", "/down"] {
        let failed = page(&result, path);
        assert_eq!(failed.http_status, 0);
        assert_eq!(failed.title, "");
        assert_eq!(failed.final_url, failed.url);
        assert!(!failed.auth_likely);
    }
    assert_eq!(page(&result, "/pricing").role, PageRole::Pricing);
}

#[tokio::test]
async fn test_missing_pages_answer_404() {
    let mut renderer = ScriptedRenderer::new().page("/", FakePage::new("Home").links(&["/gone"]));

    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    let gone = page(&result, "/gone");
    assert_eq!(gone.http_status, 404);
    // 30 base + 10 shallow + 15 error status
    assert_eq!(gone.priority_score, 55);
}

#[tokio::test]
async fn test_rejects_unusable_start_urls() {
    let mut renderer = ScriptedRenderer::new();

    let err = discover(&mut renderer, "ftp://files.example.com", &options(10, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ScoutError::Url(_)));

    let err = discover(&mut renderer, "not a url", &options(10, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ScoutError::Url(_)));

    assert!(renderer.navigations.is_empty());
}

#[tokio::test]
async fn test_result_json_shape() {
    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["baseUrl"], ORIGIN);
    assert_eq!(json["origin"], ORIGIN);
    assert_eq!(json["serviceType"], "MIXED");
    assert_eq!(json["authLikely"], true);
    assert_eq!(json["limits"]["sameOriginOnly"], true);
    assert_eq!(json["pages"][0]["role"], "HOME");
    assert_eq!(json["pages"][0]["canonicalPath"], "/");
    assert_eq!(json["metrics"]["formTypeCounts"]["LOGIN"], 1);
    assert!(json["startedAt"].is_string());
    assert!(json["finishedAt"].is_string());

    let login = json["pages"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["canonicalPath"] == "/login")
        .unwrap();
    assert_eq!(login["authSignals"][0], "password-input");
    assert_eq!(login["priorityTier"], "P0");
}

#[tokio::test]
async fn test_reports_for_discovered_site() {
    let mut renderer = product_site();
    let result = discover(&mut renderer, ORIGIN, &options(50, 3)).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let paths = write_reports(dir.path(), "run1", &result).unwrap();

    let menu: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.menu).unwrap()).unwrap();
    let docs = menu["rows"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["name"] == "Docs")
        .unwrap();
    // Docs sits in the header of 4 of 10 pages
    assert_eq!(docs["scope"], "GLOBAL");

    let summary = std::fs::read_to_string(&paths.summary).unwrap();
    assert!(summary.contains("**Service Type**: MIXED"));
    assert!(summary.contains("/login"));
}

#[tokio::test]
async fn test_discoverer_reuses_renderer() {
    let mut discoverer = Discoverer::new(product_site(), options(3, 3));

    let first = discoverer.discover(ORIGIN).await.unwrap();
    let second = discoverer.discover(&format!("{}/docs", ORIGIN)).await.unwrap();

    assert_eq!(first.pages.len(), 3);
    assert_eq!(second.pages[0].canonical_path, "/docs");
    assert_eq!(second.pages[0].role, PageRole::Docs);

    let renderer = discoverer.into_renderer();
    assert_eq!(renderer.navigations.len(), 6);
}
