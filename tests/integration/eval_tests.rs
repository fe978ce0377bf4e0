//! Evaluation harness over the scripted renderer

use crate::support::{login_form, FakePage, ScriptedRenderer, ORIGIN};
use std::time::Duration;
use surface_scout::classify::ServiceType;
use surface_scout::eval::{eval_options, run_eval, write_eval_report, EvalSeed, SeedSite};

fn site(url: &str, expected: ServiceType) -> SeedSite {
    SeedSite {
        url: url.to_string(),
        expected_service_type: expected,
        notes: None,
    }
}

fn renderer() -> ScriptedRenderer {
    ScriptedRenderer::new()
        .page("/", FakePage::new("Acme").links(&["/login", "/pricing"]))
        .page("/login", FakePage::new("Sign in").form(login_form()))
        .page("/pricing", FakePage::new("Plans"))
        .page("/docs", FakePage::new("Documentation"))
}

fn seed() -> EvalSeed {
    EvalSeed {
        policy: "smoke".to_string(),
        sample_size: 3,
        sites: vec![
            site(ORIGIN, ServiceType::Mixed),
            SeedSite {
                notes: Some("docs only".to_string()),
                ..site(&format!("{}/docs", ORIGIN), ServiceType::Dashboard)
            },
            site("ftp://files.example.com", ServiceType::Login),
            site(&format!("{}/never", ORIGIN), ServiceType::Landing),
        ],
    }
}

#[tokio::test]
async fn test_run_eval_rows_and_accuracy() {
    let mut renderer = renderer();
    let report = run_eval(&mut renderer, &seed(), &eval_options(Duration::from_secs(1))).await;

    assert_eq!(report.policy, "smoke");
    assert_eq!(report.sample_size, 3);
    assert_eq!(report.rows.len(), 3);

    let mixed = &report.rows[0];
    assert_eq!(mixed.actual_service_type, Some(ServiceType::Mixed));
    assert!(mixed.matched);
    assert!(mixed.auth_likely);
    assert_eq!(mixed.metrics.as_ref().unwrap().crawled, 3);
    assert!(mixed.error.is_none());

    let docs = &report.rows[1];
    assert_eq!(docs.actual_service_type, Some(ServiceType::Landing));
    assert!(!docs.matched);
    assert_eq!(docs.notes, "docs only");

    let invalid = &report.rows[2];
    assert_eq!(invalid.actual_service_type, None);
    assert!(!invalid.matched);
    assert!(invalid.metrics.is_none());
    assert!(invalid.error.as_deref().unwrap().contains("ftp"));

    // 1 of 3 rows matched
    assert_eq!(report.service_type_accuracy, 33);

    // Sites past the sample size are never crawled
    assert!(!renderer.navigations.iter().any(|url| url.ends_with("/never")));
}

#[tokio::test]
async fn test_eval_report_is_written_as_json() {
    let mut renderer = renderer();
    let report = run_eval(&mut renderer, &seed(), &eval_options(Duration::from_secs(1))).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report").join("discovery_eval.json");
    write_eval_report(&path, &report).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["serviceTypeAccuracy"], 33);
    assert_eq!(json["rows"][0]["actualServiceType"], "MIXED");
    assert_eq!(json["rows"][2]["actualServiceType"], serde_json::Value::Null);
    assert!(json["rows"][0].get("error").is_none());
}
