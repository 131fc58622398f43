//! HTTP engine tests
//!
//! These tests use wiremock to serve pages to the standard engine, both
//! directly and through the orchestrator.

use std::sync::Arc;
use std::time::Duration;
use sumi_harvest::crawler::{Orchestrator, TaskError};
use sumi_harvest::engine::{
    DefaultEngineFactory, Engine, EngineError, EngineMode, EngineOptions, StandardEngine,
};
use sumi_harvest::fields::FieldRegistry;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_options() -> EngineOptions {
    EngineOptions {
        user_agent: "TestBot/1.0".to_string(),
        timeout: Duration::from_secs(5),
        browser_path: None,
    }
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_successful_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><title>Home</title><body>a@b.com</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let engine = StandardEngine::new(&test_options(), Arc::new(FieldRegistry::new())).unwrap();

    engine.crawl(&format!("{}/", server.uri())).await.unwrap();
    engine.close().await;
}

#[tokio::test]
async fn test_crawl_http_error_status() {
    let server = MockServer::start().await;
    mount_page(&server, "/missing", 404, "not found").await;

    let engine = StandardEngine::new(&test_options(), Arc::new(FieldRegistry::new())).unwrap();

    let err = engine
        .crawl(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();

    match err {
        EngineError::Status { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/missing"));
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn test_crawl_unreachable_host() {
    let engine = StandardEngine::new(
        &EngineOptions {
            timeout: Duration::from_secs(2),
            ..test_options()
        },
        Arc::new(FieldRegistry::new()),
    )
    .unwrap();

    let err = engine.crawl("http://127.0.0.1:1/").await.unwrap_err();

    assert!(matches!(err, EngineError::Http(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_orchestrated_run_continues_past_failures() {
    let server = MockServer::start().await;
    mount_page(&server, "/ok-1", 200, "<html><body>one</body></html>").await;
    mount_page(&server, "/ok-2", 200, "<html><body>two</body></html>").await;
    mount_page(&server, "/broken", 500, "boom").await;

    let factory = Arc::new(DefaultEngineFactory::new(
        test_options(),
        Arc::new(FieldRegistry::new()),
    ));
    let orchestrator = Orchestrator::new(factory, EngineMode::Standard, 2);
    let targets = vec![
        format!("{}/ok-1", server.uri()),
        format!("{}/broken", server.uri()),
        format!("{}/ok-2", server.uri()),
        "not a url".to_string(),
    ];

    let report = orchestrator.run(targets).await.unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failures.len(), 2);

    let broken = report
        .failures
        .iter()
        .find(|f| f.target.ends_with("/broken"))
        .unwrap();
    assert!(matches!(
        broken.error,
        TaskError::Engine(EngineError::Status { status: 500, .. })
    ));

    let invalid = report
        .failures
        .iter()
        .find(|f| f.target == "not a url")
        .unwrap();
    assert!(matches!(
        invalid.error,
        TaskError::Engine(EngineError::InvalidTarget(_))
    ));
}
