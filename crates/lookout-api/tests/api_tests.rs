use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use lookout_api::{create_router, AppState};
use lookout_core::{
    Alerter, AnnotationStore, CommandService, DisplayState, HttpProber, PassDriver, PassRequest,
    PassTrigger, ProbeDispatcher, Publisher, Report, Target, TargetRegistry,
};
use lookout_probe::HeartbeatPresence;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;
use tower::ServiceExt;

struct AlwaysUp;

#[async_trait]
impl HttpProber for AlwaysUp {
    async fn probe(&self, _url: &str) -> anyhow::Result<u64> {
        Ok(15)
    }
}

struct NullPublisher;

#[async_trait]
impl Publisher for NullPublisher {
    async fn publish(&self, _report: &Report) -> anyhow::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

struct NullAlerter;

#[async_trait]
impl Alerter for NullAlerter {
    async fn alert(&self, _recipient: &str, _message: &str) -> anyhow::Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    requests: UnboundedReceiver<PassRequest>,
}

fn create_test_app() -> TestApp {
    let registry = Arc::new(
        TargetRegistry::new(vec![
            Target::web("Panel", "http://panel.local"),
            Target::bot("Music", "peer-music"),
        ])
        .unwrap(),
    );
    let annotations = Arc::new(RwLock::new(AnnotationStore::new()));
    let presence = Arc::new(HeartbeatPresence::new(Duration::from_secs(120)));
    let (trigger, requests) = PassTrigger::channel();

    let driver = Arc::new(PassDriver::new(
        registry.clone(),
        annotations.clone(),
        ProbeDispatcher::new(Arc::new(AlwaysUp), presence.clone()),
        Arc::new(NullPublisher),
        Arc::new(NullAlerter),
        "admin",
    ));
    let commands = Arc::new(CommandService::new(registry, annotations, trigger));

    let state = AppState::new(commands, driver, presence);
    TestApp {
        router: create_router(state.clone()),
        state,
        requests,
    }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_schedule_maintenance() {
    let mut app = create_test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/targets/Panel/maintenance",
        Some(json!({ "time": "22:00", "reason": "kernel update" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Maintenance scheduled for Panel at 22:00 for the following reason: kernel update"
    );
    // 命令触发一次立即检查
    tokio_test::assert_ok!(app.requests.try_recv());

    let report = app.state.driver.run_pass().await;
    assert!(matches!(
        report.state_of("Panel"),
        Some(DisplayState::Maintenance { .. })
    ));
}

#[tokio::test]
async fn test_unknown_site_is_rejected() {
    let mut app = create_test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/targets/Ghost/problem",
        Some(json!({ "issue": "missing" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Site Ghost not found.");
    assert!(app.requests.try_recv().is_err());
    assert!(app.state.driver.annotations().read().await.is_empty());
}

#[tokio::test]
async fn test_observation_and_clear() {
    let app = create_test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/targets/Panel/observation",
        Some(json!({ "duration_hours": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Panel is under observation for 3 hours.");

    let report = app.state.driver.run_pass().await;
    assert_eq!(
        report.state_of("Panel"),
        Some(&DisplayState::Observing { hours_remaining: 3 })
    );

    let (status, body) = send(&app.router, "DELETE", "/api/v1/targets/Panel/annotations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Annotations for Panel removed.");

    let report = app.state.driver.run_pass().await;
    assert_eq!(report.state_of("Panel"), Some(&DisplayState::Up { latency_ms: 15 }));
}

#[tokio::test]
async fn test_negative_duration_rejected() {
    let mut app = create_test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/targets/Panel/observation",
        Some(json!({ "duration_hours": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(app.state.driver.annotations().read().await.is_empty());
    tokio_test::assert_err!(app.requests.try_recv());
}

#[tokio::test]
async fn test_observation_beyond_date_range_rejected() {
    let mut app = create_test_app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/v1/targets/Panel/observation",
        Some(json!({ "duration_hours": u32::MAX })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid command:"));
    assert!(app.state.driver.annotations().read().await.is_empty());
    tokio_test::assert_err!(app.requests.try_recv());
}

#[tokio::test]
async fn test_status_and_heartbeat() {
    let app = create_test_app();

    let (status, _) = send(&app.router, "GET", "/api/v1/status", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app.router, "POST", "/api/v1/presence/peer-music/heartbeat", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["peer_id"], "peer-music");

    app.state.driver.run_pass().await;

    let (status, body) = send(&app.router, "GET", "/api/v1/status", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["target"]["name"], "Panel");
    assert_eq!(entries[0]["state"]["state"], "up");
    assert_eq!(entries[1]["state"]["state"], "online");
}

#[tokio::test]
async fn test_list_targets() {
    let app = create_test_app();

    let (status, body) = send(&app.router, "GET", "/api/v1/targets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["category"], "Bot");
}
