use campus_voice_api::{
    config::Config,
    domain::complaint::entity::Severity,
    infrastructure::{
        ml::traits::{Analysis, AnalysisSource, ComplaintAnalyzer},
        repositories::in_memory::InMemoryStore,
        security::abuse_detector::AbuseDetector,
    },
    presentation::http::{
        routes::create_router,
        state::{AppState, Repositories},
    },
};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "campus_admin";
pub const ADMIN_PASSWORD: &str = "AdminPassword123!";

/// Returns pre-scripted keywords per complaint text. Unscripted texts get
/// their longer words as keywords.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    scripts: Mutex<HashMap<String, Vec<String>>>,
}

impl ScriptedAnalyzer {
    pub fn script(&self, text: &str, keywords: &[&str]) {
        self.scripts
            .lock()
            .expect("analyzer lock poisoned")
            .insert(
                text.to_string(),
                keywords.iter().map(|k| k.to_string()).collect(),
            );
    }
}

#[async_trait]
impl ComplaintAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, text: &str) -> Analysis {
        let scripted = self
            .scripts
            .lock()
            .expect("analyzer lock poisoned")
            .get(text)
            .cloned();
        let keywords = scripted.unwrap_or_else(|| {
            text.split_whitespace()
                .filter(|w| w.len() > 3)
                .map(|w| w.to_lowercase())
                .take(5)
                .collect()
        });
        Analysis {
            summary: text.chars().take(100).collect(),
            severity: Severity::Average,
            keywords,
            source: AnalysisSource::Model,
        }
    }
}

pub struct TestApp {
    pub app: Router,
    pub analyzer: Arc<ScriptedAnalyzer>,
}

pub async fn spawn_app() -> TestApp {
    let config = Config::for_memory("test-jwt-secret");
    let analyzer = Arc::new(ScriptedAnalyzer::default());

    let state = AppState {
        db: None,
        config,
        repos: Repositories::in_memory(InMemoryStore::new()),
        detector: AbuseDetector::new(None),
        analyzer: analyzer.clone(),
        rate_limiter: None,
    };

    let admin_hash = bcrypt::hash(ADMIN_PASSWORD, 4).expect("failed to hash admin password");
    state
        .auth()
        .bootstrap_admin(ADMIN_USERNAME, "admin@campus.test", &admin_hash)
        .await
        .expect("failed to seed admin");

    TestApp {
        app: create_router(state),
        analyzer,
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();

    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

/// Builds a JSON request, attaching a bearer token when given.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn unique_username(prefix: &str) -> String {
    let id = Uuid::now_v7().simple().to_string();
    format!("{}_{}", prefix, &id[id.len() - 10..])
}

/// Signs up a fresh student and returns `(token, user_id)`.
pub async fn signup_student(app: &Router, prefix: &str) -> (String, String) {
    let username = unique_username(prefix);
    let req = json_request(
        "POST",
        "/api/v1/auth/signup",
        None,
        serde_json::json!({
            "username": username,
            "email": format!("{}@campus.test", username),
            "password": "student-pass",
        }),
    );
    let res = expect_status(send(app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    (
        body["token"].as_str().expect("missing token").to_string(),
        body["user"]["id"].as_str().expect("missing user id").to_string(),
    )
}

pub async fn login_admin(app: &Router) -> String {
    let req = json_request(
        "POST",
        "/api/v1/auth/login",
        None,
        serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
    );
    let res = expect_status(send(app, req).await, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    body["token"].as_str().expect("missing admin token").to_string()
}

pub async fn submit(app: &Router, token: &str, text: &str) -> axum::response::Response {
    send(
        app,
        json_request(
            "POST",
            "/api/v1/complaints",
            Some(token),
            serde_json::json!({ "original_text": text }),
        ),
    )
    .await
}
