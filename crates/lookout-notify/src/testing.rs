//! 测试用的内存 webhook 服务

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct MockState {
    messages: HashMap<String, Value>,
    next_id: u64,
    created: usize,
    alerts: Vec<Value>,
    failing: bool,
    stalled: bool,
}

#[derive(Clone)]
pub struct MockWebhook {
    base: String,
    state: Arc<Mutex<MockState>>,
}

impl MockWebhook {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let router = Router::new()
            .route("/hook", post(create_message))
            .route("/hook/messages/:id", patch(edit_message))
            .route("/alert", post(record_alert))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            state,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn created(&self) -> usize {
        self.state.lock().await.created
    }

    pub async fn alerts(&self) -> Vec<Value> {
        self.state.lock().await.alerts.clone()
    }

    pub async fn description(&self, id: &str) -> Option<String> {
        self.state.lock().await.messages.get(id).and_then(|m| {
            m["embeds"][0]["description"].as_str().map(str::to_string)
        })
    }

    pub async fn delete_message(&self, id: &str) {
        self.state.lock().await.messages.remove(id);
    }

    pub async fn seed_message(&self, description: &str) -> String {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = format!("seed-{}", state.next_id);
        state
            .messages
            .insert(id.clone(), json!({ "embeds": [{ "description": description }] }));
        id
    }

    pub async fn set_failing(&self, failing: bool) {
        self.state.lock().await.failing = failing;
    }

    /// 接受连接但长时间不响应
    pub async fn set_stalled(&self, stalled: bool) {
        self.state.lock().await.stalled = stalled;
    }
}

async fn stall_if_requested(state: &Mutex<MockState>) {
    let stalled = state.lock().await.stalled;
    if stalled {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }
}

async fn create_message(
    State(state): State<Arc<Mutex<MockState>>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    stall_if_requested(&state).await;
    let mut state = state.lock().await;
    if state.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" })));
    }
    state.next_id += 1;
    state.created += 1;
    let id = format!("msg-{}", state.next_id);
    state.messages.insert(id.clone(), body);
    (StatusCode::OK, Json(json!({ "id": id })))
}

async fn edit_message(
    State(state): State<Arc<Mutex<MockState>>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    stall_if_requested(&state).await;
    let mut state = state.lock().await;
    if state.failing {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match state.messages.get_mut(&id) {
        Some(message) => {
            *message = body;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn record_alert(
    State(state): State<Arc<Mutex<MockState>>>,
    Json(body): Json<Value>,
) -> StatusCode {
    stall_if_requested(&state).await;
    let mut state = state.lock().await;
    if state.failing {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.alerts.push(body);
    StatusCode::NO_CONTENT
}
