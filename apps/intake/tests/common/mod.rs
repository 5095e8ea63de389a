#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::Url;
use serde_json::{json, Value};

use resume_intake::host::{Host, HostUser};

/// One multipart upload as the stub endpoint saw it.
#[derive(Debug, Default, Clone)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: usize,
    pub telegram_id: Option<String>,
}

/// How the stub answers, plus everything it received.
#[derive(Clone)]
pub struct StubEndpoint {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Duration,
    pub uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    pub skips: Arc<Mutex<Vec<Value>>>,
}

impl Default for StubEndpoint {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "status": "ok" }),
            delay: Duration::ZERO,
            uploads: Arc::default(),
            skips: Arc::default(),
        }
    }
}

impl StubEndpoint {
    pub fn failing(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            ..Default::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn skips(&self) -> Vec<Value> {
        self.skips.lock().unwrap().clone()
    }

    /// Serves the stub on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> Url {
        let app = Router::new()
            .route("/resume/upload", post(handle_upload))
            .route("/resume/pass", post(handle_pass))
            .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{addr}/")).unwrap()
    }
}

async fn handle_upload(
    State(stub): State<StubEndpoint>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut received = ReceivedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                received.file_name = field.file_name().map(str::to_string);
                received.content_type = field.content_type().map(str::to_string);
                received.bytes = field.bytes().await.unwrap().len();
            }
            Some("telegram_id") => received.telegram_id = Some(field.text().await.unwrap()),
            _ => {}
        }
    }
    stub.uploads.lock().unwrap().push(received);

    tokio::time::sleep(stub.delay).await;
    (stub.status, Json(stub.body.clone()))
}

async fn handle_pass(
    State(stub): State<StubEndpoint>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.skips.lock().unwrap().push(body);
    tokio::time::sleep(stub.delay).await;
    (stub.status, Json(stub.body.clone()))
}

/// A base URL nothing is listening on.
pub async fn dead_base_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// Host double that counts lifecycle calls.
#[derive(Default)]
pub struct CountingHost {
    pub user: Option<HostUser>,
    pub expands: AtomicUsize,
    pub closes: AtomicUsize,
}

impl CountingHost {
    pub fn signed_in(id: &str) -> Self {
        Self {
            user: Some(HostUser::with_id(id)),
            ..Default::default()
        }
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Host for CountingHost {
    fn expand(&self) {
        self.expands.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn current_user(&self) -> Option<HostUser> {
        self.user.clone()
    }
}
