// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the course-management backend.

use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use course_admin::config::Config;
use course_admin::notify::Notifier;
use course_admin::session::{MemorySessionStore, SessionStore};
use course_admin::AdminClient;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned reply for one route.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
    pub delay: Option<Duration>,
    /// Put a fresh `data._id` in each reply
    pub sequence_id: bool,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
            delay: None,
            sequence_id: false,
        }
    }

    /// Reply with no body at all.
    #[allow(dead_code)]
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: None,
            delay: None,
            sequence_id: false,
        }
    }

    #[allow(dead_code)]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[allow(dead_code)]
    pub fn with_sequence_id(mut self) -> Self {
        self.sequence_id = true;
        self
    }
}

/// Uploaded file as seen by the backend.
#[derive(Debug, Clone)]
pub struct RecordedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// One request as received by the mock.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub json: Option<Value>,
    pub fields: Vec<(String, String)>,
    pub file: Option<RecordedFile>,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Mock backend with per-route reply queues and a request log.
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<Mutex<HashMap<(String, String), VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    next_id: Arc<AtomicU64>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply. The last reply queued for a route is reused forever.
    pub fn respond(&self, method: &str, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_reply(&self, method: &str, path: &str) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(&(method.to_string(), path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Reply::json(404, json!({ "message": "Not found" })),
        }
    }

    /// Bind to a random port and serve. Returns the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .fallback(handle)
            .layer(DefaultBodyLimit::disable())
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle(State(backend): State<MockBackend>, req: Request) -> Response {
    let mut recorded = RecordedRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        authorization: header_value(req.headers(), header::AUTHORIZATION),
        content_type: header_value(req.headers(), header::CONTENT_TYPE),
        ..Default::default()
    };

    let is_multipart = recorded
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let mut multipart = Multipart::from_request(req, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.unwrap();
                    recorded.file = Some(RecordedFile {
                        field: name,
                        file_name,
                        content_type,
                        size: bytes.len(),
                    });
                }
                None => {
                    let text = field.text().await.unwrap();
                    recorded.fields.push((name, text));
                }
            }
        }
    } else {
        let bytes = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .unwrap();
        recorded.json = serde_json::from_slice(&bytes).ok();
    }

    let reply = backend.next_reply(&recorded.method, &recorded.path);
    backend.requests.lock().unwrap().push(recorded);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap();
    match reply.body {
        Some(mut body) => {
            if reply.sequence_id {
                let id = backend.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                body["data"]["_id"] = json!(format!("course-{}", id));
            }
            (status, Json(body)).into_response()
        }
        None => status.into_response(),
    }
}

/// Notifier that keeps every notice for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[allow(dead_code)]
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Client wired to `base_url` with an in-memory session and recording notifier.
pub fn test_client(base_url: &str) -> (AdminClient, Arc<MemorySessionStore>, Arc<RecordingNotifier>) {
    let config = Config::test_default()
        .with_api_url(base_url)
        .expect("valid mock URL");
    let session = Arc::new(MemorySessionStore::new());
    let notifier = Arc::new(RecordingNotifier::default());

    let client = AdminClient::new(
        config,
        session.clone() as Arc<dyn SessionStore>,
        notifier.clone() as Arc<dyn Notifier>,
    )
    .expect("client should build");

    (client, session, notifier)
}

/// Login reply carrying `token`.
#[allow(dead_code)]
pub fn login_reply(token: &str) -> Reply {
    Reply::json(
        200,
        json!({
            "status": "success",
            "message": "Login successful",
            "data": {
                "accessToken": token,
                "refreshToken": "refresh-abc",
                "role": "admin",
                "userId": "u1",
                "profile": {
                    "_id": "u1",
                    "email": "a@b.com",
                    "firstName": "Ada",
                    "lastName": "Admin",
                    "role": "admin"
                }
            }
        }),
    )
}
