//! In-process stand-in for the analysis backend.
//!
//! Every path answers with a scripted [`Reply`]; unscripted paths answer 404
//! the way a router with no matching route would. Hits, uploads and request
//! headers are recorded for assertions.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use analysis::{AnalysisClient, ClientConfig};
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, Value),
    /// Sleep before answering 200, to trip client timeouts.
    Hang(Duration),
    Pdf(&'static [u8]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub path: String,
    pub field: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub trace_id: Option<String>,
}

#[derive(Default)]
struct MockState {
    replies: HashMap<String, Reply>,
    hits: Mutex<HashMap<String, usize>>,
    uploads: Mutex<Vec<Upload>>,
    seen: Mutex<Vec<Seen>>,
}

pub struct MockBackend {
    pub base: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Reply)>,
    {
        let state = Arc::new(MockState {
            replies: replies
                .into_iter()
                .map(|(path, reply)| (path.to_string(), reply))
                .collect(),
            ..MockState::default()
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend crashed");
        });

        Self {
            base: format!("http://{addr}"),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::resolve(Some(self.base.as_str())).with_timeout(Duration::from_secs(10))
    }

    pub fn client(&self) -> AnalysisClient {
        AnalysisClient::new(self.config()).expect("client")
    }

    pub fn client_with(&self, tweak: impl FnOnce(ClientConfig) -> ClientConfig) -> AnalysisClient {
        AnalysisClient::new(tweak(self.config())).expect("client")
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().values().sum()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().unwrap().clone()
    }
}

async fn handle(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    // The header lookups must not borrow `request` across the awaits below,
    // or the handler future stops being `Send`.
    let seen = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Seen {
            method: method.clone(),
            path: path.clone(),
            content_type: header(CONTENT_TYPE.as_str()),
            trace_id: header("x-trace-id"),
        }
    };
    state.seen.lock().unwrap().push(seen);
    *state.hits.lock().unwrap().entry(path.clone()).or_default() += 1;

    if method == Method::POST {
        if let Ok(mut multipart) = Multipart::from_request(request, &state).await {
            while let Ok(Some(field)) = multipart.next_field().await {
                let field_name = field.name().unwrap_or_default().to_string();
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
                state.uploads.lock().unwrap().push(Upload {
                    path: path.clone(),
                    field: field_name,
                    file_name,
                    bytes,
                });
            }
        }
    }

    match state.replies.get(&path).cloned() {
        Some(Reply::Json(body)) => Json(body).into_response(),
        Some(Reply::Status(code, body)) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body)).into_response()
        }
        Some(Reply::Hang(delay)) => {
            tokio::time::sleep(delay).await;
            Json(json!({ "late": true })).into_response()
        }
        Some(Reply::Pdf(bytes)) => ([(CONTENT_TYPE, "application/pdf")], bytes).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" }))).into_response(),
    }
}

/// A body shaped like the reference backend's analysis response.
pub fn sample_result(file_type: &str, report: &str) -> Value {
    json!({
        "file_type": file_type,
        "summary": {
            "location": null,
            "date_time": "2024:05:01 10:22:13",
            "source": "Canon EOS 80D",
            "ai_probability": 12,
            "confidence": "medium"
        },
        "metadata": { "EXIF": { "Make": "Canon", "ISO": 200 } },
        "ai_indicators": {
            "software_detected": [],
            "heuristics": { "missing_exif": false },
            "anomalies": []
        },
        "report_url": report
    })
}
