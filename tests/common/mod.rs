//! Local mock service for exercising the client over real HTTP
//!
//! Binds an ephemeral loopback port and answers every request from a
//! scripted sequence of responses, recording request counts, paths, query
//! strings, and authorization headers for assertions.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;

/// Route client log output through env_logger for failing-test diagnosis.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone)]
pub struct MockService {
    hits: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<(u16, String)>>>,
    fallback: (u16, String),
    delay: Option<Duration>,
    auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    paths: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    /// Service that answers every request the same way.
    pub fn always(status: u16, body: &str) -> Self {
        Self::sequence(&[], (status, body))
    }

    /// Service that plays through `script` once, then answers with
    /// `fallback` for every further request.
    pub fn sequence(script: &[(u16, &str)], fallback: (u16, &str)) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(
                script.iter().map(|(s, b)| (*s, b.to_string())).collect(),
            )),
            fallback: (fallback.0, fallback.1.to_string()),
            delay: None,
            auth_headers: Arc::new(Mutex::new(Vec::new())),
            paths: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Hold every response for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.auth_headers.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Start serving on an ephemeral port; returns the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new().fallback(respond).with_state(self.clone());
        serve(app).await
    }
}

async fn respond(State(service): State<MockService>, request: Request) -> Response {
    service.hits.fetch_add(1, Ordering::SeqCst);

    let auth = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    service.auth_headers.lock().unwrap().push(auth);
    service
        .paths
        .lock()
        .unwrap()
        .push(request.uri().path().to_string());
    service
        .queries
        .lock()
        .unwrap()
        .push(request.uri().query().unwrap_or("").to_string());

    if let Some(delay) = service.delay {
        tokio::time::sleep(delay).await;
    }

    let next = service.script.lock().unwrap().pop_front();
    let (status, body) = next.unwrap_or_else(|| service.fallback.clone());

    (
        StatusCode::from_u16(status).expect("valid status in script"),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Serve an arbitrary router on an ephemeral port; returns the base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock service");
    });

    format!("http://{}", addr)
}
