//! In-process stand-in for the game API, served by axum on an ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use crate::services::coc_client::CocClient;

pub const TEST_TOKEN: &str = "test-token";

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

#[derive(Default)]
pub struct MockApi {
    routes: HashMap<String, Canned>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, status: StatusCode, body: impl Into<String>) -> Self {
        let delay = self.routes.get(path).and_then(|canned| canned.delay);
        self.routes.insert(
            path.to_string(),
            Canned {
                status,
                body: body.into(),
                delay,
            },
        );
        self
    }

    pub fn respond_json(self, path: &str, body: serde_json::Value) -> Self {
        self.respond(path, StatusCode::OK, body.to_string())
    }

    /// Delays an already registered route.
    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        if let Some(canned) = self.routes.get_mut(path) {
            canned.delay = Some(delay);
        }
        self
    }

    pub async fn spawn(self) -> MockServer {
        let routes = Arc::new(self.routes);
        let hits = Arc::new(Mutex::new(Vec::new()));
        let handler_hits = Arc::clone(&hits);

        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&handler_hits);
            async move { serve(&routes, &hits, &uri, &headers).await }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock api");
        });

        MockServer {
            base_url: format!("http://{addr}/v1"),
            hits,
            handle,
        }
    }
}

async fn serve(
    routes: &HashMap<String, Canned>,
    hits: &Mutex<Vec<String>>,
    uri: &Uri,
    headers: &HeaderMap,
) -> Response {
    let path = uri.path().to_string();
    hits.lock().expect("hits lock").push(path.clone());

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TEST_TOKEN}"));
    if !authorized {
        return json_response(
            StatusCode::UNAUTHORIZED,
            r#"{"reason":"accessDenied.invalidToken","message":"bad token"}"#.to_string(),
        );
    }

    match routes.get(&path) {
        Some(canned) => {
            if let Some(delay) = canned.delay {
                tokio::time::sleep(delay).await;
            }
            json_response(canned.status, canned.body.clone())
        }
        None => json_response(
            StatusCode::NOT_FOUND,
            r#"{"reason":"notFound","message":"no such resource"}"#.to_string(),
        ),
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub struct MockServer {
    base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockServer {
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn client(&self) -> CocClient {
        CocClient::new(reqwest::Client::new(), &self.base_url, TEST_TOKEN)
            .expect("mock base URL should parse")
    }

    /// Request paths received so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().expect("hits lock").clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
