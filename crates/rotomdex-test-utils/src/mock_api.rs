//! In-process PokeAPI stand-in for tests.
//!
//! Serves the two endpoint shapes the catalog consumes:
//! - `GET /api/v2/pokemon?limit=N` -> `{ "count", "results": [{ "name", "url" }] }`
//! - `GET /api/v2/pokemon/{id}`    -> detail record with `types` and `sprites`
//!
//! Every sprite URL in a detail record resolves to [`SPRITE_PNG`].
//!
//! The server binds `127.0.0.1:0` on its own thread with a private tokio runtime, so
//! blocking HTTP clients can be used from plain `#[test]` functions.
//!
//! ```no_run
//! use rotomdex_test_utils::mock_api::MockApi;
//!
//! let server = MockApi::kanto().fail_item("charmander").start();
//! println!("{}", server.base_url()); // http://127.0.0.1:PORT/api/v2
//! ```

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

/// 1x1 transparent PNG served for every sprite
pub const SPRITE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone)]
pub struct MockMon {
    pub id: u64,
    pub name: String,
    pub types: Vec<String>,
    /// Whether the record carries the diamond-pearl sprite variant
    pub has_dp_sprite: bool,
}

/// Builder for a mock upstream
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    mons: Vec<MockMon>,
    index_status: Option<u16>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Six well-known entries in dex order
    pub fn kanto() -> Self {
        Self::new()
            .with_mon(1, "bulbasaur", &["grass", "poison"])
            .with_mon(4, "charmander", &["fire"])
            .with_mon(6, "charizard", &["fire", "flying"])
            .with_mon(7, "squirtle", &["water"])
            .with_mon(25, "pikachu", &["electric"])
            .with_mon(133, "eevee", &["normal"])
    }

    pub fn with_mon(mut self, id: u64, name: &str, types: &[&str]) -> Self {
        self.mons.push(MockMon {
            id,
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            has_dp_sprite: true,
        });
        self
    }

    /// Drop the diamond-pearl sprite from one record
    pub fn without_dp_sprite(mut self, name: &str) -> Self {
        if let Some(mon) = self.mons.iter_mut().find(|m| m.name == name) {
            mon.has_dp_sprite = false;
        }
        self
    }

    pub fn fail_index(mut self, status: u16) -> Self {
        self.index_status = Some(status);
        self
    }

    pub fn fail_item(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn delay_item(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    pub fn start(self) -> MockServer {
        let (addr_tx, addr_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("build mock api runtime");

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind mock api listener");
                let addr = listener.local_addr().expect("mock api local addr");

                let shared = Arc::new(Shared {
                    api: self,
                    base_url: format!("http://{}/api/v2", addr),
                    requests: counter,
                });

                let app = Router::new()
                    .route("/api/v2/pokemon", get(index))
                    .route("/api/v2/pokemon/{id}", get(detail))
                    .route("/api/v2/sprites/{kind}/{file}", get(sprite))
                    .with_state(shared);

                addr_tx.send(addr).expect("report mock api address");

                let _ = axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.await;
                    })
                    .await;
            });
        });

        let addr = addr_rx.recv().expect("mock api failed to start");

        MockServer {
            base_url: format!("http://{}/api/v2", addr),
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }
}

/// Running mock; shuts down on drop
pub struct MockServer {
    base_url: String,
    requests: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockServer {
    /// API root, e.g. `http://127.0.0.1:PORT/api/v2`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests served so far (index, detail and sprite)
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

struct Shared {
    api: MockApi,
    base_url: String,
    requests: Arc<AtomicUsize>,
}

impl Shared {
    fn sprite_url(&self, kind: &str, id: u64) -> String {
        format!("{}/sprites/{}/{}.png", self.base_url, kind, id)
    }

    fn record(&self, mon: &MockMon) -> Value {
        let types: Vec<Value> = mon
            .types
            .iter()
            .enumerate()
            .map(|(i, t)| {
                json!({
                    "slot": i + 1,
                    "type": { "name": t, "url": format!("{}/type/{}/", self.base_url, t) }
                })
            })
            .collect();

        let dp = if mon.has_dp_sprite {
            Value::String(self.sprite_url("diamond-pearl", mon.id))
        } else {
            Value::Null
        };

        json!({
            "id": mon.id,
            "name": mon.name,
            "height": mon.id * 2,
            "weight": mon.id * 10,
            "types": types,
            "sprites": {
                "front_default": self.sprite_url("default", mon.id),
                "versions": {
                    "generation-iv": {
                        "diamond-pearl": { "front_default": dp }
                    }
                }
            }
        })
    }
}

fn status_response(code: u16) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "detail": "mock failure" }))).into_response()
}

async fn index(
    State(shared): State<Arc<Shared>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    shared.requests.fetch_add(1, Ordering::SeqCst);

    if let Some(code) = shared.api.index_status {
        return status_response(code);
    }

    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(20);

    let results: Vec<Value> = shared
        .api
        .mons
        .iter()
        .take(limit)
        .map(|m| {
            json!({
                "name": m.name,
                "url": format!("{}/pokemon/{}", shared.base_url, m.id),
            })
        })
        .collect();

    Json(json!({
        "count": shared.api.mons.len(),
        "next": null,
        "previous": null,
        "results": results,
    }))
    .into_response()
}

async fn detail(State(shared): State<Arc<Shared>>, Path(id): Path<u64>) -> Response {
    shared.requests.fetch_add(1, Ordering::SeqCst);

    let Some(mon) = shared.api.mons.iter().find(|m| m.id == id) else {
        return status_response(404);
    };

    if let Some(delay) = shared.api.delays.get(&mon.name) {
        tokio::time::sleep(*delay).await;
    }

    if shared.api.failing.contains(&mon.name) {
        return status_response(500);
    }

    Json(shared.record(mon)).into_response()
}

async fn sprite(
    State(shared): State<Arc<Shared>>,
    Path((kind, file)): Path<(String, String)>,
) -> Response {
    shared.requests.fetch_add(1, Ordering::SeqCst);

    let known_id = file
        .strip_suffix(".png")
        .and_then(|id| id.parse::<u64>().ok())
        .is_some_and(|id| shared.api.mons.iter().any(|m| m.id == id));
    if !matches!(kind.as_str(), "default" | "diamond-pearl") || !known_id {
        return status_response(404);
    }

    ([(header::CONTENT_TYPE, "image/png")], SPRITE_PNG).into_response()
}
