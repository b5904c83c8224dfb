//! In-process mock of the analytics API for client integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Form, Path, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use netenergy_client::api::DashboardApi;
use netenergy_client::token::MemoryTokenStore;

/// Bearer token the mock issues. `{"alg":"HS256"}.{"sub":"alice"}.sig`
pub const VALID_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhbGljZSJ9.c2ln";
pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "correct-horse";
/// Cell whose simulation endpoint returns a server error.
pub const BROKEN_CELL: &str = "C-500";

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {VALID_TOKEN}"))
}

fn guarded(headers: &HeaderMap, body: serde_json::Value) -> Response {
    if !authorized(headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Not authenticated" })))
            .into_response();
    }
    Json(body).into_response()
}

async fn token(Form(form): Form<LoginForm>) -> Response {
    if form.username == USERNAME && form.password == PASSWORD {
        Json(json!({ "access_token": VALID_TOKEN, "token_type": "bearer" })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect username or password" })),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<serde_json::Value>) -> Response {
    Json(json!({ "message": "User created", "username": body["username"] })).into_response()
}

async fn alerts(headers: HeaderMap) -> Response {
    guarded(
        &headers,
        json!([
            {
                "cell_id": "C-1",
                "last_seen": "2025-06-01T10:00:00",
                "rsrp_mean": -104.5,
                "snr_mean": 7.2,
                "ping_avg_mean": 80.0
            },
            {
                "cell_id": "C-2",
                "last_seen": "2025-06-01T11:00:00",
                "rsrp_mean": -118.0,
                "snr_mean": null,
                "ping_avg_mean": 40.0
            },
            { "cell_id": "C-3", "ts": "2025-06-01T09:00:00", "ping_avg_mean": 20.0 }
        ]),
    )
}

async fn cell_status(headers: HeaderMap) -> Response {
    guarded(
        &headers,
        json!([
            { "cell_id": "C-1", "status": "ACTIVE", "last_action": "hold" },
            { "cell_id": "C-2", "status": "SLEEP", "last_action": "decrease" },
            { "cell_id": "C-3", "status": "ALERT" }
        ]),
    )
}

async fn latest_actions(headers: HeaderMap) -> Response {
    guarded(
        &headers,
        json!([
            {
                "cell_id": "C-2",
                "action": "decrease",
                "class_label": "Excellent",
                "ts": "2025-06-01T11:05:00",
                "reason": "{\"rule\": \"class=decrease, trend=hold\"}"
            },
            {
                "cell_id": "C-9",
                "action": "foo",
                "class_label": "Very Weak",
                "reason": { "rule": "manual" }
            }
        ]),
    )
}

/// Full `cell_policy` rows. Row ids encode the requested page so tests can
/// check the query string: `page * 100 + index`.
async fn policies(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page: i64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(-1);
    let page_size: i64 = params.get("page_size").and_then(|p| p.parse().ok()).unwrap_or(-1);
    guarded(
        &headers,
        json!([
            {
                "id": page * 100,
                "ts": "2025-06-01T12:00:00",
                "cell_id": "C-1",
                "model_name": "policy_engine",
                "class_label": "Good",
                "action": "hold",
                "reason": "{\"rule\": \"class+trend agree (hold)\"}",
                "thresholds_ver": "v1",
                "decided_at": null
            },
            {
                "id": page * 100 + 1,
                "ts": "2025-06-01T11:00:00",
                "cell_id": "C-2",
                "model_name": "policy_engine",
                "class_label": "Excellent",
                "action": "decrease",
                "reason": "{\"rule\": \"class=decrease, trend=hold\"}",
                "thresholds_ver": format!("page_size={page_size}"),
                "decided_at": "2025-06-01T11:00:05"
            }
        ]),
    )
}

async fn policy_summary(headers: HeaderMap) -> Response {
    guarded(
        &headers,
        json!([
            { "action": "hold", "count": 6 },
            { "action": "decrease", "count": 3 },
            { "action": "reboot", "count": 1 }
        ]),
    )
}

async fn policy_timeline(headers: HeaderMap, Path(cell_id): Path<String>) -> Response {
    let body = if cell_id == "C-1" {
        json!([
            { "ts": "2025-06-01T10:00:00", "action": "hold" },
            { "ts": "2025-06-01T11:00:00", "action": "decrease" },
            { "ts": "2025-06-01T12:00:00", "action": "increase" }
        ])
    } else {
        json!([])
    };
    guarded(&headers, body)
}

async fn cells(headers: HeaderMap) -> Response {
    guarded(
        &headers,
        json!([
            { "cell_id": "C-1", "latitude": 41.01, "longitude": 28.97, "rsrp_mean": -84.0, "energy_kwh": 12.5 },
            { "cell_id": "C-2", "latitude": 39.93, "longitude": 32.85, "rsrp_mean": -100.0, "energy_kwh": 3.0 },
            { "cell_id": "C-3", "rsrp_mean": -90.0 }
        ]),
    )
}

async fn energy_summary(headers: HeaderMap) -> Response {
    guarded(
        &headers,
        json!({
            "total_cells": 3,
            "saved_kwh": 7300.0,
            "saved_pct": 20.0,
            "co2_ton_saved": 3.066,
            "saved_tl": 36500.0,
            "tree_equivalent": 71
        }),
    )
}

async fn simulate(headers: HeaderMap, Path(cell_id): Path<String>) -> Response {
    if cell_id == BROKEN_CELL {
        return (StatusCode::INTERNAL_SERVER_ERROR, "simulation backend down").into_response();
    }
    guarded(
        &headers,
        json!({
            "cell_id": cell_id,
            "energy_saving_pct": 99.0,
            "throughput_loss_pct": -4.0,
            "baseline": { "energy": 50.0, "throughput": 100.0 },
            "simulated": { "energy": 35.0, "throughput": 90.0 }
        }),
    )
}

/// Router mirroring the analytics API endpoints the client uses.
pub fn mock_router() -> Router {
    Router::new()
        .route("/auth/token", post(token))
        .route("/auth/register", post(register))
        .route("/api/alerts", get(alerts))
        .route("/api/cell_status", get(cell_status))
        .route("/api/policy_actions/latest", get(latest_actions))
        .route("/api/policies", get(policies))
        .route("/api/policy_summary", get(policy_summary))
        .route("/api/policy_timeline/{cell_id}", get(policy_timeline))
        .route("/api/cells", get(cells))
        .route("/api/cell_energy_summary", get(energy_summary))
        .route("/api/simulate/{cell_id}", get(simulate))
}

/// Serve the mock API on an ephemeral port and return its base URL.
pub async fn spawn_mock_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr should be available");
    tokio::spawn(async move {
        axum::serve(listener, mock_router())
            .await
            .expect("mock server should run");
    });
    format!("http://{addr}")
}

/// Build a client against `base_url` with a fresh token store.
pub fn client(base_url: &str, store: Arc<MemoryTokenStore>) -> DashboardApi {
    DashboardApi::with_client(reqwest::Client::new(), base_url, store)
        .expect("client should build")
}
