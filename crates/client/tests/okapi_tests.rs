//! Integration tests for the Okapi client against a fake back end.
//!
//! The fake is a small axum app bound to an ephemeral port that mimics the
//! two endpoints the gateway touches: `/bl-users/login` and
//! `/inventory/instances`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use z2folio_client::{BackendError, Config, InventoryBackend, OkapiClient};

/// Everything the fake back end observed about the last search request.
#[derive(Debug, Default, Clone)]
struct Observed {
    tenant: Option<String>,
    token: Option<String>,
    accept: Option<String>,
    content_type: Option<String>,
    offset: Option<String>,
    limit: Option<String>,
    query: Option<String>,
}

#[derive(Clone)]
struct FakeOkapi {
    observed: Arc<Mutex<Observed>>,
}

async fn login_handler(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if headers.get("x-okapi-tenant").is_none() {
        return (StatusCode::BAD_REQUEST, "missing tenant").into_response();
    }
    match (body["username"].as_str(), body["password"].as_str()) {
        (Some("diku_admin"), Some("swordfish")) => {
            ([("x-okapi-token", "token-123")], StatusCode::CREATED).into_response()
        }
        (Some("tokenless"), Some(_)) => StatusCode::CREATED.into_response(),
        _ => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"errorMessage": "Password does not match"})),
        )
            .into_response(),
    }
}

async fn search_handler(
    State(state): State<FakeOkapi>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    {
        let mut observed = state.observed.lock().unwrap();
        *observed = Observed {
            tenant: header("x-okapi-tenant"),
            token: header("x-okapi-token"),
            accept: header("accept"),
            content_type: header("content-type"),
            offset: params.get("offset").cloned(),
            limit: params.get("limit").cloned(),
            query: params.get("query").cloned(),
        };
    }

    match params.get("query").map(String::as_str) {
        Some("boom") => (StatusCode::INTERNAL_SERVER_ERROR, "index exploded").into_response(),
        Some(query) => Json(json!({
            "totalRecords": 2,
            "instances": [
                {"id": "inst-1", "title": format!("match for {query}")},
                {"id": "inst-2", "title": "second"}
            ]
        }))
        .into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn spawn_fake_okapi() -> (String, Arc<Mutex<Observed>>) {
    let observed = Arc::new(Mutex::new(Observed::default()));
    let app = Router::new()
        .route("/bl-users/login", post(login_handler))
        .route("/inventory/instances", get(search_handler))
        .with_state(FakeOkapi {
            observed: Arc::clone(&observed),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), observed)
}

fn client_for(base_url: &str) -> OkapiClient {
    let raw = format!(
        r#"{{"okapi": {{"url": "{base_url}", "tenant": "diku"}}, "requestTimeout": 5}}"#
    );
    OkapiClient::new(&Config::from_json(&raw).unwrap()).unwrap()
}

#[tokio::test]
async fn test_login_returns_token_header() {
    let (base_url, _) = spawn_fake_okapi().await;
    let client = client_for(&base_url);

    let token = client.login("diku_admin", "swordfish").await.unwrap();
    assert_eq!(token, "token-123");
}

#[tokio::test]
async fn test_login_failure_decodes_error_message() {
    let (base_url, _) = spawn_fake_okapi().await;
    let client = client_for(&base_url);

    let err = client.login("diku_admin", "wrong").await.unwrap_err();
    match err {
        BackendError::Http { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Password does not match");
        }
        other => panic!("expected Http error, got {other}"),
    }
}

#[tokio::test]
async fn test_login_without_token_header_fails() {
    let (base_url, _) = spawn_fake_okapi().await;
    let client = client_for(&base_url);

    let err = client.login("tokenless", "x").await.unwrap_err();
    assert!(matches!(err, BackendError::MissingToken));
}

#[tokio::test]
async fn test_search_sends_parameters_and_headers() {
    let (base_url, observed) = spawn_fake_okapi().await;
    let client = client_for(&base_url);

    let page = client
        .search(Some("token-123"), "title=\"the cat\"", 5, 5)
        .await
        .unwrap();
    assert_eq!(page.total_records, 2);
    assert_eq!(page.instances.len(), 2);

    let observed = observed.lock().unwrap().clone();
    assert_eq!(observed.tenant.as_deref(), Some("diku"));
    assert_eq!(observed.token.as_deref(), Some("token-123"));
    assert_eq!(observed.accept.as_deref(), Some("application/json"));
    assert_eq!(observed.content_type.as_deref(), Some("application/json"));
    assert_eq!(observed.offset.as_deref(), Some("5"));
    assert_eq!(observed.limit.as_deref(), Some("5"));
    // The query reaches the back end decoded; encoding is the transport's job.
    assert_eq!(observed.query.as_deref(), Some("title=\"the cat\""));
}

#[tokio::test]
async fn test_search_without_token_omits_header() {
    let (base_url, observed) = spawn_fake_okapi().await;
    let client = client_for(&base_url);

    client.search(None, "title=cat", 0, 10).await.unwrap();
    assert!(observed.lock().unwrap().token.is_none());
}

#[tokio::test]
async fn test_search_failure_carries_raw_body() {
    let (base_url, _) = spawn_fake_okapi().await;
    let client = client_for(&base_url);

    let err = client.search(None, "boom", 0, 10).await.unwrap_err();
    match err {
        BackendError::Http { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "index exploded");
        }
        other => panic!("expected Http error, got {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_back_end_is_a_transport_error() {
    // Nothing listens on this port.
    let client = client_for("http://127.0.0.1:9");
    let err = client.login("a", "b").await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}

#[tokio::test]
async fn test_query_url_overrides_search_base() {
    let (base_url, observed) = spawn_fake_okapi().await;
    // Login goes to a dead URL, searches to the fake: queryUrl wins for search.
    let raw = format!(
        r#"{{"okapi": {{"url": "http://127.0.0.1:9", "queryUrl": "{base_url}", "tenant": "diku"}}, "requestTimeout": 5}}"#
    );
    let client = OkapiClient::new(&Config::from_json(&raw).unwrap()).unwrap();

    client.search(None, "title=cat", 0, 10).await.unwrap();
    assert_eq!(
        observed.lock().unwrap().query.as_deref(),
        Some("title=cat")
    );
}
