use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{json, Value};

use threadview::{ClientError, CommentsClient, ListQuery, NewComment, SortOrder};

type Seen = Arc<Mutex<Vec<String>>>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base: &str) -> CommentsClient {
    CommentsClient::new(base, Duration::from_secs(5))
}

fn scenario() -> Value {
    json!([
        {
            "id": 1, "user_id": 1, "content": "Root",
            "created_at": "2024-01-01T10:00:00Z", "updated_at": "2024-01-01T10:00:00Z",
            "children": [
                {
                    "id": 2, "user_id": 2, "content": "Reply", "parent_id": 1,
                    "created_at": "2024-01-01T10:05:00Z", "updated_at": "2024-01-01T10:05:00Z",
                    "children": []
                }
            ]
        }
    ])
}

#[tokio::test]
async fn test_list_parses_nested_forest() {
    let app = Router::new().route("/api/comments", get(|| async { Json(scenario()) }));
    let base = serve(app).await;

    let forest = client(&base).list(&ListQuery::default()).await.unwrap();
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].content, "Root");
    assert_eq!(forest[0].children.len(), 1);
    assert_eq!(forest[0].children[0].parent_id, Some(1));
}

#[tokio::test]
async fn test_list_null_body_is_empty_forest() {
    let app = Router::new().route("/api/comments", get(|| async { "null" }));
    let base = serve(app).await;

    let forest = client(&base).list(&ListQuery::default()).await.unwrap();
    assert!(forest.is_empty());
}

#[tokio::test]
async fn test_list_sends_query_params() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/api/comments",
            get(|State(seen): State<Seen>, RawQuery(q): RawQuery| async move {
                seen.lock().unwrap().push(q.unwrap_or_default());
                Json(json!([]))
            }),
        )
        .with_state(seen.clone());
    let base = serve(app).await;

    let c = client(&base);
    c.list(&ListQuery::default()).await.unwrap();
    let query = ListQuery { page: Some(2), sort: Some(SortOrder::Desc), ..Default::default() };
    c.list(&query).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], "");
    assert_eq!(seen[1], "page=2&sort=desc");
}

#[tokio::test]
async fn test_create_root_omits_parent_id() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/comments",
            axum::routing::post(
                |State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                    *seen.lock().unwrap() = Some(body.clone());
                    let mut created = body;
                    created["id"] = json!(7);
                    (StatusCode::CREATED, Json(created))
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(app).await;

    let comment = NewComment { user_id: 3, content: "hi".into(), parent_id: None };
    let created = client(&base).create(&comment).await.unwrap();

    let body = seen.lock().unwrap().clone().unwrap();
    assert_eq!(body, json!({ "user_id": 3, "content": "hi" }));
    assert_eq!(created.map(|c| c.id), Some(7));
}

#[tokio::test]
async fn test_delete_sends_user_id() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/api/comments/{id}",
            delete(
                |State(seen): State<Seen>, Path(id): Path<i64>, Query(q): Query<HashMap<String, String>>| async move {
                    seen.lock().unwrap().push(format!("{}:{}", id, q.get("user_id").cloned().unwrap_or_default()));
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(app).await;

    client(&base).delete(5, 9).await.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![String::from("5:9")]);
}

#[tokio::test]
async fn test_backend_error_message_from_body() {
    let app = Router::new().route(
        "/api/comments/{id}",
        delete(|| async { (StatusCode::FORBIDDEN, Json(json!({ "error": "action forbidden" }))) }),
    );
    let base = serve(app).await;

    let err = client(&base).delete(1, 2).await.unwrap_err();
    assert_eq!(err, ClientError::Backend { status: 403, message: "action forbidden".into() });
    assert_eq!(err.to_string(), "action forbidden");
}

#[tokio::test]
async fn test_backend_error_falls_back_to_status_line() {
    let app = Router::new().route(
        "/api/comments",
        get(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>").into_response() }),
    );
    let base = serve(app).await;

    let err = client(&base).list(&ListQuery::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "502 Bad Gateway");
}

#[tokio::test]
async fn test_search_sends_query_and_caps_results() {
    let seen: Arc<Mutex<HashMap<String, String>>> = Arc::default();
    let app = Router::new()
        .route(
            "/api/comments/search",
            get(
                |State(seen): State<Arc<Mutex<HashMap<String, String>>>>,
                 Query(q): Query<HashMap<String, String>>| async move {
                    *seen.lock().unwrap() = q;
                    let hits: Vec<Value> = (1..=5)
                        .map(|i| json!({ "id": i, "user_id": 1, "content": format!("hello {}", i) }))
                        .collect();
                    Json(hits)
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(app).await;

    let hits = client(&base).search("hello world", 3).await.unwrap();
    assert_eq!(hits.len(), 3);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.get("query").map(String::as_str), Some("hello world"));
    assert_eq!(seen.get("limit").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{}/api", addr);
    let err = client(&base).list(&ListQuery::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}

#[tokio::test]
async fn test_trailing_slash_in_base_is_ignored() {
    let app = Router::new().route("/api/comments", get(|| async { Json(json!([])) }));
    let base = serve(app).await;

    let c = client(&format!("{}/", base));
    assert!(!c.base().ends_with('/'));
    assert!(c.list(&ListQuery::default()).await.unwrap().is_empty());
}
