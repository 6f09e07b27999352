// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test harness: an in-process fake Notion and an app wired to it.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Method, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use run_leaderboard::config::Config;
use run_leaderboard::routes::create_router;
use run_leaderboard::AppState;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const API_KEY: &str = "secret_test_key";
pub const MEMBERS_DB: &str = "members-db";
pub const RECORDS_DS: &str = "records-ds";
pub const RECORDS_DB: &str = "11112222-3333-4444-5555-666677778888";
pub const OTHER_DB: &str = "99990000-0000-0000-0000-000000000000";

/// In-memory Notion workspace.
///
/// Pages are kept in insertion order; search returns the newest first,
/// like Notion's `last_edited_time` descending sort.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeNotion {
    pub members: Mutex<Vec<Value>>,
    pub pages: Mutex<Vec<Value>>,
    pub search_calls: AtomicUsize,
    pub page_reads: AtomicUsize,
    /// Answer 429 from this search call onwards (1-based)
    pub rate_limit_from_search: Mutex<Option<usize>>,
    next_id: AtomicUsize,
}

#[allow(dead_code)]
impl FakeNotion {
    pub fn add_member(&self, id: &str, name: &str, count: u32) {
        self.members.lock().unwrap().push(json!({
            "object": "page",
            "id": id,
            "url": format!("https://www.notion.so/{id}"),
            "parent": { "type": "database_id", "database_id": MEMBERS_DB },
            "properties": {
                "Name": { "type": "title", "title": [{ "text": { "content": name }, "plain_text": name }] },
                "누적 달린 횟수": { "type": "rollup", "rollup": { "type": "number", "number": count } },
                "누적 달린 시간": { "type": "rollup", "rollup": { "type": "number", "number": count * 30 } },
                "그룹": { "type": "select", "select": { "name": "Weekend" } },
                "주활동": { "type": "select", "select": { "name": "Seoul" } },
                "기수": { "type": "select", "select": { "name": "1" } }
            }
        }));
    }

    /// Add a run-record page as if it had been edited just now.
    pub fn add_record(&self, id: &str, member_id: &str, date: Option<&str>, title: &str) {
        let mut properties = json!({
            "오늘의 한줄 제목/Story": { "type": "title", "title": [{ "text": { "content": title } }] },
            "이름`": { "type": "relation", "relation": [{ "id": member_id }] },
            "달린 시간(분)": { "type": "number", "number": 30 },
            "달린 장소": { "type": "rich_text", "rich_text": [] },
        });
        properties["달린 날짜"] = match date {
            Some(start) => json!({ "type": "date", "date": { "start": start, "end": null } }),
            None => json!({ "type": "date", "date": null }),
        };
        self.pages.lock().unwrap().push(json!({
            "object": "page",
            "id": id,
            "url": format!("https://www.notion.so/{id}"),
            "parent": { "type": "database_id", "database_id": RECORDS_DB },
            "properties": properties,
        }));
    }

    /// Add a page that belongs to some unrelated database.
    pub fn add_unrelated_page(&self, id: &str) {
        self.pages.lock().unwrap().push(json!({
            "object": "page",
            "id": id,
            "parent": { "type": "database_id", "database_id": OTHER_DB },
            "properties": {
                "달린 날짜": { "type": "date", "date": { "start": "2030-01-01" } }
            }
        }));
    }

    pub fn record_count(&self) -> usize {
        self.pages
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p["parent"]["database_id"] == RECORDS_DB)
            .count()
    }
}

fn notion_error(status: StatusCode, code: &str, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "object": "error",
            "status": status.as_u16(),
            "code": code,
            "message": message,
        })),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .is_some_and(|v| v == format!("Bearer {API_KEY}").as_str())
        && headers
            .get("notion-version")
            .is_some_and(|v| v == "2022-06-28")
}

fn paginate(items: Vec<Value>, body: &Value) -> Value {
    let page_size = body["page_size"].as_u64().unwrap_or(100) as usize;
    let start = body["start_cursor"]
        .as_str()
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0);
    let end = (start + page_size).min(items.len());
    let has_more = end < items.len();
    json!({
        "object": "list",
        "results": items.get(start..end).map(<[Value]>::to_vec).unwrap_or_default(),
        "has_more": has_more,
        "next_cursor": if has_more { Value::from(end.to_string()) } else { Value::Null },
    })
}

fn matches_filter(page: &Value, filter: &Value) -> bool {
    if let Some(all) = filter.get("and").and_then(Value::as_array) {
        return all.iter().all(|f| matches_filter(page, f));
    }
    let property = &page["properties"][filter["property"].as_str().unwrap_or_default()];
    if let Some(id) = filter["relation"]["contains"].as_str() {
        return property["relation"]
            .as_array()
            .is_some_and(|ids| ids.iter().any(|r| r["id"] == id));
    }
    if let Some(date) = filter["date"]["equals"].as_str() {
        return property["date"]["start"] == date;
    }
    true
}

async fn search(
    State(fake): State<Arc<FakeNotion>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return notion_error(StatusCode::UNAUTHORIZED, "unauthorized", "API token is invalid.");
    }
    let call = fake.search_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if fake
        .rate_limit_from_search
        .lock()
        .unwrap()
        .is_some_and(|from| call >= from)
    {
        return notion_error(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "You have been rate limited. Please try again in a few minutes.",
        );
    }

    let mut newest_first = fake.pages.lock().unwrap().clone();
    newest_first.reverse();
    (StatusCode::OK, Json(paginate(newest_first, &body)))
}

async fn query_database(
    State(fake): State<Arc<FakeNotion>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return notion_error(StatusCode::UNAUTHORIZED, "unauthorized", "API token is invalid.");
    }
    match id.as_str() {
        MEMBERS_DB => {
            let mut members = fake.members.lock().unwrap().clone();
            if body["sorts"][0]["property"] == "Name" {
                members.sort_by_key(|m| {
                    m["properties"]["Name"]["title"][0]["plain_text"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string()
                });
            }
            (StatusCode::OK, Json(paginate(members, &body)))
        }
        RECORDS_DS => {
            let matching: Vec<Value> = fake
                .pages
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p["parent"]["database_id"] == RECORDS_DB)
                .filter(|p| matches_filter(p, &body["filter"]))
                .cloned()
                .collect();
            (StatusCode::OK, Json(paginate(matching, &body)))
        }
        _ => notion_error(
            StatusCode::NOT_FOUND,
            "object_not_found",
            &format!("Could not find database with ID: {id}."),
        ),
    }
}

async fn read_page(
    State(fake): State<Arc<FakeNotion>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return notion_error(StatusCode::UNAUTHORIZED, "unauthorized", "API token is invalid.");
    }
    fake.page_reads.fetch_add(1, Ordering::SeqCst);
    let found = fake
        .pages
        .lock()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id.as_str())
        .cloned();
    match found {
        Some(page) => (StatusCode::OK, Json(page)),
        None => notion_error(
            StatusCode::NOT_FOUND,
            "object_not_found",
            &format!("Could not find page with ID: {id}."),
        ),
    }
}

async fn create_page(
    State(fake): State<Arc<FakeNotion>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return notion_error(StatusCode::UNAUTHORIZED, "unauthorized", "API token is invalid.");
    }
    if body["parent"]["type"] != "data_source_id" || body["parent"]["data_source_id"] != RECORDS_DS
    {
        return notion_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "body failed validation: parent.data_source_id should be a valid uuid.",
        );
    }
    if body["properties"]["달린 시간(분)"]["number"].is_string() {
        return notion_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "body failed validation: number should be a number.",
        );
    }

    let n = fake.next_id.fetch_add(1, Ordering::SeqCst);
    let id = format!("created-{n}");
    let page = json!({
        "object": "page",
        "id": id,
        "url": format!("https://www.notion.so/{id}"),
        "parent": { "type": "database_id", "database_id": RECORDS_DB },
        "properties": body["properties"],
    });
    fake.pages.lock().unwrap().push(page.clone());
    (StatusCode::OK, Json(page))
}

/// Serve `fake` on an ephemeral port and return its API base URL.
pub async fn spawn_fake_notion(fake: Arc<FakeNotion>) -> String {
    let app = Router::new()
        .route("/v1/search", post(search))
        .route("/v1/databases/{id}/query", post(query_database))
        .route("/v1/pages/{id}", get(read_page))
        .route("/v1/pages", post(create_page))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Notion");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v1")
}

/// Test configuration pointing at a fake Notion at `notion_api_url`.
pub fn test_config(notion_api_url: String) -> Config {
    Config {
        notion_api_key: API_KEY.to_string(),
        notion_api_url,
        member_data_source_id: MEMBERS_DB.to_string(),
        records_data_source_id: RECORDS_DS.to_string(),
        records_database_id: RECORDS_DB.replace('-', ""),
        ..Config::default()
    }
}

/// Create the app wired to a freshly started fake Notion.
pub async fn create_test_app(fake: Arc<FakeNotion>) -> Router {
    let base_url = spawn_fake_notion(fake).await;
    let state = AppState::new(test_config(base_url)).expect("Failed to build app state");
    create_router(Arc::new(state))
}

/// Send one request and decode the JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}
