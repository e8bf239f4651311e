use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Authorization code the token endpoint accepts.
pub const VALID_CODE: &str = "mock-code";
/// Access token issued for `VALID_CODE`.
pub const ACCESS_TOKEN: &str = "mock-access-token";
pub const PICTURE_HOST: &str = "http://static.mock-graph.local/pictures";
/// JPEG header served by `/{id}/picture?redirect=false`.
pub const PICTURE_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub from: String,
    pub message: String,
}

pub type Db = Arc<RwLock<HashMap<String, Post>>>;

type QueryParams = BTreeMap<String, String>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/search", get(search))
        .route("/oauth/access_token", get(access_token))
        .route("/{id}", get(get_object).post(delete_object))
        .route("/{id}/picture", get(picture))
        .route("/{id}/feed", post(publish))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn graph_error(status: StatusCode, kind: &str, message: &str, code: u32) -> Response {
    let body = json!({
        "error": { "message": message, "type": kind, "code": code }
    });
    (status, Json(body)).into_response()
}

fn has_token(params: &QueryParams) -> bool {
    params.get("access_token").map(String::as_str) == Some(ACCESS_TOKEN)
}

fn profile(id: &str) -> Option<serde_json::Value> {
    match id {
        "4" | "zuck" => Some(json!({ "id": "4", "name": "Mark Zuckerberg", "username": "zuck" })),
        _ => None,
    }
}

async fn search(Query(params): Query<QueryParams>) -> Json<serde_json::Value> {
    log::info!("search {params:?}");
    Json(json!({ "data": [], "query": params }))
}

async fn access_token(Query(params): Query<QueryParams>) -> Response {
    if params.get("code").map(String::as_str) != Some(VALID_CODE) {
        return graph_error(StatusCode::BAD_REQUEST, "OAuthException", "Invalid verification code format.", 100);
    }
    log::info!("issuing token for client {:?}", params.get("client_id"));
    (
        [(header::CONTENT_TYPE, "text/plain; charset=UTF-8")],
        format!("access_token={ACCESS_TOKEN}&expires=5108"),
    )
        .into_response()
}

async fn get_object(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Response {
    let id = if id == "me" {
        if !has_token(&params) {
            return graph_error(
                StatusCode::BAD_REQUEST,
                "OAuthException",
                "An active access token must be used to query information about the current user.",
                2500,
            );
        }
        "4".to_string()
    } else {
        id
    };
    if let Some(found) = profile(&id) {
        return Json(found).into_response();
    }
    match db.read().await.get(&id) {
        Some(post) => Json(post.clone()).into_response(),
        None => graph_error(StatusCode::NOT_FOUND, "GraphMethodException", "Unsupported get request.", 100),
    }
}

async fn picture(Path(id): Path<String>, Query(params): Query<QueryParams>) -> Response {
    if params.get("redirect").map(String::as_str) == Some("false") {
        return ([(header::CONTENT_TYPE, "image/jpeg")], PICTURE_BYTES).into_response();
    }
    let location = format!("{PICTURE_HOST}/{id}.jpg");
    (
        StatusCode::FOUND,
        [(header::LOCATION, location), (header::CONTENT_TYPE, "image/jpeg".to_string())],
    )
        .into_response()
}

async fn publish(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if !has_token(&params) {
        return graph_error(StatusCode::BAD_REQUEST, "OAuthException", "An active access token must be used.", 2500);
    }
    let Some(message) = form.get("message").filter(|m| !m.is_empty()) else {
        return graph_error(StatusCode::BAD_REQUEST, "OAuthException", "(#100) Missing message or attachment", 100);
    };
    let from = if id == "me" { "4".to_string() } else { id };
    let post = Post {
        id: format!("{from}_{}", Uuid::new_v4().simple()),
        from,
        message: message.clone(),
    };
    log::info!("published {}", post.id);
    let body = json!({ "id": post.id });
    db.write().await.insert(post.id.clone(), post);
    Json(body).into_response()
}

async fn delete_object(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Response {
    if !has_token(&params) {
        return graph_error(StatusCode::BAD_REQUEST, "OAuthException", "An active access token must be used.", 2500);
    }
    match db.write().await.remove(&id) {
        Some(_) => {
            log::info!("deleted {id}");
            ([(header::CONTENT_TYPE, "text/javascript; charset=UTF-8")], "true").into_response()
        }
        None => graph_error(StatusCode::NOT_FOUND, "GraphMethodException", "Unsupported delete request.", 100),
    }
}
