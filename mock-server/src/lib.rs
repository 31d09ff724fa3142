//! In-process imitation of the Discuit REST API.
//!
//! Serves a fixed, seeded data set under `/api` with the same JSON shapes the
//! real service uses, plus `/files/{name}` for binary downloads and a couple
//! of deliberately broken routes for error-path tests.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

mod fixtures;

pub use fixtures::{Fixtures, BIG_FILE_LEN, CAT_PNG, GENERAL_COMMUNITY, RUST_COMMUNITY};

pub type Db = Arc<Fixtures>;

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct PostsParams {
    #[serde(rename = "communityID")]
    pub community_id: Option<String>,
    pub limit: Option<usize>,
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub next: Option<String>,
}

pub fn app() -> Router {
    app_with(Fixtures::seed())
}

pub fn app_with(fixtures: Fixtures) -> Router {
    let db: Db = Arc::new(fixtures);
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{id}", get(get_post))
        .route("/api/posts/{id}/comments", get(list_comments))
        .route("/api/communities", get(list_communities))
        .route("/api/communities/{id}", get(get_community))
        .route("/api/communities/{id}/rules", get(list_rules))
        .route("/api/communities/{id}/mods", get(list_mods))
        .route("/api/users/{username}", get(get_user))
        .route("/api/broken", get(broken))
        .route("/api/teapot", get(teapot))
        .route("/files/{name}", get(get_file))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Discuit-style error body.
fn api_error(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({
        "status": status.as_u16(),
        "code": code,
        "message": message,
    });
    (status, Json(body)).into_response()
}

/// Offset-based cursor: `next` is the index of the first item of the page.
fn paginate(items: Vec<Value>, next: Option<&str>, limit: usize) -> Result<(Vec<Value>, Value), Response> {
    let start = match next {
        Some(cursor) => cursor
            .parse::<usize>()
            .map_err(|_| api_error(StatusCode::BAD_REQUEST, "invalid_cursor", "Invalid next cursor."))?,
        None => 0,
    };
    let end = items.len().min(start.saturating_add(limit));
    let next = if end < items.len() {
        Value::String(end.to_string())
    } else {
        Value::Null
    };
    let page = items.into_iter().skip(start).take(end.saturating_sub(start)).collect();
    Ok((page, next))
}

async fn list_posts(State(db): State<Db>, Query(params): Query<PostsParams>) -> Response {
    debug!(?params, "list posts");
    let posts: Vec<Value> = db
        .posts
        .iter()
        .filter(|post| match &params.community_id {
            Some(id) => post["communityId"] == id.as_str(),
            None => true,
        })
        .cloned()
        .collect();
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    match paginate(posts, params.next.as_deref(), limit) {
        Ok((page, next)) => Json(json!({ "posts": page, "next": next })).into_response(),
        Err(response) => response,
    }
}

/// Answers with a page of posts even for a single lookup; an unknown id gives
/// an empty page.
async fn get_post(State(db): State<Db>, Path(id): Path<String>) -> Json<Value> {
    debug!(%id, "get post");
    let posts: Vec<Value> = db
        .posts
        .iter()
        .filter(|post| post["publicId"] == id.as_str())
        .cloned()
        .collect();
    Json(json!({ "posts": posts, "next": null }))
}

async fn list_comments(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Response {
    debug!(%id, ?params, "list comments");
    if !db.posts.iter().any(|post| post["publicId"] == id.as_str()) {
        return api_error(StatusCode::NOT_FOUND, "post_not_found", "Post not found.");
    }
    let comments: Vec<Value> = db
        .comments
        .iter()
        .filter(|comment| comment["postPublicId"] == id.as_str())
        .cloned()
        .collect();
    match paginate(comments, params.next.as_deref(), DEFAULT_PAGE_SIZE) {
        Ok((page, next)) => Json(json!({ "comments": page, "next": next })).into_response(),
        Err(response) => response,
    }
}

async fn list_communities(State(db): State<Db>) -> Json<Vec<Value>> {
    Json(db.communities.clone())
}

fn find_community<'a>(db: &'a Fixtures, id: &str) -> Result<&'a Value, Response> {
    db.communities
        .iter()
        .find(|community| community["id"] == id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "community_not_found", "Community not found."))
}

async fn get_community(State(db): State<Db>, Path(id): Path<String>) -> Response {
    match find_community(&db, &id) {
        Ok(community) => Json(community.clone()).into_response(),
        Err(response) => response,
    }
}

async fn list_rules(State(db): State<Db>, Path(id): Path<String>) -> Response {
    match find_community(&db, &id) {
        Ok(community) => Json(community["rules"].clone()).into_response(),
        Err(response) => response,
    }
}

async fn list_mods(State(db): State<Db>, Path(id): Path<String>) -> Response {
    match find_community(&db, &id) {
        Ok(community) => Json(community["mods"].clone()).into_response(),
        Err(response) => response,
    }
}

async fn get_user(State(db): State<Db>, Path(username): Path<String>) -> Response {
    match db.users.iter().find(|user| user["username"] == username.as_str()) {
        Some(user) => Json(user.clone()).into_response(),
        None => api_error(StatusCode::NOT_FOUND, "user_not_found", "User not found."),
    }
}

async fn broken() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        "{\"posts\": [",
    )
        .into_response()
}

async fn teapot() -> Response {
    api_error(StatusCode::IM_A_TEAPOT, "teapot", "Short and stout.")
}

async fn get_file(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "cat.png" => ([(header::CONTENT_TYPE, "image/png")], CAT_PNG).into_response(),
        "big.bin" => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            big_file(),
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, "no such file").into_response(),
    }
}

/// Deterministic filler so a download can be checked byte for byte.
pub fn big_file() -> Vec<u8> {
    (0..BIG_FILE_LEN).map(|i| (i % 251) as u8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!(i)).collect()
    }

    #[test]
    fn paginate_first_page_has_cursor() {
        let (page, next) = paginate(items(5), None, 2).unwrap();
        assert_eq!(page, vec![json!(0), json!(1)]);
        assert_eq!(next, json!("2"));
    }

    #[test]
    fn paginate_last_page_has_null_cursor() {
        let (page, next) = paginate(items(5), Some("4"), 2).unwrap();
        assert_eq!(page, vec![json!(4)]);
        assert_eq!(next, Value::Null);
    }

    #[test]
    fn paginate_past_end_is_empty() {
        let (page, next) = paginate(items(2), Some("9"), 2).unwrap();
        assert!(page.is_empty());
        assert_eq!(next, Value::Null);
    }

    #[test]
    fn paginate_rejects_garbage_cursor() {
        let response = paginate(items(2), Some("abc"), 2).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn seed_is_consistent() {
        let fixtures = Fixtures::seed();
        for post in &fixtures.posts {
            let community = post["communityId"].as_str().unwrap();
            assert!(fixtures.communities.iter().any(|c| c["id"] == community));
        }
        for comment in &fixtures.comments {
            let post = comment["postPublicId"].as_str().unwrap();
            assert!(fixtures.posts.iter().any(|p| p["publicId"] == post));
        }
    }
}
