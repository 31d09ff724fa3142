use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, big_file, BIG_FILE_LEN, CAT_PNG, GENERAL_COMMUNITY, RUST_COMMUNITY};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn get(uri: &str) -> axum::response::Response {
    app()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

// --- posts ---

#[tokio::test]
async fn list_posts_returns_page_shape() {
    let resp = get("/api/posts").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 3);
    assert!(body["next"].is_null());
}

#[tokio::test]
async fn list_posts_filters_by_community() {
    let resp = get(&format!("/api/posts?communityID={GENERAL_COMMUNITY}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["communityId"], GENERAL_COMMUNITY);
}

#[tokio::test]
async fn list_posts_paginates_with_cursor() {
    let body = body_json(get("/api/posts?limit=2").await).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 2);
    assert_eq!(body["next"], "2");

    let body = body_json(get("/api/posts?limit=2&next=2").await).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert!(body["next"].is_null());
}

#[tokio::test]
async fn list_posts_bad_cursor_returns_400() {
    let resp = get("/api/posts?next=soon").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Invalid next cursor.");
}

#[tokio::test]
async fn get_post_is_list_shaped() {
    let body = body_json(get("/api/posts/abc123").await).await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["publicId"], "abc123");
}

#[tokio::test]
async fn get_unknown_post_is_empty_list() {
    let resp = get("/api/posts/zzzzzz").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["posts"].as_array().unwrap().is_empty());
}

// --- comments ---

#[tokio::test]
async fn comments_form_a_tree() {
    let body = body_json(get("/api/posts/abc123/comments").await).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 3);
    assert!(comments[0]["ancestors"].is_null());
    assert_eq!(comments[2]["depth"], 2);
    assert_eq!(comments[2]["parentId"], comments[1]["id"]);
}

#[tokio::test]
async fn comments_for_unknown_post_return_404() {
    let resp = get("/api/posts/zzzzzz/comments").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "post_not_found");
}

// --- communities ---

#[tokio::test]
async fn list_communities_is_bare_array() {
    let body = body_json(get("/api/communities").await).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn community_rules_and_mods() {
    let rules = body_json(get(&format!("/api/communities/{RUST_COMMUNITY}/rules")).await).await;
    assert_eq!(rules.as_array().unwrap().len(), 2);
    let mods = body_json(get(&format!("/api/communities/{RUST_COMMUNITY}/mods")).await).await;
    assert_eq!(mods[0]["username"], "ferris");
}

#[tokio::test]
async fn unknown_community_returns_404() {
    let resp = get("/api/communities/000000000000000000000000").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Community not found.");
}

// --- users ---

#[tokio::test]
async fn get_user_by_username() {
    let body = body_json(get("/api/users/corro").await).await;
    assert_eq!(body["username"], "corro");
    let resp = get("/api/users/nobody").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- odd routes ---

#[tokio::test]
async fn broken_route_serves_truncated_json() {
    let resp = get("/api/broken").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

#[tokio::test]
async fn teapot_carries_message() {
    let resp = get("/api/teapot").await;
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(body_json(resp).await["message"], "Short and stout.");
}

#[tokio::test]
async fn files_are_served_as_bytes() {
    let resp = get("/files/cat.png").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(body_bytes(resp).await.as_ref(), CAT_PNG);

    let resp = get("/files/dog.png").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn big_file_is_served_whole() {
    let resp = get("/files/big.bin").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert_eq!(bytes.len(), BIG_FILE_LEN);
    assert_eq!(bytes.as_ref(), big_file().as_slice());
}
