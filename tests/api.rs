//! End-to-end API tests against an in-memory database

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use serce::api::{build_router, AppState};
use serce::db::repositories::{
    SqlxBlogRepository, SqlxImageRepository, SqlxPageRepository, SqlxSnippetRepository,
};
use serce::db::{create_test_pool, migrations};
use serce::render::StreamRenderer;
use serce::services::{BlogService, ImageService, NavigationService, PageService, SnippetService};

async fn test_server() -> TestServer {
    let pool = create_test_pool().await.expect("Failed to create pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let page_repo = SqlxPageRepository::boxed(pool.clone());
    let blog_repo = SqlxBlogRepository::boxed(pool.clone());
    let snippet_repo = SqlxSnippetRepository::boxed(pool.clone());
    let image_repo = SqlxImageRepository::boxed(pool.clone());

    let state = AppState {
        pool: pool.clone(),
        page_service: Arc::new(PageService::new(page_repo.clone())),
        nav_service: Arc::new(NavigationService::new(
            page_repo.clone(),
            snippet_repo.clone(),
        )),
        blog_service: Arc::new(BlogService::new(page_repo, blog_repo)),
        snippet_service: Arc::new(SnippetService::new(snippet_repo, image_repo.clone())),
        image_service: Arc::new(ImageService::new(image_repo)),
        renderer: Arc::new(StreamRenderer::new().expect("Failed to build renderer")),
    };

    let app = build_router(state, "http://localhost:3000");
    TestServer::new(app).expect("Failed to start test server")
}

async fn create_root(server: &TestServer) -> i64 {
    let response = server
        .post("/api/v1/pages/root")
        .json(&json!({ "title": "Home" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    let id = body["page"]["id"].as_i64().unwrap();
    server
        .post(&format!("/api/v1/pages/{}/publish", id))
        .await
        .assert_status_ok();
    id
}

#[tokio::test]
async fn test_page_lifecycle_over_http() {
    let server = test_server().await;
    let root_id = create_root(&server).await;

    let response = server
        .post("/api/v1/pages")
        .json(&json!({
            "parent_id": root_id,
            "kind": "standard",
            "title": "About",
            "slug": "about",
            "show_in_menus": true,
            "details": {
                "introduction": "Who we are",
                "body": [
                    { "type": "heading_block", "value": { "heading_text": "About", "size": "h2" } },
                    { "type": "paragraph_block", "value": { "html": "<p>Hello</p>" } }
                ]
            }
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    let page_id = body["page"]["id"].as_i64().unwrap();
    assert_eq!(body["page"]["path"], "/about/");

    // Draft pages are not served
    server
        .get("/about/")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);

    server
        .post(&format!("/api/v1/pages/{}/publish", page_id))
        .await
        .assert_status_ok();

    let response = server.get("/about/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["details"]["introduction"], "Who we are");
    let html = body["body_html"].as_str().unwrap();
    assert!(html.contains("<h2>About</h2>"));
    assert!(html.contains("<p>Hello</p>"));

    // The page appears in its own menu as the active entry
    let menu = body["menu"].as_array().unwrap();
    assert_eq!(menu.len(), 1);
    assert_eq!(menu[0]["active"], true);
}

#[tokio::test]
async fn test_malformed_slugs_rejected_over_http() {
    let server = test_server().await;
    let root_id = create_root(&server).await;

    for bad in ["", "a/b", "a%b"] {
        let response = server
            .post("/api/v1/pages")
            .json(&json!({
                "parent_id": root_id,
                "kind": "standard",
                "title": "Bad",
                "slug": bad,
                "show_in_menus": false
            }))
            .await;
        response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }

    // Nothing leaked into the path space
    let pages: Value = server.get("/api/v1/pages").await.json();
    let paths: Vec<&str> = pages["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["/"]);
}

#[tokio::test]
async fn test_gallery_page_rejects_children_over_http() {
    let server = test_server().await;
    let root_id = create_root(&server).await;

    let response = server
        .post("/api/v1/pages")
        .json(&json!({
            "parent_id": root_id,
            "kind": "gallery",
            "title": "Photos",
            "slug": "photos"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    let gallery_id = body["page"]["id"].as_i64().unwrap();

    let response = server
        .post("/api/v1/pages")
        .json(&json!({
            "parent_id": gallery_id,
            "kind": "standard",
            "title": "Nested",
            "slug": "nested"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tag_index_serving() {
    let server = test_server().await;
    let root_id = create_root(&server).await;

    let body: Value = server
        .post("/api/v1/pages")
        .json(&json!({
            "parent_id": root_id,
            "kind": "blog_index",
            "title": "Blog",
            "slug": "blog"
        }))
        .await
        .json();
    let index_id = body["page"]["id"].as_i64().unwrap();
    server
        .post(&format!("/api/v1/pages/{}/publish", index_id))
        .await
        .assert_status_ok();

    let body: Value = server
        .post("/api/v1/pages")
        .json(&json!({
            "parent_id": root_id,
            "kind": "blog_tag_index",
            "title": "Tags",
            "slug": "tags"
        }))
        .await
        .json();
    let tag_index_id = body["page"]["id"].as_i64().unwrap();
    server
        .post(&format!("/api/v1/pages/{}/publish", tag_index_id))
        .await
        .assert_status_ok();

    let body: Value = server
        .post("/api/v1/pages")
        .json(&json!({
            "parent_id": index_id,
            "kind": "blog",
            "title": "First post",
            "slug": "first",
            "details": { "date": "2024-03-01", "intro": "Hi", "body": "<p>Post</p>" }
        }))
        .await
        .json();
    let post_id = body["page"]["id"].as_i64().unwrap();
    server
        .post(&format!("/api/v1/pages/{}/publish", post_id))
        .await
        .assert_status_ok();
    server
        .put(&format!("/api/v1/blog/{}/tags", post_id))
        .json(&json!({ "tags": ["news"] }))
        .await
        .assert_status_ok();

    // The index lists the post
    let body: Value = server.get("/blog/").await.json();
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);

    // Tag index filters by the query tag; without one it is empty
    let body: Value = server.get("/tags/").await.json();
    assert!(body["posts"].as_array().unwrap().is_empty());

    let body: Value = server.get("/tags/").add_query_param("tag", "news").await.json();
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
    assert_eq!(body["posts"][0]["id"].as_i64().unwrap(), post_id);

    let body: Value = server.get("/tags/").add_query_param("tag", "other").await.json();
    assert!(body["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_footer_text_always_present_in_serve() {
    let server = test_server().await;
    create_root(&server).await;

    // No record yet, empty string
    let body: Value = server.get("/").await.json();
    assert_eq!(body["footer_text"], "");

    server
        .put("/api/v1/snippets/footer-text")
        .json(&json!({ "body": "<p>All content is available for reuse</p>" }))
        .await
        .assert_status_ok();

    let body: Value = server.get("/").await.json();
    assert_eq!(body["footer_text"], "<p>All content is available for reuse</p>");
}

#[tokio::test]
async fn test_meta_endpoints() {
    let server = test_server().await;

    let body: Value = server.get("/api/v1/meta/page-types").await.json();
    let types = body["page_types"].as_array().unwrap();
    assert_eq!(types.len(), 7);
    let gallery = types.iter().find(|t| t["kind"] == "gallery").unwrap();
    assert!(gallery["allowed_subpage_kinds"].as_array().unwrap().is_empty());

    let body: Value = server.get("/api/v1/meta/blocks").await.json();
    let blocks = body["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 5);

    let body: Value = server.get("/api/v1/meta/snippets").await.json();
    let snippets = body["snippets"].as_array().unwrap();
    let footer = snippets.iter().find(|s| s["slug"] == "footer_text").unwrap();
    assert_eq!(footer["singleton"], true);
}
