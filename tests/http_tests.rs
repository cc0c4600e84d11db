// tests/http_tests.rs
mod support;

use axum::http::StatusCode;
use pressroom_core::application::worker::PublishWorker;
use pressroom_core::domain::article::ArticleStatus;
use pressroom_core::infrastructure::queue::{DisabledPublishQueue, InMemoryPublishQueue};
use serde_json::{Value, json};
use std::sync::Arc;
use support::{
    ADMIN_TOKEN, EDITOR_TOKEN, HOOK_SECRET, VIEWER_TOKEN, draft_article, fixed_now, json_request,
    response_json, test_env,
};
use tower::ServiceExt;

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    let response = env
        .router()
        .oneshot(json_request("GET", "/health", None, None))
        .await
        .unwrap();

    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn publish_without_a_broker_completes_synchronously() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    env.articles.insert(draft_article(1, "hello-world"));

    let response = env
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/articles/1/publish",
            Some(EDITOR_TOKEN),
            None,
        ))
        .await
        .unwrap();

    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["job_id"], Value::Null);
    assert_eq!(body["message"], json!("article published successfully"));
    assert_eq!(env.articles.get(1).unwrap().status, ArticleStatus::Published);
}

#[tokio::test]
async fn publish_requires_a_valid_bearer_token() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    env.articles.insert(draft_article(1, "locked"));
    let router = env.router();

    let response = router
        .clone()
        .oneshot(json_request("POST", "/api/v1/articles/1/publish", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/articles/1/publish",
            Some("bogus-token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(env.articles.get(1).unwrap().status, ArticleStatus::Draft);
}

#[tokio::test]
async fn publish_rejects_viewers() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    env.articles.insert(draft_article(1, "locked"));

    let response = env
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/articles/1/publish",
            Some(VIEWER_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn publishing_a_published_article_is_not_found() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    let mut article = draft_article(1, "old-news");
    article.publish(fixed_now());
    env.articles.insert(article);

    let response = env
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/articles/1/publish",
            Some(EDITOR_TOKEN),
            None,
        ))
        .await
        .unwrap();

    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("article not found or already published"));
}

#[tokio::test]
async fn queued_publish_is_observable_through_the_jobs_endpoint() {
    let queue = Arc::new(InMemoryPublishQueue::new());
    let env = test_env(Arc::clone(&queue) as _);
    env.articles.insert(draft_article(1, "async-path"));
    let router = env.router();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/articles/1/publish",
            Some(ADMIN_TOKEN),
            None,
        ))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("article queued for publishing"));
    let job_id = body["job_id"].as_str().unwrap().to_string();

    // Still pending until a worker picks it up.
    let response = router
        .clone()
        .oneshot(json_request(
            "GET",
            &format!("/api/v1/jobs/{job_id}"),
            Some(VIEWER_TOKEN),
            None,
        ))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("pending"));

    let worker = PublishWorker::new(
        Arc::clone(&env.queue),
        Arc::clone(&env.services.article_commands),
    );
    assert!(worker.tick().await.unwrap());

    let response = router
        .oneshot(json_request(
            "GET",
            &format!("/api/v1/jobs/{job_id}"),
            Some(VIEWER_TOKEN),
            None,
        ))
        .await
        .unwrap();
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("completed"));
    assert_eq!(body["result"]["success"], json!(true));
    assert_eq!(env.articles.get(1).unwrap().status, ArticleStatus::Published);
}

#[tokio::test]
async fn unknown_jobs_are_not_found() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    let response = env
        .router()
        .oneshot(json_request(
            "GET",
            "/api/v1/jobs/no-such-job",
            Some(VIEWER_TOKEN),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn revalidate_hook_rejects_a_bad_secret() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    env.page_cache.cache_page("/blog/post");

    let response = env
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/hooks/revalidate",
            None,
            Some(json!({"paths": ["/blog/post"], "secret": "wrong"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(env.page_cache.contains("/blog/post"));
}

#[tokio::test]
async fn revalidate_hook_requires_a_target() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    let response = env
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/hooks/revalidate",
            None,
            Some(json!({"secret": HOOK_SECRET})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn revalidate_hook_drops_each_requested_path() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    env.page_cache.cache_page("/blog/post");
    env.page_cache.cache_page("/");

    let response = env
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/hooks/revalidate",
            None,
            Some(json!({"paths": ["/blog/post", "/"], "secret": HOOK_SECRET})),
        ))
        .await
        .unwrap();

    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revalidated"], json!(true));
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["success"] == json!(true)));
    assert!(!env.page_cache.contains("/blog/post"));
    assert!(!env.page_cache.contains("/"));
}

#[tokio::test]
async fn revalidate_hook_drops_tagged_pages() {
    let env = test_env(Arc::new(DisabledPublishQueue));
    env.page_cache.tag_page("posts", "/blog/a");
    env.page_cache.tag_page("posts", "/blog/b");
    env.page_cache.cache_page("/about");

    let response = env
        .router()
        .oneshot(json_request(
            "POST",
            "/api/v1/hooks/revalidate",
            None,
            Some(json!({"tag": "posts", "secret": HOOK_SECRET})),
        ))
        .await
        .unwrap();

    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("2 pages"));
    assert!(!env.page_cache.contains("/blog/a"));
    assert!(!env.page_cache.contains("/blog/b"));
    assert!(env.page_cache.contains("/about"));
}
