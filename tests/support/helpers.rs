// tests/support/helpers.rs
use super::mocks;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;

use pressroom_core::application::{
    ports::{
        page_cache::PageCache, queue::PublishQueue, revalidate::CacheInvalidator,
        security::TokenManager, time::Clock,
    },
    services::ApplicationServices,
};
use pressroom_core::config::ApiTokenEntry;
use pressroom_core::domain::{
    article::{ArticleReadRepository, ArticleWriteRepository},
    audit::AuditLogRepository,
};
use pressroom_core::infrastructure::{
    cache::InMemoryPageCache, security::StaticTokenManager,
};
use pressroom_core::presentation::http::{routes::build_router, state::HttpState};

pub const HOOK_SECRET: &str = "hook-secret";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const EDITOR_TOKEN: &str = "editor-token";
pub const VIEWER_TOKEN: &str = "viewer-token";

fn token_entries() -> Vec<ApiTokenEntry> {
    vec![
        ApiTokenEntry {
            token: ADMIN_TOKEN.into(),
            user_id: 1,
            role: "admin".into(),
        },
        ApiTokenEntry {
            token: EDITOR_TOKEN.into(),
            user_id: 2,
            role: "editor".into(),
        },
        ApiTokenEntry {
            token: VIEWER_TOKEN.into(),
            user_id: 3,
            role: "viewer".into(),
        },
    ]
}

/// Fully assembled application over in-memory fakes, with handles to the
/// observable pieces so tests can assert on stored state and side effects.
pub struct TestEnv {
    pub articles: Arc<mocks::InMemoryArticleRepo>,
    pub audit: Arc<mocks::RecordingAuditRepo>,
    pub invalidator: Arc<mocks::RecordingInvalidator>,
    pub page_cache: Arc<InMemoryPageCache>,
    pub queue: Arc<dyn PublishQueue>,
    pub services: Arc<ApplicationServices>,
}

impl TestEnv {
    pub fn router(&self) -> axum::Router {
        build_router(HttpState {
            services: Arc::clone(&self.services),
        })
    }
}

pub struct TestEnvBuilder {
    queue: Arc<dyn PublishQueue>,
    write_failures: u32,
    failing_invalidator: bool,
    failing_audit: bool,
}

impl TestEnvBuilder {
    pub fn new(queue: Arc<dyn PublishQueue>) -> Self {
        Self {
            queue,
            write_failures: 0,
            failing_invalidator: false,
            failing_audit: false,
        }
    }

    pub fn flaky_writes(mut self, failures: u32) -> Self {
        self.write_failures = failures;
        self
    }

    pub fn failing_invalidator(mut self) -> Self {
        self.failing_invalidator = true;
        self
    }

    pub fn failing_audit(mut self) -> Self {
        self.failing_audit = true;
        self
    }

    pub fn build(self) -> TestEnv {
        let articles = Arc::new(mocks::InMemoryArticleRepo::new());
        let audit = Arc::new(mocks::RecordingAuditRepo::new());
        let invalidator = Arc::new(if self.failing_invalidator {
            mocks::RecordingInvalidator::failing()
        } else {
            mocks::RecordingInvalidator::new()
        });
        let page_cache = Arc::new(InMemoryPageCache::new());

        let read_repo: Arc<dyn ArticleReadRepository> = Arc::clone(&articles) as _;
        let write_repo: Arc<dyn ArticleWriteRepository> = if self.write_failures > 0 {
            Arc::new(mocks::FlakyArticleWriteRepo::new(
                Arc::clone(&articles),
                self.write_failures,
            ))
        } else {
            Arc::clone(&articles) as _
        };
        let audit_repo: Arc<dyn AuditLogRepository> = if self.failing_audit {
            Arc::new(mocks::FailingAuditRepo)
        } else {
            Arc::clone(&audit) as _
        };

        let token_manager: Arc<dyn TokenManager> =
            Arc::new(StaticTokenManager::from_entries(&token_entries()).unwrap());
        let clock: Arc<dyn Clock> = Arc::new(mocks::FixedClock);

        let services = Arc::new(ApplicationServices::new(
            read_repo,
            write_repo,
            audit_repo,
            Arc::clone(&self.queue),
            Arc::clone(&invalidator) as Arc<dyn CacheInvalidator>,
            Arc::clone(&page_cache) as Arc<dyn PageCache>,
            token_manager,
            clock,
            HOOK_SECRET,
        ));

        TestEnv {
            articles,
            audit,
            invalidator,
            page_cache,
            queue: self.queue,
            services,
        }
    }
}

pub fn test_env(queue: Arc<dyn PublishQueue>) -> TestEnv {
    TestEnvBuilder::new(queue).build()
}

/* ------------------------------ http helpers ----------------------------- */

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn response_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("valid json body")
    };
    (status, json)
}
