// tests/support/mocks.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use pressroom_core::application::{
    ApplicationResult, error::ApplicationError, ports::revalidate::CacheInvalidator,
    ports::time::Clock,
};
use pressroom_core::domain::{
    article::{Article, ArticleId, ArticleSlug, ArticleStatus, ArticleTitle},
    audit::{AuditLog, AuditLogRepository},
    errors::{DomainError, DomainResult},
};

static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
        .expect("invalid RFC3339 in tests/support/mocks.rs")
        .with_timezone(&Utc)
});

pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

pub fn draft_article(id: i64, slug: &str) -> Article {
    Article {
        id: ArticleId::new(id).unwrap(),
        title: ArticleTitle::new(format!("Article {id}")).unwrap(),
        slug: ArticleSlug::new(slug).unwrap(),
        status: ArticleStatus::Draft,
        published_at: None,
        author_id: 1,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

/* ------------------------------- articles ------------------------------- */

/// Article store backed by a mutex-guarded map. The publish transition is
/// checked and applied under the lock, mirroring the atomicity of the
/// conditional UPDATE in the real repository.
#[derive(Default)]
pub struct InMemoryArticleRepo {
    articles: Mutex<HashMap<i64, Article>>,
}

impl InMemoryArticleRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, article: Article) {
        self.articles
            .lock()
            .unwrap()
            .insert(article.id.into(), article);
    }

    pub fn get(&self, id: i64) -> Option<Article> {
        self.articles.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl pressroom_core::domain::article::ArticleReadRepository for InMemoryArticleRepo {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        Ok(self.articles.lock().unwrap().get(&i64::from(id)).cloned())
    }
}

#[async_trait]
impl pressroom_core::domain::article::ArticleWriteRepository for InMemoryArticleRepo {
    async fn mark_published(
        &self,
        id: ArticleId,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Article>> {
        let mut articles = self.articles.lock().unwrap();
        let Some(article) = articles.get_mut(&i64::from(id)) else {
            return Ok(None);
        };
        if !article.is_publishable() {
            return Ok(None);
        }
        article.publish(now);
        Ok(Some(article.clone()))
    }
}

/// Write repository that fails with a transient persistence error a fixed
/// number of times before delegating, to exercise the retry path.
pub struct FlakyArticleWriteRepo {
    inner: Arc<InMemoryArticleRepo>,
    failures_left: Mutex<u32>,
}

impl FlakyArticleWriteRepo {
    pub fn new(inner: Arc<InMemoryArticleRepo>, failures: u32) -> Self {
        Self {
            inner,
            failures_left: Mutex::new(failures),
        }
    }
}

#[async_trait]
impl pressroom_core::domain::article::ArticleWriteRepository for FlakyArticleWriteRepo {
    async fn mark_published(
        &self,
        id: ArticleId,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<Article>> {
        {
            let mut failures = self.failures_left.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(DomainError::Persistence("simulated outage".into()));
            }
        }
        self.inner.mark_published(id, now).await
    }
}

/* -------------------------------- audit --------------------------------- */

#[derive(Default)]
pub struct RecordingAuditRepo {
    entries: Mutex<Vec<AuditLog>>,
}

impl RecordingAuditRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditLog> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogRepository for RecordingAuditRepo {
    async fn insert(&self, log: AuditLog) -> DomainResult<()> {
        self.entries.lock().unwrap().push(log);
        Ok(())
    }
}

pub struct FailingAuditRepo;

#[async_trait]
impl AuditLogRepository for FailingAuditRepo {
    async fn insert(&self, _log: AuditLog) -> DomainResult<()> {
        Err(DomainError::Persistence("audit store down".into()))
    }
}

/* ----------------------------- invalidation ------------------------------ */

#[derive(Default)]
pub struct RecordingInvalidator {
    calls: Mutex<Vec<Vec<String>>>,
    fail: bool,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(&self, paths: &[String]) -> ApplicationResult<()> {
        self.calls.lock().unwrap().push(paths.to_vec());
        if self.fail {
            return Err(ApplicationError::infrastructure("webhook unreachable"));
        }
        Ok(())
    }
}
