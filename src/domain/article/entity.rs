// src/domain/article/entity.rs
use crate::domain::article::value_objects::{ArticleId, ArticleSlug, ArticleStatus, ArticleTitle};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Article {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub slug: ArticleSlug,
    pub status: ArticleStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn is_publishable(&self) -> bool {
        self.status.is_publishable()
    }

    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.status = ArticleStatus::Published;
        self.published_at = Some(now);
        self.updated_at = now;
    }

    /// Public paths that go stale when this article is published: the
    /// article's canonical path and the listing page.
    pub fn stale_paths(&self) -> Vec<String> {
        vec![format!("/blog/{}", self.slug), "/".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_article(status: ArticleStatus) -> Article {
        Article {
            id: ArticleId::new(1).unwrap(),
            title: ArticleTitle::new("title").unwrap(),
            slug: ArticleSlug::new("title").unwrap(),
            status,
            published_at: None,
            author_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn publish_sets_state() {
        let mut article = sample_article(ArticleStatus::Draft);
        let now = Utc::now();
        article.publish(now);
        assert_eq!(article.status, ArticleStatus::Published);
        assert_eq!(article.published_at, Some(now));
        assert_eq!(article.updated_at, now);
    }

    #[test]
    fn only_draft_and_scheduled_are_publishable() {
        assert!(sample_article(ArticleStatus::Draft).is_publishable());
        assert!(sample_article(ArticleStatus::Scheduled).is_publishable());
        assert!(!sample_article(ArticleStatus::Published).is_publishable());
        assert!(!sample_article(ArticleStatus::Archived).is_publishable());
    }

    #[test]
    fn stale_paths_cover_article_and_listing() {
        let article = sample_article(ArticleStatus::Draft);
        assert_eq!(article.stale_paths(), vec!["/blog/title", "/"]);
    }
}
