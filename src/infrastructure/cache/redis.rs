// src/infrastructure/cache/redis.rs
use crate::application::{
    ApplicationResult, error::ApplicationError, ports::page_cache::PageCache,
};
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Pool, Runtime};

fn page_key(path: &str) -> String {
    format!("page:{path}")
}

fn tag_key(tag: &str) -> String {
    format!("tag:{tag}")
}

/// Redis-backed rendered-page cache. Pages live under `page:{path}`;
/// `tag:{tag}` sets hold the page keys associated with a tag so a whole
/// group can be dropped at once.
#[derive(Clone)]
pub struct RedisPageCache {
    pool: Pool,
}

impl RedisPageCache {
    pub fn from_url(url: &str) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PageCache for RedisPageCache {
    async fn revalidate_path(&self, path: &str) -> ApplicationResult<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        let _: () = redis::cmd("DEL")
            .arg(page_key(path))
            .query_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(())
    }

    async fn revalidate_tag(&self, tag: &str) -> ApplicationResult<usize> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        // Drop the tag's pages and the tag set atomically so clients never
        // observe a partially invalidated group.
        let script = r#"
            local members = redis.call('SMEMBERS', KEYS[1])
            for i = 1, #members do
                redis.call('DEL', members[i])
            end
            redis.call('DEL', KEYS[1])
            return #members
        "#;

        let dropped: i64 = redis::cmd("EVAL")
            .arg(script)
            .arg(1)
            .arg(tag_key(tag))
            .query_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(dropped as usize)
    }
}
