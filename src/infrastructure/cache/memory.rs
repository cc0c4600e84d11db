// src/infrastructure/cache/memory.rs
use crate::application::{ApplicationResult, ports::page_cache::PageCache};
use async_trait::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

/// Page cache for tests and deployments without Redis.
#[derive(Default)]
pub struct InMemoryPageCache {
    pages: Mutex<HashSet<String>>,
    tags: Mutex<HashMap<String, HashSet<String>>>,
}

impl InMemoryPageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_page(&self, path: &str) {
        self.pages.lock().unwrap().insert(path.to_string());
    }

    pub fn tag_page(&self, tag: &str, path: &str) {
        self.cache_page(path);
        self.tags
            .lock()
            .unwrap()
            .entry(tag.to_string())
            .or_default()
            .insert(path.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.pages.lock().unwrap().contains(path)
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn revalidate_path(&self, path: &str) -> ApplicationResult<()> {
        self.pages.lock().unwrap().remove(path);
        Ok(())
    }

    async fn revalidate_tag(&self, tag: &str) -> ApplicationResult<usize> {
        let members = self.tags.lock().unwrap().remove(tag).unwrap_or_default();
        let mut pages = self.pages.lock().unwrap();
        for path in &members {
            pages.remove(path);
        }
        Ok(members.len())
    }
}
