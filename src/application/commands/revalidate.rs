// src/application/commands/revalidate.rs
use crate::application::{
    dto::{PathRevalidation, RevalidateResponseDto},
    error::{ApplicationError, ApplicationResult},
    ports::page_cache::PageCache,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RevalidateCommand {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    #[serde(default)]
    pub tag: Option<String>,
    pub secret: String,
}

/// Handles the shared-secret revalidation webhook: authenticates the
/// caller, then drops the requested paths or tag from the page cache.
pub struct RevalidateCommandService {
    page_cache: Arc<dyn PageCache>,
    secret: String,
}

impl RevalidateCommandService {
    pub fn new(page_cache: Arc<dyn PageCache>, secret: impl Into<String>) -> Self {
        Self {
            page_cache,
            secret: secret.into(),
        }
    }

    pub async fn revalidate(
        &self,
        command: RevalidateCommand,
    ) -> ApplicationResult<RevalidateResponseDto> {
        // Reject before touching the cache; no partial invalidation on a
        // bad secret. The secret itself is never logged.
        if command.secret != self.secret {
            return Err(ApplicationError::unauthorized("invalid secret"));
        }

        if let Some(paths) = command.paths {
            let mut results = Vec::with_capacity(paths.len());
            for path in &paths {
                match self.page_cache.revalidate_path(path).await {
                    Ok(()) => results.push(PathRevalidation {
                        path: path.clone(),
                        success: true,
                        error: None,
                    }),
                    Err(err) => {
                        tracing::error!(%path, error = %err, "failed to revalidate path");
                        results.push(PathRevalidation {
                            path: path.clone(),
                            success: false,
                            error: Some(err.to_string()),
                        });
                    }
                }
            }
            return Ok(RevalidateResponseDto {
                success: true,
                revalidated: true,
                message: format!("revalidated {} paths", paths.len()),
                results: Some(results),
            });
        }

        if let Some(path) = command.path {
            self.page_cache.revalidate_path(&path).await?;
            return Ok(RevalidateResponseDto {
                success: true,
                revalidated: true,
                results: None,
                message: format!("path {path} revalidated"),
            });
        }

        if let Some(tag) = command.tag {
            let dropped = self.page_cache.revalidate_tag(&tag).await?;
            return Ok(RevalidateResponseDto {
                success: true,
                revalidated: true,
                results: None,
                message: format!("tag {tag} revalidated ({dropped} pages)"),
            });
        }

        Err(ApplicationError::validation(
            "missing path, paths, or tag parameter",
        ))
    }
}
