// src/infrastructure/revalidate.rs
use crate::application::{
    ApplicationResult, error::ApplicationError, ports::revalidate::CacheInvalidator,
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct RevalidateRequest<'a> {
    paths: &'a [String],
    secret: &'a str,
}

/// Posts stale paths to the revalidation webhook over HTTP.
///
/// The shared secret rides in the request body, never in logs.
pub struct HttpCacheInvalidator {
    client: reqwest::Client,
    endpoint: String,
    secret: String,
}

impl HttpCacheInvalidator {
    pub fn new(
        endpoint: String,
        secret: String,
        timeout: Duration,
    ) -> Result<Self, ApplicationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            secret,
        })
    }
}

#[async_trait]
impl CacheInvalidator for HttpCacheInvalidator {
    async fn invalidate(&self, paths: &[String]) -> ApplicationResult<()> {
        let body = RevalidateRequest {
            paths,
            secret: &self.secret,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                ApplicationError::infrastructure(format!("revalidate request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::infrastructure(format!(
                "revalidate endpoint returned {status}"
            )));
        }

        Ok(())
    }
}
