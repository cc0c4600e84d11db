// src/presentation/http/controllers/publish.rs
use crate::application::{
    commands::articles::PublishArticleCommand,
    dto::{JobStatusDto, PublishReceiptDto},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
}

pub async fn publish_article(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
    body: Option<Json<PublishRequest>>,
) -> HttpResult<Json<PublishReceiptDto>> {
    let request = body.map(|Json(req)| req).unwrap_or_default();

    let receipt = state
        .services
        .article_commands
        .request_publish(
            &actor,
            PublishArticleCommand {
                article_id: id,
                scheduled_for: request.scheduled_for,
            },
        )
        .await
        .into_http()?;

    Ok(Json(receipt))
}

pub async fn job_status(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(job_id): Path<String>,
) -> HttpResult<Json<JobStatusDto>> {
    let status = state
        .services
        .job_queries
        .status(&actor, &job_id)
        .await
        .into_http()?;

    Ok(Json(status))
}
