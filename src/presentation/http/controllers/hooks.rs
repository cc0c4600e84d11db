// src/presentation/http/controllers/hooks.rs
use crate::application::{commands::revalidate::RevalidateCommand, dto::RevalidateResponseDto};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};

pub async fn revalidate(
    Extension(state): Extension<HttpState>,
    Json(command): Json<RevalidateCommand>,
) -> HttpResult<Json<RevalidateResponseDto>> {
    let response = state
        .services
        .revalidation
        .revalidate(command)
        .await
        .into_http()?;

    Ok(Json(response))
}
