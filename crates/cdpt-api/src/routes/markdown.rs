use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    markdown,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownRequest {
    pub markdown_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownResponse {
    pub html_content: String,
}

/// Render markdown to HTML
#[utoipa::path(
    post,
    path = "/process-markdown",
    request_body = MarkdownRequest,
    responses(
        (status = 200, description = "Rendered HTML", body = MarkdownResponse),
        (status = 400, description = "markdownText missing or body malformed")
    ),
    tag = "markdown"
)]
pub async fn process_markdown(
    payload: Result<Json<MarkdownRequest>, JsonRejection>,
) -> ApiResult<Json<MarkdownResponse>> {
    let Json(req) = payload?;
    let text = req
        .markdown_text
        .ok_or_else(|| ApiError::BadRequest("markdownText is required".to_string()))?;

    Ok(Json(MarkdownResponse {
        html_content: markdown::render(&text),
    }))
}
