use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use cdpt_storage::LoadStrategy;
use cdpt_types::ChatHistory;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveChatRequest {
    /// Discord user id; numbers are accepted and stringified
    #[schema(value_type = Option<String>)]
    pub discord_id: Option<Value>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub chat_history: Option<ChatHistory>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LoadChatQuery {
    /// Required unless the server loads the most recent shared file
    pub discord_id: Option<String>,
}

/// Persist a chat transcript
#[utoipa::path(
    post,
    path = "/save-chat",
    request_body = SaveChatRequest,
    responses(
        (status = 200, description = "Storage gateway receipt, returned verbatim"),
        (status = 400, description = "discordId or chatHistory missing or malformed"),
        (status = 500, description = "Storage gateway unreachable")
    ),
    tag = "chat"
)]
pub async fn save_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SaveChatRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    let discord_id = req.discord_id.as_ref().and_then(identifier_from);
    let (discord_id, chat_history) = match (discord_id, req.chat_history) {
        (Some(id), Some(history)) if !history.is_empty() => (id, history),
        _ => {
            return Err(ApiError::BadRequest(
                "discordId and chatHistory are required".to_string(),
            ))
        }
    };

    let receipt = state
        .archive
        .save(&discord_id, &chat_history)
        .await
        .map_err(ApiError::storage("Failed to save chat history"))?;

    Ok(Json(receipt))
}

/// Retrieve a chat transcript
///
/// By identifier the transcript comes back newest first; in most-recent mode
/// it is returned in stored order.
#[utoipa::path(
    get,
    path = "/load-chat",
    params(LoadChatQuery),
    responses(
        (status = 200, description = "Transcript array"),
        (status = 400, description = "discordId missing"),
        (status = 404, description = "No stored transcript"),
        (status = 500, description = "Storage gateway unreachable or payload unreadable")
    ),
    tag = "chat"
)]
pub async fn load_chat(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LoadChatQuery>, QueryRejection>,
) -> ApiResult<Json<ChatHistory>> {
    let Query(query) = query?;
    let selector = query.discord_id.unwrap_or_default();

    if state.archive.strategy() == LoadStrategy::ByIdentifier && selector.trim().is_empty() {
        return Err(ApiError::BadRequest("discordId is required".to_string()));
    }

    let history = state
        .archive
        .load(&selector)
        .await
        .map_err(ApiError::storage("Failed to load chat history"))?;

    Ok(Json(history))
}

fn identifier_from(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_from() {
        assert_eq!(identifier_from(&json!("u1")), Some("u1".to_string()));
        assert_eq!(
            identifier_from(&json!(123456789012345678u64)),
            Some("123456789012345678".to_string())
        );
        assert_eq!(identifier_from(&json!("")), None);
        assert_eq!(identifier_from(&json!(null)), None);
        assert_eq!(identifier_from(&json!({"id": 1})), None);
    }
}
