use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use cdpt_providers::EntitlementQuery;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub client_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EntitlementsParams {
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub sku_ids: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub limit: Option<String>,
    pub guild_id: Option<String>,
    pub exclude_ended: Option<String>,
}

/// Non-secret client configuration for the frontend
#[utoipa::path(
    get,
    path = "/config",
    responses(
        (status = 200, description = "Discord application id", body = ClientConfigResponse)
    ),
    tag = "discord"
)]
pub async fn client_config(State(state): State<Arc<AppState>>) -> Json<ClientConfigResponse> {
    let client_id = state.discord.client_id().to_string();
    tracing::debug!(client_id = %client_id, "Sent config");
    Json(ClientConfigResponse { client_id })
}

/// Exchange an OAuth2 authorization code for a token
#[utoipa::path(
    post,
    path = "/discord/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Discord token payload"),
        (status = 400, description = "code missing, or rejected by Discord"),
        (status = 500, description = "Discord unreachable")
    ),
    tag = "discord"
)]
pub async fn exchange_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    let code = req
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("code is required".to_string()))?;

    let token = state
        .discord
        .exchange_code(&code)
        .await
        .map_err(ApiError::provider("Failed to fetch token"))?;

    Ok(Json(token))
}

/// List the application's entitlements for a user
#[utoipa::path(
    get,
    path = "/discord/entitlements",
    params(EntitlementsParams),
    responses(
        (status = 200, description = "Discord entitlement list"),
        (status = 400, description = "accessToken missing"),
        (status = 500, description = "Discord unreachable")
    ),
    tag = "discord"
)]
pub async fn entitlements(
    State(state): State<Arc<AppState>>,
    params: Result<Query<EntitlementsParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let access_token = params
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("accessToken is required".to_string()))?;

    let query = EntitlementQuery {
        user_id: params.user_id,
        sku_ids: params.sku_ids,
        before: params.before,
        after: params.after,
        limit: params.limit,
        guild_id: params.guild_id,
        exclude_ended: params.exclude_ended,
    };

    let entitlements = state
        .discord
        .entitlements(&access_token, &query)
        .await
        .map_err(ApiError::provider("Failed to fetch entitlements"))?;

    Ok(Json(entitlements))
}
