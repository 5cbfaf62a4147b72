use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use cdpt_providers::UtxoChain;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PriceResponse {
    #[schema(value_type = Object)]
    pub price: Value,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceQuery {
    /// Quote currency, e.g. `usd`
    pub currency: Option<String>,
    /// Asset symbol; `ada` when omitted (ignored by `/get-ada-price`)
    pub symbol: Option<String>,
}

/// ADA spot price
#[utoipa::path(
    get,
    path = "/get-ada-price",
    params(PriceQuery),
    responses(
        (status = 200, description = "Spot price", body = PriceResponse),
        (status = 400, description = "currency missing")
    ),
    tag = "chain"
)]
pub async fn ada_price(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> ApiResult<Json<PriceResponse>> {
    let Query(query) = query?;
    let currency = required_currency(query.currency)?;
    let price = state
        .maestro
        .market_price("ada", &currency)
        .await
        .map_err(ApiError::provider("Failed to fetch ADA price"))?;

    Ok(Json(PriceResponse { price }))
}

/// Spot price of any listed asset
#[utoipa::path(
    get,
    path = "/get-market-price",
    params(PriceQuery),
    responses(
        (status = 200, description = "Spot price", body = PriceResponse),
        (status = 400, description = "currency missing or symbol invalid")
    ),
    tag = "chain"
)]
pub async fn market_price(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> ApiResult<Json<PriceResponse>> {
    let Query(query) = query?;
    let currency = required_currency(query.currency)?;
    let symbol = query
        .symbol
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "ada".to_string());

    let price = state
        .maestro
        .market_price(&symbol, &currency)
        .await
        .map_err(ApiError::provider("Failed to fetch market price"))?;

    Ok(Json(PriceResponse { price }))
}

/// Current Cardano epoch details
#[utoipa::path(
    get,
    path = "/get-epoch-details",
    responses((status = 200, description = "Maestro epoch payload")),
    tag = "chain"
)]
pub async fn epoch_details(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let epoch = state
        .maestro
        .current_epoch()
        .await
        .map_err(ApiError::provider("Failed to fetch epoch details"))?;

    Ok(Json(epoch))
}

#[utoipa::path(
    get,
    path = "/get-latest-bitcoin-block",
    responses((status = 200, description = "Maestro block payload")),
    tag = "chain"
)]
pub async fn latest_bitcoin_block(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    latest_block(&state, UtxoChain::Bitcoin, "Failed to fetch latest Bitcoin block").await
}

#[utoipa::path(
    get,
    path = "/get-bitcoin-chain-info",
    responses((status = 200, description = "Maestro chain info payload")),
    tag = "chain"
)]
pub async fn bitcoin_chain_info(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    chain_info(&state, UtxoChain::Bitcoin, "Failed to fetch Bitcoin chain info").await
}

#[utoipa::path(
    get,
    path = "/get-latest-dogecoin-block",
    responses((status = 200, description = "Maestro block payload")),
    tag = "chain"
)]
pub async fn latest_dogecoin_block(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    latest_block(&state, UtxoChain::Dogecoin, "Failed to fetch latest Dogecoin block").await
}

#[utoipa::path(
    get,
    path = "/get-dogecoin-chain-info",
    responses((status = 200, description = "Maestro chain info payload")),
    tag = "chain"
)]
pub async fn dogecoin_chain_info(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    chain_info(&state, UtxoChain::Dogecoin, "Failed to fetch Dogecoin chain info").await
}

async fn latest_block(
    state: &AppState,
    chain: UtxoChain,
    message: &'static str,
) -> ApiResult<Json<Value>> {
    let block = state
        .maestro
        .latest_block(chain)
        .await
        .map_err(ApiError::provider(message))?;
    Ok(Json(block))
}

async fn chain_info(
    state: &AppState,
    chain: UtxoChain,
    message: &'static str,
) -> ApiResult<Json<Value>> {
    let info = state
        .maestro
        .chain_info(chain)
        .await
        .map_err(ApiError::provider(message))?;
    Ok(Json(info))
}

fn required_currency(currency: Option<String>) -> ApiResult<String> {
    currency
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Currency is required".to_string()))
}
