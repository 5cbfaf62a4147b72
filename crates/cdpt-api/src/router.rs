use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::logging,
    openapi,
    routes::{chain, chat, discord, health, markdown},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health & docs
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        // Discord
        .route("/config", get(discord::client_config))
        .route("/discord/token", post(discord::exchange_token))
        .route("/discord/entitlements", get(discord::entitlements))
        // Chat archive
        .route("/save-chat", post(chat::save_chat))
        .route("/load-chat", get(chat::load_chat))
        // Markdown
        .route("/process-markdown", post(markdown::process_markdown))
        // Prices & chain data
        .route("/get-ada-price", get(chain::ada_price))
        .route("/get-market-price", get(chain::market_price))
        .route("/get-epoch-details", get(chain::epoch_details))
        .route("/get-current-epoch-details", get(chain::epoch_details))
        .route("/get-latest-bitcoin-block", get(chain::latest_bitcoin_block))
        .route("/get-bitcoin-chain-info", get(chain::bitcoin_chain_info))
        .route("/get-latest-dogecoin-block", get(chain::latest_dogecoin_block))
        .route("/get-dogecoin-chain-info", get(chain::dogecoin_chain_info));

    let router = if state.config.static_files.enabled {
        api_routes.fallback_service(ServeDir::new(&state.config.static_files.dir))
    } else {
        api_routes
    };

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    router
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
            tracing::info_span!("http_request", method = %req.method(), path = %req.uri().path())
        }))
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}
