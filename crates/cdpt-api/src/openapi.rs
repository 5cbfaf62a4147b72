use axum::Json;
use utoipa::OpenApi;

use crate::routes::{chain, chat, discord, health, markdown};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "cdpt API",
        description = "Discord OAuth broker, Maestro chain-data proxy and Iagon chat archive"
    ),
    paths(
        health::health_check,
        discord::client_config,
        discord::exchange_token,
        discord::entitlements,
        chat::save_chat,
        chat::load_chat,
        markdown::process_markdown,
        chain::ada_price,
        chain::market_price,
        chain::epoch_details,
        chain::latest_bitcoin_block,
        chain::bitcoin_chain_info,
        chain::latest_dogecoin_block,
        chain::dogecoin_chain_info,
    ),
    components(schemas(
        health::HealthResponse,
        discord::ClientConfigResponse,
        discord::TokenRequest,
        chat::SaveChatRequest,
        markdown::MarkdownRequest,
        markdown::MarkdownResponse,
        chain::PriceResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "discord", description = "Discord OAuth2 and entitlements"),
        (name = "chat", description = "Chat transcript archive"),
        (name = "markdown", description = "Markdown rendering"),
        (name = "chain", description = "Market prices and chain data")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/save-chat", "/load-chat", "/process-markdown", "/get-ada-price"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
