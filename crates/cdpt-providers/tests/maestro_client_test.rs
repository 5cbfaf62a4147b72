use cdpt_providers::{MaestroClient, ProviderError, UtxoChain};
use mockito::Matcher;
use serde_json::json;

fn client(server: &mockito::ServerGuard) -> MaestroClient {
    let base = server.url();
    MaestroClient::builder()
        .api_key("cardano-key")
        .bitcoin_api_key("btc-key")
        .market_base(format!("{}/market", base))
        .cardano_base(format!("{}/cardano/v1", base))
        .bitcoin_base(format!("{}/btc/v0", base))
        .dogecoin_base(format!("{}/doge/v0", base))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_market_price_returns_price_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/market/market-price/ada")
        .match_header("authorization", "Bearer cardano-key")
        .match_query(Matcher::UrlEncoded("currency".to_string(), "usd".to_string()))
        .with_status(200)
        .with_body(r#"{"price":0.4521,"currency":"usd"}"#)
        .create_async()
        .await;

    let price = client(&server).market_price("ADA", "usd").await.unwrap();

    assert_eq!(price, json!(0.4521));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_market_price_without_price_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/market/market-price/ada")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"currency":"usd"}"#)
        .create_async()
        .await;

    let err = client(&server).market_price("ada", "usd").await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode { .. }));
}

#[tokio::test]
async fn test_market_price_rejects_path_symbols() {
    let server = mockito::Server::new_async().await;
    let err = client(&server)
        .market_price("../admin", "usd")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidInput(_)));
}

#[tokio::test]
async fn test_current_epoch_uses_api_key_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/cardano/v1/epochs/current")
        .match_header("api-key", "cardano-key")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(r#"{"data":{"epoch_no":512,"block_count":1200},"last_updated":{"block_slot":1}}"#)
        .create_async()
        .await;

    let epoch = client(&server).current_epoch().await.unwrap();

    assert_eq!(epoch["data"]["epoch_no"], 512);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bitcoin_uses_network_key() {
    let mut server = mockito::Server::new_async().await;
    let block = server
        .mock("GET", "/btc/v0/rpc/block/latest")
        .match_header("api-key", "btc-key")
        .with_status(200)
        .with_body(r#"{"data":{"height":840000}}"#)
        .create_async()
        .await;
    let info = server
        .mock("GET", "/btc/v0/rpc/general/info")
        .match_header("api-key", "btc-key")
        .with_status(200)
        .with_body(r#"{"data":{"chain":"main"}}"#)
        .create_async()
        .await;

    let client = client(&server);
    assert_eq!(
        client.latest_block(UtxoChain::Bitcoin).await.unwrap()["data"]["height"],
        840000
    );
    assert_eq!(
        client.chain_info(UtxoChain::Bitcoin).await.unwrap()["data"]["chain"],
        "main"
    );
    block.assert_async().await;
    info.assert_async().await;
}

#[tokio::test]
async fn test_dogecoin_falls_back_to_main_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/doge/v0/rpc/block/latest")
        .match_header("api-key", "cardano-key")
        .with_status(200)
        .with_body(r#"{"data":{"height":5000000}}"#)
        .create_async()
        .await;

    client(&server).latest_block(UtxoChain::Dogecoin).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_failure_keeps_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/doge/v0/rpc/general/info")
        .with_status(429)
        .with_body(r#"{"error":"rate limited"}"#)
        .create_async()
        .await;

    match client(&server).chain_info(UtxoChain::Dogecoin).await.unwrap_err() {
        ProviderError::Upstream { provider, status, body } => {
            assert_eq!(provider, "Maestro");
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}
