use cdpt_storage::{FileRef, IagonClient, StorageError, StorageGateway};
use mockito::Matcher;

fn client(server: &mockito::ServerGuard) -> IagonClient {
    IagonClient::builder()
        .api_key("test-key")
        .password("secret")
        .base_url(server.url())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_upload_sends_multipart_with_api_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/storage/upload")
        .match_header("x-api-key", "test-key")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="u1_chatHistory.json""#.to_string()),
            Matcher::Regex(r#"name="visibility""#.to_string()),
            Matcher::Regex("public".to_string()),
            Matcher::Regex(r#""content":"hi""#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":{"_id":"abc123","name":"u1_chatHistory.json"}}"#)
        .create_async()
        .await;

    let receipt = client(&server)
        .upload(
            "u1_chatHistory.json",
            br#"[{"role":"user","content":"hi"}]"#.to_vec(),
        )
        .await
        .unwrap();

    assert_eq!(receipt["data"]["_id"], "abc123");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_failure_is_forwarded() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/storage/upload")
        .with_status(401)
        .with_body(r#"{"success":false,"message":"Invalid API key"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .upload("u1_chatHistory.json", b"[]".to_vec())
        .await
        .unwrap_err();

    match err {
        StorageError::Upstream { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_download_by_name_omits_password() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/storage/download/u1_chatHistory.json")
        .match_header("x-api-key", "test-key")
        .match_header("password", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"data":"W10="}"#)
        .create_async()
        .await;

    let body = client(&server)
        .download(FileRef::Name("u1_chatHistory.json"))
        .await
        .unwrap();

    assert_eq!(body, br#"{"data":"W10="}"#.to_vec());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_download_escapes_reserved_characters_in_name() {
    let mut server = mockito::Server::new_async().await;
    let escaped = server
        .mock("GET", "/storage/download/a%3Fb%23c%25d_chatHistory.json")
        .with_status(200)
        .with_body(r#"{"data":"W10="}"#)
        .create_async()
        .await;
    let truncated = server
        .mock("GET", Matcher::Regex("^/storage/download/a($|\\?)".to_string()))
        .expect(0)
        .create_async()
        .await;

    let body = client(&server)
        .download(FileRef::Name("a?b#c%d_chatHistory.json"))
        .await
        .unwrap();

    assert_eq!(body, br#"{"data":"W10="}"#.to_vec());
    escaped.assert_async().await;
    truncated.assert_async().await;
}

#[tokio::test]
async fn test_download_by_id_sends_password() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/storage/download/665f1c")
        .match_header("x-api-key", "test-key")
        .match_header("password", "secret")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let body = client(&server).download(FileRef::Id("665f1c")).await.unwrap();

    assert_eq!(body, b"[]".to_vec());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_public_files() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/storage/directory")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("visibility".to_string(), "public".to_string()),
            Matcher::UrlEncoded("listingType".to_string(), "index".to_string()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
                "success": true,
                "data": {
                    "directories": [],
                    "files": [
                        {"_id": "a", "name": "u1_chatHistory.json", "updated_at": "2024-06-01T10:00:00.000Z"},
                        {"_id": "b", "name": "u2_chatHistory.json", "updated_at": "2024-06-02T10:00:00.000Z"}
                    ]
                }
            }"#,
        )
        .create_async()
        .await;

    let files = client(&server).list_public_files().await.unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[1].id, "b");
    assert_eq!(files[0].name.as_deref(), Some("u1_chatHistory.json"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_without_files_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/storage/directory")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success":true,"data":{"directories":[]}}"#)
        .create_async()
        .await;

    let files = client(&server).list_public_files().await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_unreachable_gateway_is_network_error() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = IagonClient::builder()
        .api_key("test-key")
        .base_url("http://127.0.0.1:9")
        .build()
        .unwrap();

    let err = client.list_public_files().await.unwrap_err();
    assert!(matches!(err, StorageError::Network(_)));
}
