// tests/http_client.rs
mod common;

use common::{count, signed_in, MockApi, VALID_TOKEN};
use masar_client::errors::messages;
use masar_client::{ApiError, ErrorKind, TokenStore};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn bearer_header_follows_the_store() {
    let api = MockApi::start().await;
    let tokens = signed_in(VALID_TOKEN);
    let http = api.http(Arc::clone(&tokens));

    let echoed: Value = http.get_json("/api/echo-auth").await.unwrap();
    assert_eq!(echoed["authorization"], "Bearer tok-123");

    tokens.clear();
    let echoed: Value = http.get_json("/api/echo-auth").await.unwrap();
    assert!(echoed["authorization"].is_null());
}

#[tokio::test]
async fn any_401_empties_the_store() {
    let api = MockApi::start().await;
    let tokens = signed_in(VALID_TOKEN);
    let http = api.http(Arc::clone(&tokens));

    let err = http.get_json::<Value>("/api/protected").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { message: None, .. }));
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(err.ui_message(), messages::INVALID_CREDENTIALS);
    assert!(!tokens.is_authenticated());
    assert!(tokens.get_user().is_none());
    assert_eq!(count(&api.hits.misc), 1);
}

#[tokio::test]
async fn server_errors_are_classified() {
    let api = MockApi::start().await;
    let http = api.http(Arc::new(TokenStore::in_memory()));

    let err = http.get_json::<Value>("/api/boom").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.server_message(), Some("boom"));
    assert_eq!(err.ui_message(), messages::SERVER_ERROR);

    let err = http.get_json::<Value>("/api/validation").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.ui_message(), messages::VALIDATION_ERROR);
    assert!(err.field_errors().is_some());

    let err = http.get_json::<Value>("/api/missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.ui_message(), messages::UNKNOWN_ERROR);
}

#[tokio::test]
async fn empty_body_decodes_as_null() {
    let api = MockApi::start().await;
    let http = api.http(Arc::new(TokenStore::in_memory()));

    let body: Option<Value> = http.get_json("/api/empty").await.unwrap();
    assert!(body.is_none());
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    let config = masar_client::ApiConfig::with_base_url("http://127.0.0.1:9");
    let http = masar_client::core::HttpClient::new(&config, Arc::new(TokenStore::in_memory())).unwrap();

    let err = http.get_json::<Value>("/api/anything").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.ui_message(), messages::NETWORK_ERROR);
}

#[tokio::test]
async fn absolute_urls_pass_through() {
    let api = MockApi::start().await;
    let tokens = signed_in(VALID_TOKEN);
    let config = masar_client::ApiConfig::with_base_url("http://127.0.0.1:9");
    let http = masar_client::core::HttpClient::new(&config, tokens).unwrap();

    let url = format!("{}/api/echo-auth", api.base_url);
    let echoed: Value = http.get_json(&url).await.unwrap();
    assert_eq!(echoed["authorization"], "Bearer tok-123");
}
