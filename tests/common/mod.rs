#![allow(dead_code)]

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use dreamstreamer::{
    catalog::{CatalogClient, StaticToken},
    config::{IdentitySettings, Settings},
};
use serde_json::{Value, json};
use wiremock::{MockServer, Request};

pub const BUCKET: &str = "dreamstreamer-media";

pub fn settings(server: &MockServer) -> Settings {
    Settings {
        api_url: server.uri(),
        bucket_name: BUCKET.to_string(),
        identity: IdentitySettings {
            endpoint: server.uri(),
            user_pool_id: "ap-southeast-1_pool".to_string(),
            client_id: "client-id".to_string(),
        },
    }
}

/// Catalog client pointed at `server`, signed in with a fixed token.
pub fn signed_in_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(settings(server))
        .expect("client builds")
        .with_credentials(Arc::new(StaticToken("test-token".to_string())))
}

pub fn public_url(key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", BUCKET, key)
}

/// An unsigned JWT carrying `claims`.
pub fn fake_jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn admin_token() -> String {
    fake_jwt(json!({
        "cognito:username": "ops",
        "name": "Ops Admin",
        "email": "ops@dreamstreamer.io",
        "custom:role": "1"
    }))
}

pub fn listener_token() -> String {
    fake_jwt(json!({
        "cognito:username": "mia",
        "name": "Mia",
        "email": "mia@dreamstreamer.io",
        "custom:role": "0"
    }))
}

pub async fn requests(server: &MockServer) -> Vec<Request> {
    server.received_requests().await.unwrap_or_default()
}

/// `METHOD /path` of every received request, in order.
pub async fn request_log(server: &MockServer) -> Vec<String> {
    requests(server)
        .await
        .iter()
        .map(|r| format!("{} {}", r.method.as_str(), r.url.path()))
        .collect()
}

pub fn json_body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}
