//! Mock server helpers shared by the integration tests.

#![allow(dead_code)]

use console_business::{ApiClient, ConsoleConfig};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

pub const TEST_TOKEN: &str = "test_token";

/// A mock server plus a client pointed at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub client: ApiClient,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = ConsoleConfig::new(mock_server.uri())
            .expect("mock server uri is a valid server url")
            .with_access_token(TEST_TOKEN);
        let client = ApiClient::new(config);
        Self {
            mock_server,
            client,
        }
    }

    /// Mount `GET /api/{endpoint}?{name}={value}` answering `body`.
    pub async fn mock_get(&self, endpoint: &str, query: (&str, &str), body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/{endpoint}")))
            .and(query_param(query.0, query.1))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    /// Mount `POST /api/{endpoint}` answering `body`, expected `times` times.
    pub async fn mock_post(&self, endpoint: &str, body: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/api/{endpoint}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(&self.mock_server)
            .await;
    }

    /// Bodies of every request received so far on `/api/{endpoint}`.
    pub async fn received_bodies(&self, endpoint: &str) -> Vec<String> {
        let wanted = format!("/api/{endpoint}");
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == wanted)
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}

pub fn ok(data: Value) -> Value {
    json!({"status": "ok", "msg": "", "data": data, "data2": null})
}

pub fn error(msg: &str) -> Value {
    json!({"status": "error", "msg": msg, "data": null, "data2": null})
}

pub fn sample_organization(name: &str) -> Value {
    json!({
        "owner": "admin",
        "name": name,
        "createdTime": "2024-01-01T00:00:00Z",
        "displayName": "Acme",
        "websiteUrl": "https://acme.example.com",
        "passwordType": "bcrypt",
        "accountItems": [
            {"name": "Name", "visible": true, "viewRule": "Public", "modifyRule": "Admin"},
            {"name": "Email", "visible": true, "viewRule": "Public", "modifyRule": "Self"},
            {"name": "Phone", "visible": false, "viewRule": "Self", "modifyRule": "Self"},
        ],
        "mfaItems": null,
    })
}

pub fn sample_application(name: &str) -> Value {
    json!({
        "owner": "admin",
        "name": name,
        "displayName": "Portal",
        "organization": "acme",
        "clientId": "c1",
        "signupItems": [
            {"name": "Username", "visible": true, "required": true, "rule": "None"},
            {"name": "Email", "visible": true, "required": true, "rule": "Normal"},
        ],
        "signinMethods": [
            {"name": "Password", "displayName": "Password", "rule": "All"},
            {"name": "Magic link", "displayName": "Magic link", "rule": "None"},
        ],
    })
}
