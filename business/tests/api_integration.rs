//! REST client behaviour against a mock server.

mod common;

use common::{TestContext, error, ok, sample_application, sample_organization};
use console_business::api::{add_entity, delete_entity, get_entity, list_entities, update_entity};
use console_business::{
    AccountItem, ApiClient, ApiError, Application, ConsoleConfig, EntityId, HasTable,
    MutationOutcome, Organization, User,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_list_organizations() {
    let ctx = TestContext::new().await;
    ctx.mock_get(
        "get-organizations",
        ("owner", "admin"),
        ok(json!([sample_organization("acme"), sample_organization("globex")])),
    )
    .await;

    let orgs: Vec<Organization> = list_entities(&ctx.client, "admin").await.unwrap();

    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[1].name, "globex");
    assert_eq!(HasTable::<AccountItem>::table_rows(&orgs[0]).len(), 3);
}

#[tokio::test]
async fn test_list_with_null_data_is_empty() {
    let ctx = TestContext::new().await;
    ctx.mock_get("get-users", ("owner", "acme"), ok(json!(null)))
        .await;

    let users: Vec<User> = list_entities(&ctx.client, "acme").await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_get_entity_found_and_missing() {
    let ctx = TestContext::new().await;
    ctx.mock_get(
        "get-application",
        ("id", "admin/portal"),
        ok(sample_application("portal")),
    )
    .await;
    ctx.mock_get("get-application", ("id", "admin/ghost"), ok(json!(null)))
        .await;

    let app: Option<Application> = get_entity(&ctx.client, &EntityId::new("admin", "portal"))
        .await
        .unwrap();
    let app = app.expect("portal exists");
    assert_eq!(app.organization, "acme");
    assert_eq!(app.extra["clientId"], "c1");

    let ghost: Option<Application> = get_entity(&ctx.client, &EntityId::new("admin", "ghost"))
        .await
        .unwrap();
    assert!(ghost.is_none());
}

#[tokio::test]
async fn test_server_error_message_is_surfaced() {
    let ctx = TestContext::new().await;
    ctx.mock_get(
        "get-organizations",
        ("owner", "admin"),
        error("Please login first"),
    )
    .await;

    let err = list_entities::<Organization>(&ctx.client, "admin")
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Server("Please login first".to_owned()));
}

#[tokio::test]
async fn test_http_status_error() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/get-syncers"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&ctx.mock_server)
        .await;

    let err = list_entities::<console_business::Syncer>(&ctx.client, "admin")
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Status(502));
}

#[tokio::test]
async fn test_garbage_body_is_decode_error() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/get-users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&ctx.mock_server)
        .await;

    let err = list_entities::<User>(&ctx.client, "admin")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_update_posts_under_given_id() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/update-organization"))
        .and(query_param("id", "admin/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!("Affected"))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let mut org: Organization = serde_json::from_value(sample_organization("acme")).unwrap();
    org.name = "acme-renamed".to_owned();

    let outcome = update_entity(&ctx.client, &EntityId::new("admin", "acme"), &org)
        .await
        .unwrap();
    assert_eq!(outcome, MutationOutcome::Affected);

    let bodies = ctx.received_bodies("update-organization").await;
    let sent: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(sent["name"], "acme-renamed");
    assert_eq!(sent["passwordType"], "bcrypt");
    assert_eq!(sent["mfaItems"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_add_and_delete() {
    let ctx = TestContext::new().await;
    ctx.mock_post("add-user", ok(json!("Affected")), 1).await;
    ctx.mock_post("delete-user", ok(json!("Unaffected")), 1)
        .await;

    let user = User {
        owner: "acme".to_owned(),
        name: "alice".to_owned(),
        ..User::default()
    };

    assert!(add_entity(&ctx.client, &user).await.unwrap().is_affected());
    assert_eq!(
        delete_entity(&ctx.client, &user).await.unwrap(),
        MutationOutcome::Unaffected
    );
}

#[tokio::test]
async fn test_client_credentials_use_basic_auth() {
    let ctx = TestContext::new().await;
    // "id:secret" in base64
    Mock::given(method("GET"))
        .and(path("/api/get-users"))
        .and(header("authorization", "Basic aWQ6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let raw = console_business::RawConfig {
        server_url: Some(ctx.mock_server.uri()),
        client_id: Some("id".to_owned()),
        client_secret: Some("secret".to_owned()),
        ..Default::default()
    };
    let client = ApiClient::new(ConsoleConfig::from_raw(raw).unwrap());

    let users: Vec<User> = list_entities(&client, "built-in").await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let ctx = TestContext::new().await;
    ctx.mock_get("get-users", ("owner", "acme"), ok(json!([])))
        .await;

    list_entities::<User>(&ctx.client, "acme").await.unwrap();

    let requests = ctx.mock_server.received_requests().await.unwrap();
    let agent = requests[0]
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(agent.starts_with("iam-console/"), "user agent was {agent:?}");
}
