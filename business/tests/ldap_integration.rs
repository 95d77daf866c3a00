//! LDAP server endpoints against a mock server.

mod common;

use common::{TestContext, error, ok};
use console_business::api::{get_entity, list_entities};
use console_business::ldap::{get_ldap_users, sync_ldap_users};
use console_business::{ApiError, EntityEditor, EntityId, Ldap, LdapUser, MutationOutcome};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn sample_ldap(id: &str) -> Value {
    json!({
        "id": id,
        "owner": "acme",
        "createdTime": "2024-01-01T00:00:00Z",
        "serverName": "Corp directory",
        "host": "ldap.acme.test",
        "port": 389,
        "enableSsl": false,
        "username": "cn=admin,dc=acme,dc=test",
        "password": "***",
        "baseDn": "ou=People,dc=acme,dc=test",
        "filter": "(objectClass=person)",
        "filterFields": ["uid"],
        "autoSync": 0,
        "lastSync": "",
        "passwordType": "Plain",
    })
}

#[tokio::test]
async fn test_list_and_get_ldaps() {
    let ctx = TestContext::new().await;
    ctx.mock_get("get-ldaps", ("owner", "acme"), ok(json!([sample_ldap("ldap-1")])))
        .await;
    ctx.mock_get("get-ldap", ("id", "acme/ldap-1"), ok(sample_ldap("ldap-1")))
        .await;

    let ldaps: Vec<Ldap> = list_entities(&ctx.client, "acme").await.unwrap();
    assert_eq!(ldaps.len(), 1);
    assert_eq!(ldaps[0].base_dn, "ou=People,dc=acme,dc=test");

    let ldap: Option<Ldap> = get_entity(&ctx.client, &EntityId::new("acme", "ldap-1"))
        .await
        .unwrap();
    let ldap = ldap.expect("ldap-1 exists");
    assert_eq!(ldap.filter_fields, ["uid"]);
    assert_eq!(ldap.extra["passwordType"], "Plain");
}

#[tokio::test]
async fn test_update_ldap_posts_whole_record() {
    let ctx = TestContext::new().await;
    ctx.mock_get("get-ldap", ("id", "acme/ldap-1"), ok(sample_ldap("ldap-1")))
        .await;
    ctx.mock_post("update-ldap", ok(json!("Affected")), 1).await;

    let id = EntityId::new("acme", "ldap-1");
    let mut editor = EntityEditor::<Ldap>::load(&ctx.client, &id).await.unwrap();
    editor.update(|ldap| ldap.auto_sync = 30);
    let outcome = editor.save(&ctx.client).await.unwrap();
    assert_eq!(outcome, MutationOutcome::Affected);

    let bodies = ctx.received_bodies("update-ldap").await;
    let body: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(body["id"], "ldap-1");
    assert_eq!(body["autoSync"], 30);
    assert_eq!(body["password"], "***");
    assert_eq!(body["passwordType"], "Plain");
}

#[tokio::test]
async fn test_get_ldap_users_with_existing() {
    let ctx = TestContext::new().await;
    ctx.mock_get(
        "get-ldap-users",
        ("id", "acme/ldap-1"),
        ok(json!({
            "users": [
                {"uuid": "u1", "uid": "alice", "cn": "Alice", "email": "alice@acme.test"},
                {"uuid": "u2", "uid": "bob", "cn": "Bob"},
            ],
            "existUuids": ["u1"],
        })),
    )
    .await;

    let listing = get_ldap_users(&ctx.client, &EntityId::new("acme", "ldap-1"))
        .await
        .unwrap();

    assert_eq!(listing.users.len(), 2);
    let pending: Vec<&str> = listing.pending().iter().map(|u| u.uid.as_str()).collect();
    assert_eq!(pending, ["bob"]);
}

#[tokio::test]
async fn test_get_ldap_users_server_error() {
    let ctx = TestContext::new().await;
    ctx.mock_get(
        "get-ldap-users",
        ("id", "acme/ldap-1"),
        error("LDAP Result Code 49 \"Invalid Credentials\""),
    )
    .await;

    let err = get_ldap_users(&ctx.client, &EntityId::new("acme", "ldap-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Server(msg) if msg.contains("Invalid Credentials")));
}

#[tokio::test]
async fn test_sync_ldap_users() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/sync-ldap-users"))
        .and(query_param("owner", "acme"))
        .and(query_param("ldapId", "ldap-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "exist": [{"uuid": "u2", "uid": "bob", "cn": "Bob"}],
            "failed": null,
        }))))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let users: Vec<LdapUser> = vec![
        serde_json::from_value(json!({"uuid": "u1", "uid": "alice", "memberOf": "staff"}))
            .unwrap(),
        serde_json::from_value(json!({"uuid": "u2", "uid": "bob"})).unwrap(),
    ];
    let result = sync_ldap_users(&ctx.client, &EntityId::new("acme", "ldap-1"), &users)
        .await
        .unwrap();

    assert!(!result.is_clean());
    assert_eq!(result.exist[0].label(), "Bob");
    assert!(result.failed.is_empty());

    let bodies = ctx.received_bodies("sync-ldap-users").await;
    let body: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(body[0]["uid"], "alice");
    assert_eq!(body[0]["memberOf"], "staff");
    assert_eq!(body[1]["uuid"], "u2");
}
