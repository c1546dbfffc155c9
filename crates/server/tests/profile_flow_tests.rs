//! End-to-end tests of the OAuth 1.0a profile-linking flow against a mocked
//! provider.

use axum_test::TestServer;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    Statement,
};
use status_server::{
    AppResources,
    api::build_router,
    config::{AppConfig, IdentityConfig, OAuthConfig},
    entity::{auth_request, profile},
    oauth::ProfileLinker,
};
use std::sync::Arc;
use time::OffsetDateTime;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN_USER: &str = "admin@example.com";

async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.expect("connect");

    for ddl in [
        r#"CREATE TABLE service (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            sort_order INTEGER NOT NULL DEFAULT 0
        );"#,
        r#"CREATE TABLE profile (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL UNIQUE,
            access_token TEXT NOT NULL,
            access_token_secret TEXT NOT NULL,
            created_at TEXT NOT NULL
        );"#,
        r#"CREATE TABLE auth_request (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL UNIQUE,
            request_secret TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );"#,
    ] {
        db.execute(Statement::from_string(DbBackend::Sqlite, ddl))
            .await
            .expect("create table");
    }

    db
}

/// Resources wired to a mock provider via the `provider_base` override.
async fn create_test_resources(provider_base: &str) -> AppResources {
    let db = Arc::new(create_test_db().await);
    let config = Arc::new(AppConfig {
        database_url: "sqlite::memory:".into(),
        listen_address: "127.0.0.1:0".into(),
        identity: IdentityConfig::default(),
        oauth: OAuthConfig {
            provider_base: Some(provider_base.to_string()),
            ..Default::default()
        },
    });
    let linker = Arc::new(ProfileLinker::new(&config.oauth));
    AppResources { db, linker, config }
}

async fn admin_get(server: &TestServer, url: &str) -> axum_test::TestResponse {
    server
        .get(url)
        .add_header("x-status-user", ADMIN_USER)
        .add_header("x-status-admin", "1")
        .await
}

async fn seed_auth_request(db: &DatabaseConnection, secret: &str) {
    let model = auth_request::ActiveModel {
        owner: Set(ADMIN_USER.into()),
        request_secret: Set(secret.into()),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    model.insert(db).await.expect("seed auth request");
}

// =============================================================================
// Leg 1: request token
// =============================================================================

#[tokio::test]
async fn unlinked_profile_fetches_request_token_and_exposes_authorize_url() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_ah/OAuthGetRequestToken"))
        .and(header_exists("authorization"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=req-token&oauth_token_secret=req-secret"),
        )
        .expect(1)
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    let response = admin_get(&server, "/profile").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_is_authorized"], false);
    assert_eq!(
        body["oauth_url"],
        format!(
            "{}/_ah/OAuthAuthorizeToken?oauth_token=req-token",
            provider.uri()
        )
    );

    let pending = auth_request::Entity::find_by_owner(resources.db.as_ref(), ADMIN_USER)
        .await
        .expect("query")
        .expect("auth request stored");
    assert_eq!(pending.request_secret, "req-secret");
}

#[tokio::test]
async fn second_link_attempt_overwrites_request_secret() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_ah/OAuthGetRequestToken"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=fresh-token&oauth_token_secret=fresh-secret"),
        )
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    seed_auth_request(resources.db.as_ref(), "stale-secret").await;
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    admin_get(&server, "/profile").await.assert_status_ok();

    let pending = auth_request::Entity::find_by_owner(resources.db.as_ref(), ADMIN_USER)
        .await
        .expect("query")
        .expect("auth request");
    assert_eq!(pending.request_secret, "fresh-secret");
}

#[tokio::test]
async fn request_token_failure_leaves_profile_unlinked() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_ah/OAuthGetRequestToken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    let response = admin_get(&server, "/profile").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_is_authorized"], false);
    assert!(body.get("oauth_url").is_none());

    let pending = auth_request::Entity::find_by_owner(resources.db.as_ref(), ADMIN_USER)
        .await
        .expect("query");
    assert!(pending.is_none());
}

// =============================================================================
// Leg 3: access token exchange
// =============================================================================

#[tokio::test]
async fn verify_with_pending_request_creates_profile() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_ah/OAuthGetAccessToken"))
        .and(header_exists("authorization"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=access-token&oauth_token_secret=access-secret"),
        )
        .expect(1)
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    seed_auth_request(resources.db.as_ref(), "req-secret").await;
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    let response = server
        .get("/profile/verify")
        .add_query_param("oauth_token", "req-token")
        .add_query_param("oauth_verifier", "verifier-123")
        .add_header("x-status-user", ADMIN_USER)
        .add_header("x-status-admin", "1")
        .await;
    response.assert_status_see_other();

    let linked = profile::Entity::find_by_owner(resources.db.as_ref(), ADMIN_USER)
        .await
        .expect("query")
        .expect("profile created");
    assert_eq!(linked.access_token, "access-token");
    assert_eq!(linked.access_token_secret, "access-secret");
}

#[tokio::test]
async fn verify_without_pending_request_creates_no_profile() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_ah/OAuthGetAccessToken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oauth_token=x&oauth_token_secret=y"))
        .expect(0)
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    let response = server
        .get("/profile/verify")
        .add_query_param("oauth_token", "req-token")
        .add_query_param("oauth_verifier", "verifier-123")
        .add_header("x-status-user", ADMIN_USER)
        .add_header("x-status-admin", "1")
        .await;
    response.assert_status_see_other();

    let linked = profile::Entity::find_by_owner(resources.db.as_ref(), ADMIN_USER)
        .await
        .expect("query");
    assert!(linked.is_none());
}

#[tokio::test]
async fn verify_with_missing_params_skips_exchange() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_ah/OAuthGetAccessToken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oauth_token=x&oauth_token_secret=y"))
        .expect(0)
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    seed_auth_request(resources.db.as_ref(), "req-secret").await;
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    let response = server
        .get("/profile/verify")
        .add_query_param("oauth_token", "req-token")
        .add_header("x-status-user", ADMIN_USER)
        .add_header("x-status-admin", "1")
        .await;
    response.assert_status_see_other();

    let linked = profile::Entity::find_by_owner(resources.db.as_ref(), ADMIN_USER)
        .await
        .expect("query");
    assert!(linked.is_none());
}

#[tokio::test]
async fn verify_with_rejected_exchange_creates_no_profile() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_ah/OAuthGetAccessToken"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    seed_auth_request(resources.db.as_ref(), "req-secret").await;
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    let response = server
        .get("/profile/verify")
        .add_query_param("oauth_token", "req-token")
        .add_query_param("oauth_verifier", "verifier-123")
        .add_header("x-status-user", ADMIN_USER)
        .add_header("x-status-admin", "1")
        .await;
    response.assert_status_see_other();

    let linked = profile::Entity::find_by_owner(resources.db.as_ref(), ADMIN_USER)
        .await
        .expect("query");
    assert!(linked.is_none());
}

// =============================================================================
// Linked state
// =============================================================================

#[tokio::test]
async fn linked_profile_reports_access_token_without_provider_call() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_ah/OAuthGetRequestToken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oauth_token=x&oauth_token_secret=y"))
        .expect(0)
        .mount(&provider)
        .await;

    let resources = create_test_resources(&provider.uri()).await;
    let model = profile::ActiveModel {
        owner: Set(ADMIN_USER.into()),
        access_token: Set("stored-token".into()),
        access_token_secret: Set("stored-secret".into()),
        created_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    };
    model
        .insert(resources.db.as_ref())
        .await
        .expect("seed profile");
    let server = TestServer::new(build_router(resources.clone())).expect("server");

    let response = admin_get(&server, "/profile").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["user_is_authorized"], true);
    assert_eq!(body["access_token"], "stored-token");
    assert!(body.get("oauth_url").is_none());
}
