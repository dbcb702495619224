#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);
static LISTING_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        // No SMTP in tests: dispatch outcome is Skipped, which counts as ok
        std::env::remove_var("SMTP_HOST");
        let config = piata::config::jwt::JwtConfig::from_env().unwrap();
        let _ = piata::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // Run migrations only once globally (using atomic bool for thread safety)
    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        piata::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    // Clean data tables (reverse dependency order)
    cleanup_tables(&db).await;

    let email_service = piata::services::email::EmailService::from_env();

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(piata::routes::create_routes())
        .layer(axum::middleware::from_fn(
            piata::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()))
        .layer(axum::extract::Extension(email_service));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let addr_str = format!("http://{}", addr);
    let client = Client::new();

    TestApp {
        addr: addr_str,
        db,
        client,
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    let tables = [
        "validation_tokens",
        "favorites",
        "notifications",
        "messages",
        "listings",
        "users",
    ];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Register a user and return (user_id, token).
pub async fn create_test_user(app: &TestApp, username_prefix: &str) -> (i32, String) {
    static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let unique_username = format!("{}_{}", username_prefix, counter);

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": unique_username,
            "email": format!("{}@test.com", unique_username),
            "password": "test_password_123"
        }))
        .send()
        .await
        .expect("Failed to register user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|e| {
        panic!(
            "Failed to parse register response for user '{}': status={}, error={}",
            unique_username, status, e
        );
    });

    if body["outcome"] != "success" {
        panic!(
            "Failed to register user '{}': status={}, body={}",
            unique_username, status, body
        );
    }

    let user_id = body["data"]["user_id"].as_i64().unwrap_or_else(|| {
        panic!(
            "Response missing user_id for user '{}': {:?}",
            unique_username, body
        )
    }) as i32;
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| {
            panic!(
                "Response missing token for user '{}': {:?}",
                unique_username, body
            )
        })
        .to_string();
    (user_id, token)
}

/// Create a listing (pending validation) and return (listing_id, slug).
pub async fn create_test_listing(app: &TestApp, token: &str) -> (i32, String) {
    let counter = LISTING_COUNTER.fetch_add(1, Ordering::SeqCst);

    let resp = app
        .client
        .post(app.url("/listings"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "title": format!("Bicicleta de test {}", counter),
            "description": "O bicicleta aproape noua, putin folosita.",
            "price": 450.0,
            "currency": "RON",
            "category": "sport",
            "location": "Cluj-Napoca"
        }))
        .send()
        .await
        .expect("Failed to create listing");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse listing response");

    if body["outcome"] != "success" && body["outcome"] != "partial" {
        panic!("Failed to create listing: status={}, body={}", status, body);
    }

    let id = body["data"]["listing"]["id"]
        .as_i64()
        .expect("Listing response missing id") as i32;
    let slug = body["data"]["listing"]["slug"]
        .as_str()
        .expect("Listing response missing slug")
        .to_string();
    (id, slug)
}

/// Fetch the latest validation token for a listing directly from the database.
pub async fn get_validation_token(db: &DatabaseConnection, listing_id: i32) -> String {
    let row = db
        .query_one(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT token FROM validation_tokens WHERE listing_id = $1 ORDER BY id DESC LIMIT 1",
            vec![listing_id.into()],
        ))
        .await
        .expect("Failed to query validation token")
        .expect("No validation token for listing");

    row.try_get::<String>("", "token")
        .expect("token column missing")
}

/// Confirm a listing via its emailed link. Returns the response body.
pub async fn confirm_listing(app: &TestApp, listing_id: i32, token: &str) -> serde_json::Value {
    let resp = app
        .client
        .get(format!(
            "{}/validare-anunt?id={}&token={}",
            app.addr, listing_id, token
        ))
        .send()
        .await
        .expect("Failed to call confirmation link");

    resp.json().await.expect("Failed to parse confirm response")
}

/// Create a listing and activate it through the validation flow.
pub async fn create_active_listing(app: &TestApp, token: &str) -> (i32, String) {
    let (id, slug) = create_test_listing(app, token).await;
    let validation_token = get_validation_token(&app.db, id).await;
    let body = confirm_listing(app, id, &validation_token).await;
    assert_eq!(body["outcome"], "success", "confirm failed: {}", body);
    (id, slug)
}

/// Make a user admin by directly updating the database.
pub async fn make_admin(db: &DatabaseConnection, user_id: i32) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE users SET role = 'admin' WHERE id = $1",
        vec![user_id.into()],
    ))
    .await
    .expect("Failed to make user admin");
}

/// Force-expire every validation token of a listing.
pub async fn expire_validation_tokens(db: &DatabaseConnection, listing_id: i32) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE validation_tokens SET expires_at = NOW() - INTERVAL '1 hour' WHERE listing_id = $1",
        vec![listing_id.into()],
    ))
    .await
    .expect("Failed to expire validation tokens");
}
