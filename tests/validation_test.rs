mod common;

use serde_json::Value;

#[tokio::test]
async fn new_listing_is_pending_and_hidden() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "vanzator").await;

    let (_id, slug) = common::create_test_listing(&app, &token).await;

    // Detail page still resolves (slug is assigned at creation)
    let resp = app
        .client
        .get(app.url(&format!("/listings/{}", slug)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "pending");

    // But the public list only shows active listings
    let resp = app
        .client
        .get(app.url("/listings"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(!items.iter().any(|i| i["slug"] == slug.as_str()));
}

#[tokio::test]
async fn confirm_activates_listing() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "vanzator").await;

    let (id, slug) = common::create_test_listing(&app, &token).await;
    let validation_token = common::get_validation_token(&app.db, id).await;

    let body = common::confirm_listing(&app, id, &validation_token).await;
    assert_eq!(body["outcome"], "success");
    assert_eq!(body["data"]["slug"], slug.as_str());

    // Listing is now active and publicly listed
    let resp = app
        .client
        .get(app.url("/listings"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert!(items.iter().any(|i| i["slug"] == slug.as_str()));
}

#[tokio::test]
async fn second_confirm_fails() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "vanzator").await;

    let (id, _slug) = common::create_test_listing(&app, &token).await;
    let validation_token = common::get_validation_token(&app.db, id).await;

    let body = common::confirm_listing(&app, id, &validation_token).await;
    assert_eq!(body["outcome"], "success");

    // Same link again: token is consumed, terminal
    let resp = app
        .client
        .get(format!(
            "{}/validare-anunt?id={}&token={}",
            app.addr, id, validation_token
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "error");
}

#[tokio::test]
async fn bogus_token_fails() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "vanzator").await;

    let (id, _slug) = common::create_test_listing(&app, &token).await;

    let resp = app
        .client
        .get(format!(
            "{}/validare-anunt?id={}&token={}",
            app.addr,
            id,
            "0".repeat(64)
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn expired_token_fails() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "vanzator").await;

    let (id, slug) = common::create_test_listing(&app, &token).await;
    let validation_token = common::get_validation_token(&app.db, id).await;
    common::expire_validation_tokens(&app.db, id).await;

    let resp = app
        .client
        .get(format!(
            "{}/validare-anunt?id={}&token={}",
            app.addr, id, validation_token
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Listing stays pending
    let resp = app
        .client
        .get(app.url(&format!("/listings/{}", slug)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "pending");
}

#[tokio::test]
async fn resend_issues_fresh_token() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "vanzator").await;

    let (id, _slug) = common::create_test_listing(&app, &token).await;
    let first = common::get_validation_token(&app.db, id).await;
    common::expire_validation_tokens(&app.db, id).await;

    let resp = app
        .client
        .post(app.url(&format!("/listings/{}/resend-validation", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let second = common::get_validation_token(&app.db, id).await;
    assert_ne!(first, second);

    // The fresh token activates the listing
    let body = common::confirm_listing(&app, id, &second).await;
    assert_eq!(body["outcome"], "success");
}

#[tokio::test]
async fn resend_retires_the_previous_token() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "vanzator").await;

    let (id, slug) = common::create_test_listing(&app, &token).await;
    let first = common::get_validation_token(&app.db, id).await;

    // Resend while the first token is still unconsumed and unexpired
    let resp = app
        .client
        .post(app.url(&format!("/listings/{}/resend-validation", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // The stale link no longer activates the listing
    let resp = app
        .client
        .get(format!(
            "{}/validare-anunt?id={}&token={}",
            app.addr, id, first
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = app
        .client
        .get(app.url(&format!("/listings/{}", slug)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "pending");

    // Only the latest link works
    let second = common::get_validation_token(&app.db, id).await;
    assert_ne!(first, second);
    let body = common::confirm_listing(&app, id, &second).await;
    assert_eq!(body["outcome"], "success");
}

#[tokio::test]
async fn resend_requires_ownership() {
    let app = common::spawn_app().await;
    let (_owner_id, owner_token) = common::create_test_user(&app, "vanzator").await;
    let (_other_id, other_token) = common::create_test_user(&app, "strain").await;

    let (id, _slug) = common::create_test_listing(&app, &owner_token).await;

    let resp = app
        .client
        .post(app.url(&format!("/listings/{}/resend-validation", id)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}
