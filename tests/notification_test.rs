mod common;

use serde_json::Value;

async fn favorite_listing(app: &common::TestApp, token: &str, listing_id: i32) {
    let resp = app
        .client
        .post(app.url(&format!("/listings/{}/favorite", listing_id)))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn list_and_mark_read() {
    let app = common::spawn_app().await;
    let (_owner_id, owner_token) = common::create_test_user(&app, "vanzator").await;
    let (buyer_id, buyer_token) = common::create_test_user(&app, "cumparator").await;

    let (id, _slug) = common::create_active_listing(&app, &owner_token).await;
    favorite_listing(&app, &buyer_token, id).await;

    // Owner sees the favorite notification
    let resp = app
        .client
        .get(app.url("/notifications"))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "favorite");
    assert_eq!(items[0]["actor_id"], buyer_id);
    assert_eq!(items[0]["listing_id"], id);
    assert_eq!(items[0]["is_read"], false);

    let notification_id = items[0]["id"].as_i64().unwrap();

    // Mark read
    let resp = app
        .client
        .put(app.url(&format!("/notifications/{}/read", notification_id)))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url("/notifications/unread-count"))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["unread"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn cannot_read_someone_elses_notification() {
    let app = common::spawn_app().await;
    let (_owner_id, owner_token) = common::create_test_user(&app, "vanzator").await;
    let (_buyer_id, buyer_token) = common::create_test_user(&app, "cumparator").await;

    let (id, _slug) = common::create_active_listing(&app, &owner_token).await;
    favorite_listing(&app, &buyer_token, id).await;

    let resp = app
        .client
        .get(app.url("/notifications"))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let notification_id = body["data"]["items"][0]["id"].as_i64().unwrap();

    // The buyer (actor, not recipient) cannot mark it read
    let resp = app
        .client
        .put(app.url(&format!("/notifications/{}/read", notification_id)))
        .bearer_auth(&buyer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn mark_all_and_delete_all() {
    let app = common::spawn_app().await;
    let (_owner_id, owner_token) = common::create_test_user(&app, "vanzator").await;
    let (_b1, buyer1_token) = common::create_test_user(&app, "cumparator").await;
    let (_b2, buyer2_token) = common::create_test_user(&app, "alt_cumparator").await;

    let (id, _slug) = common::create_active_listing(&app, &owner_token).await;
    favorite_listing(&app, &buyer1_token, id).await;
    favorite_listing(&app, &buyer2_token, id).await;

    let resp = app
        .client
        .put(app.url("/notifications/read-all"))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["updated"].as_u64().unwrap(), 2);

    let resp = app
        .client
        .delete(app.url("/notifications"))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["deleted"].as_u64().unwrap(), 2);

    let resp = app
        .client
        .get(app.url("/notifications"))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["total"].as_u64().unwrap(), 0);
}
