//! Profile listing, detail projection, and the creators autocomplete.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn listing_without_filters_returns_nothing() {
    let server = setup_test_server().await;
    register_user(&server, "Someone", "someone@example.com", false).await;

    let (status, body) = get(&server.router, "/api/pulse/profiles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(0));
    assert_eq!(body["results"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn name_filter_ranks_prefix_matches_first() {
    let server = setup_test_server().await;
    register_user(&server, "Vesna Andersen", "vesna@example.com", false).await;
    register_user(&server, "Andy Vesnason", "andy@example.com", false).await;

    let (status, body) = get(&server.router, "/api/pulse/profiles?name=Vesna").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(2));
    assert_eq!(body["results"][0]["name"], "Vesna Andersen");
    assert_eq!(body["results"][1]["name"], "Andy Vesnason");
}

#[tokio::test]
async fn creators_autocomplete_carries_the_legacy_alias() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Pomax", "pomax@example.com", false).await;

    let (status, body) = get(&server.router, "/api/pulse/creators?name=Pom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(1));

    let item = &body["results"][0];
    assert_eq!(item["name"], "Pomax");
    assert_eq!(item["creator_id"], item["profile_id"]);
    assert_eq!(item["profile_id"].as_i64(), Some(user.profile_id as i64));
}

#[tokio::test]
async fn v1_profile_lists_inline_created_entries() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Lister", &format!("lister@{TRUSTED_DOMAIN}"), false).await;

    submit_entry(
        &server.router,
        &user.token,
        "Listed work",
        json!({"related_creators": [{"profile_id": user.profile_id}]}),
    )
    .await;

    let (status, v1) = get(&server.router, "/api/pulse/v1/profiles?name=Lister").await;
    assert_eq!(status, StatusCode::OK);
    let created = v1["results"][0]["created_entries"]
        .as_array()
        .expect("v1 list inlines entries");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["title"], "Listed work");

    let (status, v2) = get(&server.router, "/api/pulse/v2/profiles?name=Lister").await;
    assert_eq!(status, StatusCode::OK);
    assert!(v2["results"][0].get("created_entries").is_none());
}

#[tokio::test]
async fn my_profile_requires_authentication() {
    let server = setup_test_server().await;

    let (status, _) = get(&server.router, "/api/pulse/myprofile").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn my_profile_can_be_read_and_updated() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Original Name", "orig@example.com", false).await;

    let (status, body) = get_authed(&server.router, "/api/pulse/myprofile", &user.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Original Name");
    assert_eq!(body["profile_id"].as_i64(), Some(user.profile_id as i64));

    let (status, body) = request(
        &server.router,
        Method::PUT,
        "/api/pulse/myprofile",
        Some(&user.token),
        Some(json!({"custom_name": "Chosen Name", "user_bio": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Chosen Name");
    assert_eq!(body["user_bio"], "hello");
}

#[tokio::test]
async fn extended_info_fields_require_opt_in() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Extended", "ext@example.com", false).await;

    let (_, body) = request(
        &server.router,
        Method::PUT,
        "/api/pulse/myprofile",
        Some(&user.token),
        Some(json!({"user_bio_long": "a much longer story", "affiliation": "Example Org"})),
    )
    .await;
    assert!(body.get("user_bio_long").is_none());

    let (_, body) = request(
        &server.router,
        Method::PUT,
        "/api/pulse/myprofile",
        Some(&user.token),
        Some(json!({"enable_extended_info": true})),
    )
    .await;
    assert_eq!(body["user_bio_long"], "a much longer story");
    assert_eq!(body["affiliation"], "Example Org");
}

#[tokio::test]
async fn profile_detail_versions_differ_in_entry_shape() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Maker", &format!("maker@{TRUSTED_DOMAIN}"), false).await;

    submit_entry(
        &server.router,
        &user.token,
        "Made by me",
        json!({"related_creators": [{"profile_id": user.profile_id}]}),
    )
    .await;

    let (status, v1) = get(
        &server.router,
        &format!("/api/pulse/profiles/{}", user.profile_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created = v1["created_entries"].as_array().expect("v1 inline entries");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["title"], "Made by me");
    assert!(v1.get("entry_count").is_none());

    let (status, v2) = get(
        &server.router,
        &format!("/api/pulse/v2/profiles/{}", user.profile_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(v2.get("created_entries").is_none());
    assert_eq!(v2["entry_count"]["created"].as_u64(), Some(1));
    assert_eq!(v2["entry_count"]["published"].as_u64(), Some(1));
}

#[tokio::test]
async fn pending_work_is_not_counted_publicly() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Quiet", "quiet@example.com", false).await;

    submit_entry(
        &server.router,
        &user.token,
        "Not yet approved",
        json!({"related_creators": [{"profile_id": user.profile_id}]}),
    )
    .await;

    let (_, v2) = get(
        &server.router,
        &format!("/api/pulse/v2/profiles/{}", user.profile_id),
    )
    .await;
    assert_eq!(v2["entry_count"]["created"].as_u64(), Some(0));
    assert_eq!(v2["entry_count"]["published"].as_u64(), Some(0));
}

#[tokio::test]
async fn unknown_profiles_are_not_found() {
    let server = setup_test_server().await;

    let (status, _) = get(&server.router, "/api/pulse/profiles/424242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
