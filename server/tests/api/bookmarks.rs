//! Bookmark toggle and bulk behavior.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn anonymous_bookmarking_is_forbidden() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Pub", &format!("pub@{TRUSTED_DOMAIN}"), false).await;
    let entry = submit_entry(&server.router, &user.token, "Bookmarkable", json!({})).await;
    let entry_id = entry["id"].as_i64().expect("id");

    let (status, _) = request(
        &server.router,
        Method::PUT,
        &format!("/api/pulse/entries/{entry_id}/bookmark"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn double_toggle_returns_to_zero() {
    let server = setup_test_server().await;
    let publisher = register_user(&server, "Pub", &format!("pub2@{TRUSTED_DOMAIN}"), false).await;
    let reader = register_user(&server, "Reader", "reader@example.com", false).await;

    let entry = submit_entry(&server.router, &publisher.token, "Toggled", json!({})).await;
    let entry_id = entry["id"].as_i64().expect("id");
    let path = format!("/api/pulse/entries/{entry_id}/bookmark");

    let (status, _) = request(&server.router, Method::PUT, &path, Some(&reader.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get_authed(
        &server.router,
        &format!("/api/pulse/entries/{entry_id}"),
        &reader.token,
    )
    .await;
    assert_eq!(body["is_bookmarked"], json!(true));
    assert_eq!(body["bookmark_count"].as_u64(), Some(1));

    let (status, _) = request(&server.router, Method::PUT, &path, Some(&reader.token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get_authed(
        &server.router,
        &format!("/api/pulse/entries/{entry_id}"),
        &reader.token,
    )
    .await;
    assert_eq!(body["is_bookmarked"], json!(false));
    assert_eq!(body["bookmark_count"].as_u64(), Some(0));
}

#[tokio::test]
async fn pending_entries_can_be_bookmarked() {
    let server = setup_test_server().await;
    let submitter = register_user(&server, "Sub", "sub2@example.com", false).await;
    let reader = register_user(&server, "Reader", "reader2@example.com", false).await;
    let moderator = register_user(&server, "Mod", "mod2@example.com", true).await;

    let entry = submit_entry(&server.router, &submitter.token, "Still pending", json!({})).await;
    let entry_id = entry["id"].as_i64().expect("id");

    // The toggle resolves over all entries, not just approved ones.
    let (status, _) = request(
        &server.router,
        Method::PUT,
        &format!("/api/pulse/entries/{entry_id}/bookmark"),
        Some(&reader.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The bookmark list only shows approved entries, so the saved row
    // surfaces once the entry clears moderation.
    let (_, body) = get_authed(
        &server.router,
        "/api/pulse/entries/bookmarks",
        &reader.token,
    )
    .await;
    assert_eq!(body["count"].as_u64(), Some(0));

    approve_entry(&server.router, &moderator.token, entry_id).await;

    let (_, body) = get_authed(
        &server.router,
        "/api/pulse/entries/bookmarks",
        &reader.token,
    )
    .await;
    assert_eq!(body["count"].as_u64(), Some(1));
    assert_eq!(body["results"][0]["id"].as_i64(), Some(entry_id));

    // A bookmark for a nonexistent entry is still a 404.
    let (status, _) = request(
        &server.router,
        Method::PUT,
        "/api/pulse/entries/99999/bookmark",
        Some(&reader.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_bookmarking_skips_unknown_and_duplicate_ids() {
    let server = setup_test_server().await;
    let publisher = register_user(&server, "Pub", &format!("pub3@{TRUSTED_DOMAIN}"), false).await;
    let pending_submitter = register_user(&server, "Sub", "sub3@example.com", false).await;
    let reader = register_user(&server, "Reader", "reader3@example.com", false).await;
    let moderator = register_user(&server, "Mod", "mod3@example.com", true).await;

    let approved = submit_entry(&server.router, &publisher.token, "Approved", json!({})).await;
    let pending = submit_entry(&server.router, &pending_submitter.token, "Pending", json!({})).await;
    let approved_id = approved["id"].as_i64().expect("id");
    let pending_id = pending["id"].as_i64().expect("id");

    // Pre-bookmark the approved entry so the bulk call sees a duplicate.
    let (status, _) = request(
        &server.router,
        Method::PUT,
        &format!("/api/pulse/entries/{approved_id}/bookmark"),
        Some(&reader.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Duplicate, pending, nonexistent, and malformed ids in one batch:
    // only the unknown and malformed ones are dropped.
    let (status, _) = request(
        &server.router,
        Method::POST,
        &format!("/api/pulse/entries/bookmarks?ids={approved_id},{pending_id},99999,oops"),
        Some(&reader.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    approve_entry(&server.router, &moderator.token, pending_id).await;

    let (status, body) = get_authed(
        &server.router,
        "/api/pulse/entries/bookmarks",
        &reader.token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(2));
    let ids: Vec<i64> = body["results"]
        .as_array()
        .expect("results")
        .iter()
        .filter_map(|e| e["id"].as_i64())
        .collect();
    assert!(ids.contains(&approved_id) && ids.contains(&pending_id));
}

#[tokio::test]
async fn bookmarked_list_is_most_recent_first() {
    let server = setup_test_server().await;
    let publisher = register_user(&server, "Pub", &format!("pub4@{TRUSTED_DOMAIN}"), false).await;
    let reader = register_user(&server, "Reader", "reader4@example.com", false).await;

    let first = submit_entry(&server.router, &publisher.token, "First fav", json!({})).await;
    let second = submit_entry(&server.router, &publisher.token, "Second fav", json!({})).await;
    let first_id = first["id"].as_i64().expect("id");
    let second_id = second["id"].as_i64().expect("id");

    for id in [first_id, second_id] {
        let (status, _) = request(
            &server.router,
            Method::PUT,
            &format!("/api/pulse/entries/{id}/bookmark"),
            Some(&reader.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    assert_eq!(
        bookmarked_ids(&server.router, &reader.token).await,
        vec![second_id, first_id]
    );

    // Re-toggling off and on makes the first entry the newest bookmark.
    let path = format!("/api/pulse/entries/{first_id}/bookmark");
    for _ in 0..2 {
        let (status, _) =
            request(&server.router, Method::PUT, &path, Some(&reader.token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    assert_eq!(
        bookmarked_ids(&server.router, &reader.token).await,
        vec![first_id, second_id]
    );
}

async fn bookmarked_ids(router: &axum::Router, token: &str) -> Vec<i64> {
    let (status, body) = get_authed(router, "/api/pulse/entries/bookmarks", token).await;
    assert_eq!(status, StatusCode::OK);
    body["results"]
        .as_array()
        .expect("results")
        .iter()
        .filter_map(|e| e["id"].as_i64())
        .collect()
}
