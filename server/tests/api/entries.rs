//! Entry lifecycle: submission, moderation, visibility, attribution.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::helpers::*;

#[tokio::test]
async fn anonymous_submission_is_forbidden() {
    let server = setup_test_server().await;

    let (status, _) = request(
        &server.router,
        Method::POST,
        "/api/pulse/entries",
        None,
        Some(json!({"title": "t", "content_url": "https://example.org"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn untrusted_submission_starts_pending_and_stays_private() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Alice", "alice@example.com", false).await;
    let moderator = register_user(&server, "Mod", "mod@example.com", true).await;

    submit_entry(&server.router, &user.token, "Hidden project", json!({})).await;

    let (status, body) = get(&server.router, "/api/pulse/entries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(0));

    // Moderators can pull the pending queue by state name.
    let (status, body) = get_authed(
        &server.router,
        "/api/pulse/entries?moderationstate=Pending",
        &moderator.token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(1));
    assert_eq!(body["results"][0]["title"], "Hidden project");

    // The state filter is ignored for anonymous callers.
    let (status, body) = get(&server.router, "/api/pulse/entries?moderationstate=Pending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(0));
}

#[tokio::test]
async fn trusted_domain_submission_is_auto_approved() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Staff", &format!("staff@{TRUSTED_DOMAIN}"), false).await;

    submit_entry(&server.router, &user.token, "Trusted project", json!({})).await;

    let (status, body) = get(&server.router, "/api/pulse/entries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(1));
    assert_eq!(body["results"][0]["title"], "Trusted project");
}

#[tokio::test]
async fn moderation_requires_the_moderator_role() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Alice", "alice@example.com", false).await;
    let moderator = register_user(&server, "Mod", "mod@example.com", true).await;

    let entry = submit_entry(&server.router, &user.token, "Pending one", json!({})).await;
    let entry_id = entry["id"].as_i64().expect("entry id");
    let approved = state_id(&server.router, "Approved").await;

    let path = format!("/api/pulse/entries/{entry_id}/moderate/{approved}");

    let (status, _) = request(&server.router, Method::PUT, &path, None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(&server.router, Method::PUT, &path, Some(&user.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The entry is unchanged after the rejected attempts.
    let (status, body) = get(&server.router, "/api/pulse/entries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(0));

    let (status, _) = request(
        &server.router,
        Method::PUT,
        &path,
        Some(&moderator.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&server.router, "/api/pulse/entries").await;
    assert_eq!(body["count"].as_u64(), Some(1));
}

#[tokio::test]
async fn creators_keep_submission_order_across_versions() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Sub", "sub@example.com", false).await;
    let moderator = register_user(&server, "Mod", "mod2@example.com", true).await;

    let entry = submit_entry(
        &server.router,
        &user.token,
        "Collab project",
        json!({"related_creators": [{"name": "Alan"}, {"name": "Pomax"}]}),
    )
    .await;
    let entry_id = entry["id"].as_i64().expect("entry id");
    approve_entry(&server.router, &moderator.token, entry_id).await;

    let (status, v1) = get(&server.router, &format!("/api/pulse/entries/{entry_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v1["creators"], json!(["Alan", "Pomax"]));
    assert_eq!(v1["related_creators"][0]["name"], "Alan");
    assert!(v1["related_creators"][0]["creator_id"].is_number());
    assert!(v1.get("creators_with_profiles").is_none());

    let (status, v2) = get(&server.router, &format!("/api/pulse/v2/entries/{entry_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let with_profiles = v2["creators_with_profiles"].as_array().expect("v2 creators");
    assert_eq!(with_profiles.len(), 2);
    assert_eq!(with_profiles[0]["name"], "Alan");
    assert_eq!(with_profiles[1]["name"], "Pomax");
    assert!(with_profiles[0]["profile_id"].is_number());
    assert!(v2.get("creators").is_none());
}

#[tokio::test]
async fn published_by_creator_is_not_attributed_twice() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Self Promoter", "self@example.com", false).await;
    let moderator = register_user(&server, "Mod", "mod3@example.com", true).await;

    let entry = submit_entry(
        &server.router,
        &user.token,
        "My own work",
        json!({
            "published_by_creator": true,
            "related_creators": [{"profile_id": user.profile_id}],
        }),
    )
    .await;
    let entry_id = entry["id"].as_i64().expect("entry id");
    approve_entry(&server.router, &moderator.token, entry_id).await;

    let (_, body) = get(&server.router, &format!("/api/pulse/entries/{entry_id}")).await;
    let creators = body["related_creators"].as_array().expect("creators");
    assert_eq!(creators.len(), 1);
    assert_eq!(creators[0]["creator_id"].as_i64(), Some(user.profile_id as i64));
}

#[tokio::test]
async fn comma_carrying_tags_are_split() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Tagger", &format!("tagger@{TRUSTED_DOMAIN}"), false).await;

    let submitted = submit_entry(
        &server.router,
        &user.token,
        "Tagged project",
        json!({"tags": ["open science", "rust,web"]}),
    )
    .await;
    let entry_id = submitted["id"].as_i64().expect("id");

    let (status, entry) = get(&server.router, &format!("/api/pulse/entries/{entry_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let tags = entry["tags"].as_array().expect("tags");
    let names: Vec<&str> = tags.iter().filter_map(|t| t.as_str()).collect();
    assert_eq!(names, vec!["open science", "rust", "web"]);

    let (status, body) = get(&server.router, "/api/pulse/tags").await;
    assert_eq!(status, StatusCode::OK);
    let all: Vec<&str> = body
        .as_array()
        .expect("tag list")
        .iter()
        .filter_map(|t| t.as_str())
        .collect();
    assert!(all.contains(&"rust"));
    assert!(all.contains(&"web"));
}

#[tokio::test]
async fn non_numeric_ids_are_silently_dropped() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Ids", &format!("ids@{TRUSTED_DOMAIN}"), false).await;

    let first = submit_entry(&server.router, &user.token, "First", json!({})).await;
    submit_entry(&server.router, &user.token, "Second", json!({})).await;
    let first_id = first["id"].as_i64().expect("id");

    let (status, body) = get(
        &server.router,
        &format!("/api/pulse/entries?ids={first_id},oops"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"].as_u64(), Some(1));
    assert_eq!(body["results"][0]["id"].as_i64(), Some(first_id));
}

#[tokio::test]
async fn overlong_titles_are_rejected() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Long", "long@example.com", false).await;

    let (status, body) = request(
        &server.router,
        Method::POST,
        "/api/pulse/entries",
        Some(&user.token),
        Some(json!({
            "title": "x".repeat(141),
            "content_url": "https://example.org",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["title"].is_array());
}

#[tokio::test]
async fn unknown_issue_names_fail_the_whole_submission() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Issues", "issues@example.com", false).await;

    let (status, _) = request(
        &server.router,
        Method::POST,
        "/api/pulse/entries",
        Some(&user.token),
        Some(json!({
            "title": "With issue",
            "content_url": "https://example.org",
            "issues": ["No Such Issue"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was committed.
    let moderator = register_user(&server, "Mod", "mod4@example.com", true).await;
    let (_, body) = get_authed(
        &server.router,
        "/api/pulse/entries?moderationstate=Pending",
        &moderator.token,
    )
    .await;
    assert_eq!(body["count"].as_u64(), Some(0));
}

#[tokio::test]
async fn featured_is_a_moderator_toggle() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Feat", &format!("feat@{TRUSTED_DOMAIN}"), false).await;
    let moderator = register_user(&server, "Mod", "mod5@example.com", true).await;

    let entry = submit_entry(&server.router, &user.token, "Featurable", json!({})).await;
    let entry_id = entry["id"].as_i64().expect("id");
    let path = format!("/api/pulse/entries/{entry_id}/feature");

    let (status, _) = request(&server.router, Method::PUT, &path, Some(&user.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &server.router,
        Method::PUT,
        &path,
        Some(&moderator.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&server.router, "/api/pulse/entries?featured=true").await;
    assert_eq!(body["count"].as_u64(), Some(1));
    assert_eq!(body["results"][0]["featured"], json!(true));

    // A second toggle clears the flag.
    let (status, _) = request(
        &server.router,
        Method::PUT,
        &path,
        Some(&moderator.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&server.router, "/api/pulse/entries?featured=true").await;
    assert_eq!(body["count"].as_u64(), Some(0));
}

#[tokio::test]
async fn moderation_states_are_seeded() {
    let server = setup_test_server().await;

    let (status, body) = get(&server.router, "/api/pulse/entries/moderation-states").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .expect("states")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Pending", "Approved"]);
}

#[tokio::test]
async fn internal_notes_never_appear_in_responses() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Notes", &format!("notes@{TRUSTED_DOMAIN}"), false).await;

    let entry = submit_entry(&server.router, &user.token, "Clean payload", json!({})).await;
    let entry_id = entry["id"].as_i64().expect("id");

    for prefix in ["/api/pulse", "/api/pulse/v2", "/api/pulse/v3"] {
        let (status, body) = get(&server.router, &format!("{prefix}/entries/{entry_id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("internal_notes").is_none());
    }
}

#[tokio::test]
async fn unknown_version_segments_are_not_found() {
    let server = setup_test_server().await;

    let (status, _) = get(&server.router, "/api/pulse/v4/entries").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_terms_all_have_to_match() {
    let server = setup_test_server().await;
    let user = register_user(&server, "Search", &format!("search@{TRUSTED_DOMAIN}"), false).await;

    submit_entry(
        &server.router,
        &user.token,
        "Rust web service",
        json!({"description": "a fast backend"}),
    )
    .await;
    submit_entry(
        &server.router,
        &user.token,
        "Python notebook",
        json!({"description": "a fast analysis"}),
    )
    .await;

    let (_, body) = get(&server.router, "/api/pulse/entries?search=fast").await;
    assert_eq!(body["count"].as_u64(), Some(2));

    let (_, body) = get(&server.router, "/api/pulse/entries?search=fast%20backend").await;
    assert_eq!(body["count"].as_u64(), Some(1));
    assert_eq!(body["results"][0]["title"], "Rust web service");
}
