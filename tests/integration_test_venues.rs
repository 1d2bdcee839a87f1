mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;

fn venue_payload(private: bool) -> serde_json::Value {
    json!({
        "name": "Cellar",
        "private": private,
        "category": 3,
        "latitude": 48.21,
        "longitude": 16.36
    })
}

#[tokio::test]
async fn only_root_curates_the_public_directory() {
    let app = TestApp::new().await;
    let (user, _) = app.register("user").await;

    let (status, _) = app
        .request("POST", "/api/v1/venues", Some(&user), Some(venue_payload(false)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A private venue of one's own is fine.
    let (status, body) = app
        .request("POST", "/api/v1/venues", Some(&user), Some(venue_payload(true)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["private"], true);

    let root = app.login_root().await;
    let (status, _) = app
        .request("POST", "/api/v1/venues", Some(&root), Some(venue_payload(false)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn a_private_venue_is_shown_to_its_owner_and_root_only() {
    let app = TestApp::new().await;
    let (owner, _) = app.register("owner").await;
    let (other, _) = app.register("other").await;
    let root = app.login_root().await;

    let (_, venue) = app
        .request("POST", "/api/v1/venues", Some(&owner), Some(venue_payload(true)))
        .await;
    let uri = format!("/api/v1/venues/{}", venue["id"].as_str().unwrap());

    let (status, _) = app.request("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("GET", &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn updating_a_venue_leaves_position_and_privacy_alone() {
    let app = TestApp::new().await;
    let (owner, _) = app.register("owner").await;

    let (_, venue) = app
        .request("POST", "/api/v1/venues", Some(&owner), Some(venue_payload(true)))
        .await;
    let uri = format!("/api/v1/venues/{}", venue["id"].as_str().unwrap());

    let (status, updated) = app
        .request(
            "PUT",
            &uri,
            Some(&owner),
            Some(json!({
                "name": "Renamed cellar",
                "category": 4,
                "capacity": 40
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Renamed cellar");
    assert_eq!(updated["category"], 4);
    // The index keys never move.
    assert_eq!(updated["private"], true);
    assert_eq!(updated["position"]["latitude"], 48.21);
    assert_eq!(updated["position"]["longitude"], 16.36);
}

#[tokio::test]
async fn a_stranger_cannot_update_or_delete_a_venue() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let (stranger, _) = app.register("stranger").await;

    let (_, venue) = app
        .request("POST", "/api/v1/venues", Some(&root), Some(venue_payload(false)))
        .await;
    let uri = format!("/api/v1/venues/{}", venue["id"].as_str().unwrap());

    let (status, _) = app
        .request(
            "PUT",
            &uri,
            Some(&stranger),
            Some(json!({"name": "Mine now", "category": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("DELETE", &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("DELETE", &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn transfer_requires_an_existing_new_owner() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let (_, heir_id) = app.register("heir").await;

    let (_, venue) = app
        .request("POST", "/api/v1/venues", Some(&root), Some(venue_payload(false)))
        .await;
    let uri = format!("/api/v1/venues/{}/transfer", venue["id"].as_str().unwrap());

    let (status, _) = app
        .request("POST", &uri, Some(&root), Some(json!({"new_owner_id": "no-such-user"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, transferred) = app
        .request("POST", &uri, Some(&root), Some(json!({"new_owner_id": heir_id})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transferred["owner_id"], *heir_id);
}

#[tokio::test]
async fn an_accepted_claim_transfers_ownership() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let (claimant, claimant_id) = app.register("claimant").await;

    let (_, venue) = app
        .request("POST", "/api/v1/venues", Some(&root), Some(venue_payload(false)))
        .await;
    let venue_id = venue["id"].as_str().unwrap();

    let (status, claim) = app
        .request("POST", &format!("/api/v1/venues/{}/claims", venue_id), Some(&claimant), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let claim_id = claim["id"].as_str().unwrap();

    // Claims are adjudicated by root.
    let (status, _) = app.request("GET", "/api/v1/claims", Some(&claimant), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, claims) = app.request("GET", "/api/v1/claims", Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claims.as_array().unwrap().len(), 1);

    let (status, venue) = app
        .request("POST", &format!("/api/v1/claims/{}/accept", claim_id), Some(&root), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(venue["owner_id"], *claimant_id);

    let (_, claims) = app.request("GET", "/api/v1/claims", Some(&root), None).await;
    assert_eq!(claims.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn the_owner_cannot_claim_their_own_venue() {
    let app = TestApp::new().await;
    let root = app.login_root().await;

    let (_, venue) = app
        .request("POST", "/api/v1/venues", Some(&root), Some(venue_payload(false)))
        .await;
    let venue_id = venue["id"].as_str().unwrap();

    let (status, _) = app
        .request("POST", &format!("/api/v1/venues/{}/claims", venue_id), Some(&root), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn news_is_validated_posted_and_expires_out_of_the_feed() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let (bystander, _) = app.register("bystander").await;

    let (_, venue) = app
        .request("POST", "/api/v1/venues", Some(&root), Some(venue_payload(false)))
        .await;
    let news_uri = format!("/api/v1/venues/{}/news", venue["id"].as_str().unwrap());

    let (status, body) = app
        .request(
            "POST",
            &news_uri,
            Some(&root),
            Some(json!({"text": "", "expires_at": (Utc::now() + Duration::days(1)).to_rfc3339()})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "news_text_empty");

    let (status, body) = app
        .request(
            "POST",
            &news_uri,
            Some(&root),
            Some(json!({"text": "Too old", "expires_at": (Utc::now() - Duration::hours(1)).to_rfc3339()})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "news_expiry_in_past");

    let (status, _) = app
        .request(
            "POST",
            &news_uri,
            Some(&bystander),
            Some(json!({"text": "Not mine", "expires_at": (Utc::now() + Duration::days(1)).to_rfc3339()})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, posted) = app
        .request(
            "POST",
            &news_uri,
            Some(&root),
            Some(json!({"text": "Open late on Friday", "expires_at": (Utc::now() + Duration::days(1)).to_rfc3339()})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, feed) = app.request("GET", "/api/v1/news", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = feed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "Open late on Friday");

    let news_id = posted["id"].as_str().unwrap();
    let (status, _) = app
        .request("DELETE", &format!("/api/v1/news/{}", news_id), Some(&bystander), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request("DELETE", &format!("/api/v1/news/{}", news_id), Some(&root), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, feed) = app.request("GET", "/api/v1/news", None, None).await;
    assert_eq!(feed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn health_and_version_endpoints_answer_without_auth() {
    let app = TestApp::new().await;

    let (status, _) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("GET", "/api/v1/meta/min-app-version", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["min_app_version"], 1.0);
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let app = TestApp::new().await;
    let (token, _) = app.register("leaver").await;

    let (status, _) = app.request("GET", "/api/v1/venues", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("POST", "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("GET", "/api/v1/venues", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_usernames_and_emails_are_rejected() {
    let app = TestApp::new().await;
    app.register("taken").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "taken",
                "email": "fresh@example.com",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "username": "fresh",
                "email": "taken@example.com",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn a_wrong_password_is_turned_away() {
    let app = TestApp::new().await;
    app.register("careful").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "careful", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
