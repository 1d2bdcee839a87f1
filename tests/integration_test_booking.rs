mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use events_backend::domain::models::booking::Booking;
use events_backend::error::{AppError, DomainError};
use serde_json::json;

async fn create_public_venue(app: &TestApp, root: &str, capacity: Option<u32>) -> String {
    let mut payload = json!({
        "name": "Hall",
        "private": false,
        "category": 1,
        "latitude": 48.2,
        "longitude": 16.37
    });
    if let Some(c) = capacity {
        payload["capacity"] = json!(c);
    }

    let (status, body) = app.request("POST", "/api/v1/venues", Some(root), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", body);
    body["id"].as_str().unwrap().to_string()
}

async fn create_event(app: &TestApp, token: &str, venue_id: &str) -> String {
    let payload = json!({
        "venue_id": venue_id,
        "name": "Concert",
        "private": false,
        "category": 1,
        "start_time": (Utc::now() + Duration::days(7)).to_rfc3339()
    });

    let (status, body) = app.request("POST", "/api/v1/events", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", body);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn event_inherits_venue_capacity_and_refuses_the_overflow_guest() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let venue_id = create_public_venue(&app, &root, Some(10)).await;

    let (organizer, _) = app.register("organizer").await;
    let event_id = create_event(&app, &organizer, &venue_id).await;

    for i in 0..10 {
        let (guest, _) = app.register(&format!("guest{}", i)).await;
        let (status, body) = app
            .request("POST", &format!("/api/v1/events/{}/book", event_id), Some(&guest), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::CREATED, "guest {} refused: {:?}", i, body);
    }

    let (late, _) = app.register("late_guest").await;
    let (status, body) = app
        .request("POST", &format!("/api/v1/events/{}/book", event_id), Some(&late), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "event_not_bookable");

    let (_, event) = app
        .request("GET", &format!("/api/v1/events/{}", event_id), None, None)
        .await;
    assert_eq!(event["bookings_count"], 10);
}

#[tokio::test]
async fn a_guest_cannot_book_the_same_event_twice() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let venue_id = create_public_venue(&app, &root, None).await;

    let (organizer, _) = app.register("organizer").await;
    let event_id = create_event(&app, &organizer, &venue_id).await;

    let (guest, _) = app.register("guest").await;
    let uri = format!("/api/v1/events/{}/book", event_id);

    let (status, _) = app.request("POST", &uri, Some(&guest), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.request("POST", &uri, Some(&guest), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "booking_already_made");
}

#[tokio::test]
async fn cancellation_returns_the_seat_to_the_pool() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let venue_id = create_public_venue(&app, &root, Some(1)).await;

    let (organizer, _) = app.register("organizer").await;
    let event_id = create_event(&app, &organizer, &venue_id).await;
    let book_uri = format!("/api/v1/events/{}/book", event_id);

    let (first, _) = app.register("first").await;
    let (second, _) = app.register("second").await;

    let (status, booking) = app.request("POST", &book_uri, Some(&first), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, body) = app.request("POST", &book_uri, Some(&second), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT, "{:?}", body);

    let (status, _) = app
        .request("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&first), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request("POST", &book_uri, Some(&second), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn racing_bookings_cannot_take_the_last_seat_twice() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let venue_id = create_public_venue(&app, &root, Some(1)).await;

    let (organizer, _) = app.register("organizer").await;
    let event_id = create_event(&app, &organizer, &venue_id).await;

    let (_, alice_id) = app.register("alice").await;
    let (_, bob_id) = app.register("bob").await;

    // Two requests that both passed the bookability check on the same
    // stale read of the event. The guarded ledger write admits only one.
    let first = Booking::new(event_id.clone(), alice_id.clone(), alice_id, None, String::new());
    let second = Booking::new(event_id.clone(), bob_id.clone(), bob_id, None, String::new());

    app.state.booking_repo.create_with_event(&first, &event_id).await.unwrap();
    let err = app.state.booking_repo.create_with_event(&second, &event_id).await.unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::EventNotBookable)));

    let bookings = app.state.booking_repo.list_by_event(&event_id).await.unwrap();
    assert_eq!(bookings.len(), 1);

    let (_, event) = app
        .request("GET", &format!("/api/v1/events/{}", event_id), None, None)
        .await;
    assert_eq!(event["bookings_count"], 1);
}

#[tokio::test]
async fn booking_is_refused_inside_the_notice_window() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let venue_id = create_public_venue(&app, &root, None).await;

    let (organizer, _) = app.register("organizer").await;
    // Starts in one hour, requires two hours notice: the window is open.
    let payload = json!({
        "venue_id": venue_id,
        "name": "Last minute",
        "private": false,
        "category": 1,
        "start_time": (Utc::now() + Duration::hours(1)).to_rfc3339(),
        "notice_secs": 7200
    });
    let (status, event) = app.request("POST", "/api/v1/events", Some(&organizer), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = event["id"].as_str().unwrap();

    let (guest, _) = app.register("guest").await;
    let (status, body) = app
        .request("POST", &format!("/api/v1/events/{}/book", event_id), Some(&guest), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "event_not_bookable");
}

#[tokio::test]
async fn check_in_is_for_the_organizer_and_idempotent() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let venue_id = create_public_venue(&app, &root, None).await;

    let (organizer, _) = app.register("organizer").await;
    let event_id = create_event(&app, &organizer, &venue_id).await;

    let (guest, _) = app.register("guest").await;
    let (status, booking) = app
        .request("POST", &format!("/api/v1/events/{}/book", event_id), Some(&guest), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let check_in_uri = format!("/api/v1/bookings/{}/check-in", booking["id"].as_str().unwrap());

    // The guest cannot check themselves in.
    let (status, _) = app.request("POST", &check_in_uri, Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, checked) = app.request("POST", &check_in_uri, Some(&organizer), None).await;
    assert_eq!(status, StatusCode::OK);
    let first_stamp = checked["checked_in_at"].as_str().unwrap().to_string();

    // Scanning twice keeps the first timestamp.
    let (status, repeated) = app.request("POST", &check_in_uri, Some(&organizer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(repeated["checked_in_at"].as_str().unwrap(), first_stamp);
}

#[tokio::test]
async fn note_travels_with_the_booking() {
    let app = TestApp::new().await;
    let root = app.login_root().await;
    let venue_id = create_public_venue(&app, &root, None).await;

    let (organizer, _) = app.register("organizer").await;
    let event_id = create_event(&app, &organizer, &venue_id).await;

    let (guest, _) = app.register("guest").await;
    let (status, booking) = app
        .request(
            "POST",
            &format!("/api/v1/events/{}/book", event_id),
            Some(&guest),
            Some(json!({"note": "Wheelchair access please"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["note"], "Wheelchair access please");

    let (status, fetched) = app
        .request(
            "GET",
            &format!("/api/v1/bookings/{}", booking["id"].as_str().unwrap()),
            Some(&organizer),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["note"], "Wheelchair access please");
}
