use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, booking, event, health, invite, news, search, venue};
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/meta/min-app-version", get(health::min_app_version))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Venues
        .route("/api/v1/venues", post(venue::create_venue).get(venue::list_own_venues))
        .route("/api/v1/venues/search", post(search::search_venues))
        .route("/api/v1/venues/{id}", get(venue::get_venue).put(venue::update_venue).delete(venue::delete_venue))
        .route("/api/v1/venues/{id}/images", put(venue::update_venue_images))
        .route("/api/v1/venues/{id}/transfer", post(venue::transfer_venue))
        .route("/api/v1/venues/{id}/events", get(event::list_venue_events))
        .route("/api/v1/venues/{id}/news", post(news::create_news))

        // Venue claims
        .route("/api/v1/venues/{id}/claims", post(venue::create_claim))
        .route("/api/v1/claims", get(venue::list_claims))
        .route("/api/v1/claims/{id}/accept", post(venue::accept_claim))
        .route("/api/v1/claims/{id}/reject", post(venue::reject_claim))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_own_events))
        .route("/api/v1/events/search", post(search::search_events))
        .route("/api/v1/events/{id}", get(event::get_event).put(event::update_event))
        .route("/api/v1/events/{id}/images", put(event::update_event_images))
        .route("/api/v1/events/{id}/venue", post(event::change_venue))
        .route("/api/v1/events/{id}/request-confirmation", post(event::request_confirmation))
        .route("/api/v1/events/{id}/confirm", post(event::confirm_event))
        .route("/api/v1/events/{id}/reject", post(event::reject_event))
        .route("/api/v1/events/{id}/cancel", post(event::cancel_event))
        .route("/api/v1/events/{id}/report", post(event::report_event))

        // Bookings
        .route("/api/v1/events/{id}/book", post(booking::create_booking))
        .route("/api/v1/events/{id}/bookings", get(booking::list_event_bookings))
        .route("/api/v1/bookings", get(booking::list_own_bookings))
        .route("/api/v1/bookings/{id}", get(booking::get_booking))
        .route("/api/v1/bookings/{id}/cancel", post(booking::cancel_booking))
        .route("/api/v1/bookings/{id}/check-in", post(booking::check_in))

        // Invites
        .route("/api/v1/events/{id}/invites", post(invite::create_invite).get(invite::list_event_invites))
        .route("/api/v1/invites", get(invite::list_own_invites))
        .route("/api/v1/invites/{id}", get(invite::get_invite))
        .route("/api/v1/invites/{id}/accept", post(invite::accept_invite))
        .route("/api/v1/invites/{id}/decline", post(invite::decline_invite))

        // Open invites
        .route("/api/v1/events/{id}/open-invites", post(invite::create_open_invite).get(invite::list_event_open_invites))
        .route("/api/v1/open-invites/{id}", get(invite::get_open_invite))
        .route("/api/v1/open-invites/{id}/contacts", post(invite::add_contact))
        .route("/api/v1/open-invites/{id}/accept", post(invite::accept_open_invite))
        .route("/api/v1/open-invites/{id}/decline", post(invite::decline_open_invite))

        // News
        .route("/api/v1/news", get(news::news_feed))
        .route("/api/v1/news/{id}", delete(news::delete_news))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
