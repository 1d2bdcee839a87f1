use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub device_token: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub device_token: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateVenueRequest {
    pub name: String,
    pub private: bool,
    pub category: u32,
    #[serde(default)]
    pub category_description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    /// Omitted means unlimited.
    pub capacity: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confirmation_required: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateVenueRequest {
    pub name: String,
    pub category: u32,
    #[serde(default)]
    pub category_description: String,
    #[serde(default)]
    pub address: String,
    pub capacity: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confirmation_required: bool,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Deserialize)]
pub struct UpdateImagesRequest {
    pub images: Vec<String>,
}

#[derive(Deserialize)]
pub struct TransferVenueRequest {
    pub new_owner_id: String,
}

#[derive(Deserialize)]
pub struct SearchVenuesRequest {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    /// Empty means every category.
    #[serde(default)]
    pub categories: Vec<u32>,
}

#[derive(Deserialize)]
pub struct SearchEventsRequest {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    #[serde(default)]
    pub categories: Vec<u32>,
    pub starts_after: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub venue_id: String,
    pub name: String,
    /// The venue's privacy is OR-ed in; a private venue never hosts a
    /// public event.
    pub private: bool,
    pub category: u32,
    #[serde(default)]
    pub category_description: String,
    /// Omitted means inherit from the venue.
    pub capacity: Option<u32>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub duration_secs: i64,
    #[serde(default)]
    pub notice_secs: i64,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateEventRequest {
    pub name: String,
    pub category: u32,
    #[serde(default)]
    pub category_description: String,
    pub capacity: Option<u32>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub duration_secs: i64,
    #[serde(default)]
    pub notice_secs: i64,
}

#[derive(Deserialize)]
pub struct ChangeVenueRequest {
    pub venue_id: String,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub note: String,
}

#[derive(Deserialize)]
pub struct CreateInviteRequest {
    pub guest_id: String,
}

#[derive(Deserialize)]
pub struct AddContactRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct DeclineOpenInviteRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateNewsRequest {
    pub text: String,
    pub expires_at: DateTime<Utc>,
}
