use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::domain::models::capacity::Capacity;
use crate::domain::models::geo::Position;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Venue {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// Immutable after creation: it is a search-index key.
    pub private: bool,
    pub category: u32,
    pub category_description: String,
    /// Immutable after creation, same reason as `private`.
    pub position: Position,
    pub address: String,
    pub capacity: Capacity,
    pub description: String,
    pub confirmation_required: bool,
    pub images: Vec<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

pub struct NewVenueParams {
    pub owner_id: String,
    pub name: String,
    pub private: bool,
    pub category: u32,
    pub category_description: String,
    pub position: Position,
    pub address: String,
    pub capacity: Capacity,
    pub description: String,
    pub confirmation_required: bool,
    pub rating: f64,
    pub images: Vec<String>,
}

impl Venue {
    pub fn new(params: NewVenueParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: params.owner_id,
            name: params.name,
            private: params.private,
            category: params.category,
            category_description: params.category_description,
            position: params.position,
            address: params.address,
            // Inheriting makes no sense for a venue, it has nothing to
            // inherit from.
            capacity: if params.capacity.is_uninitialized() {
                Capacity::Infinite
            } else {
                params.capacity
            },
            description: params.description,
            confirmation_required: params.confirmation_required,
            images: params.images,
            rating: params.rating,
            created_at: Utc::now(),
        }
    }

    pub fn transfer(&mut self, new_owner_id: String) {
        self.owner_id = new_owner_id;
    }

    /// Privacy and position cannot be updated, they are search-index keys.
    /// Shrinking the capacity while events are organized here is the
    /// caller's concern.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        name: String,
        category: u32,
        category_description: String,
        address: String,
        capacity: Capacity,
        description: String,
        confirmation_required: bool,
        rating: f64,
    ) {
        self.name = name;
        self.category = category;
        self.category_description = category_description;
        self.address = address;
        if !capacity.is_uninitialized() {
            self.capacity = capacity;
        }
        self.description = description;
        self.confirmation_required = confirmation_required;
        self.rating = rating;
    }
}

impl FromRow<'_, SqliteRow> for Venue {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let images_json: String = row.try_get("images_json")?;
        let images = serde_json::from_str(&images_json).map_err(|e| sqlx::Error::ColumnDecode {
            index: "images_json".into(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            name: row.try_get("name")?,
            private: row.try_get("private")?,
            category: row.try_get::<i64, _>("category")? as u32,
            category_description: row.try_get("category_description")?,
            position: Position {
                latitude: row.try_get("latitude")?,
                longitude: row.try_get("longitude")?,
            },
            address: row.try_get("address")?,
            capacity: Capacity::from_db(row.try_get("capacity")?),
            description: row.try_get("description")?,
            confirmation_required: row.try_get("confirmation_required")?,
            images,
            rating: row.try_get("rating")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A pending transfer-of-ownership request. Accepting applies the transfer
/// and removes the claim; rejecting simply removes it.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VenueClaim {
    pub id: String,
    pub venue_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl VenueClaim {
    pub fn new(venue_id: String, user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
