//! Event Model

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Event entity
///
/// `date_time` and `created_at` are Unix milliseconds (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    pub organizer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub venue: String,
    pub date_time: i64,
    pub category: String,
    pub capacity: i64,
    pub image_path: Option<String>,
    pub created_at: i64,
}

impl Event {
    /// Overwrite the fields present in `patch`, leaving the rest untouched
    ///
    /// Required text is stored trimmed; an explicit `null` clears
    /// `description` / `image_path`.
    pub fn apply_patch(&mut self, patch: &EventUpdate) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(venue) = &patch.venue {
            self.venue = venue.trim().to_string();
        }
        if let Some(date_time) = patch.date_time {
            self.date_time = date_time;
        }
        if let Some(category) = &patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(image_path) = &patch.image_path {
            self.image_path = image_path.clone();
        }
    }
}

/// Create event payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCreate {
    /// Defaults to the caller; only an admin may name someone else
    pub organizer_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub date_time: Option<i64>,
    pub category: Option<String>,
    pub capacity: Option<i64>,
    pub image_path: Option<String>,
}

/// Update event payload
///
/// `description` and `image_path` distinguish a missing key (`None`) from
/// an explicit `null` (`Some(None)`), which clears the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub venue: Option<String>,
    pub date_time: Option<i64>,
    pub category: Option<String>,
    pub capacity: Option<i64>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_path: Option<Option<String>>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.venue.is_none()
            && self.date_time.is_none()
            && self.category.is_none()
            && self.capacity.is_none()
            && self.image_path.is_none()
    }
}

/// Event with its derived seat counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EventWithAvailability {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub event: Event,
    pub tickets_sold: i64,
    pub available_seats: i64,
}

/// Seat accounting for a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Availability {
    pub capacity: i64,
    pub tickets_sold: i64,
    pub available_seats: i64,
}

/// Query string of `GET /api/events`
///
/// Everything arrives as text; empty values count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuery {
    pub category: Option<String>,
    pub organizer_id: Option<String>,
    pub venue: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub upcoming: Option<String>,
}
