//! Booking Model

use serde::{Deserialize, Serialize};

/// Booking entity (never updated once written)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub event_id: i64,
    pub attendee_id: i64,
    pub tickets_booked: i64,
    pub total_price: f64,
    pub booking_time: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingCreate {
    pub event_id: Option<i64>,
    /// Defaults to the caller; only an admin may book for someone else
    pub attendee_id: Option<i64>,
    pub tickets_booked: Option<i64>,
    pub total_price: Option<f64>,
}

/// Booking joined with the display fields of its event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingConfirmation {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub booking: Booking,
    pub event_name: String,
    pub venue: String,
    pub date_time: i64,
    pub category: String,
    /// Owner of the event, used for access checks
    #[serde(skip_serializing, default)]
    pub organizer_id: i64,
}

/// Aggregates over all bookings of one event
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingSummary {
    pub total_bookings: i64,
    pub total_tickets_sold: i64,
    pub total_revenue: f64,
}

/// Response of `GET /api/bookings/event/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBookings {
    pub bookings: Vec<Booking>,
    pub summary: BookingSummary,
}
