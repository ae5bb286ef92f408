//! Booking Repository

use super::RepoResult;
use shared::models::{Availability, Booking, BookingConfirmation, BookingSummary};
use sqlx::SqlitePool;

const BOOKING_COLUMNS: &str =
    "b.id, b.event_id, b.attendee_id, b.tickets_booked, b.total_price, b.booking_time";

/// Booking fields ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub event_id: i64,
    pub attendee_id: i64,
    pub tickets_booked: i64,
    pub total_price: f64,
    pub booking_time: i64,
}

/// Capacity, tickets sold and seats left for one event; `None` if the
/// event does not exist
pub async fn availability(pool: &SqlitePool, event_id: i64) -> RepoResult<Option<Availability>> {
    let row = sqlx::query_as::<_, Availability>(
        "SELECT e.capacity, \
         COALESCE(SUM(b.tickets_booked), 0) AS tickets_sold, \
         e.capacity - COALESCE(SUM(b.tickets_booked), 0) AS available_seats \
         FROM events e LEFT JOIN bookings b ON b.event_id = e.id \
         WHERE e.id = ? GROUP BY e.id",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert the booking only if the event exists and still has at least
/// `tickets_booked` seats left, evaluated inside the single INSERT.
///
/// Returns the new id, or `None` when nothing was written.
pub async fn insert_if_available(pool: &SqlitePool, data: &NewBooking) -> RepoResult<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO bookings (event_id, attendee_id, tickets_booked, total_price, booking_time) \
         SELECT ?1, ?2, ?3, ?4, ?5 \
         WHERE EXISTS ( \
             SELECT 1 FROM events e WHERE e.id = ?1 \
             AND e.capacity - (SELECT COALESCE(SUM(tickets_booked), 0) FROM bookings WHERE event_id = ?1) >= ?3 \
         ) \
         RETURNING id",
    )
    .bind(data.event_id)
    .bind(data.attendee_id)
    .bind(data.tickets_booked)
    .bind(data.total_price)
    .bind(data.booking_time)
    .fetch_optional(pool)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
    let booking =
        sqlx::query_as::<_, Booking>(&format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(booking)
}

/// All bookings of an event, newest first
pub async fn find_by_event(pool: &SqlitePool, event_id: i64) -> RepoResult<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.event_id = ? ORDER BY b.booking_time DESC, b.id DESC"
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(bookings)
}

pub async fn summary_for_event(pool: &SqlitePool, event_id: i64) -> RepoResult<BookingSummary> {
    let summary = sqlx::query_as::<_, BookingSummary>(
        "SELECT COUNT(*) AS total_bookings, \
         COALESCE(SUM(tickets_booked), 0) AS total_tickets_sold, \
         CAST(COALESCE(SUM(total_price), 0) AS REAL) AS total_revenue \
         FROM bookings WHERE event_id = ?",
    )
    .bind(event_id)
    .fetch_one(pool)
    .await?;
    Ok(summary)
}

/// Booking joined with the display fields of its event
pub async fn find_confirmation(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<BookingConfirmation>> {
    let row = sqlx::query_as::<_, BookingConfirmation>(&format!(
        "SELECT {BOOKING_COLUMNS}, e.name AS event_name, e.venue, e.date_time, e.category, e.organizer_id \
         FROM bookings b JOIN events e ON e.id = b.event_id WHERE b.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
