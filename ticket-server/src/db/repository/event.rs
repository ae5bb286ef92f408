//! Event Repository
//!
//! Seat counts are never stored: every read that needs them joins the
//! bookings table and sums `tickets_booked` on the spot.

use super::{RepoError, RepoResult};
use shared::models::{Event, EventWithAvailability};
use shared::util::now_millis;
use sqlx::SqlitePool;

const EVENT_COLUMNS: &str = "e.id, e.organizer_id, e.name, e.description, e.venue, e.date_time, e.category, e.capacity, e.image_path, e.created_at";

/// Projection shared by list and detail reads; callers append WHERE and
/// the `GROUP BY e.id` tail.
fn availability_select() -> String {
    format!(
        "SELECT {EVENT_COLUMNS}, \
         COALESCE(SUM(b.tickets_booked), 0) AS tickets_sold, \
         e.capacity - COALESCE(SUM(b.tickets_booked), 0) AS available_seats \
         FROM events e LEFT JOIN bookings b ON b.event_id = e.id"
    )
}

/// Validated event fields ready for insertion
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub organizer_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub venue: String,
    pub date_time: i64,
    pub category: String,
    pub capacity: i64,
    pub image_path: Option<String>,
}

/// Listing filters; `None` means "no constraint"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub category: Option<String>,
    pub organizer_id: Option<i64>,
    /// Case-insensitive substring of the venue
    pub venue: Option<String>,
    /// Inclusive lower bound on `date_time`
    pub starts_from: Option<i64>,
    /// Inclusive upper bound on `date_time`
    pub starts_until: Option<i64>,
    /// Exclusive lower bound on `date_time` (upcoming events only)
    pub starts_after: Option<i64>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Event>> {
    let event =
        sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(event)
}

pub async fn find_with_availability(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<EventWithAvailability>> {
    let row = sqlx::query_as::<_, EventWithAvailability>(&format!(
        "{} WHERE e.id = ? GROUP BY e.id",
        availability_select()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Events matching every supplied filter, earliest first
pub async fn list(pool: &SqlitePool, filter: &EventFilter) -> RepoResult<Vec<EventWithAvailability>> {
    let sql = format!(
        "{} WHERE (?1 IS NULL OR e.category = ?1) \
         AND (?2 IS NULL OR e.organizer_id = ?2) \
         AND (?3 IS NULL OR LOWER(e.venue) LIKE '%' || LOWER(?3) || '%' ESCAPE '\\') \
         AND (?4 IS NULL OR e.date_time >= ?4) \
         AND (?5 IS NULL OR e.date_time <= ?5) \
         AND (?6 IS NULL OR e.date_time > ?6) \
         GROUP BY e.id \
         ORDER BY e.date_time ASC, e.id ASC",
        availability_select()
    );

    let rows = sqlx::query_as::<_, EventWithAvailability>(&sql)
        .bind(filter.category.as_deref())
        .bind(filter.organizer_id)
        .bind(filter.venue.as_deref().map(escape_like))
        .bind(filter.starts_from)
        .bind(filter.starts_until)
        .bind(filter.starts_after)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: NewEvent) -> RepoResult<Event> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO events (organizer_id, name, description, venue, date_time, category, capacity, image_path, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.organizer_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.venue)
    .bind(data.date_time)
    .bind(&data.category)
    .bind(data.capacity)
    .bind(&data.image_path)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create event".into()))
}

/// Persist every mutable column of `event`, but only while its capacity
/// still covers the tickets already sold.
///
/// Returns `false` when the guard rejected the write (or the row vanished).
pub async fn update_if_capacity_covers_sold(pool: &SqlitePool, event: &Event) -> RepoResult<bool> {
    let result = sqlx::query(
        "UPDATE events SET name = ?1, description = ?2, venue = ?3, date_time = ?4, \
         category = ?5, capacity = ?6, image_path = ?7 \
         WHERE id = ?8 \
         AND ?6 >= (SELECT COALESCE(SUM(tickets_booked), 0) FROM bookings WHERE event_id = ?8)",
    )
    .bind(&event.name)
    .bind(&event.description)
    .bind(&event.venue)
    .bind(event.date_time)
    .bind(&event.category)
    .bind(event.capacity)
    .bind(&event.image_path)
    .bind(event.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete an event; its bookings go with it via `ON DELETE CASCADE`
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Escape LIKE wildcards so user input only matches literally
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
