//! Seat accounting
//!
//! Every write that can change how many seats an event has left (a new
//! booking, a capacity change, cancellation) runs inside that event's
//! critical section. The statements themselves are conditional as well,
//! so the database refuses an oversell even without the lock.

use std::sync::Arc;

use dashmap::DashMap;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Availability, Event, EventUpdate};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::db::repository::booking::{self, NewBooking};
use crate::db::repository::{event, user};

type LockMap = DashMap<i64, Arc<Mutex<()>>>;

/// Per-event async locks plus the capacity-checked writes
#[derive(Clone)]
pub struct CapacityService {
    pool: SqlitePool,
    locks: Arc<LockMap>,
}

/// Held critical section for one event
///
/// On drop the map entry is removed unless another task still holds or
/// waits on the same mutex, so the map only tracks events in flight.
struct EventLock {
    locks: Arc<LockMap>,
    event_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EventLock {
    fn drop(&mut self) {
        // release our reference first so only the map's remains when idle
        self.guard.take();
        self.locks
            .remove_if(&self.event_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl std::fmt::Debug for CapacityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapacityService")
            .field("locked_events", &self.locks.len())
            .finish_non_exhaustive()
    }
}

impl CapacityService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: Arc::new(DashMap::new()),
        }
    }

    async fn lock(&self, event_id: i64) -> EventLock {
        let mutex = self
            .locks
            .entry(event_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        EventLock {
            locks: Arc::clone(&self.locks),
            event_id,
            guard: Some(mutex.lock_owned().await),
        }
    }

    /// Capacity, tickets sold and seats left, derived from current rows
    pub async fn availability(&self, event_id: i64) -> AppResult<Availability> {
        booking::availability(&self.pool, event_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))
    }

    /// Book seats if enough are left; returns the new booking id
    ///
    /// | Failure | Error |
    /// |---------|-------|
    /// | `tickets_booked <= 0` | InvalidTicketCount |
    /// | negative or non-finite price | InvalidTotalPrice |
    /// | attendee missing | ValidationFailed |
    /// | event missing | EventNotFound |
    /// | not enough seats | CapacityExceeded |
    pub async fn book(&self, data: &NewBooking) -> AppResult<i64> {
        if data.tickets_booked <= 0 {
            return Err(AppError::new(ErrorCode::InvalidTicketCount)
                .with_detail("tickets_booked", data.tickets_booked));
        }
        if !data.total_price.is_finite() || data.total_price < 0.0 {
            return Err(AppError::new(ErrorCode::InvalidTotalPrice));
        }
        if user::find_by_id(&self.pool, data.attendee_id).await?.is_none() {
            return Err(AppError::validation("Attendee does not exist")
                .with_detail("attendee_id", data.attendee_id));
        }

        let _lock = self.lock(data.event_id).await;

        if let Some(id) = booking::insert_if_available(&self.pool, data).await? {
            tracing::info!(
                booking_id = id,
                event_id = data.event_id,
                attendee_id = data.attendee_id,
                tickets = data.tickets_booked,
                "Booking created"
            );
            return Ok(id);
        }

        // Nothing written: either the event is gone or the seats ran out
        match booking::availability(&self.pool, data.event_id).await? {
            None => Err(AppError::new(ErrorCode::EventNotFound)),
            Some(seats) => {
                tracing::debug!(
                    event_id = data.event_id,
                    available = seats.available_seats,
                    requested = data.tickets_booked,
                    "Booking rejected, not enough seats"
                );
                Err(AppError::capacity_exceeded(
                    seats.available_seats,
                    data.tickets_booked,
                ))
            }
        }
    }

    /// Merge `patch` into the stored event and persist it
    ///
    /// A capacity below the tickets already sold is refused with
    /// CapacityBelowSold; shrinking to exactly the sold count is allowed.
    pub async fn update_event(&self, event_id: i64, patch: &EventUpdate) -> AppResult<Event> {
        let _lock = self.lock(event_id).await;

        let mut stored = event::find_by_id(&self.pool, event_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;
        stored.apply_patch(patch);

        if event::update_if_capacity_covers_sold(&self.pool, &stored).await? {
            tracing::info!(event_id, capacity = stored.capacity, "Event updated");
            return Ok(stored);
        }

        let seats = self.availability(event_id).await?;
        Err(AppError::with_message(
            ErrorCode::CapacityBelowSold,
            format!(
                "Capacity cannot be lower than tickets already sold. Sold: {}, Requested capacity: {}",
                seats.tickets_sold, stored.capacity
            ),
        )
        .with_detail("tickets_sold", seats.tickets_sold)
        .with_detail("requested_capacity", stored.capacity))
    }

    /// Delete the event together with its bookings
    pub async fn cancel_event(&self, event_id: i64) -> AppResult<()> {
        let _lock = self.lock(event_id).await;
        if !event::delete(&self.pool, event_id).await? {
            return Err(AppError::new(ErrorCode::EventNotFound));
        }

        tracing::info!(event_id, "Event cancelled");
        Ok(())
    }
}
