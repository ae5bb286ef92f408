//! Booking API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{BookingConfirmation, BookingCreate, EventBookings};
use shared::response::CreatedResponse;
use shared::util::now_millis;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::booking::{self, NewBooking};
use crate::db::repository::event;
use crate::security_log;
use crate::utils::validation::require;
use crate::utils::{ApiJson, ApiPath};

/// POST /api/bookings
///
/// `attendee_id` defaults to the caller; only an admin may book for
/// another user.
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiJson(payload): ApiJson<BookingCreate>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let event_id = require(payload.event_id, "event_id")?;
    let tickets_booked = require(payload.tickets_booked, "tickets_booked")?;
    let total_price = require(payload.total_price, "total_price")?;

    let attendee_id = match payload.attendee_id {
        None => current_user.id,
        Some(id) if id == current_user.id || current_user.is_admin() => id,
        Some(id) => {
            security_log!(
                "WARN",
                "foreign_attendee_id",
                user_id = current_user.id,
                attendee_id = id
            );
            return Err(AppError::permission_denied(
                "Attendees can only book tickets for themselves",
            ));
        }
    };

    let id = state
        .capacity
        .book(&NewBooking {
            event_id,
            attendee_id,
            tickets_booked,
            total_price,
            booking_time: now_millis(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(id, "Tickets booked successfully")),
    ))
}

/// GET /api/bookings/event/{event_id} - newest first, with totals
pub async fn list_by_event(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(event_id): ApiPath<i64>,
) -> AppResult<Json<EventBookings>> {
    let stored = event::find_by_id(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;

    if !current_user.is_admin() && stored.organizer_id != current_user.id {
        security_log!(
            "WARN",
            "not_event_owner",
            user_id = current_user.id,
            event_id = event_id
        );
        return Err(AppError::new(ErrorCode::NotResourceOwner));
    }

    let bookings = booking::find_by_event(&state.pool, event_id).await?;
    let summary = booking::summary_for_event(&state.pool, event_id).await?;

    Ok(Json(EventBookings { bookings, summary }))
}

/// GET /api/bookings/{id}
///
/// Visible to the attendee, the event's organizer and admins; anyone else
/// gets the same 404 as for a missing booking.
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<BookingConfirmation>> {
    let confirmation = booking::find_confirmation(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BookingNotFound))?;

    let allowed = current_user.is_admin()
        || confirmation.booking.attendee_id == current_user.id
        || confirmation.organizer_id == current_user.id;
    if !allowed {
        security_log!(
            "WARN",
            "booking_access_denied",
            user_id = current_user.id,
            booking_id = id
        );
        return Err(AppError::new(ErrorCode::BookingNotFound));
    }

    Ok(Json(confirmation))
}
