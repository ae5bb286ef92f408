//! Event API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{EventCreate, EventQuery, EventUpdate, EventWithAvailability, Role};
use shared::response::{CreatedResponse, MessageResponse};
use shared::util::{day_end_millis, day_start_millis, now_millis};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::event::{self, EventFilter, NewEvent};
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::{
    MAX_CATEGORY_LEN, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, MAX_VENUE_LEN, require,
    validate_capacity, validate_optional_text, validate_required_text,
};
use crate::utils::{ApiJson, ApiPath, ApiQuery};

/// GET /api/events - events matching the query filters, earliest first
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> AppResult<Json<Vec<EventWithAvailability>>> {
    let filter = to_filter(query, now_millis())?;
    let events = event::list(&state.pool, &filter).await?;
    Ok(Json(events))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<EventWithAvailability>> {
    let row = event::find_with_availability(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound))?;
    Ok(Json(row))
}

/// POST /api/events
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiJson(payload): ApiJson<EventCreate>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let organizer_id = resolve_organizer(&state, &current_user, payload.organizer_id).await?;

    let name = require(payload.name, "name")?;
    let venue = require(payload.venue, "venue")?;
    let date_time = require(payload.date_time, "date_time")?;
    let category = require(payload.category, "category")?;
    let capacity = require(payload.capacity, "capacity")?;

    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    validate_required_text(&venue, "venue", MAX_VENUE_LEN)?;
    validate_required_text(&category, "category", MAX_CATEGORY_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_path, "image_path", MAX_URL_LEN)?;
    validate_capacity(capacity)?;

    let created = event::create(
        &state.pool,
        NewEvent {
            organizer_id,
            name: name.trim().to_string(),
            description: payload.description,
            venue: venue.trim().to_string(),
            date_time,
            category: category.trim().to_string(),
            capacity,
            image_path: payload.image_path,
        },
    )
    .await?;

    tracing::info!(
        event_id = created.id,
        organizer_id,
        created_by = current_user.id,
        capacity,
        "Event created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(created.id, "Event created successfully")),
    ))
}

/// PUT /api/events/{id} - overwrite the supplied fields only
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<EventUpdate>,
) -> AppResult<Json<MessageResponse>> {
    if patch.is_empty() {
        return Err(AppError::new(ErrorCode::NoFieldsToUpdate));
    }
    validate_patch(&patch)?;

    ensure_can_manage(&state, &current_user, id).await?;
    state.capacity.update_event(id, &patch).await?;

    Ok(Json(MessageResponse::new("Event updated successfully")))
}

/// DELETE /api/events/{id} - bookings are removed with the event
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    ensure_can_manage(&state, &current_user, id).await?;
    state.capacity.cancel_event(id).await?;

    Ok(Json(MessageResponse::new("Event cancelled successfully")))
}

/// Organizers create for themselves; an admin may name any ORGANIZER or
/// ADMIN account
async fn resolve_organizer(
    state: &ServerState,
    current_user: &CurrentUser,
    requested: Option<i64>,
) -> AppResult<i64> {
    match requested {
        None => Ok(current_user.id),
        Some(id) if id == current_user.id => Ok(id),
        Some(id) if current_user.is_admin() => {
            let owner = user::find_by_id(&state.pool, id).await?;
            match owner {
                Some(u) if u.role != Role::Attendee => Ok(id),
                _ => Err(AppError::validation(
                    "organizer_id must reference an ORGANIZER or ADMIN user",
                )
                .with_detail("organizer_id", id)),
            }
        }
        Some(id) => {
            security_log!(
                "WARN",
                "foreign_organizer_id",
                user_id = current_user.id,
                organizer_id = id
            );
            Err(AppError::permission_denied(
                "Organizers can only create their own events",
            ))
        }
    }
}

/// The event must exist and belong to the caller, unless the caller is an
/// admin
async fn ensure_can_manage(
    state: &ServerState,
    current_user: &CurrentUser,
    event_id: i64,
) -> AppResult<()> {
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
    Ok(())
}

fn validate_patch(patch: &EventUpdate) -> AppResult<()> {
    if let Some(name) = &patch.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(venue) = &patch.venue {
        validate_required_text(venue, "venue", MAX_VENUE_LEN)?;
    }
    if let Some(category) = &patch.category {
        validate_required_text(category, "category", MAX_CATEGORY_LEN)?;
    }
    if let Some(description) = &patch.description {
        validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
    }
    if let Some(image_path) = &patch.image_path {
        validate_optional_text(image_path, "image_path", MAX_URL_LEN)?;
    }
    if let Some(capacity) = patch.capacity {
        validate_capacity(capacity)?;
    }
    Ok(())
}

/// Turn the raw query string into repository filters
///
/// Empty values count as absent. `startDate` / `endDate` are inclusive UTC
/// calendar days.
fn to_filter(query: EventQuery, now: i64) -> AppResult<EventFilter> {
    fn present(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    let organizer_id = present(query.organizer_id)
        .map(|raw| {
            raw.parse::<i64>().map_err(|_| {
                AppError::with_message(ErrorCode::InvalidFormat, "organizer_id must be an integer")
            })
        })
        .transpose()?;

    let starts_from = present(query.start_date)
        .map(|raw| {
            day_start_millis(&raw).ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidFormat, "startDate must be YYYY-MM-DD")
            })
        })
        .transpose()?;

    let starts_until = present(query.end_date)
        .map(|raw| {
            day_end_millis(&raw).ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidFormat, "endDate must be YYYY-MM-DD")
            })
        })
        .transpose()?;

    let starts_after = present(query.upcoming)
        .filter(|v| v.eq_ignore_ascii_case("true"))
        .map(|_| now);

    Ok(EventFilter {
        category: present(query.category),
        organizer_id,
        venue: present(query.venue),
        starts_from,
        starts_until,
        starts_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_800_000_000_000;

    #[test]
    fn test_empty_query_has_no_constraints() {
        let filter = to_filter(EventQuery::default(), NOW).unwrap();
        assert_eq!(filter, EventFilter::default());

        let blank = EventQuery {
            category: Some("".into()),
            organizer_id: Some("  ".into()),
            venue: Some("".into()),
            start_date: Some("".into()),
            end_date: Some("".into()),
            upcoming: Some("".into()),
        };
        assert_eq!(to_filter(blank, NOW).unwrap(), EventFilter::default());
    }

    #[test]
    fn test_full_query() {
        let query = EventQuery {
            category: Some("music".into()),
            organizer_id: Some("7".into()),
            venue: Some("hall".into()),
            start_date: Some("2030-01-01".into()),
            end_date: Some("2030-01-01".into()),
            upcoming: Some("true".into()),
        };
        let filter = to_filter(query, NOW).unwrap();
        assert_eq!(filter.category.as_deref(), Some("music"));
        assert_eq!(filter.organizer_id, Some(7));
        assert_eq!(filter.venue.as_deref(), Some("hall"));
        assert_eq!(filter.starts_from, Some(1_893_456_000_000));
        assert_eq!(filter.starts_until, Some(1_893_542_399_999));
        assert_eq!(filter.starts_after, Some(NOW));
    }

    #[test]
    fn test_upcoming_false_is_ignored() {
        let query = EventQuery {
            upcoming: Some("false".into()),
            ..Default::default()
        };
        assert_eq!(to_filter(query, NOW).unwrap().starts_after, None);
    }

    #[test]
    fn test_malformed_values_rejected() {
        let bad_id = EventQuery {
            organizer_id: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(to_filter(bad_id, NOW).unwrap_err().code, ErrorCode::InvalidFormat);

        let bad_date = EventQuery {
            start_date: Some("01/02/2030".into()),
            ..Default::default()
        };
        assert_eq!(to_filter(bad_date, NOW).unwrap_err().code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_patch_validation() {
        assert!(validate_patch(&EventUpdate {
            capacity: Some(0),
            ..Default::default()
        })
        .is_err());
        assert!(validate_patch(&EventUpdate {
            name: Some("  ".into()),
            ..Default::default()
        })
        .is_err());
        assert!(validate_patch(&EventUpdate {
            description: Some(Some("x".repeat(MAX_DESCRIPTION_LEN + 1))),
            ..Default::default()
        })
        .is_err());
        assert!(validate_patch(&EventUpdate {
            description: Some(None),
            image_path: Some(None),
            ..Default::default()
        })
        .is_ok());
        assert!(validate_patch(&EventUpdate {
            venue: Some("New Hall".into()),
            capacity: Some(10),
            ..Default::default()
        })
        .is_ok());
    }
}
