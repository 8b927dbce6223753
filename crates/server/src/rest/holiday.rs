use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, CreateHolidayRequest, HolidayCalendarEntry, UpdateHolidayRequest};

use crate::auth::extractors::Actor;
use crate::error_convert::ValidateRequest;
use crate::rest::{case::parse_uuid, require_admin};

// ---------------------------------------------------------------------------
// GET /api/holidays — list the judicial holiday calendar
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/holidays",
    responses(
        (status = 200, description = "Holiday calendar entries, sorted by date", body = Vec<HolidayCalendarEntry>)
    ),
    tag = "holidays"
)]
pub async fn list_holidays(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<HolidayCalendarEntry>>, AppError> {
    let entries = crate::repo::holiday::list_all(&pool).await?;
    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// POST /api/holidays — create a holiday entry
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/holidays",
    request_body = CreateHolidayRequest,
    responses(
        (status = 201, description = "Holiday entry created", body = HolidayCalendarEntry),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Duplicate date", body = AppError)
    ),
    tag = "holidays"
)]
pub async fn create_holiday(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Json(body): Json<CreateHolidayRequest>,
) -> Result<(StatusCode, Json<HolidayCalendarEntry>), AppError> {
    require_admin(actor)?;
    body.validate_request()?;

    let entry = crate::repo::holiday::create(&pool, body).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// ---------------------------------------------------------------------------
// PATCH /api/holidays/{id} — partially update a holiday entry
// ---------------------------------------------------------------------------

#[utoipa::path(
    patch,
    path = "/api/holidays/{id}",
    request_body = UpdateHolidayRequest,
    params(
        ("id" = String, Path, description = "Holiday entry UUID")
    ),
    responses(
        (status = 200, description = "Holiday entry updated", body = HolidayCalendarEntry),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "holidays"
)]
pub async fn update_holiday(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(body): Json<UpdateHolidayRequest>,
) -> Result<Json<HolidayCalendarEntry>, AppError> {
    require_admin(actor)?;
    let uuid = parse_uuid(&id)?;

    let entry = crate::repo::holiday::update(&pool, uuid, body)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Holiday entry {id} not found")))?;
    Ok(Json(entry))
}

// ---------------------------------------------------------------------------
// DELETE /api/holidays/{id} — delete a holiday entry
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/holidays/{id}",
    params(
        ("id" = String, Path, description = "Holiday entry UUID")
    ),
    responses(
        (status = 204, description = "Holiday entry deleted"),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "holidays"
)]
pub async fn delete_holiday(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(actor)?;
    let uuid = parse_uuid(&id)?;

    if crate::repo::holiday::delete(&pool, uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Holiday entry {id} not found")))
    }
}
