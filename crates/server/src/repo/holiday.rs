use shared_types::{AppError, CreateHolidayRequest, HolidayCalendarEntry, UpdateHolidayRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const HOLIDAY_COLUMNS: &str = "id, date, descricao, considera_para_slas, created_at, updated_at";

/// List all holiday entries, sorted by date.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<HolidayCalendarEntry>, AppError> {
    sqlx::query_as::<_, HolidayCalendarEntry>(&format!(
        "SELECT {HOLIDAY_COLUMNS} FROM holiday_calendar ORDER BY date ASC"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Insert a new holiday entry.
pub async fn create(
    pool: &Pool<Postgres>,
    req: CreateHolidayRequest,
) -> Result<HolidayCalendarEntry, AppError> {
    sqlx::query_as::<_, HolidayCalendarEntry>(&format!(
        r#"
        INSERT INTO holiday_calendar (date, descricao, considera_para_slas)
        VALUES ($1, $2, $3)
        RETURNING {HOLIDAY_COLUMNS}
        "#
    ))
    .bind(req.date)
    .bind(&req.descricao)
    .bind(req.considera_para_slas)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Partially update a holiday entry.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: UpdateHolidayRequest,
) -> Result<Option<HolidayCalendarEntry>, AppError> {
    sqlx::query_as::<_, HolidayCalendarEntry>(&format!(
        r#"
        UPDATE holiday_calendar SET
            descricao           = COALESCE($2, descricao),
            considera_para_slas = COALESCE($3, considera_para_slas),
            updated_at          = NOW()
        WHERE id = $1
        RETURNING {HOLIDAY_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(req.descricao)
    .bind(req.considera_para_slas)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Delete a holiday entry. Returns true if a row was deleted.
pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM holiday_calendar WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
