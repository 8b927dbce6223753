use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use sqlx::{Pool, Postgres};

use shared_types::{
    AppError, DeadlineFeedEntry, DeadlineStatus, StageDeadline, StageDeadlineResponse,
};

use crate::engine::calendar::BusinessCalendar;
use crate::engine::deadline;
use crate::rest::case::parse_uuid;

fn to_response(
    row: StageDeadline,
    calendar: &BusinessCalendar,
    warning_threshold_pct: u32,
    today: chrono::NaiveDate,
) -> StageDeadlineResponse {
    let status = deadline::status(&row, calendar, warning_threshold_pct, today);
    let remaining = deadline::remaining_business_days(&row, calendar, today);
    StageDeadlineResponse {
        id: row.id.to_string(),
        processo_id: row.processo_id.to_string(),
        stage: row.stage,
        start_date: row.start_date,
        prazo_dias: row.prazo_dias,
        due_date: row.due_date,
        suspensions: deadline::parse_suspensions(&row.suspensions),
        status,
        remaining_business_days: remaining,
        closed: row.closed_at.is_some(),
    }
}

// ---------------------------------------------------------------------------
// GET /api/processos/{id}/prazos — deadline history of a case
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/processos/{id}/prazos",
    params(
        ("id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Stage deadlines with derived status", body = Vec<StageDeadlineResponse>),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "prazos"
)]
pub async fn list_case_deadlines(
    State(pool): State<Pool<Postgres>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<StageDeadlineResponse>>, AppError> {
    let uuid = parse_uuid(&id)?;
    crate::repo::case::find_by_id(&pool, uuid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;

    let rows = crate::repo::deadline::list_by_case(&pool, uuid).await?;
    let holidays = crate::repo::holiday::list_all(&pool).await?;
    let calendar = BusinessCalendar::new(&holidays);
    let tuning = crate::config::engine_tuning();
    let today = Utc::now().date_naive();

    Ok(Json(
        rows.into_iter()
            .map(|row| to_response(row, &calendar, tuning.warning_threshold_pct, today))
            .collect(),
    ))
}

// ---------------------------------------------------------------------------
// Dashboard feeds
// ---------------------------------------------------------------------------

async fn feed_with_status(
    pool: &Pool<Postgres>,
    wanted: DeadlineStatus,
) -> Result<Vec<DeadlineFeedEntry>, AppError> {
    let rows = crate::repo::deadline::feed_open(pool).await?;
    let holidays = crate::repo::holiday::list_all(pool).await?;
    let calendar = BusinessCalendar::new(&holidays);
    let tuning = crate::config::engine_tuning();
    let today = Utc::now().date_naive();

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let status = deadline::status_parts(
                row.due_date,
                row.prazo_dias,
                &row.suspensions,
                &calendar,
                tuning.warning_threshold_pct,
                today,
            );
            (status == wanted).then(|| DeadlineFeedEntry {
                processo_id: row.processo_id.to_string(),
                numero: row.numero,
                process_type: row.process_type,
                stage: row.stage,
                due_date: row.due_date,
                status,
                remaining_business_days: calendar.business_days_between(today, row.due_date),
            })
        })
        .collect())
}

#[utoipa::path(
    get,
    path = "/api/prazos/approaching",
    responses(
        (status = 200, description = "Open deadlines in the warning band", body = Vec<DeadlineFeedEntry>)
    ),
    tag = "prazos"
)]
pub async fn list_approaching(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<DeadlineFeedEntry>>, AppError> {
    Ok(Json(feed_with_status(&pool, DeadlineStatus::Warning).await?))
}

#[utoipa::path(
    get,
    path = "/api/prazos/overdue",
    responses(
        (status = 200, description = "Open deadlines past their due date", body = Vec<DeadlineFeedEntry>)
    ),
    tag = "prazos"
)]
pub async fn list_overdue(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<DeadlineFeedEntry>>, AppError> {
    Ok(Json(feed_with_status(&pool, DeadlineStatus::Overdue).await?))
}
