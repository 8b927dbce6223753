use chrono::NaiveDate;
use shared_types::{AppError, DeadlineFeedRow, StageDeadline};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const DEADLINE_COLUMNS: &str = "id, processo_id, stage, start_date, prazo_dias, due_date, \
     suspensions, closed_at, created_at, updated_at";

/// Open a deadline for a stage of a case.
pub async fn insert(
    pool: &Pool<Postgres>,
    processo_id: Uuid,
    stage: &str,
    start_date: NaiveDate,
    prazo_dias: i32,
    due_date: NaiveDate,
) -> Result<StageDeadline, AppError> {
    sqlx::query_as::<_, StageDeadline>(&format!(
        r#"
        INSERT INTO stage_deadlines
            (processo_id, stage, start_date, prazo_dias, due_date, suspensions)
        VALUES ($1, $2, $3, $4, $5, '[]'::jsonb)
        RETURNING {DEADLINE_COLUMNS}
        "#
    ))
    .bind(processo_id)
    .bind(stage)
    .bind(start_date)
    .bind(prazo_dias)
    .bind(due_date)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// The open (not yet closed) deadline of a case — at most one exists.
pub async fn find_open_by_case(
    pool: &Pool<Postgres>,
    processo_id: Uuid,
) -> Result<Option<StageDeadline>, AppError> {
    sqlx::query_as::<_, StageDeadline>(&format!(
        r#"
        SELECT {DEADLINE_COLUMNS}
        FROM stage_deadlines
        WHERE processo_id = $1 AND closed_at IS NULL
        ORDER BY created_at DESC
        LIMIT 1
        "#
    ))
    .bind(processo_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Full deadline history of a case, oldest first.
pub async fn list_by_case(
    pool: &Pool<Postgres>,
    processo_id: Uuid,
) -> Result<Vec<StageDeadline>, AppError> {
    sqlx::query_as::<_, StageDeadline>(&format!(
        r#"
        SELECT {DEADLINE_COLUMNS}
        FROM stage_deadlines
        WHERE processo_id = $1
        ORDER BY created_at ASC
        "#
    ))
    .bind(processo_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Write back an engine-mutated deadline (suspend/resume/close).
pub async fn update(
    pool: &Pool<Postgres>,
    deadline: &StageDeadline,
) -> Result<StageDeadline, AppError> {
    sqlx::query_as::<_, StageDeadline>(&format!(
        r#"
        UPDATE stage_deadlines SET
            due_date    = $2,
            suspensions = $3,
            closed_at   = $4,
            updated_at  = NOW()
        WHERE id = $1
        RETURNING {DEADLINE_COLUMNS}
        "#
    ))
    .bind(deadline.id)
    .bind(deadline.due_date)
    .bind(&deadline.suspensions)
    .bind(deadline.closed_at)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Open deadlines of non-archived cases, for the dashboard feeds.
pub async fn feed_open(pool: &Pool<Postgres>) -> Result<Vec<DeadlineFeedRow>, AppError> {
    sqlx::query_as::<_, DeadlineFeedRow>(
        r#"
        SELECT d.processo_id, p.numero, p.process_type, d.stage,
               d.due_date, d.prazo_dias, d.suspensions
        FROM stage_deadlines d
        JOIN processos p ON p.id = d.processo_id
        WHERE d.closed_at IS NULL AND p.stage_status <> 'archived'
        ORDER BY d.due_date ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
