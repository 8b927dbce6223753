use shared_types::{AppError, LifecycleEvent, NewLifecycleEvent};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const EVENT_COLUMNS: &str =
    "id, processo_id, kind, from_stage, to_stage, actor_role, occurred_at, detail";

/// Insert one lifecycle event.
pub async fn insert(
    pool: &Pool<Postgres>,
    event: &NewLifecycleEvent,
) -> Result<LifecycleEvent, AppError> {
    sqlx::query_as::<_, LifecycleEvent>(&format!(
        r#"
        INSERT INTO lifecycle_events
            (processo_id, kind, from_stage, to_stage, actor_role, occurred_at, detail)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {EVENT_COLUMNS}
        "#
    ))
    .bind(event.processo_id)
    .bind(event.kind.as_str())
    .bind(&event.from_stage)
    .bind(&event.to_stage)
    .bind(&event.actor_role)
    .bind(event.occurred_at)
    .bind(&event.detail)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Publish events best-effort: a failed insert is logged and never rolls
/// back the transition that produced it (at-least-once observability,
/// not case-of-record state).
pub async fn publish_best_effort(pool: &Pool<Postgres>, events: &[NewLifecycleEvent]) {
    for event in events {
        if let Err(e) = insert(pool, event).await {
            tracing::warn!(
                processo_id = %event.processo_id,
                kind = event.kind.as_str(),
                error = %e,
                "Failed to publish lifecycle event"
            );
        }
    }
}

/// Audit feed of a case, oldest first.
pub async fn list_by_case(
    pool: &Pool<Postgres>,
    processo_id: Uuid,
) -> Result<Vec<LifecycleEvent>, AppError> {
    sqlx::query_as::<_, LifecycleEvent>(&format!(
        r#"
        SELECT {EVENT_COLUMNS}
        FROM lifecycle_events
        WHERE processo_id = $1
        ORDER BY occurred_at ASC, id ASC
        "#
    ))
    .bind(processo_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
