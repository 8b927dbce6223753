use shared_types::{AppError, CaseInstance};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const CASE_COLUMNS: &str = "id, numero, process_type, current_stage, stage_status, urgency, \
     letra, relator_id, adjunto_id, valor_contrato_cents, natureza_entidade, \
     fonte_financiamento, version, created_at, updated_at";

/// Insert a newly registered case with its distribution result.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    pool: &Pool<Postgres>,
    numero: &str,
    process_type: &str,
    current_stage: &str,
    urgency: &str,
    letra: &str,
    relator_id: Uuid,
    adjunto_id: Option<Uuid>,
    valor_contrato_cents: Option<i64>,
    natureza_entidade: Option<&str>,
    fonte_financiamento: Option<&str>,
) -> Result<CaseInstance, AppError> {
    sqlx::query_as::<_, CaseInstance>(&format!(
        r#"
        INSERT INTO processos
            (numero, process_type, current_stage, stage_status, urgency,
             letra, relator_id, adjunto_id, valor_contrato_cents,
             natureza_entidade, fonte_financiamento)
        VALUES ($1, $2, $3, 'in_progress', $4, $5, $6, $7, $8, $9, $10)
        RETURNING {CASE_COLUMNS}
        "#
    ))
    .bind(numero)
    .bind(process_type)
    .bind(current_stage)
    .bind(urgency)
    .bind(letra)
    .bind(relator_id)
    .bind(adjunto_id)
    .bind(valor_contrato_cents)
    .bind(natureza_entidade)
    .bind(fonte_financiamento)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Fetch a case by ID.
pub async fn find_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<CaseInstance>, AppError> {
    sqlx::query_as::<_, CaseInstance>(&format!(
        "SELECT {CASE_COLUMNS} FROM processos WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// List cases, newest first.
pub async fn list(
    pool: &Pool<Postgres>,
    limit: i64,
    offset: i64,
) -> Result<Vec<CaseInstance>, AppError> {
    sqlx::query_as::<_, CaseInstance>(&format!(
        "SELECT {CASE_COLUMNS} FROM processos ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Persist a transition outcome with an optimistic version check. Returns
/// None when the caller's version is stale (concurrent transition won).
pub async fn update_transition(
    pool: &Pool<Postgres>,
    case: &CaseInstance,
    expected_version: i32,
) -> Result<Option<CaseInstance>, AppError> {
    sqlx::query_as::<_, CaseInstance>(&format!(
        r#"
        UPDATE processos SET
            current_stage = $3,
            stage_status  = $4,
            version       = $5,
            updated_at    = NOW()
        WHERE id = $1 AND version = $2
        RETURNING {CASE_COLUMNS}
        "#
    ))
    .bind(case.id)
    .bind(expected_version)
    .bind(&case.current_stage)
    .bind(&case.stage_status)
    .bind(case.version)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
