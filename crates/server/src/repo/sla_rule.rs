use shared_types::{AppError, CreateSlaRuleRequest, SlaRule, UpdateSlaRuleRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const SLA_COLUMNS: &str =
    "id, process_type, urgency, prazo_dias, suspende_por_solicitacao, ativo, created_at, updated_at";

/// List all active SLA rules.
pub async fn list_active(pool: &Pool<Postgres>) -> Result<Vec<SlaRule>, AppError> {
    sqlx::query_as::<_, SlaRule>(&format!(
        "SELECT {SLA_COLUMNS} FROM sla_rules WHERE ativo = TRUE ORDER BY process_type, urgency"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// List all SLA rules, active or not.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<SlaRule>, AppError> {
    sqlx::query_as::<_, SlaRule>(&format!(
        "SELECT {SLA_COLUMNS} FROM sla_rules ORDER BY process_type, urgency, created_at"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Insert a new SLA rule. Returns the created row.
pub async fn create(
    pool: &Pool<Postgres>,
    req: CreateSlaRuleRequest,
) -> Result<SlaRule, AppError> {
    sqlx::query_as::<_, SlaRule>(&format!(
        r#"
        INSERT INTO sla_rules (process_type, urgency, prazo_dias, suspende_por_solicitacao)
        VALUES ($1, $2, $3, $4)
        RETURNING {SLA_COLUMNS}
        "#
    ))
    .bind(req.process_type.as_str())
    .bind(req.urgency.as_str())
    .bind(req.prazo_dias)
    .bind(req.suspende_por_solicitacao)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Partially update an SLA rule using the COALESCE pattern.
/// Returns the updated row, or None if the rule was not found.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: UpdateSlaRuleRequest,
) -> Result<Option<SlaRule>, AppError> {
    sqlx::query_as::<_, SlaRule>(&format!(
        r#"
        UPDATE sla_rules SET
            prazo_dias               = COALESCE($2, prazo_dias),
            suspende_por_solicitacao = COALESCE($3, suspende_por_solicitacao),
            updated_at               = NOW()
        WHERE id = $1
        RETURNING {SLA_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(req.prazo_dias)
    .bind(req.suspende_por_solicitacao)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Soft-delete an SLA rule by setting ativo=false.
/// Returns true if a row was updated, false if not found.
pub async fn soft_delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE sla_rules SET ativo = FALSE, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
