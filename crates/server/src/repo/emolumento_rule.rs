use shared_types::{
    AppError, CreateEmolumentoRuleRequest, EmolumentoRule, UpdateEmolumentoRuleRequest,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const RULE_COLUMNS: &str =
    "id, process_type, formula, minimo_cents, maximo_pct, escaloes, ativo, created_at, updated_at";

/// The active fee rule for a process type.
pub async fn find_active_by_type(
    pool: &Pool<Postgres>,
    process_type: &str,
) -> Result<Option<EmolumentoRule>, AppError> {
    sqlx::query_as::<_, EmolumentoRule>(&format!(
        r#"
        SELECT {RULE_COLUMNS} FROM emolumento_rules
        WHERE process_type = $1 AND ativo = TRUE
        ORDER BY created_at DESC
        LIMIT 1
        "#
    ))
    .bind(process_type)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// List all fee rules.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<EmolumentoRule>, AppError> {
    sqlx::query_as::<_, EmolumentoRule>(&format!(
        "SELECT {RULE_COLUMNS} FROM emolumento_rules ORDER BY process_type, created_at"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Insert a new fee rule.
pub async fn create(
    pool: &Pool<Postgres>,
    req: CreateEmolumentoRuleRequest,
) -> Result<EmolumentoRule, AppError> {
    sqlx::query_as::<_, EmolumentoRule>(&format!(
        r#"
        INSERT INTO emolumento_rules (process_type, formula, minimo_cents, maximo_pct, escaloes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {RULE_COLUMNS}
        "#
    ))
    .bind(req.process_type.as_str())
    .bind(&req.formula)
    .bind(req.minimo_cents)
    .bind(req.maximo_pct)
    .bind(req.escaloes)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Partially update a fee rule.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: UpdateEmolumentoRuleRequest,
) -> Result<Option<EmolumentoRule>, AppError> {
    sqlx::query_as::<_, EmolumentoRule>(&format!(
        r#"
        UPDATE emolumento_rules SET
            formula      = COALESCE($2, formula),
            minimo_cents = COALESCE($3, minimo_cents),
            maximo_pct   = COALESCE($4, maximo_pct),
            escaloes     = COALESCE($5, escaloes),
            updated_at   = NOW()
        WHERE id = $1
        RETURNING {RULE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(req.formula)
    .bind(req.minimo_cents)
    .bind(req.maximo_pct)
    .bind(req.escaloes)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Soft-delete a fee rule by setting ativo=false.
pub async fn soft_delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result =
        sqlx::query("UPDATE emolumento_rules SET ativo = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
