use shared_types::{
    AppError, CreateDistributionRuleRequest, DistributionCursor, DistributionRule,
    UpdateDistributionRuleRequest,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const RULE_COLUMNS: &str = "id, process_type, criterio, params, ativo, created_at, updated_at";

/// List all distribution rules.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<DistributionRule>, AppError> {
    sqlx::query_as::<_, DistributionRule>(&format!(
        "SELECT {RULE_COLUMNS} FROM distribution_rules ORDER BY process_type, created_at"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// All rules for one process type; the engine enforces the
/// exactly-one-active invariant.
pub async fn list_by_type(
    pool: &Pool<Postgres>,
    process_type: &str,
) -> Result<Vec<DistributionRule>, AppError> {
    sqlx::query_as::<_, DistributionRule>(&format!(
        "SELECT {RULE_COLUMNS} FROM distribution_rules WHERE process_type = $1"
    ))
    .bind(process_type)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Fetch a single distribution rule by ID.
pub async fn find_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DistributionRule>, AppError> {
    sqlx::query_as::<_, DistributionRule>(&format!(
        "SELECT {RULE_COLUMNS} FROM distribution_rules WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Insert a new distribution rule. Returns the created row.
pub async fn create(
    pool: &Pool<Postgres>,
    req: CreateDistributionRuleRequest,
) -> Result<DistributionRule, AppError> {
    sqlx::query_as::<_, DistributionRule>(&format!(
        r#"
        INSERT INTO distribution_rules (process_type, criterio, params)
        VALUES ($1, $2, $3)
        RETURNING {RULE_COLUMNS}
        "#
    ))
    .bind(req.process_type.as_str())
    .bind(req.criterio.as_str())
    .bind(&req.params)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Partially update a distribution rule.
/// Returns the updated row, or None if the rule was not found.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: UpdateDistributionRuleRequest,
) -> Result<Option<DistributionRule>, AppError> {
    sqlx::query_as::<_, DistributionRule>(&format!(
        r#"
        UPDATE distribution_rules SET
            params     = COALESCE($2, params),
            ativo      = COALESCE($3, ativo),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {RULE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(req.params)
    .bind(req.ativo)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Soft-delete a distribution rule by setting ativo=false.
pub async fn soft_delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result =
        sqlx::query("UPDATE distribution_rules SET ativo = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}

// ── Rotation cursor ───────────────────────────────────────────────

/// Fetch the rotation cursor for a process type, creating the row on
/// first use.
pub async fn get_or_init_cursor(
    pool: &Pool<Postgres>,
    process_type: &str,
) -> Result<DistributionCursor, AppError> {
    sqlx::query("INSERT INTO distribution_cursors (process_type) VALUES ($1) ON CONFLICT (process_type) DO NOTHING")
        .bind(process_type)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    sqlx::query_as::<_, DistributionCursor>(
        "SELECT process_type, last_letra, version, updated_at FROM distribution_cursors WHERE process_type = $1",
    )
    .bind(process_type)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Compare-and-swap the rotation cursor. Returns false when another
/// registration advanced it first; the caller re-reads and retries.
pub async fn cas_cursor(
    pool: &Pool<Postgres>,
    process_type: &str,
    new_letra: &str,
    expected_version: i32,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE distribution_cursors SET
            last_letra = $2,
            version    = version + 1,
            updated_at = NOW()
        WHERE process_type = $1 AND version = $3
        "#,
    )
    .bind(process_type)
    .bind(new_letra)
    .bind(expected_version)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
