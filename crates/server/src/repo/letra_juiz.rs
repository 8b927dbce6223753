use shared_types::{AppError, CreateLetraJuizRequest, JudgeLoad, LetraJuizMapping};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const MAPPING_COLUMNS: &str = "id, letra, relator_id, adjunto_id, vigencia_inicio, vigencia_fim, \
     ativo, created_at, updated_at";

/// List all active letter mappings.
pub async fn list_ativo(pool: &Pool<Postgres>) -> Result<Vec<LetraJuizMapping>, AppError> {
    sqlx::query_as::<_, LetraJuizMapping>(&format!(
        "SELECT {MAPPING_COLUMNS} FROM letra_juiz_mappings WHERE ativo = TRUE ORDER BY letra, vigencia_inicio"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// List all letter mappings, active or not.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<LetraJuizMapping>, AppError> {
    sqlx::query_as::<_, LetraJuizMapping>(&format!(
        "SELECT {MAPPING_COLUMNS} FROM letra_juiz_mappings ORDER BY letra, vigencia_inicio"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Insert a new letter mapping. Vigência validation happens in the
/// handler against the full active set before this runs.
pub async fn create(
    pool: &Pool<Postgres>,
    req: CreateLetraJuizRequest,
) -> Result<LetraJuizMapping, AppError> {
    sqlx::query_as::<_, LetraJuizMapping>(&format!(
        r#"
        INSERT INTO letra_juiz_mappings
            (letra, relator_id, adjunto_id, vigencia_inicio, vigencia_fim)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {MAPPING_COLUMNS}
        "#
    ))
    .bind(&req.letra)
    .bind(req.relator_id)
    .bind(req.adjunto_id)
    .bind(req.vigencia_inicio)
    .bind(req.vigencia_fim)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Soft-delete a letter mapping by setting ativo=false.
pub async fn soft_delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE letra_juiz_mappings SET ativo = FALSE, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}

/// Current non-terminal caseload per judge appearing in an active
/// mapping. Judges with no open cases count zero, so a fresh judge is
/// eligible under the carga criterion.
pub async fn judge_loads(pool: &Pool<Postgres>) -> Result<Vec<JudgeLoad>, AppError> {
    sqlx::query_as::<_, JudgeLoad>(
        r#"
        SELECT m.relator_id AS judge_id,
               COUNT(p.id) FILTER (WHERE p.stage_status <> 'archived') AS active_cases
        FROM letra_juiz_mappings m
        LEFT JOIN processos p ON p.relator_id = m.relator_id
        WHERE m.ativo = TRUE
        GROUP BY m.relator_id
        ORDER BY m.relator_id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
