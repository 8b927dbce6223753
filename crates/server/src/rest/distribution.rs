use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{
    is_valid_letra, AppError, BucketParams, CreateDistributionRuleRequest, CreateLetraJuizRequest,
    Criterio, DistributionRule, LetraJuizMapping, LetterCycleParams,
    UpdateDistributionRuleRequest,
};

use crate::auth::extractors::Actor;
use crate::engine::distribution::validate_mappings;
use crate::rest::{case::parse_uuid, require_admin};

/// Validate a rule's params JSONB against its criterion before it is
/// accepted — a malformed parameter bag would otherwise only surface as a
/// Configuration error at the next registration.
fn validate_rule_params(criterio: Criterio, params: &serde_json::Value) -> Result<(), AppError> {
    match criterio {
        Criterio::LetraJuiz => {
            let cycle: LetterCycleParams = serde_json::from_value(params.clone())
                .map_err(|e| AppError::bad_request(format!("Malformed letra_juiz params: {e}")))?;
            if cycle.ordem.is_empty() {
                return Err(AppError::bad_request("ordem must not be empty"));
            }
            if let Some(bad) = cycle.ordem.iter().find(|l| !is_valid_letra(l)) {
                return Err(AppError::bad_request(format!("Invalid letter token '{bad}'")));
            }
        }
        Criterio::NaturezaEntidade | Criterio::FonteFinanciamento => {
            let buckets: BucketParams = serde_json::from_value(params.clone())
                .map_err(|e| AppError::bad_request(format!("Malformed bucket params: {e}")))?;
            if buckets.buckets.is_empty() {
                return Err(AppError::bad_request("buckets must not be empty"));
            }
            if let Some(bad) = buckets.buckets.values().find(|l| !is_valid_letra(l)) {
                return Err(AppError::bad_request(format!("Invalid letter token '{bad}'")));
            }
        }
        Criterio::Carga => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /api/distribution-rules — list distribution rules
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/distribution-rules",
    responses(
        (status = 200, description = "All distribution rules", body = Vec<DistributionRule>)
    ),
    tag = "distribution"
)]
pub async fn list_distribution_rules(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<DistributionRule>>, AppError> {
    let rules = crate::repo::distribution_rule::list_all(&pool).await?;
    Ok(Json(rules))
}

// ---------------------------------------------------------------------------
// POST /api/distribution-rules — create a distribution rule
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/distribution-rules",
    request_body = CreateDistributionRuleRequest,
    responses(
        (status = 201, description = "Distribution rule created", body = DistributionRule),
        (status = 400, description = "Malformed criterion params", body = AppError),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "An active rule already exists for this process type", body = AppError)
    ),
    tag = "distribution"
)]
pub async fn create_distribution_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Json(body): Json<CreateDistributionRuleRequest>,
) -> Result<(StatusCode, Json<DistributionRule>), AppError> {
    require_admin(actor)?;
    validate_rule_params(body.criterio, &body.params)?;

    // One active rule per process type keeps distribution deterministic;
    // creating a second is rejected here rather than surfacing later as
    // AmbiguousRule at registration time.
    let existing =
        crate::repo::distribution_rule::list_by_type(&pool, body.process_type.as_str()).await?;
    if existing.iter().any(|r| r.ativo) {
        return Err(AppError::conflict(format!(
            "An active distribution rule already exists for {}; deactivate it first",
            body.process_type.as_str()
        )));
    }

    let rule = crate::repo::distribution_rule::create(&pool, body).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

// ---------------------------------------------------------------------------
// PATCH /api/distribution-rules/{id} — partially update a rule
// ---------------------------------------------------------------------------

#[utoipa::path(
    patch,
    path = "/api/distribution-rules/{id}",
    request_body = UpdateDistributionRuleRequest,
    params(
        ("id" = String, Path, description = "Distribution rule UUID")
    ),
    responses(
        (status = 200, description = "Distribution rule updated", body = DistributionRule),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "distribution"
)]
pub async fn update_distribution_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(body): Json<UpdateDistributionRuleRequest>,
) -> Result<Json<DistributionRule>, AppError> {
    require_admin(actor)?;
    let uuid = parse_uuid(&id)?;

    // Validate replacement params against the stored criterion before
    // anything is written.
    if let Some(params) = &body.params {
        let existing = crate::repo::distribution_rule::find_by_id(&pool, uuid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Distribution rule {id} not found")))?;
        let criterio = Criterio::parse(&existing.criterio).ok_or_else(|| {
            AppError::configuration(format!("Unknown criterio '{}'", existing.criterio))
        })?;
        validate_rule_params(criterio, params)?;
    }

    let rule = crate::repo::distribution_rule::update(&pool, uuid, body)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Distribution rule {id} not found")))?;
    Ok(Json(rule))
}

// ---------------------------------------------------------------------------
// DELETE /api/distribution-rules/{id} — soft-delete (set ativo=false)
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/distribution-rules/{id}",
    params(
        ("id" = String, Path, description = "Distribution rule UUID")
    ),
    responses(
        (status = 204, description = "Distribution rule deactivated"),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "distribution"
)]
pub async fn delete_distribution_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(actor)?;
    let uuid = parse_uuid(&id)?;

    if crate::repo::distribution_rule::soft_delete(&pool, uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!(
            "Distribution rule {id} not found"
        )))
    }
}

// ---------------------------------------------------------------------------
// GET /api/letra-juiz — list judge-letter mappings
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/letra-juiz",
    responses(
        (status = 200, description = "All judge-letter mappings", body = Vec<LetraJuizMapping>)
    ),
    tag = "distribution"
)]
pub async fn list_letra_juiz(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<LetraJuizMapping>>, AppError> {
    let mappings = crate::repo::letra_juiz::list_all(&pool).await?;
    Ok(Json(mappings))
}

// ---------------------------------------------------------------------------
// POST /api/letra-juiz — create a judge-letter mapping
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/letra-juiz",
    request_body = CreateLetraJuizRequest,
    responses(
        (status = 201, description = "Mapping created", body = LetraJuizMapping),
        (status = 400, description = "Invalid letter or vigência", body = AppError),
        (status = 403, description = "Admin only", body = AppError)
    ),
    tag = "distribution"
)]
pub async fn create_letra_juiz(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Json(body): Json<CreateLetraJuizRequest>,
) -> Result<(StatusCode, Json<LetraJuizMapping>), AppError> {
    require_admin(actor)?;

    if !is_valid_letra(&body.letra) {
        return Err(AppError::bad_request(
            "letra must be 1-3 uppercase ASCII letters",
        ));
    }
    if let Some(fim) = body.vigencia_fim {
        if fim < body.vigencia_inicio {
            return Err(AppError::bad_request("vigência ends before it starts"));
        }
    }

    // Strict vigência discipline: reject overlaps with the existing
    // active mappings for the same letter instead of storing free-form
    // periods that break resolution later.
    let mut mappings = crate::repo::letra_juiz::list_ativo(&pool).await?;
    mappings.push(LetraJuizMapping {
        id: uuid::Uuid::nil(),
        letra: body.letra.clone(),
        relator_id: body.relator_id,
        adjunto_id: body.adjunto_id,
        vigencia_inicio: body.vigencia_inicio,
        vigencia_fim: body.vigencia_fim,
        ativo: true,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    });
    validate_mappings(&mappings).map_err(|e| AppError::bad_request(e.message))?;

    let mapping = crate::repo::letra_juiz::create(&pool, body).await?;
    Ok((StatusCode::CREATED, Json(mapping)))
}

// ---------------------------------------------------------------------------
// DELETE /api/letra-juiz/{id} — soft-delete (set ativo=false)
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/letra-juiz/{id}",
    params(
        ("id" = String, Path, description = "Mapping UUID")
    ),
    responses(
        (status = 204, description = "Mapping deactivated"),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "distribution"
)]
pub async fn delete_letra_juiz(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(actor)?;
    let uuid = parse_uuid(&id)?;

    if crate::repo::letra_juiz::soft_delete(&pool, uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Mapping {id} not found")))
    }
}
