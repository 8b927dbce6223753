use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, CreateSlaRuleRequest, SlaRule, UpdateSlaRuleRequest};

use crate::auth::extractors::Actor;
use crate::error_convert::ValidateRequest;
use crate::rest::{case::parse_uuid, require_admin};

// ---------------------------------------------------------------------------
// GET /api/sla-rules — list SLA rules
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/sla-rules",
    responses(
        (status = 200, description = "All SLA rules", body = Vec<SlaRule>)
    ),
    tag = "sla-rules"
)]
pub async fn list_sla_rules(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<SlaRule>>, AppError> {
    let rules = crate::repo::sla_rule::list_all(&pool).await?;
    Ok(Json(rules))
}

// ---------------------------------------------------------------------------
// POST /api/sla-rules — create an SLA rule
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/sla-rules",
    request_body = CreateSlaRuleRequest,
    responses(
        (status = 201, description = "SLA rule created", body = SlaRule),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "Duplicate (process_type, urgency)", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "sla-rules"
)]
pub async fn create_sla_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Json(body): Json<CreateSlaRuleRequest>,
) -> Result<(StatusCode, Json<SlaRule>), AppError> {
    require_admin(actor)?;
    body.validate_request()?;

    let rule = crate::repo::sla_rule::create(&pool, body).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

// ---------------------------------------------------------------------------
// PATCH /api/sla-rules/{id} — partially update an SLA rule
// ---------------------------------------------------------------------------

#[utoipa::path(
    patch,
    path = "/api/sla-rules/{id}",
    request_body = UpdateSlaRuleRequest,
    params(
        ("id" = String, Path, description = "SLA rule UUID")
    ),
    responses(
        (status = 200, description = "SLA rule updated", body = SlaRule),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "sla-rules"
)]
pub async fn update_sla_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(body): Json<UpdateSlaRuleRequest>,
) -> Result<Json<SlaRule>, AppError> {
    require_admin(actor)?;
    body.validate_request()?;
    let uuid = parse_uuid(&id)?;

    let rule = crate::repo::sla_rule::update(&pool, uuid, body)
        .await?
        .ok_or_else(|| AppError::not_found(format!("SLA rule {id} not found")))?;
    Ok(Json(rule))
}

// ---------------------------------------------------------------------------
// DELETE /api/sla-rules/{id} — soft-delete (set ativo=false)
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/sla-rules/{id}",
    params(
        ("id" = String, Path, description = "SLA rule UUID")
    ),
    responses(
        (status = 204, description = "SLA rule deactivated"),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "sla-rules"
)]
pub async fn delete_sla_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(actor)?;
    let uuid = parse_uuid(&id)?;

    if crate::repo::sla_rule::soft_delete(&pool, uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("SLA rule {id} not found")))
    }
}
