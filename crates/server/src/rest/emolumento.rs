use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{
    AppError, CreateEmolumentoRuleRequest, EmolumentoRule, EvaluateFeeRequest, FeeOutcome,
    UpdateEmolumentoRuleRequest,
};

use crate::auth::extractors::Actor;
use crate::engine::emolumento::{self, FeeFormula};
use crate::error_convert::ValidateRequest;
use crate::rest::{case::parse_uuid, require_admin};

// ---------------------------------------------------------------------------
// POST /api/emolumentos/evaluate — compute a fee
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/emolumentos/evaluate",
    request_body = EvaluateFeeRequest,
    responses(
        (status = 200, description = "Computed fee with any configuration warnings", body = FeeOutcome),
        (status = 400, description = "Missing case attribute for the formula", body = AppError),
        (status = 500, description = "Missing or malformed fee rule", body = AppError)
    ),
    tag = "emolumentos"
)]
pub async fn evaluate_fee(
    State(pool): State<Pool<Postgres>>,
    Json(body): Json<EvaluateFeeRequest>,
) -> Result<Json<FeeOutcome>, AppError> {
    let rule =
        crate::repo::emolumento_rule::find_active_by_type(&pool, body.process_type.as_str())
            .await?
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "No active emolumento rule for {}",
                    body.process_type.as_str()
                ))
            })?;

    let outcome = emolumento::evaluate(&rule, &body.context)?;
    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// GET /api/emolumento-rules — list fee rules
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/emolumento-rules",
    responses(
        (status = 200, description = "All fee rules", body = Vec<EmolumentoRule>)
    ),
    tag = "emolumentos"
)]
pub async fn list_emolumento_rules(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<EmolumentoRule>>, AppError> {
    let rules = crate::repo::emolumento_rule::list_all(&pool).await?;
    Ok(Json(rules))
}

// ---------------------------------------------------------------------------
// POST /api/emolumento-rules — create a fee rule
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/emolumento-rules",
    request_body = CreateEmolumentoRuleRequest,
    responses(
        (status = 201, description = "Fee rule created", body = EmolumentoRule),
        (status = 400, description = "Malformed formula", body = AppError),
        (status = 403, description = "Admin only", body = AppError)
    ),
    tag = "emolumentos"
)]
pub async fn create_emolumento_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Json(body): Json<CreateEmolumentoRuleRequest>,
) -> Result<(StatusCode, Json<EmolumentoRule>), AppError> {
    require_admin(actor)?;
    body.validate_request()?;

    // A formula that won't parse should be rejected at write time, not
    // discovered as a Configuration error during billing.
    let formula =
        FeeFormula::parse(&body.formula).map_err(|e| AppError::bad_request(e.message))?;
    if formula == FeeFormula::ProgressivoEscalao
        && body.escaloes.as_ref().map_or(true, |v| v.is_null())
    {
        return Err(AppError::bad_request(
            "progressivo_escalao formula requires an escalões table",
        ));
    }

    let rule = crate::repo::emolumento_rule::create(&pool, body).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

// ---------------------------------------------------------------------------
// PATCH /api/emolumento-rules/{id} — partially update a fee rule
// ---------------------------------------------------------------------------

#[utoipa::path(
    patch,
    path = "/api/emolumento-rules/{id}",
    request_body = UpdateEmolumentoRuleRequest,
    params(
        ("id" = String, Path, description = "Fee rule UUID")
    ),
    responses(
        (status = 200, description = "Fee rule updated", body = EmolumentoRule),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "emolumentos"
)]
pub async fn update_emolumento_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(body): Json<UpdateEmolumentoRuleRequest>,
) -> Result<Json<EmolumentoRule>, AppError> {
    require_admin(actor)?;
    if let Some(f) = &body.formula {
        FeeFormula::parse(f).map_err(|e| AppError::bad_request(e.message))?;
    }
    if let Some(minimo) = body.minimo_cents {
        if minimo < 0 {
            return Err(AppError::bad_request("minimo_cents must not be negative"));
        }
    }
    let uuid = parse_uuid(&id)?;

    let rule = crate::repo::emolumento_rule::update(&pool, uuid, body)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Fee rule {id} not found")))?;
    Ok(Json(rule))
}

// ---------------------------------------------------------------------------
// DELETE /api/emolumento-rules/{id} — soft-delete (set ativo=false)
// ---------------------------------------------------------------------------

#[utoipa::path(
    delete,
    path = "/api/emolumento-rules/{id}",
    params(
        ("id" = String, Path, description = "Fee rule UUID")
    ),
    responses(
        (status = 204, description = "Fee rule deactivated"),
        (status = 403, description = "Admin only", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "emolumentos"
)]
pub async fn delete_emolumento_rule(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_admin(actor)?;
    let uuid = parse_uuid(&id)?;

    if crate::repo::emolumento_rule::soft_delete(&pool, uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("Fee rule {id} not found")))
    }
}
