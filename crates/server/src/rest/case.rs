use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    stage_list, AppError, CaseResponse, LifecycleEventKind, LifecycleEventResponse,
    NewLifecycleEvent, RegisterCaseRequest, TransitionRequest,
};

use crate::auth::extractors::Actor;
use crate::engine::calendar::BusinessCalendar;
use crate::engine::distribution::{self, CaseAttributes};
use crate::engine::tramitacao;

// ---------------------------------------------------------------------------
// POST /api/processos — register (autuar) a new case
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/processos",
    request_body = RegisterCaseRequest,
    responses(
        (status = 201, description = "Case registered and distributed", body = CaseResponse),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 403, description = "Actor cannot register cases", body = AppError),
        (status = 500, description = "Distribution/SLA configuration problem", body = AppError)
    ),
    tag = "processos"
)]
pub async fn register_case(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Json(body): Json<RegisterCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), AppError> {
    if body.numero.trim().is_empty() {
        return Err(AppError::bad_request("numero must not be empty"));
    }

    let first_stage = stage_list(body.process_type)[0];
    if !actor.has_capability(first_stage.capability) {
        return Err(AppError::unauthorized_action(format!(
            "Registration requires the {} capability",
            first_stage.capability.as_str()
        )));
    }

    let now = Utc::now();
    let tuning = crate::config::engine_tuning();

    // Read-mostly configuration, fetched per request
    let slas = crate::repo::sla_rule::list_active(&pool).await?;
    let rules =
        crate::repo::distribution_rule::list_by_type(&pool, body.process_type.as_str()).await?;
    let mappings = crate::repo::letra_juiz::list_ativo(&pool).await?;
    distribution::validate_mappings(&mappings)?;
    let holidays = crate::repo::holiday::list_all(&pool).await?;
    let calendar = BusinessCalendar::new(&holidays);
    let workloads = crate::repo::letra_juiz::judge_loads(&pool).await?;

    let attrs = CaseAttributes {
        natureza_entidade: body.natureza_entidade.as_deref(),
        fonte_financiamento: body.fonte_financiamento.as_deref(),
    };

    // The rotation cursor is advanced with a compare-and-swap; a lost
    // race re-reads the cursor and recomputes, so two racing
    // registrations can never take the same letter.
    let mut registration = None;
    for _ in 0..tuning.distribution_retries.max(1) {
        let cursor =
            crate::repo::distribution_rule::get_or_init_cursor(&pool, body.process_type.as_str())
                .await?;
        let reg = tramitacao::register(
            body.process_type,
            body.urgency,
            attrs,
            &rules,
            &mappings,
            cursor.last_letra.as_deref(),
            &workloads,
            &slas,
            &calendar,
            now,
        )?;
        match &reg.assignment.next_cursor {
            Some(next) => {
                if crate::repo::distribution_rule::cas_cursor(
                    &pool,
                    body.process_type.as_str(),
                    next,
                    cursor.version,
                )
                .await?
                {
                    registration = Some(reg);
                    break;
                }
            }
            None => {
                registration = Some(reg);
                break;
            }
        }
    }
    let registration = registration
        .ok_or_else(|| AppError::conflict("Distribution cursor contention; please retry"))?;

    let case = crate::repo::case::insert(
        &pool,
        body.numero.trim(),
        body.process_type.as_str(),
        registration.first_stage.as_str(),
        body.urgency.as_str(),
        &registration.assignment.letra,
        registration.assignment.relator_id,
        registration.assignment.adjunto_id,
        body.valor_contrato_cents,
        body.natureza_entidade.as_deref(),
        body.fonte_financiamento.as_deref(),
    )
    .await?;

    crate::repo::deadline::insert(
        &pool,
        case.id,
        registration.first_stage.as_str(),
        registration.deadline.start_date,
        registration.deadline.prazo_dias,
        registration.deadline.due_date,
    )
    .await?;

    let event = NewLifecycleEvent {
        processo_id: case.id,
        kind: LifecycleEventKind::CaseRegistered,
        from_stage: None,
        to_stage: Some(registration.first_stage.as_str().to_string()),
        actor_role: actor.as_str().to_string(),
        occurred_at: now,
        detail: serde_json::json!({
            "letra": registration.assignment.letra,
            "relator_id": registration.assignment.relator_id,
        }),
    };
    crate::repo::lifecycle_event::publish_best_effort(&pool, std::slice::from_ref(&event)).await;

    tracing::info!(
        processo = %case.numero,
        letra = %registration.assignment.letra,
        "Case registered and distributed"
    );

    Ok((StatusCode::CREATED, Json(CaseResponse::from(case))))
}

// ---------------------------------------------------------------------------
// GET /api/processos — list cases
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListCasesParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/processos",
    params(ListCasesParams),
    responses(
        (status = 200, description = "Cases, newest first", body = Vec<CaseResponse>)
    ),
    tag = "processos"
)]
pub async fn list_cases(
    State(pool): State<Pool<Postgres>>,
    Query(params): Query<ListCasesParams>,
) -> Result<Json<Vec<CaseResponse>>, AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);
    let cases = crate::repo::case::list(&pool, limit, offset).await?;
    Ok(Json(cases.into_iter().map(CaseResponse::from).collect()))
}

// ---------------------------------------------------------------------------
// GET /api/processos/{id} — fetch a case
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/processos/{id}",
    params(
        ("id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Case", body = CaseResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "processos"
)]
pub async fn get_case(
    State(pool): State<Pool<Postgres>>,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let uuid = parse_uuid(&id)?;
    let case = crate::repo::case::find_by_id(&pool, uuid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;
    Ok(Json(CaseResponse::from(case)))
}

// ---------------------------------------------------------------------------
// POST /api/processos/{id}/transition — apply a tramitação action
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/processos/{id}/transition",
    request_body = TransitionRequest,
    params(
        ("id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Transition committed", body = CaseResponse),
        (status = 403, description = "Actor lacks the stage capability", body = AppError),
        (status = 404, description = "Not found", body = AppError),
        (status = 409, description = "Stale version, archived case or illegal suspension", body = AppError)
    ),
    tag = "processos"
)]
pub async fn transition_case(
    State(pool): State<Pool<Postgres>>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(body): Json<TransitionRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let uuid = parse_uuid(&id)?;
    let case = crate::repo::case::find_by_id(&pool, uuid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;

    if body.version != case.version {
        return Err(AppError::conflict(
            "Case was modified by another transition; reload and retry",
        ));
    }

    let deadline = crate::repo::deadline::find_open_by_case(&pool, uuid)
        .await?
        .ok_or_else(|| AppError::conflict("Case has no open stage deadline"))?;

    let now = Utc::now();
    let tuning = crate::config::engine_tuning();
    let slas = crate::repo::sla_rule::list_active(&pool).await?;
    let holidays = crate::repo::holiday::list_all(&pool).await?;
    let calendar = BusinessCalendar::new(&holidays);

    let outcome = tramitacao::apply_transition(
        &case,
        &deadline,
        body.action,
        body.motivo.as_deref(),
        actor,
        &slas,
        &calendar,
        tuning.warning_threshold_pct,
        now,
    )?;

    // Optimistic version check is the serialization point: a concurrent
    // transition that committed first makes this update a no-op.
    let committed = crate::repo::case::update_transition(&pool, &outcome.case, body.version)
        .await?
        .ok_or_else(|| {
            AppError::conflict("Case was modified by another transition; reload and retry")
        })?;

    if let Some(closed) = &outcome.closed_deadline {
        crate::repo::deadline::update(&pool, closed).await?;
    }
    if let Some(updated) = &outcome.updated_deadline {
        crate::repo::deadline::update(&pool, updated).await?;
    }
    if let Some((stage, draft)) = &outcome.new_deadline {
        crate::repo::deadline::insert(
            &pool,
            committed.id,
            stage.as_str(),
            draft.start_date,
            draft.prazo_dias,
            draft.due_date,
        )
        .await?;
    }

    crate::repo::lifecycle_event::publish_best_effort(&pool, &outcome.events).await;

    tracing::info!(
        processo = %committed.numero,
        action = body.action.as_str(),
        stage = %committed.current_stage,
        "Transition committed"
    );

    Ok(Json(CaseResponse::from(committed)))
}

// ---------------------------------------------------------------------------
// GET /api/processos/{id}/eventos — audit feed
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/processos/{id}/eventos",
    params(
        ("id" = String, Path, description = "Case UUID")
    ),
    responses(
        (status = 200, description = "Lifecycle events, oldest first", body = Vec<LifecycleEventResponse>),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "processos"
)]
pub async fn list_case_events(
    State(pool): State<Pool<Postgres>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<LifecycleEventResponse>>, AppError> {
    let uuid = parse_uuid(&id)?;
    crate::repo::case::find_by_id(&pool, uuid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Case {id} not found")))?;

    let events = crate::repo::lifecycle_event::list_by_case(&pool, uuid).await?;
    Ok(Json(
        events.into_iter().map(LifecycleEventResponse::from).collect(),
    ))
}

pub(crate) fn parse_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid UUID format"))
}
