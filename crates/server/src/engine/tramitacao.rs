//! Tramitação state machine — the top-level orchestrator.
//!
//! Owns the ordered stage list per process type, validates role-gated
//! transitions, invokes the distribution engine once (at autuação) and
//! drives the deadline engine per stage. All functions are pure: they
//! return an outcome the REST layer persists atomically, so a failed
//! engine call leaves the case untouched.

use chrono::{DateTime, Utc};

use shared_types::{
    stage_def, stage_list, stage_position, AppError, Assignment, CaseInstance, DistributionRule,
    JudgeLoad, LetraJuizMapping, LifecycleEventKind, NewLifecycleEvent, Papel, ProcessType,
    SlaRule, Stage, StageAction, StageDeadline, StageDef, StageStatus, UrgencyLevel,
};

use super::calendar::BusinessCalendar;
use super::deadline::{self, DeadlineDraft};
use super::distribution::{self, CaseAttributes};

// ── Registration (autuação) ─────────────────────────────────────────

/// Everything computed when a new case is registered: the assigned judge
/// pair, the initial stage, and its first deadline.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_stage: Stage,
    pub assignment: Assignment,
    pub deadline: DeadlineDraft,
}

/// Compose distribution and the first stage deadline for a new case.
#[allow(clippy::too_many_arguments)]
pub fn register(
    process_type: ProcessType,
    urgency: UrgencyLevel,
    attrs: CaseAttributes<'_>,
    rules: &[DistributionRule],
    mappings: &[LetraJuizMapping],
    cursor: Option<&str>,
    workloads: &[JudgeLoad],
    slas: &[SlaRule],
    calendar: &BusinessCalendar,
    now: DateTime<Utc>,
) -> Result<Registration, AppError> {
    let assignment = distribution::assign(
        rules,
        mappings,
        cursor,
        workloads,
        attrs,
        process_type,
        now.date_naive(),
    )?;
    let draft = deadline::start(slas, process_type, urgency, calendar, now.date_naive())?;
    Ok(Registration {
        first_stage: stage_list(process_type)[0].stage,
        assignment,
        deadline: draft,
    })
}

// ── Transitions ─────────────────────────────────────────────────────

/// Result of a validated transition. The REST layer persists the pieces
/// in one transaction; `events` are emitted best-effort afterwards.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub case: CaseInstance,
    /// Previous stage deadline, frozen as a historical record.
    pub closed_deadline: Option<StageDeadline>,
    /// Deadline to open for the stage being entered.
    pub new_deadline: Option<(Stage, DeadlineDraft)>,
    /// Current deadline mutated in place (suspend/resume).
    pub updated_deadline: Option<StageDeadline>,
    pub events: Vec<NewLifecycleEvent>,
}

/// Typed view of a case row; a row that fails to parse violates the
/// storage invariant and is reported as an internal error.
fn typed(case: &CaseInstance) -> Result<(ProcessType, Stage, StageStatus), AppError> {
    let pt = ProcessType::parse(&case.process_type)
        .ok_or_else(|| AppError::internal(format!("Unknown process_type '{}'", case.process_type)))?;
    let stage = Stage::parse(&case.current_stage)
        .ok_or_else(|| AppError::internal(format!("Unknown stage '{}'", case.current_stage)))?;
    let status = StageStatus::parse(&case.stage_status)
        .ok_or_else(|| AppError::internal(format!("Unknown stage_status '{}'", case.stage_status)))?;
    Ok((pt, stage, status))
}

fn event(
    case: &CaseInstance,
    kind: LifecycleEventKind,
    from: Stage,
    to: Option<Stage>,
    actor: Papel,
    now: DateTime<Utc>,
    detail: serde_json::Value,
) -> NewLifecycleEvent {
    NewLifecycleEvent {
        processo_id: case.id,
        kind,
        from_stage: Some(from.as_str().to_string()),
        to_stage: to.map(|s| s.as_str().to_string()),
        actor_role: actor.as_str().to_string(),
        occurred_at: now,
        detail,
    }
}

/// Apply a tramitação action to a case and its current stage deadline.
///
/// Committed only if the actor holds the stage's capability and every
/// engine call succeeds; otherwise the error is surfaced verbatim and
/// nothing changes.
#[allow(clippy::too_many_arguments)]
pub fn apply_transition(
    case: &CaseInstance,
    current_deadline: &StageDeadline,
    action: StageAction,
    motivo: Option<&str>,
    actor: Papel,
    slas: &[SlaRule],
    calendar: &BusinessCalendar,
    warning_threshold_pct: u32,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, AppError> {
    let (pt, stage, status) = typed(case)?;

    if status == StageStatus::Archived {
        return Err(AppError::conflict("Case is archived"));
    }
    if status == StageStatus::Suspended && action != StageAction::Retomar {
        return Err(AppError::conflict("Case is suspended; resume it first"));
    }
    if current_deadline.closed_at.is_some() {
        return Err(AppError::internal("Current stage deadline is already closed"));
    }

    let def = stage_def(pt, stage)
        .ok_or_else(|| AppError::internal("Current stage is not in the process type's list"))?;

    if !actor.has_capability(def.capability) {
        return Err(AppError::unauthorized_action(format!(
            "Stage {} requires the {} capability",
            stage.as_str(),
            def.capability.as_str()
        )));
    }

    let urgency = UrgencyLevel::parse(&case.urgency)
        .ok_or_else(|| AppError::internal(format!("Unknown urgency '{}'", case.urgency)))?;

    // Acting on an already-overdue deadline surfaces a breach event
    // alongside the transition's own event.
    let mut events = Vec::new();
    if deadline::status(current_deadline, calendar, warning_threshold_pct, now.date_naive())
        == shared_types::DeadlineStatus::Overdue
    {
        events.push(event(
            case,
            LifecycleEventKind::DeadlineBreached,
            stage,
            None,
            actor,
            now,
            serde_json::json!({ "due_date": current_deadline.due_date }),
        ));
    }

    let mut updated_case = case.clone();
    updated_case.version = case.version + 1;
    updated_case.updated_at = now;

    let outcome = match action {
        StageAction::Aprovar => {
            advance(case, updated_case, def, pt, stage, urgency, actor, slas, calendar, now, events, current_deadline)?
        }
        StageAction::Rejeitar | StageAction::PedirDiligencia => match def.retorno {
            Some(target) => branch_back(
                case, updated_case, action, target, pt, stage, urgency, actor, slas, calendar, now,
                events, current_deadline,
            )?,
            None => {
                // No configured return stage: the case stays put and the
                // action is recorded for the audit trail only.
                events.push(event(
                    case,
                    LifecycleEventKind::StageChanged,
                    stage,
                    Some(stage),
                    actor,
                    now,
                    serde_json::json!({ "action": action.as_str() }),
                ));
                TransitionOutcome {
                    case: updated_case,
                    closed_deadline: None,
                    new_deadline: None,
                    updated_deadline: None,
                    events,
                }
            }
        },
        StageAction::Suspender => {
            let motivo = motivo
                .filter(|m| !m.trim().is_empty())
                .ok_or_else(|| AppError::bad_request("Suspension requires a motivo"))?;
            let sla = deadline::find_sla(slas, pt, urgency)?;
            let updated = deadline::suspend(current_deadline, sla, now, motivo)?;
            updated_case.stage_status = StageStatus::Suspended.as_str().to_string();
            events.push(event(
                case,
                LifecycleEventKind::DeadlineSuspended,
                stage,
                None,
                actor,
                now,
                serde_json::json!({ "motivo": motivo }),
            ));
            TransitionOutcome {
                case: updated_case,
                closed_deadline: None,
                new_deadline: None,
                updated_deadline: Some(updated),
                events,
            }
        }
        StageAction::Retomar => {
            let updated = deadline::resume(current_deadline, calendar, now)?;
            updated_case.stage_status = StageStatus::InProgress.as_str().to_string();
            events.push(event(
                case,
                LifecycleEventKind::DeadlineResumed,
                stage,
                None,
                actor,
                now,
                serde_json::json!({ "due_date": updated.due_date }),
            ));
            TransitionOutcome {
                case: updated_case,
                closed_deadline: None,
                new_deadline: None,
                updated_deadline: Some(updated),
                events,
            }
        }
    };

    Ok(outcome)
}

/// Aprovar: advance to the next stage in the ordered list, freezing the
/// current deadline and opening one for the new stage (terminal stages
/// get no deadline — entering them archives the case).
#[allow(clippy::too_many_arguments)]
fn advance(
    case: &CaseInstance,
    mut updated_case: CaseInstance,
    def: &StageDef,
    pt: ProcessType,
    stage: Stage,
    urgency: UrgencyLevel,
    actor: Papel,
    slas: &[SlaRule],
    calendar: &BusinessCalendar,
    now: DateTime<Utc>,
    mut events: Vec<NewLifecycleEvent>,
    current_deadline: &StageDeadline,
) -> Result<TransitionOutcome, AppError> {
    if def.terminal {
        return Err(AppError::conflict("Terminal stage cannot be approved further"));
    }
    let pos = stage_position(pt, stage)
        .ok_or_else(|| AppError::internal("Current stage is not in the process type's list"))?;
    let next = &stage_list(pt)[pos + 1];

    updated_case.current_stage = next.stage.as_str().to_string();
    updated_case.stage_status = if next.terminal {
        StageStatus::Archived.as_str().to_string()
    } else {
        StageStatus::InProgress.as_str().to_string()
    };

    let new_deadline = if next.terminal {
        None
    } else {
        Some((
            next.stage,
            deadline::start(slas, pt, urgency, calendar, now.date_naive())?,
        ))
    };

    let mut closed = current_deadline.clone();
    closed.closed_at = Some(now);
    closed.updated_at = now;

    events.push(event(
        case,
        LifecycleEventKind::StageChanged,
        stage,
        Some(next.stage),
        actor,
        now,
        serde_json::json!({ "action": StageAction::Aprovar.as_str() }),
    ));

    Ok(TransitionOutcome {
        case: updated_case,
        closed_deadline: Some(closed),
        new_deadline,
        updated_deadline: None,
        events,
    })
}

/// Rejeitar / PedirDiligencia with a configured retorno: send the case
/// back to the target stage and restart its deadline.
#[allow(clippy::too_many_arguments)]
fn branch_back(
    case: &CaseInstance,
    mut updated_case: CaseInstance,
    action: StageAction,
    target: Stage,
    pt: ProcessType,
    stage: Stage,
    urgency: UrgencyLevel,
    actor: Papel,
    slas: &[SlaRule],
    calendar: &BusinessCalendar,
    now: DateTime<Utc>,
    mut events: Vec<NewLifecycleEvent>,
    current_deadline: &StageDeadline,
) -> Result<TransitionOutcome, AppError> {
    updated_case.current_stage = target.as_str().to_string();
    updated_case.stage_status = StageStatus::InProgress.as_str().to_string();

    let draft = deadline::start(slas, pt, urgency, calendar, now.date_naive())?;

    let mut closed = current_deadline.clone();
    closed.closed_at = Some(now);
    closed.updated_at = now;

    events.push(event(
        case,
        LifecycleEventKind::StageChanged,
        stage,
        Some(target),
        actor,
        now,
        serde_json::json!({ "action": action.as_str() }),
    ));

    Ok(TransitionOutcome {
        case: updated_case,
        closed_deadline: Some(closed),
        new_deadline: Some((target, draft)),
        updated_deadline: None,
        events,
    })
}
