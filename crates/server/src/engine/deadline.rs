//! Stage deadline computation: start, suspend, resume, status.
//!
//! Day counts are business days per the calendar module. Suspension
//! spans are measured in calendar time but credited back in business
//! days, so a suspension over a weekend does not grant working-day
//! credit the case never lost.

use chrono::{DateTime, NaiveDate, Utc};

use shared_types::{
    AppError, DeadlineStatus, ProcessType, SlaRule, StageDeadline, SuspensionInterval,
    UrgencyLevel,
};

use super::calendar::BusinessCalendar;

/// A freshly computed deadline, before persistence assigns it a row.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineDraft {
    pub start_date: NaiveDate,
    pub prazo_dias: i32,
    pub due_date: NaiveDate,
}

/// Find the active SLA rule for a (process type, urgency) pair.
pub fn find_sla<'a>(
    slas: &'a [SlaRule],
    process_type: ProcessType,
    urgency: UrgencyLevel,
) -> Result<&'a SlaRule, AppError> {
    slas.iter()
        .find(|r| {
            r.ativo && r.process_type == process_type.as_str() && r.urgency == urgency.as_str()
        })
        .ok_or_else(|| {
            AppError::no_sla_rule(format!(
                "No active SLA rule for {} / {}",
                process_type.as_str(),
                urgency.as_str()
            ))
        })
}

/// Compute the deadline for a stage entered now.
pub fn start(
    slas: &[SlaRule],
    process_type: ProcessType,
    urgency: UrgencyLevel,
    calendar: &BusinessCalendar,
    today: NaiveDate,
) -> Result<DeadlineDraft, AppError> {
    let sla = find_sla(slas, process_type, urgency)?;
    Ok(DeadlineDraft {
        start_date: today,
        prazo_dias: sla.prazo_dias,
        due_date: calendar.add_business_days(today, sla.prazo_dias as i64),
    })
}

/// Parse the suspensions JSONB column. Accepts either a list of typed
/// intervals or null/absent (no suspensions).
pub fn parse_suspensions(value: &serde_json::Value) -> Vec<SuspensionInterval> {
    if value.is_null() {
        return Vec::new();
    }
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Index of the open suspension interval, if any.
fn open_interval(suspensions: &[SuspensionInterval]) -> Option<usize> {
    suspensions.iter().position(|s| s.fim.is_none())
}

/// Suspend a deadline's clock. Legal only when the SLA rule allows
/// suspension and no interval is already open.
pub fn suspend(
    deadline: &StageDeadline,
    sla: &SlaRule,
    now: DateTime<Utc>,
    motivo: &str,
) -> Result<StageDeadline, AppError> {
    if !sla.suspende_por_solicitacao {
        return Err(AppError::not_suspendable(format!(
            "SLA rule for {} / {} does not allow suspension",
            sla.process_type, sla.urgency
        )));
    }
    let mut suspensions = parse_suspensions(&deadline.suspensions);
    if open_interval(&suspensions).is_some() {
        return Err(AppError::not_suspendable("Deadline is already suspended"));
    }
    suspensions.push(SuspensionInterval {
        inicio: now,
        fim: None,
        motivo: motivo.to_string(),
    });

    let mut updated = deadline.clone();
    updated.suspensions = serde_json::to_value(&suspensions)
        .map_err(|e| AppError::internal(format!("Failed to encode suspensions: {e}")))?;
    updated.updated_at = now;
    Ok(updated)
}

/// Resume a suspended deadline: close the open interval and shift the due
/// date forward by the suspension's span in business days, preserving the
/// remaining-business-day budget regardless of how long the pause lasted.
pub fn resume(
    deadline: &StageDeadline,
    calendar: &BusinessCalendar,
    now: DateTime<Utc>,
) -> Result<StageDeadline, AppError> {
    let mut suspensions = parse_suspensions(&deadline.suspensions);
    let idx = open_interval(&suspensions)
        .ok_or_else(|| AppError::not_suspendable("Deadline is not suspended"))?;

    let inicio = suspensions[idx].inicio;
    suspensions[idx].fim = Some(now);

    let span = calendar.business_days_between(inicio.date_naive(), now.date_naive());

    let mut updated = deadline.clone();
    updated.due_date = calendar.add_business_days(deadline.due_date, span.max(0));
    updated.suspensions = serde_json::to_value(&suspensions)
        .map_err(|e| AppError::internal(format!("Failed to encode suspensions: {e}")))?;
    updated.updated_at = now;
    Ok(updated)
}

/// Signed remaining business days until the due date (negative once the
/// due date has passed).
pub fn remaining_business_days(
    deadline: &StageDeadline,
    calendar: &BusinessCalendar,
    today: NaiveDate,
) -> i64 {
    calendar.business_days_between(today, deadline.due_date)
}

/// Classify a deadline at a given date. Pure — calling it never mutates
/// the record; only suspend/resume/stage completion do.
pub fn status(
    deadline: &StageDeadline,
    calendar: &BusinessCalendar,
    warning_threshold_pct: u32,
    today: NaiveDate,
) -> DeadlineStatus {
    status_parts(
        deadline.due_date,
        deadline.prazo_dias,
        &deadline.suspensions,
        calendar,
        warning_threshold_pct,
        today,
    )
}

/// Status classification from raw column values (shared with the
/// dashboard feed rows, which are joins rather than full records).
pub fn status_parts(
    due_date: NaiveDate,
    prazo_dias: i32,
    suspensions: &serde_json::Value,
    calendar: &BusinessCalendar,
    warning_threshold_pct: u32,
    today: NaiveDate,
) -> DeadlineStatus {
    let suspensions = parse_suspensions(suspensions);
    if open_interval(&suspensions).is_some() {
        return DeadlineStatus::Suspended;
    }
    if today > due_date {
        return DeadlineStatus::Overdue;
    }
    let remaining = calendar.business_days_between(today, due_date);
    let threshold = (prazo_dias as i64 * warning_threshold_pct as i64) / 100;
    if remaining <= threshold {
        DeadlineStatus::Warning
    } else {
        DeadlineStatus::OnTrack
    }
}
