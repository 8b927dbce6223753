use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of lifecycle event emitted by the tramitação engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEventKind {
    CaseRegistered,
    StageChanged,
    DeadlineSuspended,
    DeadlineResumed,
    DeadlineBreached,
}

impl LifecycleEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEventKind::CaseRegistered => "case_registered",
            LifecycleEventKind::StageChanged => "stage_changed",
            LifecycleEventKind::DeadlineSuspended => "deadline_suspended",
            LifecycleEventKind::DeadlineResumed => "deadline_resumed",
            LifecycleEventKind::DeadlineBreached => "deadline_breached",
        }
    }
}

/// Append-only audit record of a committed tramitação action. Publication
/// is at-least-once / best-effort: a failed insert is logged and never
/// rolls back the transition that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct LifecycleEvent {
    pub id: Uuid,
    pub processo_id: Uuid,
    pub kind: String,
    pub from_stage: Option<String>,
    pub to_stage: Option<String>,
    pub actor_role: String,
    pub occurred_at: DateTime<Utc>,
    pub detail: serde_json::Value,
}

/// A lifecycle event as produced by the engine, before persistence
/// assigns it an id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewLifecycleEvent {
    pub processo_id: Uuid,
    pub kind: LifecycleEventKind,
    pub from_stage: Option<String>,
    pub to_stage: Option<String>,
    pub actor_role: String,
    pub occurred_at: DateTime<Utc>,
    pub detail: serde_json::Value,
}

/// API response shape for a lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LifecycleEventResponse {
    pub id: String,
    pub processo_id: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_stage: Option<String>,
    pub actor_role: String,
    pub occurred_at: String,
    pub detail: serde_json::Value,
}

impl From<LifecycleEvent> for LifecycleEventResponse {
    fn from(e: LifecycleEvent) -> Self {
        Self {
            id: e.id.to_string(),
            processo_id: e.processo_id.to_string(),
            kind: e.kind,
            from_stage: e.from_stage,
            to_stage: e.to_stage,
            actor_role: e.actor_role,
            occurred_at: e.occurred_at.to_rfc3339(),
            detail: e.detail,
        }
    }
}
