use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stage::StageAction;

// ── Process type ────────────────────────────────────────────────────

/// Enumerated case category. Immutable once a case is registered;
/// determines which stage list, SLA rule and distribution rule apply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    Visto,
    PrestacaoContas,
    PrestacaoContasSoberania,
    AutonomoMulta,
    FiscalizacaoOge,
    Recurso,
    Outros,
}

/// All process types, in display order.
pub const PROCESS_TYPES: &[ProcessType] = &[
    ProcessType::Visto,
    ProcessType::PrestacaoContas,
    ProcessType::PrestacaoContasSoberania,
    ProcessType::AutonomoMulta,
    ProcessType::FiscalizacaoOge,
    ProcessType::Recurso,
    ProcessType::Outros,
];

impl ProcessType {
    /// Stable text form used in DB columns and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessType::Visto => "visto",
            ProcessType::PrestacaoContas => "prestacao_contas",
            ProcessType::PrestacaoContasSoberania => "prestacao_contas_soberania",
            ProcessType::AutonomoMulta => "autonomo_multa",
            ProcessType::FiscalizacaoOge => "fiscalizacao_oge",
            ProcessType::Recurso => "recurso",
            ProcessType::Outros => "outros",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        PROCESS_TYPES.iter().copied().find(|pt| pt.as_str() == s)
    }
}

// ── Urgency ─────────────────────────────────────────────────────────

/// Urgency level of a case; part of the SLA rule key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Normal,
    UrgenciaSimplificada,
    Urgente,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Normal => "normal",
            UrgencyLevel::UrgenciaSimplificada => "urgencia_simplificada",
            UrgencyLevel::Urgente => "urgente",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(UrgencyLevel::Normal),
            "urgencia_simplificada" => Some(UrgencyLevel::UrgenciaSimplificada),
            "urgente" => Some(UrgencyLevel::Urgente),
            _ => None,
        }
    }
}

impl Default for UrgencyLevel {
    fn default() -> Self {
        UrgencyLevel::Normal
    }
}

// ── Stage status ────────────────────────────────────────────────────

/// Status of a case within its current stage. `Archived` is set when the
/// terminal stage of the process type's list is entered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    InProgress,
    Suspended,
    Completed,
    Archived,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::InProgress => "in_progress",
            StageStatus::Suspended => "suspended",
            StageStatus::Completed => "completed",
            StageStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(StageStatus::Pending),
            "in_progress" => Some(StageStatus::InProgress),
            "suspended" => Some(StageStatus::Suspended),
            "completed" => Some(StageStatus::Completed),
            "archived" => Some(StageStatus::Archived),
            _ => None,
        }
    }
}

// ── CaseInstance DB struct ──────────────────────────────────────────

/// A concrete process. Created at autuação (registration), mutated only
/// through validated tramitação transitions, never deleted.
///
/// Enum-valued columns are stored as text (see the `as_str`/`parse`
/// helpers on each enum).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CaseInstance {
    pub id: Uuid,
    /// Human-facing case number (e.g. "TC-2026/0153").
    pub numero: String,
    pub process_type: String,
    pub current_stage: String,
    pub stage_status: String,
    pub urgency: String,
    /// Judge letter assigned at distribution.
    pub letra: Option<String>,
    pub relator_id: Option<Uuid>,
    pub adjunto_id: Option<Uuid>,
    pub valor_contrato_cents: Option<i64>,
    pub natureza_entidade: Option<String>,
    pub fonte_financiamento: Option<String>,
    /// Optimistic-concurrency version; bumped on every committed transition.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── API response / request types ────────────────────────────────────

/// API response shape for a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseResponse {
    pub id: String,
    pub numero: String,
    pub process_type: String,
    pub current_stage: String,
    pub stage_status: String,
    pub urgency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjunto_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_contrato_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natureza_entidade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonte_financiamento: Option<String>,
    pub version: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CaseInstance> for CaseResponse {
    fn from(c: CaseInstance) -> Self {
        Self {
            id: c.id.to_string(),
            numero: c.numero,
            process_type: c.process_type,
            current_stage: c.current_stage,
            stage_status: c.stage_status,
            urgency: c.urgency,
            letra: c.letra,
            relator_id: c.relator_id.map(|id| id.to_string()),
            adjunto_id: c.adjunto_id.map(|id| id.to_string()),
            valor_contrato_cents: c.valor_contrato_cents,
            natureza_entidade: c.natureza_entidade,
            fonte_financiamento: c.fonte_financiamento,
            version: c.version,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Request to register (autuar) a new case. Distribution and the first
/// stage deadline are computed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterCaseRequest {
    pub numero: String,
    pub process_type: ProcessType,
    #[serde(default)]
    pub urgency: UrgencyLevel,
    #[serde(default)]
    pub valor_contrato_cents: Option<i64>,
    #[serde(default)]
    pub natureza_entidade: Option<String>,
    #[serde(default)]
    pub fonte_financiamento: Option<String>,
}

/// Request to apply a tramitação action to a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TransitionRequest {
    pub action: StageAction,
    /// Suspension reason; required when `action` is `suspender`.
    #[serde(default)]
    pub motivo: Option<String>,
    /// Case version the caller last read; stale versions are rejected.
    pub version: i32,
}
