use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── SLA rules ───────────────────────────────────────────────────────

/// Statutory deadline rule, keyed by (process type, urgency).
/// Managed by administrators; read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct SlaRule {
    pub id: Uuid,
    pub process_type: String,
    pub urgency: String,
    /// Business days allowed for a stage. 1..=365.
    pub prazo_dias: i32,
    /// Whether a pending external request pauses the clock.
    pub suspende_por_solicitacao: bool,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an SLA rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateSlaRuleRequest {
    pub process_type: crate::case::ProcessType,
    #[serde(default)]
    pub urgency: crate::case::UrgencyLevel,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, max = 365, message = "prazo_dias must be between 1 and 365"))
    )]
    pub prazo_dias: i32,
    #[serde(default)]
    pub suspende_por_solicitacao: bool,
}

/// Request to partially update an SLA rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct UpdateSlaRuleRequest {
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, max = 365, message = "prazo_dias must be between 1 and 365"))
    )]
    #[serde(default)]
    pub prazo_dias: Option<i32>,
    #[serde(default)]
    pub suspende_por_solicitacao: Option<bool>,
}

// ── Suspension intervals ────────────────────────────────────────────

/// One pause of a stage deadline's clock. An open interval (`fim: None`)
/// means the deadline is currently suspended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SuspensionInterval {
    pub inicio: DateTime<Utc>,
    #[serde(default)]
    pub fim: Option<DateTime<Utc>>,
    pub motivo: String,
}

// ── Stage deadlines ─────────────────────────────────────────────────

/// Deadline record for one stage of one case. Status is always derived
/// from the row and the clock, never stored. `closed_at` freezes the row
/// as a historical record when the stage completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct StageDeadline {
    pub id: Uuid,
    pub processo_id: Uuid,
    pub stage: String,
    pub start_date: NaiveDate,
    pub prazo_dias: i32,
    /// Business-day-adjusted due date; shifted forward on resume.
    pub due_date: NaiveDate,
    /// JSONB list of `SuspensionInterval`s.
    pub suspensions: serde_json::Value,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived status of a stage deadline at a given instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
    OnTrack,
    Warning,
    Overdue,
    Suspended,
}

impl DeadlineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineStatus::OnTrack => "on_track",
            DeadlineStatus::Warning => "warning",
            DeadlineStatus::Overdue => "overdue",
            DeadlineStatus::Suspended => "suspended",
        }
    }
}

/// API response for a stage deadline, with its derived status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StageDeadlineResponse {
    pub id: String,
    pub processo_id: String,
    pub stage: String,
    pub start_date: NaiveDate,
    pub prazo_dias: i32,
    pub due_date: NaiveDate,
    pub suspensions: Vec<SuspensionInterval>,
    pub status: DeadlineStatus,
    /// Remaining business days until the due date (negative when overdue).
    pub remaining_business_days: i64,
    pub closed: bool,
}

/// One row of the approaching/overdue deadline dashboard feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct DeadlineFeedRow {
    pub processo_id: Uuid,
    pub numero: String,
    pub process_type: String,
    pub stage: String,
    pub due_date: NaiveDate,
    pub prazo_dias: i32,
    pub suspensions: serde_json::Value,
}

/// Dashboard feed entry with derived status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DeadlineFeedEntry {
    pub processo_id: String,
    pub numero: String,
    pub process_type: String,
    pub stage: String,
    pub due_date: NaiveDate,
    pub status: DeadlineStatus,
    pub remaining_business_days: i64,
}
