use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Fee rules ───────────────────────────────────────────────────────

/// Statutory fee rule for a process type. Amounts are integer cents; the
/// formula string is parsed against a small fixed vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct EmolumentoRule {
    pub id: Uuid,
    pub process_type: String,
    /// `valor_fixo`, `progressivo_escalao` or `valor_contrato * <rate>`.
    pub formula: String,
    /// Absolute floor; the computed amount never goes below it.
    pub minimo_cents: i64,
    /// Optional cap as a percentage of the contract value.
    pub maximo_pct: Option<f64>,
    /// Ordered bracket table (JSONB list of `Escalao`) for the
    /// progressive formula.
    pub escaloes: Option<serde_json::Value>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One bracket of a progressive fee table: the slice of contract value up
/// to `ate_cents` (open-ended when None) is charged at `taxa_pct`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Escalao {
    #[serde(default)]
    pub ate_cents: Option<i64>,
    pub taxa_pct: f64,
}

// ── Evaluation context / outcome ────────────────────────────────────

/// Case attributes a fee formula can reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeeContext {
    #[serde(default)]
    pub valor_contrato_cents: Option<i64>,
}

/// Result of evaluating a fee formula. Warnings carry non-fatal
/// configuration inconsistencies (e.g. the minimum beating the
/// percentage cap) that the caller should surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeeOutcome {
    pub amount_cents: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// ── API request types ───────────────────────────────────────────────

/// Request to evaluate a fee for a process type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EvaluateFeeRequest {
    pub process_type: crate::case::ProcessType,
    #[serde(default)]
    pub context: FeeContext,
}

/// Request to create a fee rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateEmolumentoRuleRequest {
    pub process_type: crate::case::ProcessType,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "formula must not be empty"))
    )]
    pub formula: String,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 0, message = "minimo_cents must not be negative"))
    )]
    pub minimo_cents: i64,
    #[serde(default)]
    pub maximo_pct: Option<f64>,
    #[serde(default)]
    pub escaloes: Option<serde_json::Value>,
}

/// Request to partially update a fee rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateEmolumentoRuleRequest {
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub minimo_cents: Option<i64>,
    #[serde(default)]
    pub maximo_pct: Option<f64>,
    #[serde(default)]
    pub escaloes: Option<serde_json::Value>,
}
