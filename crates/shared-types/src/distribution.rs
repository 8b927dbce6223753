use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ── Distribution criteria ───────────────────────────────────────────

/// Criterion a distribution rule dispatches on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Criterio {
    LetraJuiz,
    Carga,
    NaturezaEntidade,
    FonteFinanciamento,
}

impl Criterio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterio::LetraJuiz => "letra_juiz",
            Criterio::Carga => "carga",
            Criterio::NaturezaEntidade => "natureza_entidade",
            Criterio::FonteFinanciamento => "fonte_financiamento",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "letra_juiz" => Some(Criterio::LetraJuiz),
            "carga" => Some(Criterio::Carga),
            "natureza_entidade" => Some(Criterio::NaturezaEntidade),
            "fonte_financiamento" => Some(Criterio::FonteFinanciamento),
            _ => None,
        }
    }
}

// ── Distribution rules ──────────────────────────────────────────────

/// Distribution rule for a process type. Exactly one active rule should
/// exist per process type; zero or several is a hard error at assignment
/// time, never silently resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct DistributionRule {
    pub id: Uuid,
    pub process_type: String,
    /// Criterio stored as text.
    pub criterio: String,
    /// Criterion parameters (JSONB): `LetterCycleParams` for letra_juiz,
    /// `BucketParams` for the attribute criteria, empty for carga.
    pub params: serde_json::Value,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `params` shape for the `letra_juiz` criterion: the fixed cyclic letter
/// order the rotation advances through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LetterCycleParams {
    pub ordem: Vec<String>,
}

/// `params` shape for the attribute criteria: case attribute value →
/// judge letter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BucketParams {
    pub buckets: HashMap<String, String>,
}

// ── Judge-letter mappings ───────────────────────────────────────────

/// Validity period of a judge-letter mapping. Stored as explicit columns
/// and validated strictly (inicio ≤ fim, no overlap per letter) rather
/// than accepted as free-form JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Vigencia {
    pub inicio: NaiveDate,
    #[serde(default)]
    pub fim: Option<NaiveDate>,
}

impl Vigencia {
    /// Whether the period contains the given date. An open-ended period
    /// (`fim: None`) contains every date from `inicio` on.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.inicio && self.fim.map_or(true, |f| date <= f)
    }

    /// Whether two periods share at least one day.
    pub fn overlaps(&self, other: &Vigencia) -> bool {
        let self_end = self.fim.unwrap_or(NaiveDate::MAX);
        let other_end = other.fim.unwrap_or(NaiveDate::MAX);
        self.inicio <= other_end && other.inicio <= self_end
    }
}

/// Letter → judge pair mapping with a validity period. Multiple rows may
/// exist per letter across non-overlapping periods (rotation over time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct LetraJuizMapping {
    pub id: Uuid,
    /// Single uppercase token, 1–3 chars.
    pub letra: String,
    pub relator_id: Uuid,
    pub adjunto_id: Option<Uuid>,
    pub vigencia_inicio: NaiveDate,
    pub vigencia_fim: Option<NaiveDate>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LetraJuizMapping {
    pub fn vigencia(&self) -> Vigencia {
        Vigencia {
            inicio: self.vigencia_inicio,
            fim: self.vigencia_fim,
        }
    }
}

/// Check whether a letter token is well-formed (1–3 uppercase chars).
pub fn is_valid_letra(s: &str) -> bool {
    (1..=3).contains(&s.len()) && s.chars().all(|c| c.is_ascii_uppercase())
}

// ── Assignment result ───────────────────────────────────────────────

/// Result of distributing a case: the chosen letter and judge pair, plus
/// the rotation cursor value to persist (set for the letra_juiz
/// criterion only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Assignment {
    pub letra: String,
    pub relator_id: Uuid,
    pub adjunto_id: Option<Uuid>,
    pub next_cursor: Option<String>,
}

/// Current non-terminal caseload of one judge (for the carga criterion).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct JudgeLoad {
    pub judge_id: Uuid,
    pub active_cases: i64,
}

/// Per-process-type rotation cursor with a version column for
/// compare-and-swap persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct DistributionCursor {
    pub process_type: String,
    pub last_letra: Option<String>,
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}

// ── Admin request types ─────────────────────────────────────────────

/// Request to create a distribution rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateDistributionRuleRequest {
    pub process_type: crate::case::ProcessType,
    pub criterio: Criterio,
    /// Criterion parameters; validated against the criterion on create.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Request to partially update a distribution rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateDistributionRuleRequest {
    #[serde(default)]
    pub params: Option<serde_json::Value>,
    #[serde(default)]
    pub ativo: Option<bool>,
}

/// Request to create a judge-letter mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateLetraJuizRequest {
    pub letra: String,
    pub relator_id: Uuid,
    #[serde(default)]
    pub adjunto_id: Option<Uuid>,
    pub vigencia_inicio: NaiveDate,
    #[serde(default)]
    pub vigencia_fim: Option<NaiveDate>,
}
