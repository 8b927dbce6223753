use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the judicial holiday calendar. Only entries with
/// `considera_para_slas = true` count as non-business days for deadline
/// arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct HolidayCalendarEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub descricao: String,
    pub considera_para_slas: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a holiday calendar entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct CreateHolidayRequest {
    pub date: NaiveDate,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "descricao must not be empty"))
    )]
    pub descricao: String,
    /// Defaults to true — most holidays pause SLA clocks.
    #[serde(default = "default_considera")]
    pub considera_para_slas: bool,
}

fn default_considera() -> bool {
    true
}

/// Request to partially update a holiday calendar entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateHolidayRequest {
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub considera_para_slas: Option<bool>,
}
