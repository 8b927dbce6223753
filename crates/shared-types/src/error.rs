use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of application errors.
///
/// Transport kinds (NotFound, BadRequest, ...) follow the usual HTTP
/// mapping; the remaining kinds are the lifecycle-engine taxonomy. A
/// Configuration or AmbiguousRule failure is surfaced to an administrator,
/// never resolved into a best-guess fee or due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    Conflict,
    DatabaseError,
    Unauthorized,
    InternalError,
    /// Missing or malformed configuration (rule, formula, vigência).
    Configuration,
    /// No active distribution rule for the process type.
    NoActiveRule,
    /// More than one active distribution rule — data-integrity problem.
    AmbiguousRule,
    /// No judge-letter mapping whose vigência contains the instant.
    NoValidMapping,
    /// Case attribute has no configured distribution bucket.
    UnmappedAttribute,
    /// No SLA rule for the (process type, urgency) pair.
    NoSlaRule,
    /// Suspension requested on a deadline that does not allow it.
    NotSuspendable,
    /// Actor's role does not hold the stage's required capability.
    UnauthorizedAction,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppErrorKind::NotFound => "NotFound",
            AppErrorKind::BadRequest => "BadRequest",
            AppErrorKind::ValidationError => "ValidationError",
            AppErrorKind::Conflict => "Conflict",
            AppErrorKind::DatabaseError => "DatabaseError",
            AppErrorKind::Unauthorized => "Unauthorized",
            AppErrorKind::InternalError => "InternalError",
            AppErrorKind::Configuration => "Configuration",
            AppErrorKind::NoActiveRule => "NoActiveRule",
            AppErrorKind::AmbiguousRule => "AmbiguousRule",
            AppErrorKind::NoValidMapping => "NoValidMapping",
            AppErrorKind::UnmappedAttribute => "UnmappedAttribute",
            AppErrorKind::NoSlaRule => "NoSlaRule",
            AppErrorKind::NotSuspendable => "NotSuspendable",
            AppErrorKind::UnauthorizedAction => "UnauthorizedAction",
        };
        write!(f, "{s}")
    }
}

/// Structured application error used across the engine and its REST surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

impl AppError {
    fn new(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Conflict, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::DatabaseError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::InternalError, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Configuration, message)
    }

    pub fn no_active_rule(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NoActiveRule, message)
    }

    pub fn ambiguous_rule(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::AmbiguousRule, message)
    }

    pub fn no_valid_mapping(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NoValidMapping, message)
    }

    pub fn unmapped_attribute(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::UnmappedAttribute, message)
    }

    pub fn no_sla_rule(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NoSlaRule, message)
    }

    pub fn not_suspendable(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NotSuspendable, message)
    }

    pub fn unauthorized_action(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::UnauthorizedAction, message)
    }

    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::ValidationError | AppErrorKind::UnmappedAttribute => 422,
            AppErrorKind::Conflict | AppErrorKind::NotSuspendable => 409,
            AppErrorKind::Unauthorized => 401,
            AppErrorKind::UnauthorizedAction => 403,
            AppErrorKind::Configuration
            | AppErrorKind::NoActiveRule
            | AppErrorKind::AmbiguousRule
            | AppErrorKind::NoValidMapping
            | AppErrorKind::NoSlaRule
            | AppErrorKind::DatabaseError
            | AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        AppError::validation("Validation failed", field_errors)
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}
