pub mod case;
pub mod deadline;
pub mod distribution;
pub mod emolumento;
pub mod holiday;
pub mod sla;

use axum::{
    routing::{get, patch, post},
    Router,
};
use shared_types::{AppError, Papel};

use crate::db::AppState;

/// Configuration writes are reserved for administrators; rule management
/// itself lives with the external admin collaborator.
pub(crate) fn require_admin(actor: Papel) -> Result<(), AppError> {
    if actor == Papel::Admin {
        Ok(())
    } else {
        Err(AppError::unauthorized_action(
            "Configuration changes require the admin role",
        ))
    }
}

/// Build the REST API router for the lifecycle engine.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Processos (tramitação)
        .route("/api/processos", get(case::list_cases).post(case::register_case))
        .route("/api/processos/{id}", get(case::get_case))
        .route("/api/processos/{id}/transition", post(case::transition_case))
        .route("/api/processos/{id}/eventos", get(case::list_case_events))
        // Prazos (deadlines)
        .route("/api/processos/{id}/prazos", get(deadline::list_case_deadlines))
        .route("/api/prazos/approaching", get(deadline::list_approaching))
        .route("/api/prazos/overdue", get(deadline::list_overdue))
        // Emolumentos
        .route("/api/emolumentos/evaluate", post(emolumento::evaluate_fee))
        .route(
            "/api/emolumento-rules",
            get(emolumento::list_emolumento_rules).post(emolumento::create_emolumento_rule),
        )
        .route(
            "/api/emolumento-rules/{id}",
            patch(emolumento::update_emolumento_rule).delete(emolumento::delete_emolumento_rule),
        )
        // SLA rules
        .route("/api/sla-rules", get(sla::list_sla_rules).post(sla::create_sla_rule))
        .route(
            "/api/sla-rules/{id}",
            patch(sla::update_sla_rule).delete(sla::delete_sla_rule),
        )
        // Distribution configuration
        .route(
            "/api/distribution-rules",
            get(distribution::list_distribution_rules).post(distribution::create_distribution_rule),
        )
        .route(
            "/api/distribution-rules/{id}",
            patch(distribution::update_distribution_rule)
                .delete(distribution::delete_distribution_rule),
        )
        .route(
            "/api/letra-juiz",
            get(distribution::list_letra_juiz).post(distribution::create_letra_juiz),
        )
        .route(
            "/api/letra-juiz/{id}",
            axum::routing::delete(distribution::delete_letra_juiz),
        )
        // Judicial holiday calendar
        .route(
            "/api/holidays",
            get(holiday::list_holidays).post(holiday::create_holiday),
        )
        .route(
            "/api/holidays/{id}",
            patch(holiday::update_holiday).delete(holiday::delete_holiday),
        )
        // Health
        .route("/health", get(crate::health::health_check))
}
