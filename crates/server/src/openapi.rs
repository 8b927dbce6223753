use utoipa::OpenApi;

use crate::health;
use crate::rest;
use shared_types::{
    AppError, AppErrorKind, Assignment, CaseResponse, CreateDistributionRuleRequest,
    CreateEmolumentoRuleRequest, CreateHolidayRequest, CreateLetraJuizRequest,
    CreateSlaRuleRequest, DeadlineFeedEntry, DeadlineStatus, DistributionRule, EmolumentoRule,
    Escalao, EvaluateFeeRequest, FeeContext, FeeOutcome, HolidayCalendarEntry,
    LetraJuizMapping, LifecycleEventResponse, ProcessType, RegisterCaseRequest, SlaRule,
    StageAction, StageDeadlineResponse, SuspensionInterval, TransitionRequest,
    UpdateDistributionRuleRequest, UpdateEmolumentoRuleRequest, UpdateHolidayRequest,
    UpdateSlaRuleRequest, UrgencyLevel,
};

/// Aggregated OpenAPI document for the lifecycle-engine REST surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Processos
        rest::case::register_case,
        rest::case::list_cases,
        rest::case::get_case,
        rest::case::transition_case,
        rest::case::list_case_events,
        // Prazos
        rest::deadline::list_case_deadlines,
        rest::deadline::list_approaching,
        rest::deadline::list_overdue,
        // Emolumentos
        rest::emolumento::evaluate_fee,
        rest::emolumento::list_emolumento_rules,
        rest::emolumento::create_emolumento_rule,
        rest::emolumento::update_emolumento_rule,
        rest::emolumento::delete_emolumento_rule,
        // SLA rules
        rest::sla::list_sla_rules,
        rest::sla::create_sla_rule,
        rest::sla::update_sla_rule,
        rest::sla::delete_sla_rule,
        // Distribution configuration
        rest::distribution::list_distribution_rules,
        rest::distribution::create_distribution_rule,
        rest::distribution::update_distribution_rule,
        rest::distribution::delete_distribution_rule,
        rest::distribution::list_letra_juiz,
        rest::distribution::create_letra_juiz,
        rest::distribution::delete_letra_juiz,
        // Holidays
        rest::holiday::list_holidays,
        rest::holiday::create_holiday,
        rest::holiday::update_holiday,
        rest::holiday::delete_holiday,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        ProcessType,
        UrgencyLevel,
        StageAction,
        CaseResponse,
        RegisterCaseRequest,
        TransitionRequest,
        LifecycleEventResponse,
        DeadlineStatus,
        SuspensionInterval,
        StageDeadlineResponse,
        DeadlineFeedEntry,
        SlaRule,
        CreateSlaRuleRequest,
        UpdateSlaRuleRequest,
        DistributionRule,
        CreateDistributionRuleRequest,
        UpdateDistributionRuleRequest,
        LetraJuizMapping,
        CreateLetraJuizRequest,
        Assignment,
        HolidayCalendarEntry,
        CreateHolidayRequest,
        UpdateHolidayRequest,
        EmolumentoRule,
        Escalao,
        EvaluateFeeRequest,
        FeeContext,
        FeeOutcome,
        CreateEmolumentoRuleRequest,
        UpdateEmolumentoRuleRequest,
        health::HealthResponse,
    )),
    tags(
        (name = "processos", description = "Case registration and tramitação"),
        (name = "prazos", description = "Stage deadlines and dashboard feeds"),
        (name = "emolumentos", description = "Statutory fee evaluation and rules"),
        (name = "sla-rules", description = "SLA rule administration"),
        (name = "distribution", description = "Distribution rules and judge-letter mappings"),
        (name = "holidays", description = "Judicial holiday calendar"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "Case Lifecycle Engine API",
        description = "Tramitação, deadlines, distribution and emolumentos for the case-management portal",
    )
)]
pub struct ApiDoc;
