//! Shared builders for the pure-engine test suites. Everything here
//! constructs in-memory rows — no database is involved.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use shared_types::{
    CaseInstance, DistributionRule, EmolumentoRule, HolidayCalendarEntry, LetraJuizMapping,
    ProcessType, SlaRule, Stage, StageDeadline, StageStatus, UrgencyLevel,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Midday UTC on the given date — keeps date_naive() unambiguous.
pub fn dt(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn judge(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn sla(
    process_type: ProcessType,
    urgency: UrgencyLevel,
    prazo_dias: i32,
    suspende: bool,
) -> SlaRule {
    SlaRule {
        id: Uuid::new_v4(),
        process_type: process_type.as_str().to_string(),
        urgency: urgency.as_str().to_string(),
        prazo_dias,
        suspende_por_solicitacao: suspende,
        ativo: true,
        created_at: dt(2026, 1, 1),
        updated_at: dt(2026, 1, 1),
    }
}

pub fn holiday(year: i32, month: u32, day: u32, considera: bool) -> HolidayCalendarEntry {
    HolidayCalendarEntry {
        id: Uuid::new_v4(),
        date: date(year, month, day),
        descricao: "Feriado".to_string(),
        considera_para_slas: considera,
        created_at: dt(2026, 1, 1),
        updated_at: dt(2026, 1, 1),
    }
}

pub fn deadline_row(start: NaiveDate, prazo_dias: i32, due: NaiveDate) -> StageDeadline {
    StageDeadline {
        id: Uuid::new_v4(),
        processo_id: Uuid::from_u128(9),
        stage: Stage::AnaliseTecnica.as_str().to_string(),
        start_date: start,
        prazo_dias,
        due_date: due,
        suspensions: serde_json::json!([]),
        closed_at: None,
        created_at: dt(2026, 1, 1),
        updated_at: dt(2026, 1, 1),
    }
}

pub fn mapping(
    letra: &str,
    relator: Uuid,
    inicio: NaiveDate,
    fim: Option<NaiveDate>,
) -> LetraJuizMapping {
    LetraJuizMapping {
        id: Uuid::new_v4(),
        letra: letra.to_string(),
        relator_id: relator,
        adjunto_id: None,
        vigencia_inicio: inicio,
        vigencia_fim: fim,
        ativo: true,
        created_at: dt(2026, 1, 1),
        updated_at: dt(2026, 1, 1),
    }
}

pub fn distribution_rule(
    process_type: ProcessType,
    criterio: &str,
    params: serde_json::Value,
) -> DistributionRule {
    DistributionRule {
        id: Uuid::new_v4(),
        process_type: process_type.as_str().to_string(),
        criterio: criterio.to_string(),
        params,
        ativo: true,
        created_at: dt(2026, 1, 1),
        updated_at: dt(2026, 1, 1),
    }
}

pub fn emolumento_rule(
    process_type: ProcessType,
    formula: &str,
    minimo_cents: i64,
    maximo_pct: Option<f64>,
    escaloes: Option<serde_json::Value>,
) -> EmolumentoRule {
    EmolumentoRule {
        id: Uuid::new_v4(),
        process_type: process_type.as_str().to_string(),
        formula: formula.to_string(),
        minimo_cents,
        maximo_pct,
        escaloes,
        ativo: true,
        created_at: dt(2026, 1, 1),
        updated_at: dt(2026, 1, 1),
    }
}

pub fn case_row(
    process_type: ProcessType,
    stage: Stage,
    status: StageStatus,
    urgency: UrgencyLevel,
) -> CaseInstance {
    CaseInstance {
        id: Uuid::from_u128(9),
        numero: "TC-2026/0001".to_string(),
        process_type: process_type.as_str().to_string(),
        current_stage: stage.as_str().to_string(),
        stage_status: status.as_str().to_string(),
        urgency: urgency.as_str().to_string(),
        letra: Some("A".to_string()),
        relator_id: Some(judge(1)),
        adjunto_id: None,
        valor_contrato_cents: None,
        natureza_entidade: None,
        fonte_financiamento: None,
        version: 1,
        created_at: dt(2026, 1, 1),
        updated_at: dt(2026, 1, 1),
    }
}
