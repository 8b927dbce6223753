//! Tramitação state machine tests.

use pretty_assertions::assert_eq;

use server::engine::calendar::BusinessCalendar;
use server::engine::deadline;
use server::engine::distribution::CaseAttributes;
use server::engine::tramitacao::{apply_transition, register};
use shared_types::{
    AppErrorKind, LifecycleEventKind, Papel, ProcessType, SlaRule, Stage, StageAction,
    StageStatus, UrgencyLevel,
};

use crate::common::{
    case_row, date, deadline_row, distribution_rule, dt, judge, mapping, sla,
};

const WARNING_PCT: u32 = 20;

fn visto_slas() -> Vec<SlaRule> {
    vec![sla(ProcessType::Visto, UrgencyLevel::Normal, 10, true)]
}

// ── Registration ────────────────────────────────────────────────────

#[test]
fn register_composes_distribution_and_first_deadline() {
    let rules = vec![distribution_rule(
        ProcessType::Visto,
        "letra_juiz",
        serde_json::json!({ "ordem": ["A"] }),
    )];
    let mappings = vec![mapping("A", judge(1), date(2026, 1, 1), None)];
    let slas = vec![sla(ProcessType::Visto, UrgencyLevel::Normal, 30, true)];
    let cal = BusinessCalendar::empty();

    let reg = register(
        ProcessType::Visto,
        UrgencyLevel::Normal,
        CaseAttributes::default(),
        &rules,
        &mappings,
        None,
        &[],
        &slas,
        &cal,
        dt(2026, 1, 5),
    )
    .unwrap();

    assert_eq!(reg.first_stage, Stage::Autuacao);
    assert_eq!(reg.assignment.letra, "A");
    assert_eq!(reg.assignment.relator_id, judge(1));
    assert_eq!(reg.deadline.due_date, date(2026, 2, 16));
}

#[test]
fn register_fails_entirely_without_sla_rule() {
    let rules = vec![distribution_rule(
        ProcessType::Visto,
        "letra_juiz",
        serde_json::json!({ "ordem": ["A"] }),
    )];
    let mappings = vec![mapping("A", judge(1), date(2026, 1, 1), None)];
    let cal = BusinessCalendar::empty();

    let err = register(
        ProcessType::Visto,
        UrgencyLevel::Normal,
        CaseAttributes::default(),
        &rules,
        &mappings,
        None,
        &[],
        &[],
        &cal,
        dt(2026, 1, 5),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NoSlaRule);
}

// ── Aprovar ─────────────────────────────────────────────────────────

#[test]
fn approve_advances_to_the_next_stage() {
    let case = case_row(
        ProcessType::Visto,
        Stage::Autuacao,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &dl,
        StageAction::Aprovar,
        None,
        Papel::Secretaria,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 6),
    )
    .unwrap();

    assert_eq!(outcome.case.current_stage, "analise_tecnica");
    assert_eq!(outcome.case.stage_status, "in_progress");
    assert_eq!(outcome.case.version, 2);

    let closed = outcome.closed_deadline.unwrap();
    assert!(closed.closed_at.is_some());

    let (stage, draft) = outcome.new_deadline.unwrap();
    assert_eq!(stage, Stage::AnaliseTecnica);
    assert_eq!(draft.due_date, date(2026, 1, 20));

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].kind, LifecycleEventKind::StageChanged);
    assert_eq!(outcome.events[0].to_stage.as_deref(), Some("analise_tecnica"));
}

#[test]
fn approve_into_terminal_stage_archives_without_new_deadline() {
    let case = case_row(
        ProcessType::Visto,
        Stage::Notificacao,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &dl,
        StageAction::Aprovar,
        None,
        Papel::Secretaria,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 6),
    )
    .unwrap();

    assert_eq!(outcome.case.current_stage, "arquivo");
    assert_eq!(outcome.case.stage_status, "archived");
    assert!(outcome.new_deadline.is_none());
    assert!(outcome.closed_deadline.is_some());
}

// ── Role gating ─────────────────────────────────────────────────────

#[test]
fn wrong_role_is_rejected_and_nothing_changes() {
    let case = case_row(
        ProcessType::Visto,
        Stage::ParecerChefe,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let err = apply_transition(
        &case,
        &dl,
        StageAction::Aprovar,
        None,
        Papel::Tecnico,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 6),
    )
    .unwrap_err();

    assert_eq!(err.kind, AppErrorKind::UnauthorizedAction);
    // The input case is untouched; a failed transition commits nothing.
    assert_eq!(case.current_stage, "parecer_chefe");
    assert_eq!(case.version, 1);
}

#[test]
fn admin_satisfies_every_stage_capability() {
    let case = case_row(
        ProcessType::Visto,
        Stage::DecisaoRelator,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &dl,
        StageAction::Aprovar,
        None,
        Papel::Admin,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 6),
    )
    .unwrap();
    assert_eq!(outcome.case.current_stage, "notificacao");
}

// ── Rejeitar / PedirDiligencia ──────────────────────────────────────

#[test]
fn reject_branches_to_the_configured_return_stage() {
    let case = case_row(
        ProcessType::Visto,
        Stage::ParecerChefe,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &dl,
        StageAction::Rejeitar,
        None,
        Papel::ChefeDivisao,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 6),
    )
    .unwrap();

    assert_eq!(outcome.case.current_stage, "analise_tecnica");
    let (stage, _) = outcome.new_deadline.unwrap();
    assert_eq!(stage, Stage::AnaliseTecnica);
    assert!(outcome.closed_deadline.is_some());
}

#[test]
fn diligencia_without_return_stage_keeps_the_case_in_place() {
    let case = case_row(
        ProcessType::Visto,
        Stage::AnaliseTecnica,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &dl,
        StageAction::PedirDiligencia,
        None,
        Papel::Tecnico,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 6),
    )
    .unwrap();

    assert_eq!(outcome.case.current_stage, "analise_tecnica");
    assert_eq!(outcome.case.version, 2);
    assert!(outcome.closed_deadline.is_none());
    assert!(outcome.new_deadline.is_none());
    assert!(outcome.updated_deadline.is_none());
    assert_eq!(outcome.events.len(), 1);
}

// ── Suspender / Retomar ─────────────────────────────────────────────

#[test]
fn suspend_requires_a_motivo() {
    let case = case_row(
        ProcessType::Visto,
        Stage::AnaliseTecnica,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let err = apply_transition(
        &case,
        &dl,
        StageAction::Suspender,
        None,
        Papel::Tecnico,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 8),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::BadRequest);
}

#[test]
fn suspend_marks_case_and_deadline() {
    let case = case_row(
        ProcessType::Visto,
        Stage::AnaliseTecnica,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &dl,
        StageAction::Suspender,
        Some("Vista ao MP"),
        Papel::Tecnico,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 8),
    )
    .unwrap();

    assert_eq!(outcome.case.stage_status, "suspended");
    let updated = outcome.updated_deadline.unwrap();
    let intervals = deadline::parse_suspensions(&updated.suspensions);
    assert_eq!(intervals.len(), 1);
    assert_eq!(outcome.events[0].kind, LifecycleEventKind::DeadlineSuspended);
}

#[test]
fn suspend_is_illegal_when_the_rule_forbids_it() {
    let case = case_row(
        ProcessType::Visto,
        Stage::AnaliseTecnica,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();
    let slas = vec![sla(ProcessType::Visto, UrgencyLevel::Normal, 10, false)];

    let err = apply_transition(
        &case,
        &dl,
        StageAction::Suspender,
        Some("Vista ao MP"),
        Papel::Tecnico,
        &slas,
        &cal,
        WARNING_PCT,
        dt(2026, 1, 8),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotSuspendable);
}

#[test]
fn resume_restores_the_clock() {
    let case = case_row(
        ProcessType::Visto,
        Stage::AnaliseTecnica,
        StageStatus::Suspended,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 10, true);
    let suspended = deadline::suspend(&dl, &rule, dt(2026, 1, 8), "Vista ao MP").unwrap();
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &suspended,
        StageAction::Retomar,
        None,
        Papel::Tecnico,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 13),
    )
    .unwrap();

    assert_eq!(outcome.case.stage_status, "in_progress");
    let updated = outcome.updated_deadline.unwrap();
    assert_eq!(updated.due_date, date(2026, 1, 22));
    assert_eq!(outcome.events[0].kind, LifecycleEventKind::DeadlineResumed);
}

// ── Guards ──────────────────────────────────────────────────────────

#[test]
fn archived_case_rejects_all_actions() {
    let case = case_row(
        ProcessType::Visto,
        Stage::Arquivo,
        StageStatus::Archived,
        UrgencyLevel::Normal,
    );
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let err = apply_transition(
        &case,
        &dl,
        StageAction::Aprovar,
        None,
        Papel::Admin,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 6),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Conflict);
}

#[test]
fn acting_on_an_overdue_deadline_emits_a_breach_event() {
    let case = case_row(
        ProcessType::Visto,
        Stage::AnaliseTecnica,
        StageStatus::InProgress,
        UrgencyLevel::Normal,
    );
    // Due Jan 19, acted on Jan 26 — one week late
    let dl = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let outcome = apply_transition(
        &case,
        &dl,
        StageAction::Aprovar,
        None,
        Papel::Tecnico,
        &visto_slas(),
        &cal,
        WARNING_PCT,
        dt(2026, 1, 26),
    )
    .unwrap();

    let kinds: Vec<LifecycleEventKind> = outcome.events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LifecycleEventKind::DeadlineBreached,
            LifecycleEventKind::StageChanged
        ]
    );
}
