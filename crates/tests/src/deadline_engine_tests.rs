//! Deadline engine tests: start, suspend/resume credit, status bands.

use pretty_assertions::assert_eq;

use server::engine::calendar::BusinessCalendar;
use server::engine::deadline;
use shared_types::{AppErrorKind, DeadlineStatus, ProcessType, UrgencyLevel};

use crate::common::{date, deadline_row, dt, sla};

const WARNING_PCT: u32 = 20;

#[test]
fn start_computes_business_day_due_date() {
    let slas = vec![sla(ProcessType::Visto, UrgencyLevel::Normal, 30, true)];
    let cal = BusinessCalendar::empty();

    // Registered on Monday Jan 5 2026, 30 business days = Monday Feb 16
    let draft = deadline::start(
        &slas,
        ProcessType::Visto,
        UrgencyLevel::Normal,
        &cal,
        date(2026, 1, 5),
    )
    .unwrap();

    assert_eq!(draft.start_date, date(2026, 1, 5));
    assert_eq!(draft.prazo_dias, 30);
    assert_eq!(draft.due_date, date(2026, 2, 16));
}

#[test]
fn start_without_rule_is_no_sla_rule_error() {
    let slas = vec![sla(ProcessType::Visto, UrgencyLevel::Urgente, 5, false)];
    let cal = BusinessCalendar::empty();

    let err = deadline::start(
        &slas,
        ProcessType::Visto,
        UrgencyLevel::Normal,
        &cal,
        date(2026, 1, 5),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NoSlaRule);
}

#[test]
fn inactive_rule_does_not_match() {
    let mut rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 30, true);
    rule.ativo = false;
    let cal = BusinessCalendar::empty();

    let err = deadline::start(
        &[rule],
        ProcessType::Visto,
        UrgencyLevel::Normal,
        &cal,
        date(2026, 1, 5),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NoSlaRule);
}

// ── Status bands ────────────────────────────────────────────────────

#[test]
fn status_on_day_one_is_on_track() {
    let row = deadline_row(date(2026, 1, 5), 30, date(2026, 2, 16));
    let cal = BusinessCalendar::empty();
    assert_eq!(
        deadline::status(&row, &cal, WARNING_PCT, date(2026, 1, 5)),
        DeadlineStatus::OnTrack
    );
}

#[test]
fn status_warning_at_twenty_percent_remaining() {
    let row = deadline_row(date(2026, 1, 5), 30, date(2026, 2, 16));
    let cal = BusinessCalendar::empty();

    // Friday Feb 6: six business days remain (20% of 30)
    assert_eq!(
        deadline::status(&row, &cal, WARNING_PCT, date(2026, 2, 6)),
        DeadlineStatus::Warning
    );
    // Thursday Feb 5: seven remain — still on track
    assert_eq!(
        deadline::status(&row, &cal, WARNING_PCT, date(2026, 2, 5)),
        DeadlineStatus::OnTrack
    );
}

#[test]
fn status_overdue_the_day_after_due() {
    let row = deadline_row(date(2026, 1, 5), 30, date(2026, 2, 16));
    let cal = BusinessCalendar::empty();
    assert_eq!(
        deadline::status(&row, &cal, WARNING_PCT, date(2026, 2, 17)),
        DeadlineStatus::Overdue
    );
    // The due date itself is still actionable
    assert_ne!(
        deadline::status(&row, &cal, WARNING_PCT, date(2026, 2, 16)),
        DeadlineStatus::Overdue
    );
}

// ── Suspend / resume ────────────────────────────────────────────────

#[test]
fn suspend_requires_rule_permission() {
    let row = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 10, false);

    let err = deadline::suspend(&row, &rule, dt(2026, 1, 8), "Vista ao MP").unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotSuspendable);
}

#[test]
fn suspend_records_open_interval() {
    let row = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 10, true);
    let cal = BusinessCalendar::empty();

    let suspended = deadline::suspend(&row, &rule, dt(2026, 1, 8), "Vista ao MP").unwrap();
    let intervals = deadline::parse_suspensions(&suspended.suspensions);
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].motivo, "Vista ao MP");
    assert!(intervals[0].fim.is_none());
    assert_eq!(
        deadline::status(&suspended, &cal, WARNING_PCT, date(2026, 1, 9)),
        DeadlineStatus::Suspended
    );
}

#[test]
fn suspend_twice_is_rejected() {
    let row = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 10, true);

    let suspended = deadline::suspend(&row, &rule, dt(2026, 1, 8), "Vista ao MP").unwrap();
    let err = deadline::suspend(&suspended, &rule, dt(2026, 1, 9), "again").unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotSuspendable);
}

#[test]
fn resume_without_suspension_is_rejected() {
    let row = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let cal = BusinessCalendar::empty();

    let err = deadline::resume(&row, &cal, dt(2026, 1, 9)).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotSuspendable);
}

#[test]
fn resume_shifts_due_date_by_business_day_span() {
    let row = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 10, true);
    let cal = BusinessCalendar::empty();

    // Suspended Thursday Jan 8, resumed Tuesday Jan 13 — the pause spans
    // a weekend but only three business days (Fri, Mon, Tue).
    let suspended = deadline::suspend(&row, &rule, dt(2026, 1, 8), "Vista ao MP").unwrap();
    let resumed = deadline::resume(&suspended, &cal, dt(2026, 1, 13)).unwrap();

    assert_eq!(resumed.due_date, date(2026, 1, 22));

    let intervals = deadline::parse_suspensions(&resumed.suspensions);
    assert_eq!(intervals[0].fim, Some(dt(2026, 1, 13)));
}

#[test]
fn suspend_resume_preserves_remaining_business_days() {
    let row = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 10, true);
    let cal = BusinessCalendar::empty();

    let remaining_before =
        deadline::remaining_business_days(&row, &cal, date(2026, 1, 8));

    let suspended = deadline::suspend(&row, &rule, dt(2026, 1, 8), "Vista ao MP").unwrap();
    let resumed = deadline::resume(&suspended, &cal, dt(2026, 1, 13)).unwrap();

    let remaining_after =
        deadline::remaining_business_days(&resumed, &cal, date(2026, 1, 13));

    assert_eq!(remaining_before, remaining_after);
    assert_eq!(remaining_after, 7);
}

#[test]
fn same_day_resume_leaves_due_date_unchanged() {
    let row = deadline_row(date(2026, 1, 5), 10, date(2026, 1, 19));
    let rule = sla(ProcessType::Visto, UrgencyLevel::Normal, 10, true);
    let cal = BusinessCalendar::empty();

    let suspended = deadline::suspend(&row, &rule, dt(2026, 1, 8), "Vista ao MP").unwrap();
    let resumed = deadline::resume(&suspended, &cal, dt(2026, 1, 8)).unwrap();
    assert_eq!(resumed.due_date, date(2026, 1, 19));
}
