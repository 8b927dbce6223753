//! Fee formula evaluator tests.

use pretty_assertions::assert_eq;
use serde_json::json;

use server::engine::emolumento::{evaluate, FeeFormula};
use shared_types::{AppErrorKind, FeeContext, ProcessType};

use crate::common::emolumento_rule;

fn ctx(valor_contrato_cents: i64) -> FeeContext {
    FeeContext {
        valor_contrato_cents: Some(valor_contrato_cents),
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

#[test]
fn parses_the_fixed_vocabulary() {
    assert_eq!(FeeFormula::parse("valor_fixo").unwrap(), FeeFormula::ValorFixo);
    assert_eq!(
        FeeFormula::parse("progressivo_escalao").unwrap(),
        FeeFormula::ProgressivoEscalao
    );
    assert_eq!(
        FeeFormula::parse("valor_contrato * 0.01").unwrap(),
        FeeFormula::ContratoRate(0.01)
    );
    assert_eq!(
        FeeFormula::parse("  valor_contrato*0.5 ").unwrap(),
        FeeFormula::ContratoRate(0.5)
    );
}

#[test]
fn unknown_formula_is_configuration_error() {
    for bad in ["", "valor_contrato + 1", "rand()", "contrato * 0.01"] {
        let err = FeeFormula::parse(bad).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Configuration, "{bad:?}");
    }
}

#[test]
fn negative_or_nan_rate_is_rejected() {
    assert!(FeeFormula::parse("valor_contrato * -0.01").is_err());
    assert!(FeeFormula::parse("valor_contrato * muito").is_err());
}

// ── Evaluation ──────────────────────────────────────────────────────

#[test]
fn minimum_floor_wins_over_computed_amount() {
    // 1% of 1,000,000 = 10,000 — the 50,000 floor applies
    let rule = emolumento_rule(ProcessType::Visto, "valor_contrato * 0.01", 50_000, None, None);
    let outcome = evaluate(&rule, &ctx(1_000_000)).unwrap();
    assert_eq!(outcome.amount_cents, 50_000);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn computed_amount_above_minimum_is_kept() {
    let rule = emolumento_rule(ProcessType::Visto, "valor_contrato * 0.01", 50_000, None, None);
    let outcome = evaluate(&rule, &ctx(10_000_000)).unwrap();
    assert_eq!(outcome.amount_cents, 100_000);
}

#[test]
fn valor_fixo_returns_minimo_verbatim() {
    let rule = emolumento_rule(ProcessType::Outros, "valor_fixo", 25_000, None, None);
    let outcome = evaluate(&rule, &FeeContext::default()).unwrap();
    assert_eq!(outcome.amount_cents, 25_000);
}

#[test]
fn maximo_pct_caps_the_amount() {
    // 20% of 1,000,000 = 200,000, capped at 10% = 100,000
    let rule = emolumento_rule(
        ProcessType::Visto,
        "valor_contrato * 0.2",
        10_000,
        Some(10.0),
        None,
    );
    let outcome = evaluate(&rule, &ctx(1_000_000)).unwrap();
    assert_eq!(outcome.amount_cents, 100_000);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn minimum_beats_cap_with_a_warning() {
    // Cap would be 100,000 but the floor is 150,000 — the floor wins and
    // the inconsistency is surfaced, not silently resolved.
    let rule = emolumento_rule(
        ProcessType::Visto,
        "valor_contrato * 0.2",
        150_000,
        Some(10.0),
        None,
    );
    let outcome = evaluate(&rule, &ctx(1_000_000)).unwrap();
    assert_eq!(outcome.amount_cents, 150_000);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("minimo"));
}

#[test]
fn result_is_never_below_minimo() {
    let rule = emolumento_rule(
        ProcessType::Visto,
        "valor_contrato * 0.01",
        50_000,
        Some(5.0),
        None,
    );
    for vc in [1, 10_000, 1_000_000, 4_999_999, 100_000_000] {
        let outcome = evaluate(&rule, &ctx(vc)).unwrap();
        assert!(outcome.amount_cents >= 50_000, "vc = {vc}");
    }
}

#[test]
fn multiplicative_formula_without_contract_value_fails() {
    let rule = emolumento_rule(ProcessType::Visto, "valor_contrato * 0.01", 50_000, None, None);
    let err = evaluate(&rule, &FeeContext::default()).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::BadRequest);
}

#[test]
fn malformed_stored_formula_fails_loudly() {
    let rule = emolumento_rule(ProcessType::Visto, "valor_contrato ** 2", 50_000, None, None);
    let err = evaluate(&rule, &ctx(1_000_000)).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Configuration);
}

// ── Progressive brackets ────────────────────────────────────────────

#[test]
fn progressive_accumulates_across_brackets() {
    // First 1,000,000 at 2%, remainder at 1%
    let rule = emolumento_rule(
        ProcessType::PrestacaoContas,
        "progressivo_escalao",
        0,
        None,
        Some(json!([
            { "ate_cents": 1_000_000, "taxa_pct": 2.0 },
            { "taxa_pct": 1.0 }
        ])),
    );
    let outcome = evaluate(&rule, &ctx(2_000_000)).unwrap();
    assert_eq!(outcome.amount_cents, 30_000);
}

#[test]
fn progressive_below_first_bracket_boundary() {
    let rule = emolumento_rule(
        ProcessType::PrestacaoContas,
        "progressivo_escalao",
        0,
        None,
        Some(json!([
            { "ate_cents": 1_000_000, "taxa_pct": 2.0 },
            { "taxa_pct": 1.0 }
        ])),
    );
    let outcome = evaluate(&rule, &ctx(500_000)).unwrap();
    assert_eq!(outcome.amount_cents, 10_000);
}

#[test]
fn progressive_without_table_is_configuration_error() {
    let rule = emolumento_rule(ProcessType::PrestacaoContas, "progressivo_escalao", 0, None, None);
    let err = evaluate(&rule, &ctx(1_000_000)).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Configuration);
}

#[test]
fn progressive_with_unordered_table_is_rejected() {
    let rule = emolumento_rule(
        ProcessType::PrestacaoContas,
        "progressivo_escalao",
        0,
        None,
        Some(json!([
            { "ate_cents": 2_000_000, "taxa_pct": 2.0 },
            { "ate_cents": 1_000_000, "taxa_pct": 1.0 }
        ])),
    );
    let err = evaluate(&rule, &ctx(3_000_000)).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Configuration);
}
