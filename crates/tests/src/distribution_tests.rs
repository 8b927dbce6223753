//! Distribution engine tests: rotation, workload, buckets, vigência.

use pretty_assertions::assert_eq;
use serde_json::json;

use server::engine::distribution::{assign, validate_mappings, CaseAttributes};
use shared_types::{AppErrorKind, JudgeLoad, ProcessType};

use crate::common::{date, distribution_rule, judge, mapping};

fn letter_rule() -> shared_types::DistributionRule {
    distribution_rule(
        ProcessType::Visto,
        "letra_juiz",
        json!({ "ordem": ["A", "B", "C"] }),
    )
}

fn abc_mappings() -> Vec<shared_types::LetraJuizMapping> {
    vec![
        mapping("A", judge(1), date(2026, 1, 1), None),
        mapping("B", judge(2), date(2026, 1, 1), None),
        mapping("C", judge(3), date(2026, 1, 1), None),
    ]
}

const TODAY: fn() -> chrono::NaiveDate = || date(2026, 3, 2);

#[test]
fn rotation_cycles_a_b_c_a() {
    let rules = vec![letter_rule()];
    let mappings = abc_mappings();

    let mut cursor: Option<String> = None;
    let mut sequence = Vec::new();
    for _ in 0..4 {
        let a = assign(
            &rules,
            &mappings,
            cursor.as_deref(),
            &[],
            CaseAttributes::default(),
            ProcessType::Visto,
            TODAY(),
        )
        .unwrap();
        cursor = a.next_cursor.clone();
        sequence.push(a.letra);
    }
    assert_eq!(sequence, vec!["A", "B", "C", "A"]);
}

#[test]
fn assignment_is_deterministic_without_cursor_advance() {
    let rules = vec![letter_rule()];
    let mappings = abc_mappings();

    let first = assign(
        &rules, &mappings, Some("A"), &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap();
    let second = assign(
        &rules, &mappings, Some("A"), &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.letra, "B");
    assert_eq!(first.relator_id, judge(2));
}

#[test]
fn rotation_skips_letters_without_valid_mapping() {
    let rules = vec![letter_rule()];
    // B's vigência ended before today
    let mappings = vec![
        mapping("A", judge(1), date(2026, 1, 1), None),
        mapping("B", judge(2), date(2025, 1, 1), Some(date(2025, 12, 31))),
        mapping("C", judge(3), date(2026, 1, 1), None),
    ];

    let a = assign(
        &rules, &mappings, Some("A"), &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap();
    assert_eq!(a.letra, "C");
}

#[test]
fn missing_rule_is_no_active_rule() {
    let err = assign(
        &[], &abc_mappings(), None, &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NoActiveRule);
}

#[test]
fn two_active_rules_is_ambiguous() {
    let rules = vec![letter_rule(), letter_rule()];
    let err = assign(
        &rules, &abc_mappings(), None, &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::AmbiguousRule);
}

#[test]
fn inactive_rule_does_not_count() {
    let mut inactive = letter_rule();
    inactive.ativo = false;
    let rules = vec![inactive, letter_rule()];

    let a = assign(
        &rules, &abc_mappings(), None, &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap();
    assert_eq!(a.letra, "A");
}

#[test]
fn all_mappings_stale_is_no_valid_mapping() {
    let rules = vec![letter_rule()];
    let mappings = vec![
        mapping("A", judge(1), date(2025, 1, 1), Some(date(2025, 6, 30))),
        mapping("B", judge(2), date(2025, 1, 1), Some(date(2025, 6, 30))),
        mapping("C", judge(3), date(2025, 1, 1), Some(date(2025, 6, 30))),
    ];
    let err = assign(
        &rules, &mappings, None, &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NoValidMapping);
}

#[test]
fn resolution_picks_the_mapping_valid_today() {
    // Letter A rotated between two judges over disjoint vigências
    let rules = vec![letter_rule()];
    let mappings = vec![
        mapping("A", judge(1), date(2025, 1, 1), Some(date(2025, 12, 31))),
        mapping("A", judge(4), date(2026, 1, 1), None),
        mapping("B", judge(2), date(2026, 1, 1), None),
        mapping("C", judge(3), date(2026, 1, 1), None),
    ];

    let a = assign(
        &rules, &mappings, Some("C"), &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap();
    assert_eq!(a.letra, "A");
    assert_eq!(a.relator_id, judge(4));
}

#[test]
fn bucket_criterion_has_no_cursor() {
    let rules = vec![distribution_rule(
        ProcessType::Visto,
        "natureza_entidade",
        json!({ "buckets": { "empresa_publica": "B" } }),
    )];
    let a = assign(
        &rules,
        &abc_mappings(),
        None,
        &[],
        CaseAttributes {
            natureza_entidade: Some("empresa_publica"),
            fonte_financiamento: None,
        },
        ProcessType::Visto,
        TODAY(),
    )
    .unwrap();
    assert_eq!(a.letra, "B");
    assert_eq!(a.next_cursor, None);
}

#[test]
fn missing_attribute_is_unmapped() {
    let rules = vec![distribution_rule(
        ProcessType::Visto,
        "natureza_entidade",
        json!({ "buckets": { "empresa_publica": "B" } }),
    )];
    let err = assign(
        &rules, &abc_mappings(), None, &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::UnmappedAttribute);
}

#[test]
fn unconfigured_bucket_value_is_unmapped() {
    let rules = vec![distribution_rule(
        ProcessType::Visto,
        "fonte_financiamento",
        json!({ "buckets": { "oge": "A" } }),
    )];
    let err = assign(
        &rules,
        &abc_mappings(),
        None,
        &[],
        CaseAttributes {
            natureza_entidade: None,
            fonte_financiamento: Some("financiamento_externo"),
        },
        ProcessType::Visto,
        TODAY(),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::UnmappedAttribute);
}

#[test]
fn carga_picks_least_loaded_judge() {
    let rules = vec![distribution_rule(ProcessType::Visto, "carga", json!({}))];
    let mappings = abc_mappings();
    let workloads = vec![
        JudgeLoad { judge_id: judge(1), active_cases: 12 },
        JudgeLoad { judge_id: judge(2), active_cases: 3 },
        JudgeLoad { judge_id: judge(3), active_cases: 7 },
    ];

    let a = assign(
        &rules, &mappings, None, &workloads, CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap();
    assert_eq!(a.relator_id, judge(2));
    assert_eq!(a.letra, "B");
}

#[test]
fn carga_ties_break_by_ascending_judge_id() {
    let rules = vec![distribution_rule(ProcessType::Visto, "carga", json!({}))];
    let workloads = vec![
        JudgeLoad { judge_id: judge(3), active_cases: 5 },
        JudgeLoad { judge_id: judge(1), active_cases: 5 },
    ];

    let a = assign(
        &rules, &abc_mappings(), None, &workloads, CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap();
    assert_eq!(a.relator_id, judge(1));
}

#[test]
fn malformed_params_is_configuration_error() {
    let rules = vec![distribution_rule(
        ProcessType::Visto,
        "letra_juiz",
        json!({ "ordem": "not-a-list" }),
    )];
    let err = assign(
        &rules, &abc_mappings(), None, &[], CaseAttributes::default(),
        ProcessType::Visto, TODAY(),
    )
    .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Configuration);
}

// ── Vigência validation ─────────────────────────────────────────────

#[test]
fn overlapping_vigencias_are_rejected() {
    let mappings = vec![
        mapping("A", judge(1), date(2026, 1, 1), Some(date(2026, 6, 30))),
        mapping("A", judge(2), date(2026, 6, 1), None),
    ];
    let err = validate_mappings(&mappings).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Configuration);
}

#[test]
fn disjoint_vigencias_pass_validation() {
    let mappings = vec![
        mapping("A", judge(1), date(2026, 1, 1), Some(date(2026, 6, 30))),
        mapping("A", judge(2), date(2026, 7, 1), None),
        mapping("B", judge(3), date(2026, 1, 1), None),
    ];
    assert!(validate_mappings(&mappings).is_ok());
}

#[test]
fn inverted_vigencia_is_rejected() {
    let mappings = vec![mapping("A", judge(1), date(2026, 6, 1), Some(date(2026, 1, 1)))];
    let err = validate_mappings(&mappings).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Configuration);
}

#[test]
fn lowercase_letter_token_is_rejected() {
    let mappings = vec![mapping("a", judge(1), date(2026, 1, 1), None)];
    let err = validate_mappings(&mappings).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Configuration);
}
