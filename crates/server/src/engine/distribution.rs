//! Judge distribution: rotating letter, workload and attribute-bucket
//! criteria, resolved to a relator/adjunct pair through vigência-valid
//! letter mappings.
//!
//! Deterministic by construction — no randomness. Re-running `assign`
//! with the same cursor and the same `now` reproduces the assignment, so
//! a crash before cursor persistence retries idempotently.

use chrono::NaiveDate;

use shared_types::{
    is_valid_letra, AppError, Assignment, BucketParams, Criterio, DistributionRule, JudgeLoad,
    LetraJuizMapping, LetterCycleParams, ProcessType,
};

/// Case attributes the attribute criteria dispatch on.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseAttributes<'a> {
    pub natureza_entidade: Option<&'a str>,
    pub fonte_financiamento: Option<&'a str>,
}

/// Select the single active distribution rule for a process type. Zero or
/// several active rules is a data-integrity problem surfaced as a hard
/// error — never resolved by picking "the first".
pub fn select_rule<'a>(
    rules: &'a [DistributionRule],
    process_type: ProcessType,
) -> Result<&'a DistributionRule, AppError> {
    let mut active = rules
        .iter()
        .filter(|r| r.ativo && r.process_type == process_type.as_str());

    let first = active.next().ok_or_else(|| {
        AppError::no_active_rule(format!(
            "No active distribution rule for {}",
            process_type.as_str()
        ))
    })?;
    if active.next().is_some() {
        return Err(AppError::ambiguous_rule(format!(
            "Multiple active distribution rules for {}",
            process_type.as_str()
        )));
    }
    Ok(first)
}

/// Mapping for a letter whose vigência contains `today`.
fn valid_mapping<'a>(
    mappings: &'a [LetraJuizMapping],
    letra: &str,
    today: NaiveDate,
) -> Option<&'a LetraJuizMapping> {
    mappings
        .iter()
        .find(|m| m.ativo && m.letra == letra && m.vigencia().contains(today))
}

/// Distribute a case: pick a letter per the active rule's criterion and
/// resolve it to the judge pair mapped for that letter today.
pub fn assign(
    rules: &[DistributionRule],
    mappings: &[LetraJuizMapping],
    cursor: Option<&str>,
    workloads: &[JudgeLoad],
    attrs: CaseAttributes<'_>,
    process_type: ProcessType,
    today: NaiveDate,
) -> Result<Assignment, AppError> {
    let rule = select_rule(rules, process_type)?;
    let criterio = Criterio::parse(&rule.criterio).ok_or_else(|| {
        AppError::configuration(format!("Unknown distribution criterio '{}'", rule.criterio))
    })?;

    let (letra, is_rotation) = match criterio {
        Criterio::LetraJuiz => (next_letter(rule, mappings, cursor, today)?, true),
        Criterio::Carga => (least_loaded_letter(mappings, workloads, today)?, false),
        Criterio::NaturezaEntidade => (
            bucket_letter(rule, attrs.natureza_entidade, "natureza_entidade")?,
            false,
        ),
        Criterio::FonteFinanciamento => (
            bucket_letter(rule, attrs.fonte_financiamento, "fonte_financiamento")?,
            false,
        ),
    };

    let mapping = valid_mapping(mappings, &letra, today).ok_or_else(|| {
        AppError::no_valid_mapping(format!(
            "No judge-letter mapping for '{letra}' is valid today"
        ))
    })?;

    Ok(Assignment {
        letra: letra.clone(),
        relator_id: mapping.relator_id,
        adjunto_id: mapping.adjunto_id,
        next_cursor: is_rotation.then_some(letra),
    })
}

/// Advance the rotation cursor to the next letter in the rule's cyclic
/// order, skipping letters with no vigência-valid mapping.
fn next_letter(
    rule: &DistributionRule,
    mappings: &[LetraJuizMapping],
    cursor: Option<&str>,
    today: NaiveDate,
) -> Result<String, AppError> {
    let params: LetterCycleParams = serde_json::from_value(rule.params.clone())
        .map_err(|e| AppError::configuration(format!("Malformed letra_juiz params: {e}")))?;
    if params.ordem.is_empty() {
        return Err(AppError::configuration(
            "letra_juiz rule has an empty letter order",
        ));
    }

    let start = cursor
        .and_then(|c| params.ordem.iter().position(|l| l == c))
        .map(|i| i + 1)
        .unwrap_or(0);

    for offset in 0..params.ordem.len() {
        let letra = &params.ordem[(start + offset) % params.ordem.len()];
        if valid_mapping(mappings, letra, today).is_some() {
            return Ok(letra.clone());
        }
    }
    Err(AppError::no_valid_mapping(
        "No letter in the rotation order has a mapping valid today",
    ))
}

/// Pick the judge with the fewest non-terminal cases (ties broken by
/// ascending judge id for determinism) and return their letter.
fn least_loaded_letter(
    mappings: &[LetraJuizMapping],
    workloads: &[JudgeLoad],
    today: NaiveDate,
) -> Result<String, AppError> {
    let chosen = workloads
        .iter()
        .filter(|w| {
            mappings
                .iter()
                .any(|m| m.ativo && m.relator_id == w.judge_id && m.vigencia().contains(today))
        })
        .min_by_key(|w| (w.active_cases, w.judge_id))
        .ok_or_else(|| {
            AppError::no_valid_mapping("No judge with a valid letter mapping is available")
        })?;

    mappings
        .iter()
        .find(|m| m.ativo && m.relator_id == chosen.judge_id && m.vigencia().contains(today))
        .map(|m| m.letra.clone())
        .ok_or_else(|| AppError::no_valid_mapping("Chosen judge lost their mapping"))
}

/// Look up the letter bucket keyed by a case attribute value.
fn bucket_letter(
    rule: &DistributionRule,
    value: Option<&str>,
    attribute: &str,
) -> Result<String, AppError> {
    let value = value.ok_or_else(|| {
        AppError::unmapped_attribute(format!("Case has no {attribute} attribute"))
    })?;
    let params: BucketParams = serde_json::from_value(rule.params.clone())
        .map_err(|e| AppError::configuration(format!("Malformed bucket params: {e}")))?;
    params.buckets.get(value).cloned().ok_or_else(|| {
        AppError::unmapped_attribute(format!(
            "No distribution bucket configured for {attribute} = '{value}'"
        ))
    })
}

/// Strict validation of letter mappings: well-formed tokens, inicio ≤ fim,
/// and no overlapping vigências per letter among active rows.
pub fn validate_mappings(mappings: &[LetraJuizMapping]) -> Result<(), AppError> {
    for m in mappings {
        if !is_valid_letra(&m.letra) {
            return Err(AppError::configuration(format!(
                "Invalid letter token '{}'",
                m.letra
            )));
        }
        if let Some(fim) = m.vigencia_fim {
            if fim < m.vigencia_inicio {
                return Err(AppError::configuration(format!(
                    "Mapping for '{}' has vigência ending before it starts",
                    m.letra
                )));
            }
        }
    }
    let active: Vec<&LetraJuizMapping> = mappings.iter().filter(|m| m.ativo).collect();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            if a.letra == b.letra && a.vigencia().overlaps(&b.vigencia()) {
                return Err(AppError::configuration(format!(
                    "Overlapping vigências for letter '{}'",
                    a.letra
                )));
            }
        }
    }
    Ok(())
}
