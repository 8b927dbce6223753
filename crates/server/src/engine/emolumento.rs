//! Emolumento (statutory fee) formula evaluation.
//!
//! The formula vocabulary is deliberately small: `valor_fixo`,
//! `progressivo_escalao`, and `valor_contrato * <rate>`. A formula that
//! parses to none of these is a configuration error propagated to the
//! caller — fee computation never silently defaults to zero.

use shared_types::{AppError, EmolumentoRule, Escalao, FeeContext, FeeOutcome};

/// Parsed fee formula.
#[derive(Debug, Clone, PartialEq)]
pub enum FeeFormula {
    /// The rule's minimo verbatim.
    ValorFixo,
    /// Progressive bracket accumulation over the rule's escalões table.
    ProgressivoEscalao,
    /// Contract value times a rate (e.g. `valor_contrato * 0.01`).
    ContratoRate(f64),
}

impl FeeFormula {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let s = s.trim();
        match s {
            "valor_fixo" => return Ok(FeeFormula::ValorFixo),
            "progressivo_escalao" => return Ok(FeeFormula::ProgressivoEscalao),
            _ => {}
        }
        if let Some((lhs, rhs)) = s.split_once('*') {
            if lhs.trim() == "valor_contrato" {
                let rate: f64 = rhs
                    .trim()
                    .parse()
                    .map_err(|_| malformed(s, "rate is not a number"))?;
                if !rate.is_finite() || rate < 0.0 {
                    return Err(malformed(s, "rate must be a non-negative finite number"));
                }
                return Ok(FeeFormula::ContratoRate(rate));
            }
        }
        Err(malformed(s, "unknown formula"))
    }
}

fn malformed(formula: &str, why: &str) -> AppError {
    AppError::configuration(format!("Malformed fee formula '{formula}': {why}"))
}

/// Evaluate a fee rule against case attributes.
///
/// The result is floored at `minimo_cents` and, when `maximo_pct` is set,
/// capped at that percentage of the contract value — except that the
/// minimum always wins over the cap; that inconsistency is surfaced as a
/// warning in the outcome, not resolved silently.
pub fn evaluate(rule: &EmolumentoRule, ctx: &FeeContext) -> Result<FeeOutcome, AppError> {
    let formula = FeeFormula::parse(&rule.formula)?;

    let computed = match formula {
        FeeFormula::ValorFixo => rule.minimo_cents,
        FeeFormula::ContratoRate(rate) => {
            let vc = contract_value(ctx)?;
            (vc as f64 * rate).round() as i64
        }
        FeeFormula::ProgressivoEscalao => {
            let vc = contract_value(ctx)?;
            progressive(rule, vc)?
        }
    };

    let mut warnings = Vec::new();
    let mut amount = computed.max(rule.minimo_cents);

    if let (Some(pct), Some(vc)) = (rule.maximo_pct, ctx.valor_contrato_cents) {
        let cap = (vc as f64 * pct / 100.0).round() as i64;
        if cap < amount {
            if cap < rule.minimo_cents {
                warnings.push(format!(
                    "minimo ({} cents) exceeds the maximo_pct cap ({} cents); minimum applied",
                    rule.minimo_cents, cap
                ));
                amount = rule.minimo_cents;
            } else {
                amount = cap;
            }
        }
    }

    Ok(FeeOutcome {
        amount_cents: amount,
        warnings,
    })
}

fn contract_value(ctx: &FeeContext) -> Result<i64, AppError> {
    ctx.valor_contrato_cents
        .ok_or_else(|| AppError::bad_request("Case has no contract value for this fee formula"))
}

/// Progressive bracket accumulation: each slice of the contract value up
/// to a bracket's `ate_cents` is charged at that bracket's rate; the last
/// bracket may be open-ended.
fn progressive(rule: &EmolumentoRule, valor_contrato_cents: i64) -> Result<i64, AppError> {
    let table: Vec<Escalao> = rule
        .escaloes
        .as_ref()
        .filter(|v| !v.is_null())
        .map(|v| serde_json::from_value(v.clone()))
        .transpose()
        .map_err(|e| AppError::configuration(format!("Malformed escalões table: {e}")))?
        .unwrap_or_default();

    if table.is_empty() {
        return Err(AppError::configuration(
            "progressivo_escalao formula requires an escalões table",
        ));
    }

    let mut total = 0f64;
    let mut lower = 0i64;
    for (i, escalao) in table.iter().enumerate() {
        if !escalao.taxa_pct.is_finite() || escalao.taxa_pct < 0.0 {
            return Err(AppError::configuration(format!(
                "Escalão {i} has an invalid rate"
            )));
        }
        let upper = match escalao.ate_cents {
            Some(ate) if ate <= lower => {
                return Err(AppError::configuration(
                    "Escalões table is not in ascending order",
                ));
            }
            Some(ate) => ate.min(valor_contrato_cents),
            None => valor_contrato_cents,
        };
        if upper > lower {
            total += (upper - lower) as f64 * escalao.taxa_pct / 100.0;
        }
        lower = match escalao.ate_cents {
            Some(ate) => ate,
            None => break,
        };
        if lower >= valor_contrato_cents {
            break;
        }
    }
    Ok(total.round() as i64)
}
