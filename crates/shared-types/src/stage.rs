use serde::{Deserialize, Serialize};

use crate::case::ProcessType;

// ── Stage identifiers ───────────────────────────────────────────────

/// One node in a process type's ordered stage list. Stages are static
/// configuration; cases only move between them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Autuacao,
    AnaliseTecnica,
    ParecerChefe,
    VistaMp,
    DecisaoRelator,
    DecisaoPlenario,
    Notificacao,
    Arquivo,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Autuacao => "autuacao",
            Stage::AnaliseTecnica => "analise_tecnica",
            Stage::ParecerChefe => "parecer_chefe",
            Stage::VistaMp => "vista_mp",
            Stage::DecisaoRelator => "decisao_relator",
            Stage::DecisaoPlenario => "decisao_plenario",
            Stage::Notificacao => "notificacao",
            Stage::Arquivo => "arquivo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "autuacao" => Some(Stage::Autuacao),
            "analise_tecnica" => Some(Stage::AnaliseTecnica),
            "parecer_chefe" => Some(Stage::ParecerChefe),
            "vista_mp" => Some(Stage::VistaMp),
            "decisao_relator" => Some(Stage::DecisaoRelator),
            "decisao_plenario" => Some(Stage::DecisaoPlenario),
            "notificacao" => Some(Stage::Notificacao),
            "arquivo" => Some(Stage::Arquivo),
            _ => None,
        }
    }
}

// ── Capabilities and actor roles ────────────────────────────────────

/// The role capability a stage requires from the acting user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Secretaria,
    Tecnico,
    ChefeDivisao,
    Procurador,
    JuizRelator,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Secretaria => "secretaria",
            Capability::Tecnico => "tecnico",
            Capability::ChefeDivisao => "chefe_divisao",
            Capability::Procurador => "procurador",
            Capability::JuizRelator => "juiz_relator",
        }
    }
}

/// Actor role carried in JWT claims. `Admin` satisfies every capability;
/// `Consulta` is the read-only fallback for unknown role strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Papel {
    Admin,
    JuizRelator,
    Procurador,
    ChefeDivisao,
    Tecnico,
    Secretaria,
    Consulta,
}

impl Papel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Papel::Admin => "admin",
            Papel::JuizRelator => "juiz_relator",
            Papel::Procurador => "procurador",
            Papel::ChefeDivisao => "chefe_divisao",
            Papel::Tecnico => "tecnico",
            Papel::Secretaria => "secretaria",
            Papel::Consulta => "consulta",
        }
    }

    /// Parse a role string from claims, falling back to the read-only role.
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "admin" => Papel::Admin,
            "juiz_relator" => Papel::JuizRelator,
            "procurador" => Papel::Procurador,
            "chefe_divisao" => Papel::ChefeDivisao,
            "tecnico" => Papel::Tecnico,
            "secretaria" => Papel::Secretaria,
            _ => Papel::Consulta,
        }
    }

    /// Whether this role holds the given stage capability.
    pub fn has_capability(&self, cap: Capability) -> bool {
        match self {
            Papel::Admin => true,
            Papel::JuizRelator => cap == Capability::JuizRelator,
            Papel::Procurador => cap == Capability::Procurador,
            Papel::ChefeDivisao => cap == Capability::ChefeDivisao,
            Papel::Tecnico => cap == Capability::Tecnico,
            Papel::Secretaria => cap == Capability::Secretaria,
            Papel::Consulta => false,
        }
    }
}

// ── Stage actions ───────────────────────────────────────────────────

/// Actions a user can submit against the current stage of a case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum StageAction {
    Aprovar,
    Rejeitar,
    PedirDiligencia,
    Suspender,
    Retomar,
}

impl StageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageAction::Aprovar => "aprovar",
            StageAction::Rejeitar => "rejeitar",
            StageAction::PedirDiligencia => "pedir_diligencia",
            StageAction::Suspender => "suspender",
            StageAction::Retomar => "retomar",
        }
    }
}

// ── Stage definition tables ─────────────────────────────────────────

/// Definition of one stage within a process type's ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDef {
    pub stage: Stage,
    /// Capability required to act on this stage.
    pub capability: Capability,
    /// Entering a terminal stage archives the case.
    pub terminal: bool,
    /// Branch target for Rejeitar / PedirDiligencia. None keeps the case
    /// on the current stage.
    pub retorno: Option<Stage>,
}

const fn def(stage: Stage, capability: Capability, terminal: bool, retorno: Option<Stage>) -> StageDef {
    StageDef {
        stage,
        capability,
        terminal,
        retorno,
    }
}

/// Full accounts-review flow: technical analysis, division chief opinion,
/// public-prosecutor vista, then relator decision.
const PRESTACAO_CONTAS_STAGES: &[StageDef] = &[
    def(Stage::Autuacao, Capability::Secretaria, false, None),
    def(Stage::AnaliseTecnica, Capability::Tecnico, false, None),
    def(Stage::ParecerChefe, Capability::ChefeDivisao, false, Some(Stage::AnaliseTecnica)),
    def(Stage::VistaMp, Capability::Procurador, false, Some(Stage::AnaliseTecnica)),
    def(Stage::DecisaoRelator, Capability::JuizRelator, false, Some(Stage::ParecerChefe)),
    def(Stage::Notificacao, Capability::Secretaria, false, None),
    def(Stage::Arquivo, Capability::Secretaria, true, None),
];

/// Prior-review (visto) flow — no MP vista.
const VISTO_STAGES: &[StageDef] = &[
    def(Stage::Autuacao, Capability::Secretaria, false, None),
    def(Stage::AnaliseTecnica, Capability::Tecnico, false, None),
    def(Stage::ParecerChefe, Capability::ChefeDivisao, false, Some(Stage::AnaliseTecnica)),
    def(Stage::DecisaoRelator, Capability::JuizRelator, false, Some(Stage::AnaliseTecnica)),
    def(Stage::Notificacao, Capability::Secretaria, false, None),
    def(Stage::Arquivo, Capability::Secretaria, true, None),
];

const AUTONOMO_MULTA_STAGES: &[StageDef] = &[
    def(Stage::Autuacao, Capability::Secretaria, false, None),
    def(Stage::AnaliseTecnica, Capability::Tecnico, false, None),
    def(Stage::DecisaoRelator, Capability::JuizRelator, false, Some(Stage::AnaliseTecnica)),
    def(Stage::Notificacao, Capability::Secretaria, false, None),
    def(Stage::Arquivo, Capability::Secretaria, true, None),
];

/// Appeals go straight to the MP and are decided in plenary session.
const RECURSO_STAGES: &[StageDef] = &[
    def(Stage::Autuacao, Capability::Secretaria, false, None),
    def(Stage::VistaMp, Capability::Procurador, false, None),
    def(Stage::DecisaoPlenario, Capability::JuizRelator, false, Some(Stage::VistaMp)),
    def(Stage::Notificacao, Capability::Secretaria, false, None),
    def(Stage::Arquivo, Capability::Secretaria, true, None),
];

const OUTROS_STAGES: &[StageDef] = &[
    def(Stage::Autuacao, Capability::Secretaria, false, None),
    def(Stage::AnaliseTecnica, Capability::Tecnico, false, None),
    def(Stage::DecisaoRelator, Capability::JuizRelator, false, Some(Stage::AnaliseTecnica)),
    def(Stage::Arquivo, Capability::Secretaria, true, None),
];

/// The ordered stage list for a process type. Always non-empty and always
/// ends in a terminal stage.
pub fn stage_list(process_type: ProcessType) -> &'static [StageDef] {
    match process_type {
        ProcessType::Visto => VISTO_STAGES,
        ProcessType::PrestacaoContas
        | ProcessType::PrestacaoContasSoberania
        | ProcessType::FiscalizacaoOge => PRESTACAO_CONTAS_STAGES,
        ProcessType::AutonomoMulta => AUTONOMO_MULTA_STAGES,
        ProcessType::Recurso => RECURSO_STAGES,
        ProcessType::Outros => OUTROS_STAGES,
    }
}

/// Find the definition of a stage within a process type's list.
pub fn stage_def(process_type: ProcessType, stage: Stage) -> Option<&'static StageDef> {
    stage_list(process_type).iter().find(|d| d.stage == stage)
}

/// Position of a stage within a process type's list.
pub fn stage_position(process_type: ProcessType, stage: Stage) -> Option<usize> {
    stage_list(process_type).iter().position(|d| d.stage == stage)
}
