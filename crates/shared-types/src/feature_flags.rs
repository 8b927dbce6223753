use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional integrations are active.
///
/// Loaded from `config.toml` at server startup. Every field defaults to
/// `false` so that a missing or incomplete config file disables all
/// optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    #[serde(default)]
    pub telemetry: bool,
}

/// Engine tuning knobs loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineTuning {
    /// A deadline enters Warning when its remaining business days drop to
    /// this percentage of prazo_dias or below.
    #[serde(default = "default_warning_threshold_pct")]
    pub warning_threshold_pct: u32,
    /// Bounded retries for the distribution-cursor compare-and-swap.
    #[serde(default = "default_distribution_retries")]
    pub distribution_retries: u32,
}

fn default_warning_threshold_pct() -> u32 {
    20
}

fn default_distribution_retries() -> u32 {
    3
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            warning_threshold_pct: default_warning_threshold_pct(),
            distribution_retries: default_distribution_retries(),
        }
    }
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub engine: EngineTuning,
}
