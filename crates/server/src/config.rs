use shared_types::{AppConfig, EngineTuning, FeatureFlags};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml` and store the parsed config in the global
/// `OnceLock`. Safe to call multiple times — only the first call has effect.
///
/// If the file is missing or unparseable, flags default to off and the
/// engine tuning falls back to its built-in defaults.
pub fn load_config() {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config: AppConfig = toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("[config] Failed to parse {CONFIG_PATH}: {e} — using defaults");
                AppConfig::default()
            });
            eprintln!(
                "[config] Feature flags: {:?}; engine tuning: {:?}",
                config.features, config.engine
            );
            config
        }
        Err(e) => {
            eprintln!("[config] {CONFIG_PATH} not found ({e}) — using defaults");
            AppConfig::default()
        }
    });
}

/// Get the loaded feature flags. Returns all-off defaults if
/// `load_config()` hasn't been called yet (safe fallback).
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags { telemetry: false };
    CONFIG.get().map(|c| &c.features).unwrap_or(&DEFAULT)
}

/// Get the loaded engine tuning. Built-in defaults apply until
/// `load_config()` runs.
pub fn engine_tuning() -> EngineTuning {
    CONFIG
        .get()
        .map(|c| c.engine.clone())
        .unwrap_or_default()
}
