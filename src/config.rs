//! Application configuration from `TUI_2048_*` environment variables.

use anyhow::{Context, Result};

use crate::core::{EngineConfig, SpawnDistribution};
use crate::types::MOVE_COOLDOWN_MS;

/// Everything the binary reads from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    /// Fixed seed for replays; `None` draws one from OS entropy.
    pub seed: Option<u32>,
    pub move_cooldown_ms: u32,
    /// Log file; logging is off when unset since stdout belongs to the UI.
    pub log_path: Option<String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            seed: None,
            move_cooldown_ms: MOVE_COOLDOWN_MS,
            log_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(v) = get("TUI_2048_SIZE") {
            config.engine.size = v.parse().with_context(|| format!("TUI_2048_SIZE={v}"))?;
        }
        if let Some(v) = get("TUI_2048_TARGET") {
            config.engine.win_target = v.parse().with_context(|| format!("TUI_2048_TARGET={v}"))?;
        }
        if let Some(v) = get("TUI_2048_FOUR_PER_MILLE") {
            let high_per_mille = v
                .parse()
                .with_context(|| format!("TUI_2048_FOUR_PER_MILLE={v}"))?;
            config.engine.spawn = SpawnDistribution {
                high_per_mille,
                ..config.engine.spawn
            };
        }
        if let Some(v) = get("TUI_2048_SEED") {
            config.seed = Some(v.parse().with_context(|| format!("TUI_2048_SEED={v}"))?);
        }
        if let Some(v) = get("TUI_2048_MOVE_COOLDOWN_MS") {
            config.move_cooldown_ms = v
                .parse()
                .with_context(|| format!("TUI_2048_MOVE_COOLDOWN_MS={v}"))?;
        }
        config.log_path = get("TUI_2048_LOG_PATH");
        if let Some(v) = get("TUI_2048_LOG") {
            config.log_filter = v;
        }

        config
            .engine
            .validate()
            .context("invalid game configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.move_cooldown_ms, 500);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TUI_2048_SIZE", "5"),
            ("TUI_2048_TARGET", " 1024 "),
            ("TUI_2048_FOUR_PER_MILLE", "250"),
            ("TUI_2048_SEED", "42"),
            ("TUI_2048_MOVE_COOLDOWN_MS", "0"),
            ("TUI_2048_LOG_PATH", "/tmp/2048.log"),
            ("TUI_2048_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.engine.size, 5);
        assert_eq!(config.engine.win_target, 1024);
        assert_eq!(config.engine.spawn.high_per_mille, 250);
        assert_eq!(config.engine.spawn.low, 2);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.move_cooldown_ms, 0);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/2048.log"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[("TUI_2048_SEED", "  "), ("TUI_2048_LOG_PATH", "")])).unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.log_path, None);
    }

    #[test]
    fn test_rejects_garbage_and_invalid_rules() {
        assert!(AppConfig::from_lookup(lookup(&[("TUI_2048_SIZE", "four")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("TUI_2048_SIZE", "1")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("TUI_2048_TARGET", "1000")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("TUI_2048_FOUR_PER_MILLE", "1001")])).is_err());
    }
}
