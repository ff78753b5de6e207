use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::engine::suggestions::DEFAULT_MAX_ENTRIES;

/// Top-level bot configuration, loaded from prowl.toml.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct BotConfig {
    pub roasts: RoastSection,
    pub suggestions: SuggestionSection,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct RoastSection {
    /// Per-message chance of an unprompted roast, 0.0..=1.0.
    pub probability: f64,
}

impl Default for RoastSection {
    fn default() -> Self {
        Self { probability: 0.2 }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct SuggestionSection {
    /// Cap on stored suggestions; additions past it are rejected.
    pub max_entries: usize,
}

impl Default for SuggestionSection {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl BotConfig {
    /// Load config from a TOML file. Falls back to defaults if the file
    /// doesn't exist. Environment variables override TOML values.
    pub fn load(path: &str) -> Self {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read config file {}: {}", path, e));
            toml::from_str(&contents)
                .unwrap_or_else(|e| panic!("failed to parse config file {}: {}", path, e))
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ROAST_PROBABILITY")
            && let Ok(p) = v.parse()
        {
            self.roasts.probability = p;
        }
        if let Ok(v) = std::env::var("SUGGESTION_MAX_ENTRIES")
            && let Ok(n) = v.parse()
        {
            self.suggestions.max_entries = n;
        }
    }
}
