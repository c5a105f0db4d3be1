use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::session::{SlotSession, SpinTiming};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub server_seed: String,
    pub client_seed: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            server_seed: "dev-server-seed".to_string(),
            client_seed: "demo-seed".to_string(),
        }
    }
}

/// Game configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timing: SpinTiming,
    pub seeds: SeedConfig,
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.reel_duration_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.reel_duration_ms must be > 0".into(),
            ));
        }
        if self.timing.drop_distance.is_nan() || self.timing.drop_distance < 0.0 {
            return Err(ConfigError::Validation(
                "timing.drop_distance must be >= 0".into(),
            ));
        }
        if self.seeds.server_seed.is_empty() {
            return Err(ConfigError::Validation(
                "seeds.server_seed must not be empty".into(),
            ));
        }
        if self.seeds.client_seed.is_empty() {
            return Err(ConfigError::Validation(
                "seeds.client_seed must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn session(&self) -> SlotSession {
        SlotSession::new(
            self.seeds.server_seed.clone(),
            self.seeds.client_seed.clone(),
            self.timing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = GameConfig::from_toml(
            r#"
            [timing]
            reel_stagger_ms = 150

            [seeds]
            client_seed = "alice"
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.reel_stagger_ms, 150);
        assert_eq!(config.timing.reel_duration_ms, 500);
        assert_eq!(config.seeds.client_seed, "alice");
        assert_eq!(config.seeds.server_seed, "dev-server-seed");
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = GameConfig::from_toml("[timing]\nreel_duration_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = GameConfig::from_toml("timing = 3").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load_or_default(Path::new("/nonexistent/reelconnect.toml")).unwrap();
        assert_eq!(config.timing, SpinTiming::default());
    }

    #[test]
    fn test_huge_timings_still_spin() {
        let config = GameConfig::from_toml("[timing]\nreel_stagger_ms = 9223372036854775807\n").unwrap();
        let mut session = config.session();
        assert!(session.start_spin().is_ok());

        let config = GameConfig::from_toml(
            "[timing]\nreel_duration_ms = 9223372036854775807\nreel_stagger_ms = 9223372036854775807\n",
        )
        .unwrap();
        assert_eq!(
            config.timing.evaluation_delay(),
            std::time::Duration::from_millis(u64::MAX)
        );
    }
}
