use std::path::PathBuf;

/// Errors raised by the grid, symbol catalog and spin session.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("cell ({row}, {col}) is outside the 3x5 grid")]
    OutOfBounds { row: usize, col: usize },

    #[error("unknown symbol asset key: {0}")]
    UnknownSymbol(String),

    #[error("a spin is already in progress")]
    SpinInProgress,

    #[error("no spin is in progress")]
    NotSpinning,

    #[error("invalid HMAC key: {0}")]
    HmacKey(#[from] hmac::digest::InvalidLength),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_display() {
        let err = CoreError::OutOfBounds { row: 3, col: 1 };
        assert_eq!(err.to_string(), "cell (3, 1) is outside the 3x5 grid");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("timing.reel_duration_ms must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: timing.reel_duration_ms must be > 0"
        );
    }
}
