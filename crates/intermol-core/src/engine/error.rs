use thiserror::Error;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Valence model covers {model} atoms but the structure has {structure}")]
    ValenceMismatch { model: usize, structure: usize },
}
