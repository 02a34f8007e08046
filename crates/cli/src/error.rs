use inscriber_core::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("core error")]
    Core(#[from] inscriber_core::error::Error),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("io error")]
    Io(#[from] std::io::Error),

    #[error("failed to parse run file")]
    RunFile(#[from] toml::de::Error),
}
