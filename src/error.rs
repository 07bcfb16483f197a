use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("particle count must be positive, got {0}")]
    InvalidParticleCount(i32),

    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid parameters file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
