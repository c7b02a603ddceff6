use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("unknown drill difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("invalid selection config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T, E = SelectionError> = std::result::Result<T, E>;
