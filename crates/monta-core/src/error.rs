use thiserror::Error;

#[derive(Debug, Error)]
pub enum MontaError {
    #[error("missing setting: {0}")]
    MissingSetting(String),

    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("mapping error: {0}")]
    Mapping(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MontaError>;
